//! HTTP fetch collaborator
//!
//! One shared client serves robots.txt, listing pages, and job detail
//! fetches. A non-success status surfaces as an error so callers can count
//! the page as failed; transport errors never panic.

use crate::config::UserAgentConfig;
use crate::PracantError;
use reqwest::Client;
use std::time::Duration;

/// A successfully fetched page
#[derive(Debug)]
pub struct FetchedPage {
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: String,
}

/// Builds the crawler's HTTP client
///
/// The user agent identifies the crawler and its operator:
/// `CrawlerName/Version (+ContactURL; ContactEmail)`.
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL, treating any non-success status as an error
pub async fn fetch_page(client: &Client, url: &str) -> crate::Result<FetchedPage> {
    let response = client.get(url).send().await?;
    let status = response.status();

    if !status.is_success() {
        return Err(PracantError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().await?;
    Ok(FetchedPage {
        status: status.as_u16(),
        body,
    })
}
