use serde::Deserialize;

/// Main configuration structure for Pracant
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Listing page the crawl starts from
    #[serde(rename = "start-url")]
    pub start_url: String,

    /// Maximum number of listing pages processed concurrently
    #[serde(default = "default_concurrency")]
    pub concurrency: u32,

    /// Maximum number of listing pages a run may enqueue
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,

    /// Upper bound on listing page fetches per minute
    #[serde(
        rename = "max-requests-per-minute",
        default = "default_max_requests_per_minute"
    )]
    pub max_requests_per_minute: u32,

    /// Retry attempts for a failed listing page fetch
    #[serde(rename = "max-request-retries", default = "default_max_request_retries")]
    pub max_request_retries: u32,

    /// Time budget for handling a single listing page (seconds)
    #[serde(
        rename = "request-handler-timeout-secs",
        default = "default_request_handler_timeout_secs"
    )]
    pub request_handler_timeout_secs: u64,
}

fn default_concurrency() -> u32 {
    2
}

fn default_max_pages() -> u32 {
    4
}

fn default_max_requests_per_minute() -> u32 {
    100
}

fn default_max_request_retries() -> u32 {
    3
}

fn default_request_handler_timeout_secs() -> u64 {
    60
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the full user agent string: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving jobs.json and jobs.csv
    #[serde(default = "default_output_directory")]
    pub directory: String,

    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

fn default_output_directory() -> String {
    "output".to_string()
}
