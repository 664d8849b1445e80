//! Listing page extraction
//!
//! Pulls the three things the frontier needs out of a rendered listing
//! page: job detail candidates, the single "next page" link, and the
//! fallback pagination anchors. All hrefs are resolved against the page
//! URL before filtering, mirroring how a browser exposes absolute links.

use scraper::{Html, Selector};
use url::Url;

/// A possible job detail link extracted from a listing row
///
/// Not yet validated; either field may be missing in broken markup.
#[derive(Debug, Clone, PartialEq)]
pub struct JobCandidate {
    pub id: Option<String>,
    pub url: Option<String>,
}

/// Everything extracted from one listing page
#[derive(Debug, Clone, Default)]
pub struct ListingPage {
    /// Job detail candidates from the listing rows
    pub job_candidates: Vec<JobCandidate>,
    /// The single "next page" link, if present
    pub next_url: Option<String>,
    /// Fallback pagination anchors, in document order
    pub pagination_urls: Vec<String>,
}

/// Parses a listing page
pub fn parse_listing(html: &str, base_url: &Url) -> ListingPage {
    let document = Html::parse_document(html);

    ListingPage {
        job_candidates: extract_job_candidates(&document, base_url),
        next_url: extract_next_url(&document, base_url),
        pagination_urls: extract_pagination_urls(&document, base_url),
    }
}

/// Job rows carry their posting id on the title anchor
fn extract_job_candidates(document: &Html, base_url: &Url) -> Vec<JobCandidate> {
    let mut candidates = Vec::new();
    if let Ok(selector) = Selector::parse("li.list-row h2 a") {
        for element in document.select(&selector) {
            let id = element
                .value()
                .attr("id")
                .filter(|id| !id.is_empty())
                .map(str::to_string);
            let url = element
                .value()
                .attr("href")
                .and_then(|href| resolve(href, base_url));
            candidates.push(JobCandidate { id, url });
        }
    }
    candidates
}

fn extract_next_url(document: &Html, base_url: &Url) -> Option<String> {
    let selector = Selector::parse("li > a.next").ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|a| a.value().attr("href"))
        .and_then(|href| resolve(href, base_url))
}

/// Fallback pagination: listing-tree anchors (`praca` in the path) that are
/// not detail links and carry no id attribute
fn extract_pagination_urls(document: &Html, base_url: &Url) -> Vec<String> {
    let mut urls = Vec::new();
    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            if element
                .value()
                .attr("id")
                .is_some_and(|id| !id.is_empty())
            {
                continue;
            }
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let Some(absolute) = resolve(href, base_url) else {
                continue;
            };
            if absolute.contains("praca") && !absolute.contains("detail") {
                urls.push(absolute);
            }
        }
    }
    urls
}

fn resolve(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    base_url.join(href).ok().map(|u| u.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://www.profesia.sk/praca/").unwrap()
    }

    #[test]
    fn test_extract_job_candidates() {
        let html = r#"
            <ul>
                <li class="list-row"><h2><a id="job-1" href="/praca/detail/1">First</a></h2></li>
                <li class="list-row"><h2><a id="job-2" href="https://www.profesia.sk/praca/detail/2">Second</a></h2></li>
            </ul>
        "#;
        let listing = parse_listing(html, &base_url());
        assert_eq!(listing.job_candidates.len(), 2);
        assert_eq!(listing.job_candidates[0].id.as_deref(), Some("job-1"));
        assert_eq!(
            listing.job_candidates[0].url.as_deref(),
            Some("https://www.profesia.sk/praca/detail/1")
        );
    }

    #[test]
    fn test_job_candidate_without_id_or_href() {
        let html = r#"
            <li class="list-row"><h2><a href="/praca/detail/1">No id</a></h2></li>
            <li class="list-row"><h2><a id="job-2">No href</a></h2></li>
        "#;
        let listing = parse_listing(html, &base_url());
        assert_eq!(listing.job_candidates[0].id, None);
        assert!(listing.job_candidates[0].url.is_some());
        assert_eq!(listing.job_candidates[1].id.as_deref(), Some("job-2"));
        assert_eq!(listing.job_candidates[1].url, None);
    }

    #[test]
    fn test_extract_next_url() {
        let html = r#"<ul><li><a class="next" href="/praca/?page=2">Next</a></li></ul>"#;
        let listing = parse_listing(html, &base_url());
        assert_eq!(
            listing.next_url.as_deref(),
            Some("https://www.profesia.sk/praca/?page=2")
        );
    }

    #[test]
    fn test_no_next_url() {
        let listing = parse_listing("<html></html>", &base_url());
        assert_eq!(listing.next_url, None);
    }

    #[test]
    fn test_pagination_filters() {
        let html = r#"
            <a href="/praca/it/">IT jobs</a>
            <a href="/praca/detail/123">A detail link</a>
            <a href="/o-nas">About us</a>
            <a id="tracked" href="/praca/sales/">Tracked link</a>
        "#;
        let listing = parse_listing(html, &base_url());
        assert_eq!(
            listing.pagination_urls,
            vec!["https://www.profesia.sk/praca/it/"]
        );
    }

    #[test]
    fn test_pagination_preserves_document_order() {
        let html = r#"
            <a href="/praca/b/">B</a>
            <a href="/praca/a/">A</a>
        "#;
        let listing = parse_listing(html, &base_url());
        assert_eq!(
            listing.pagination_urls,
            vec![
                "https://www.profesia.sk/praca/b/",
                "https://www.profesia.sk/praca/a/"
            ]
        );
    }
}
