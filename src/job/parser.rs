//! Job detail page extractor
//!
//! Pulls structured fields out of a profesia.sk job detail page. The
//! extractor is pure and never fails on malformed input: every field that
//! cannot be found becomes `None` (or an empty list for tags).

use crate::job::JobRecord;
use chrono::NaiveDate;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// Parses job detail HTML into a [`JobRecord`]
///
/// `job_id` and `job_url` are passed through unchanged from the listing
/// candidate.
pub fn parse_job(html: &str, job_id: &str, job_url: &str) -> JobRecord {
    let document = Html::parse_document(html);

    let job_title = select_text(&document, "h1[itemprop=\"title\"]");
    let company_name = select_text(&document, "h2[itemprop=\"hiringOrganization\"] span");
    let company_url = company_name
        .as_deref()
        .and_then(|name| extract_company_url(&document, name));
    let location = extract_location(&document);
    let (salary_min, salary_max, salary_currency, salary_period) = extract_salary(&document);
    let employment_type = select_text(&document, "span[itemprop=\"employmentType\"]");
    let tags = extract_tags(&document);
    let posted_at = extract_posted_at(&document);
    let description = select_text(&document, "div.details-desc");

    JobRecord {
        job_id: job_id.to_string(),
        job_title,
        company_name,
        company_url,
        location,
        salary_min,
        salary_max,
        salary_currency,
        salary_period,
        employment_type,
        tags,
        posted_at,
        job_url: job_url.to_string(),
        description,
    }
}

/// First element matching the selector, as trimmed non-empty text
fn select_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// The immediately following sibling element, if any
fn next_element(element: ElementRef) -> Option<ElementRef> {
    element.next_siblings().find_map(ElementRef::wrap)
}

/// Company profile link: an anchor in a `span.hidden-xs` whose text repeats
/// the company name; hrefs are site-relative
fn extract_company_url(document: &Html, company_name: &str) -> Option<String> {
    let selector = Selector::parse("span.hidden-xs a").ok()?;
    document
        .select(&selector)
        .find(|a| a.text().collect::<String>().contains(company_name))
        .and_then(|a| a.value().attr("href"))
        .map(|href| format!("https://www.profesia.sk{}", href))
}

/// Location follows a `Miesto práce` label as `<strong>label</strong><br><span>value</span>`
fn extract_location(document: &Html) -> Option<String> {
    let selector = Selector::parse("strong").ok()?;
    for strong in document.select(&selector) {
        if !strong.text().collect::<String>().contains("Miesto práce") {
            continue;
        }
        let Some(br) = next_element(strong) else {
            continue;
        };
        if br.value().name() != "br" {
            continue;
        }
        let Some(span) = next_element(br) else {
            continue;
        };
        if span.value().name() != "span" {
            continue;
        }
        let text = span.text().collect::<String>().trim().to_string();
        if !text.is_empty() {
            return Some(text);
        }
    }
    None
}

/// Salary range like `2 000 – 3 000 EUR/mesiac`; `dohodou` (by agreement)
/// carries no salary data
fn extract_salary(document: &Html) -> (Option<f64>, Option<f64>, Option<String>, Option<String>) {
    let Some(salary_text) = select_text(document, ".salary-range") else {
        return (None, None, None, None);
    };
    if salary_text.to_lowercase().contains("dohodou") {
        return (None, None, None, None);
    }

    let Some(re) = Regex::new(r"(?i)([\d\s]+)(?:\s*–\s*([\d\s]+))?\s*(EUR)/([a-z]+)").ok() else {
        return (None, None, None, None);
    };
    let Some(caps) = re.captures(&salary_text) else {
        return (None, None, None, None);
    };

    let Some(min) = caps.get(1).and_then(|m| parse_amount(m.as_str())) else {
        return (None, None, None, None);
    };
    let max = caps
        .get(2)
        .and_then(|m| parse_amount(m.as_str()))
        .unwrap_or(min);
    let currency = caps.get(3).map(|m| m.as_str().to_string());
    let period = caps.get(4).map(|m| m.as_str().to_string());

    (Some(min), Some(max), currency, period)
}

/// Parses a digit-grouped amount like `2 000`
fn parse_amount(text: &str) -> Option<f64> {
    let digits: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    digits.parse().ok()
}

/// Skill/category tags link back into the listing tree
fn extract_tags(document: &Html) -> Vec<String> {
    let mut tags = Vec::new();
    if let Ok(selector) = Selector::parse("span.hidden-xs a[href*=\"/praca/\"]") {
        for element in document.select(&selector) {
            let tag = element.text().collect::<String>().trim().to_string();
            if !tag.is_empty() {
                tags.push(tag);
            }
        }
    }
    tags
}

/// Posted date follows a `Dátum zverejnenia` label as `d.m.yyyy`
fn extract_posted_at(document: &Html) -> Option<NaiveDate> {
    let selector = Selector::parse(".padding-on-bottom strong").ok()?;
    let strong = document
        .select(&selector)
        .find(|s| s.text().collect::<String>().contains("Dátum zverejnenia"))?;
    let span = next_element(strong)?;
    if span.value().name() != "span" {
        return None;
    }
    let text = span.text().collect::<String>().trim().to_string();

    let re = Regex::new(r"(\d{1,2})\.(\d{1,2})\.(\d{4})").ok()?;
    let caps = re.captures(&text)?;
    let day: u32 = caps.get(1)?.as_str().parse().ok()?;
    let month: u32 = caps.get(2)?.as_str().parse().ok()?;
    let year: i32 = caps.get(3)?.as_str().parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_document() {
        let html = r#"
            <html>
                <h1 itemprop="title">Test Job Title</h1>
                <h2 itemprop="hiringOrganization"><span>Test Company</span></h2>
                <span class="hidden-xs"><a href="/firma/test-company">Test Company</a></span>
                <strong>Miesto práce</strong><br><span>Bratislava</span>
                <div class="salary-range">1 000 – 2 000 EUR/mesiac</div>
                <span itemprop="employmentType">plný úväzok</span>
                <span class="hidden-xs"><a href="/praca/tag1">Tag1</a></span>
                <span class="hidden-xs"><a href="/praca/tag2">Tag2</a></span>
                <div class="details-desc">Test description</div>
            </html>
        "#;
        let record = parse_job(html, "test123", "https://www.profesia.sk/praca/test123");

        assert_eq!(record.job_id, "test123");
        assert_eq!(record.job_title.as_deref(), Some("Test Job Title"));
        assert_eq!(record.company_name.as_deref(), Some("Test Company"));
        assert_eq!(
            record.company_url.as_deref(),
            Some("https://www.profesia.sk/firma/test-company")
        );
        assert_eq!(record.location.as_deref(), Some("Bratislava"));
        assert_eq!(record.employment_type.as_deref(), Some("plný úväzok"));
        assert_eq!(record.description.as_deref(), Some("Test description"));
        assert_eq!(record.job_url, "https://www.profesia.sk/praca/test123");
    }

    #[test]
    fn test_missing_fields_become_none() {
        let record = parse_job("<html></html>", "id2", "url2");
        assert_eq!(record.job_title, None);
        assert_eq!(record.company_name, None);
        assert_eq!(record.company_url, None);
        assert_eq!(record.location, None);
        assert_eq!(record.salary_min, None);
        assert_eq!(record.posted_at, None);
        assert!(record.tags.is_empty());
    }

    #[test]
    fn test_parse_salary_range() {
        let html = r#"<div class="salary-range">2 000 – 3 000 EUR/mesiac</div>"#;
        let record = parse_job(html, "id4", "url4");
        assert_eq!(record.salary_min, Some(2000.0));
        assert_eq!(record.salary_max, Some(3000.0));
        assert_eq!(record.salary_currency.as_deref(), Some("EUR"));
        assert_eq!(record.salary_period.as_deref(), Some("mesiac"));
    }

    #[test]
    fn test_parse_salary_single_value() {
        let html = r#"<div class="salary-range">800 EUR/hod</div>"#;
        let record = parse_job(html, "id", "url");
        assert_eq!(record.salary_min, Some(800.0));
        assert_eq!(record.salary_max, Some(800.0));
        assert_eq!(record.salary_period.as_deref(), Some("hod"));
    }

    #[test]
    fn test_salary_by_agreement_has_no_data() {
        let html = r#"<div class="salary-range">Dohodou</div>"#;
        let record = parse_job(html, "id", "url");
        assert_eq!(record.salary_min, None);
        assert_eq!(record.salary_max, None);
        assert_eq!(record.salary_currency, None);
    }

    #[test]
    fn test_extract_multiple_tags() {
        let html = r#"
            <html>
                <span class="hidden-xs"><a href="/praca/tagA">TagA</a></span>
                <span class="hidden-xs"><a href="/praca/tagB">TagB</a></span>
                <span class="hidden-xs"><a href="/praca/tagC">TagC</a></span>
            </html>
        "#;
        let record = parse_job(html, "id6", "url6");
        assert_eq!(record.tags, vec!["TagA", "TagB", "TagC"]);
    }

    #[test]
    fn test_tags_ignore_non_listing_links() {
        let html = r#"
            <html>
                <span class="hidden-xs"><a href="/firma/acme">Acme</a></span>
                <span class="hidden-xs"><a href="/praca/it">IT</a></span>
            </html>
        "#;
        let record = parse_job(html, "id", "url");
        assert_eq!(record.tags, vec!["IT"]);
    }

    #[test]
    fn test_parse_posted_at() {
        let html = r#"
            <html>
                <div class="padding-on-bottom">
                    <strong>Dátum zverejnenia</strong>
                    <span>1.7.2025</span>
                </div>
            </html>
        "#;
        let record = parse_job(html, "id7", "url7");
        assert_eq!(record.posted_at, NaiveDate::from_ymd_opt(2025, 7, 1));
    }

    #[test]
    fn test_invalid_posted_at_is_none() {
        let html = r#"
            <html>
                <div class="padding-on-bottom">
                    <strong>Dátum zverejnenia</strong>
                    <span>32.13.2025</span>
                </div>
            </html>
        "#;
        let record = parse_job(html, "id", "url");
        assert_eq!(record.posted_at, None);
    }

    #[test]
    fn test_parse_employment_type() {
        let html = r#"<span itemprop="employmentType">živnosť</span>"#;
        let record = parse_job(html, "id5", "url5");
        assert_eq!(record.employment_type.as_deref(), Some("živnosť"));
    }

    #[test]
    fn test_title_whitespace_is_trimmed() {
        let html = r#"<h1 itemprop="title">  Spaced Title  </h1>"#;
        let record = parse_job(html, "id", "url");
        assert_eq!(record.job_title.as_deref(), Some("Spaced Title"));
    }
}
