//! Job record validation
//!
//! Decides whether an extracted record is complete enough to persist.
//! Required fields: job title, job id, job URL, and location. URLs must be
//! well-formed absolute URLs. A posted date in the future is normalized to
//! `None` rather than rejecting the record.

use crate::job::JobRecord;
use chrono::Utc;
use url::Url;

/// Validates a job record, normalizing `posted_at` as a side effect
///
/// Returns `false` when a required field is missing or a URL is malformed.
pub fn is_valid(record: &mut JobRecord) -> bool {
    // Required fields must be non-empty strings
    if record.job_id.trim().is_empty() || record.job_url.trim().is_empty() {
        return false;
    }
    if !has_text(&record.job_title) || !has_text(&record.location) {
        return false;
    }

    // Job URL must be a well-formed absolute URL
    if Url::parse(&record.job_url).is_err() {
        return false;
    }

    // Company URL, when present, must also parse
    if let Some(company_url) = &record.company_url {
        if !company_url.is_empty() && Url::parse(company_url).is_err() {
            return false;
        }
    }

    // A posted date in the future is dropped, not fatal
    if let Some(posted_at) = record.posted_at {
        if posted_at > Utc::now().date_naive() {
            record.posted_at = None;
        }
    }

    true
}

fn has_text(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|s| !s.trim().is_empty())
}
