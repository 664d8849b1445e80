use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A structured job posting
///
/// Produced once per successfully fetched and parsed job detail page.
/// Immutable after creation except for the `posted_at` normalization
/// performed by the validator. Serialized field names match the export
/// schema (`jobId`, `jobTitle`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub job_id: String,
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub company_url: Option<String>,
    pub location: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub salary_currency: Option<String>,
    pub salary_period: Option<String>,
    pub employment_type: Option<String>,
    pub tags: Vec<String>,
    pub posted_at: Option<NaiveDate>,
    pub job_url: String,
    pub description: Option<String>,
}
