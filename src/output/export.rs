//! End-of-run exports
//!
//! Writes the collected job records to `jobs.json` and `jobs.csv` in the
//! output directory. Every field is flattened to a cleaned string (newlines
//! and runs of whitespace collapsed) so both formats stay line-safe.

use crate::job::JobRecord;
use crate::output::OutputResult;
use serde::Serialize;
use std::path::Path;

/// A job record flattened to cleaned string fields for export
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct CleanedJob {
    job_id: String,
    job_title: String,
    company_name: String,
    company_url: String,
    location: String,
    salary_min: String,
    salary_max: String,
    salary_currency: String,
    salary_period: String,
    employment_type: String,
    tags: String,
    posted_at: String,
    job_url: String,
    description: String,
}

impl CleanedJob {
    fn from_record(record: &JobRecord) -> Self {
        Self {
            job_id: clean_field(&record.job_id),
            job_title: clean_opt(&record.job_title),
            company_name: clean_opt(&record.company_name),
            company_url: clean_opt(&record.company_url),
            location: clean_opt(&record.location),
            salary_min: clean_num(record.salary_min),
            salary_max: clean_num(record.salary_max),
            salary_currency: clean_opt(&record.salary_currency),
            salary_period: clean_opt(&record.salary_period),
            employment_type: clean_opt(&record.employment_type),
            tags: clean_field(&record.tags.join(",")),
            posted_at: record.posted_at.map(|d| d.to_string()).unwrap_or_default(),
            job_url: clean_field(&record.job_url),
            description: clean_opt(&record.description),
        }
    }
}

/// Collapses all whitespace runs (including newlines) to single spaces
fn clean_field(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn clean_opt(value: &Option<String>) -> String {
    value.as_deref().map(clean_field).unwrap_or_default()
}

fn clean_num(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Clears or creates the output directory
///
/// An existing directory keeps its subdirectories; plain files from earlier
/// runs are removed.
pub fn prepare_output_directory(output_dir: &Path) -> OutputResult<()> {
    if output_dir.exists() {
        for entry in std::fs::read_dir(output_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                std::fs::remove_file(entry.path())?;
            }
        }
    } else {
        std::fs::create_dir_all(output_dir)?;
    }
    Ok(())
}

/// Exports jobs to both `jobs.json` and `jobs.csv` in the output directory
pub fn export_jobs(jobs: &[JobRecord], output_dir: &Path) -> OutputResult<()> {
    let cleaned: Vec<CleanedJob> = jobs.iter().map(CleanedJob::from_record).collect();
    export_json(&cleaned, output_dir)?;
    export_csv(&cleaned, output_dir)?;
    Ok(())
}

fn export_json(jobs: &[CleanedJob], output_dir: &Path) -> OutputResult<()> {
    let path = output_dir.join("jobs.json");
    let json = serde_json::to_string_pretty(jobs)?;
    std::fs::write(path, json)?;
    Ok(())
}

fn export_csv(jobs: &[CleanedJob], output_dir: &Path) -> OutputResult<()> {
    let path = output_dir.join("jobs.csv");

    if jobs.is_empty() {
        tracing::info!("No jobs to export to CSV");
        std::fs::write(path, "")?;
        return Ok(());
    }

    let mut writer = csv::Writer::from_path(path)?;
    for job in jobs {
        writer.serialize(job)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_record() -> JobRecord {
        JobRecord {
            job_id: "job-1".to_string(),
            job_title: Some("Rust\nDeveloper".to_string()),
            company_name: Some("Acme   s.r.o.".to_string()),
            location: Some("Bratislava".to_string()),
            salary_min: Some(2000.0),
            salary_max: Some(3000.0),
            salary_currency: Some("EUR".to_string()),
            salary_period: Some("mesiac".to_string()),
            tags: vec!["Rust".to_string(), "Backend".to_string()],
            posted_at: NaiveDate::from_ymd_opt(2025, 7, 1),
            job_url: "https://www.profesia.sk/praca/job-1".to_string(),
            ..JobRecord::default()
        }
    }

    #[test]
    fn test_clean_field_collapses_whitespace() {
        assert_eq!(clean_field("a\r\nb"), "a b");
        assert_eq!(clean_field("a    b"), "a b");
        assert_eq!(clean_field("  padded  "), "padded");
        assert_eq!(clean_field(""), "");
    }

    #[test]
    fn test_cleaned_job_flattens_fields() {
        let cleaned = CleanedJob::from_record(&sample_record());
        assert_eq!(cleaned.job_title, "Rust Developer");
        assert_eq!(cleaned.company_name, "Acme s.r.o.");
        assert_eq!(cleaned.company_url, "");
        assert_eq!(cleaned.salary_min, "2000");
        assert_eq!(cleaned.tags, "Rust,Backend");
        assert_eq!(cleaned.posted_at, "2025-07-01");
    }

    #[test]
    fn test_export_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        export_jobs(&[sample_record()], dir.path()).unwrap();

        let json = std::fs::read_to_string(dir.path().join("jobs.json")).unwrap();
        assert!(json.contains("\"jobId\": \"job-1\""));
        assert!(json.contains("\"jobTitle\": \"Rust Developer\""));

        let csv = std::fs::read_to_string(dir.path().join("jobs.csv")).unwrap();
        let mut lines = csv.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("jobId,jobTitle,companyName"));
        assert!(lines.next().unwrap().contains("job-1"));
    }

    #[test]
    fn test_export_empty_jobs_writes_empty_csv() {
        let dir = tempfile::tempdir().unwrap();
        export_jobs(&[], dir.path()).unwrap();

        assert_eq!(
            std::fs::read_to_string(dir.path().join("jobs.csv")).unwrap(),
            ""
        );
        assert_eq!(
            std::fs::read_to_string(dir.path().join("jobs.json")).unwrap(),
            "[]"
        );
    }

    #[test]
    fn test_prepare_output_directory_clears_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("stale.json"), "old").unwrap();

        prepare_output_directory(dir.path()).unwrap();
        assert!(!dir.path().join("stale.json").exists());
    }

    #[test]
    fn test_prepare_output_directory_creates_missing() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out");
        prepare_output_directory(&nested).unwrap();
        assert!(nested.is_dir());
    }
}
