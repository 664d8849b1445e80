//! Crawl statistics aggregation
//!
//! The reporter accumulates pipeline outcomes for one run: processed job
//! counts, duplicates, failures, frequency distributions, and salary
//! samples. It is the only owner of this state; the pipeline and frontier
//! report through its methods and never read it back mid-run.

use crate::job::JobRecord;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::sync::Mutex;

/// One salary observation from a processed job
#[derive(Debug, Clone, PartialEq)]
pub struct SalarySample {
    pub min: f64,
    pub max: f64,
    pub currency: Option<String>,
    pub period: Option<String>,
}

#[derive(Debug, Default)]
struct ReportData {
    total_jobs: u64,
    duplicates: u64,
    failed: u64,
    // IndexMap keeps first-insertion order, which breaks ties in the top-N views
    locations: IndexMap<String, u64>,
    tags: IndexMap<String, u64>,
    companies: IndexMap<String, u64>,
    employment_types: IndexMap<String, u64>,
    salaries: Vec<SalarySample>,
    failed_urls: Vec<String>,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
}

/// Statistics aggregator for one crawl run
#[derive(Debug, Default)]
pub struct Reporter {
    data: Mutex<ReportData>,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the start of the crawl
    pub fn start_timer(&self) {
        self.data.lock().unwrap().start_time = Some(Utc::now());
    }

    /// Marks the end of the crawl
    pub fn end_timer(&self) {
        self.data.lock().unwrap().end_time = Some(Utc::now());
    }

    /// Records a successfully processed job and updates the distributions
    pub fn add_job(&self, job: &JobRecord) {
        let mut data = self.data.lock().unwrap();
        data.total_jobs += 1;

        if let Some(location) = &job.location {
            *data.locations.entry(location.clone()).or_insert(0) += 1;
        }
        for tag in &job.tags {
            *data.tags.entry(tag.clone()).or_insert(0) += 1;
        }
        if let Some(company) = &job.company_name {
            *data.companies.entry(company.clone()).or_insert(0) += 1;
        }
        if let (Some(min), Some(max)) = (job.salary_min, job.salary_max) {
            data.salaries.push(SalarySample {
                min,
                max,
                currency: job.salary_currency.clone(),
                period: job.salary_period.clone(),
            });
        }
        if let Some(employment_type) = &job.employment_type {
            *data
                .employment_types
                .entry(employment_type.clone())
                .or_insert(0) += 1;
        }
    }

    /// Records a skipped duplicate candidate
    pub fn add_duplicate(&self) {
        self.data.lock().unwrap().duplicates += 1;
    }

    /// Records a failed candidate, remembering the URL when known
    pub fn add_failed(&self, url: Option<&str>) {
        let mut data = self.data.lock().unwrap();
        data.failed += 1;
        if let Some(url) = url {
            data.failed_urls.push(url.to_string());
        }
    }

    /// Produces the end-of-run summary view
    pub fn summary(&self) -> CrawlSummary {
        let data = self.data.lock().unwrap();

        let duration_seconds = match (data.start_time, data.end_time) {
            (Some(start), Some(end)) => {
                Some((end - start).num_milliseconds() as f64 / 1000.0)
            }
            _ => None,
        };

        let (avg_salary_min, avg_salary_max) = if data.salaries.is_empty() {
            (None, None)
        } else {
            let count = data.salaries.len() as f64;
            let min_sum: f64 = data.salaries.iter().map(|s| s.min).sum();
            let max_sum: f64 = data.salaries.iter().map(|s| s.max).sum();
            (Some(min_sum / count), Some(max_sum / count))
        };

        CrawlSummary {
            duration_seconds,
            total_jobs: data.total_jobs,
            duplicates: data.duplicates,
            failed: data.failed,
            top_locations: top_n(&data.locations, 5),
            top_tags: top_n(&data.tags, 5),
            top_companies: top_n(&data.companies, 5),
            salary_count: data.salaries.len(),
            avg_salary_min,
            avg_salary_max,
            salary_currency: data.salaries.first().and_then(|s| s.currency.clone()),
            salary_period: data.salaries.first().and_then(|s| s.period.clone()),
            top_employment_types: top_n(&data.employment_types, 3),
            unique_locations: data.locations.len(),
            unique_tags: data.tags.len(),
            unique_companies: data.companies.len(),
            failed_urls: data.failed_urls.iter().take(5).cloned().collect(),
        }
    }

    /// Prints the summary report to stdout
    pub fn print_summary(&self) {
        let summary = self.summary();

        println!("\n--- CRAWL SUMMARY REPORT ---\n");
        if let Some(duration) = summary.duration_seconds {
            println!("Crawl duration: {:.2} seconds", duration);
        }
        println!("Total jobs processed: {}", summary.total_jobs);
        println!("Duplicates skipped: {}", summary.duplicates);
        println!("Failed/invalid jobs: {}", summary.failed);

        println!("\nTop locations:");
        for (location, count) in &summary.top_locations {
            println!("  {}: {}", location, count);
        }

        println!("\nTop tags:");
        for (tag, count) in &summary.top_tags {
            println!("  {}: {}", tag, count);
        }

        println!("\nTop companies:");
        for (company, count) in &summary.top_companies {
            println!("  {}: {}", company, count);
        }

        println!("\nSalary stats:");
        if summary.salary_count > 0 {
            let currency = summary.salary_currency.as_deref().unwrap_or("");
            let period = summary.salary_period.as_deref().unwrap_or("");
            println!("  Jobs with salary info: {}", summary.salary_count);
            if let Some(avg_min) = summary.avg_salary_min {
                println!("  Average min: {:.2} {} / {}", avg_min, currency, period);
            }
            if let Some(avg_max) = summary.avg_salary_max {
                println!("  Average max: {:.2} {} / {}", avg_max, currency, period);
            }
        } else {
            println!("  No salary info available.");
        }

        println!("\nTop employment types:");
        if summary.top_employment_types.is_empty() {
            println!("  No employment type data available.");
        } else {
            for (employment_type, count) in &summary.top_employment_types {
                println!("  {}: {}", employment_type, count);
            }
        }

        println!("\nUnique locations: {}", summary.unique_locations);
        println!("Unique tags: {}", summary.unique_tags);
        println!("Unique companies: {}", summary.unique_companies);

        if !summary.failed_urls.is_empty() {
            println!("\nFailed job URLs (first 5):");
            for url in &summary.failed_urls {
                println!("  {}", url);
            }
        }

        println!("---------------------------\n");
    }
}

/// Top `n` entries by descending count
///
/// The stable sort preserves map insertion order for equal counts, so ties
/// go to the key seen first.
fn top_n(map: &IndexMap<String, u64>, n: usize) -> Vec<(String, u64)> {
    let mut entries: Vec<(String, u64)> = map
        .iter()
        .filter(|(_, &count)| count > 0)
        .map(|(key, &count)| (key.clone(), count))
        .collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries.truncate(n);
    entries
}

/// Summary view of one crawl run
#[derive(Debug, Clone, Default)]
pub struct CrawlSummary {
    pub duration_seconds: Option<f64>,
    pub total_jobs: u64,
    pub duplicates: u64,
    pub failed: u64,
    pub top_locations: Vec<(String, u64)>,
    pub top_tags: Vec<(String, u64)>,
    pub top_companies: Vec<(String, u64)>,
    pub salary_count: usize,
    pub avg_salary_min: Option<f64>,
    pub avg_salary_max: Option<f64>,
    pub salary_currency: Option<String>,
    pub salary_period: Option<String>,
    pub top_employment_types: Vec<(String, u64)>,
    pub unique_locations: usize,
    pub unique_tags: usize,
    pub unique_companies: usize,
    pub failed_urls: Vec<String>,
}
