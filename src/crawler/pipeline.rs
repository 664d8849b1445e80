//! Job fetch pipeline
//!
//! Takes one listing candidate through policy, dedup, fetch, parse,
//! validate, and persist. Every outcome is reported to the stats
//! aggregator; a failure in one candidate never aborts its siblings or the
//! page handler.

use crate::crawler::fetcher::fetch_page;
use crate::crawler::listing::JobCandidate;
use crate::job::{is_valid, parse_job};
use crate::output::Reporter;
use crate::robots::RobotsPolicy;
use crate::state::DedupRegistry;
use crate::storage::JobSink;
use reqwest::Client;
use std::sync::Arc;

/// Per-candidate processing pipeline
pub struct JobFetchPipeline {
    client: Client,
    robots: Arc<RobotsPolicy>,
    dedup: Arc<DedupRegistry>,
    reporter: Arc<Reporter>,
    sink: Arc<dyn JobSink>,
}

impl JobFetchPipeline {
    pub fn new(
        client: Client,
        robots: Arc<RobotsPolicy>,
        dedup: Arc<DedupRegistry>,
        reporter: Arc<Reporter>,
        sink: Arc<dyn JobSink>,
    ) -> Self {
        Self {
            client,
            robots,
            dedup,
            reporter,
            sink,
        }
    }

    /// Processes one candidate end to end
    ///
    /// Candidates missing an id or URL, and candidates disallowed by
    /// robots.txt, count as failed. A job id seen earlier in the run counts
    /// as a duplicate. A record failing validation is dropped without a
    /// report.
    pub async fn process(&self, candidate: JobCandidate) {
        let Some(url) = candidate.url else {
            self.reporter.add_failed(None);
            return;
        };
        let Some(id) = candidate.id else {
            self.reporter.add_failed(Some(&url));
            return;
        };
        if !self.robots.is_allowed(&url).await {
            self.reporter.add_failed(Some(&url));
            return;
        }

        if !self.dedup.mark_job_seen(&id) {
            self.reporter.add_duplicate();
            return;
        }

        if let Err(e) = self.fetch_and_store(&id, &url).await {
            self.reporter.add_failed(Some(&url));
            tracing::error!("Failed to process job {}: {}", url, e);
        }
    }

    async fn fetch_and_store(&self, id: &str, url: &str) -> crate::Result<()> {
        let page = fetch_page(&self.client, url).await?;
        let mut record = parse_job(&page.body, id, url);

        if !is_valid(&mut record) {
            tracing::debug!("Dropping invalid job record from {}", url);
            return Ok(());
        }

        self.reporter.add_job(&record);
        self.sink.push(&record)?;
        Ok(())
    }
}
