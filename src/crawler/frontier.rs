//! Crawl frontier
//!
//! Handles one rendered listing page: fans the job pipeline out over every
//! candidate (joining before the handler returns) and decides which next
//! page(s) to enqueue under the page budget and stop signal. Job detail
//! URLs never enter the page queue; they are fetched directly by the
//! pipeline.

use crate::crawler::listing::ListingPage;
use crate::crawler::pipeline::JobFetchPipeline;
use crate::crawler::queue::PageQueue;
use crate::robots::RobotsPolicy;
use crate::state::{CrawlBudget, DedupRegistry, StopFlag};
use std::sync::Arc;
use tokio::task::JoinSet;

/// Decides what gets crawled next
pub struct CrawlFrontier {
    robots: Arc<RobotsPolicy>,
    dedup: Arc<DedupRegistry>,
    budget: Arc<CrawlBudget>,
    stop: Arc<StopFlag>,
    pipeline: Arc<JobFetchPipeline>,
    queue: Arc<PageQueue>,
}

impl CrawlFrontier {
    pub fn new(
        robots: Arc<RobotsPolicy>,
        dedup: Arc<DedupRegistry>,
        budget: Arc<CrawlBudget>,
        stop: Arc<StopFlag>,
        pipeline: Arc<JobFetchPipeline>,
        queue: Arc<PageQueue>,
    ) -> Self {
        Self {
            robots,
            dedup,
            budget,
            stop,
            pipeline,
            queue,
        }
    }

    /// Handles one listing page: process all job candidates, then decide
    /// pagination
    pub async fn handle_page(&self, listing: ListingPage) {
        let mut tasks = JoinSet::new();
        for candidate in listing.job_candidates {
            let pipeline = Arc::clone(&self.pipeline);
            tasks.spawn(async move { pipeline.process(candidate).await });
        }
        // Fan-in: the page handler completes only after every candidate has
        // finished, in whatever order.
        while let Some(result) = tasks.join_next().await {
            if let Err(e) = result {
                tracing::error!("Job candidate task failed: {}", e);
            }
        }

        if self.stop.is_stopped() {
            tracing::debug!("Stop requested; not enqueuing further pages");
            return;
        }

        self.enqueue_next_pages(&listing.next_url, &listing.pagination_urls)
            .await;
    }

    /// Prefers the single "next page" link; otherwise walks the fallback
    /// pagination anchors in extraction order under the budget
    async fn enqueue_next_pages(&self, next_url: &Option<String>, pagination_urls: &[String]) {
        if let Some(next) = next_url {
            if self.robots.is_allowed(next).await {
                if self.budget.try_reserve() {
                    tracing::debug!("Enqueuing next page {}", next);
                    self.queue.enqueue(vec![next.clone()]);
                }
                return;
            }
        }

        for href in pagination_urls {
            if self.stop.is_stopped() {
                break;
            }
            if self.budget.is_exhausted() {
                tracing::debug!("Page budget exhausted; not enqueuing more links");
                break;
            }
            if !self.dedup.mark_url_visited(href) {
                continue;
            }
            if !self.robots.is_allowed(href).await {
                continue;
            }
            if !self.budget.try_reserve() {
                break;
            }
            tracing::debug!("Enqueuing listing page {}", href);
            self.queue.enqueue(vec![href.clone()]);
        }
    }
}
