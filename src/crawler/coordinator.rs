//! Crawl coordinator - main crawl orchestration logic
//!
//! Owns the run-scoped state, seeds the page queue with the start URL, and
//! drives listing page handlers under the configured concurrency, pacing,
//! retry, and timeout limits. A Ctrl-C requests a graceful stop: no new
//! pages are scheduled and in-flight handlers drain.

use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, fetch_page, FetchedPage};
use crate::crawler::frontier::CrawlFrontier;
use crate::crawler::listing::parse_listing;
use crate::crawler::pipeline::JobFetchPipeline;
use crate::crawler::queue::PageQueue;
use crate::output::Reporter;
use crate::robots::RobotsPolicy;
use crate::state::{CrawlBudget, DedupRegistry, StopFlag};
use crate::storage::JobSink;
use crate::PracantError;
use reqwest::Client;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::Instant;
use tokio::task::JoinSet;
use url::Url;

/// Delay between listing fetch retry attempts
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    client: Client,
    robots: Arc<RobotsPolicy>,
    dedup: Arc<DedupRegistry>,
    budget: Arc<CrawlBudget>,
    stop: Arc<StopFlag>,
    queue: Arc<PageQueue>,
    frontier: Arc<CrawlFrontier>,
    reporter: Arc<Reporter>,
    pacer: RequestPacer,
}

impl Coordinator {
    /// Creates a coordinator with fresh run state
    ///
    /// All coordination state (robots cache, dedup sets, budget, stop flag)
    /// is owned by this instance, so tests and repeated runs stay isolated.
    pub fn new(
        config: Config,
        sink: Arc<dyn JobSink>,
        reporter: Arc<Reporter>,
    ) -> crate::Result<Self> {
        let client = build_http_client(&config.user_agent)?;
        let robots = Arc::new(RobotsPolicy::new(client.clone()));
        let dedup = Arc::new(DedupRegistry::new());
        let budget = Arc::new(CrawlBudget::new(config.crawler.max_pages));
        let stop = Arc::new(StopFlag::new());
        let queue = Arc::new(PageQueue::new());

        let pipeline = Arc::new(JobFetchPipeline::new(
            client.clone(),
            Arc::clone(&robots),
            Arc::clone(&dedup),
            Arc::clone(&reporter),
            sink,
        ));
        let frontier = Arc::new(CrawlFrontier::new(
            Arc::clone(&robots),
            Arc::clone(&dedup),
            Arc::clone(&budget),
            Arc::clone(&stop),
            pipeline,
            Arc::clone(&queue),
        ));

        let pacer = RequestPacer::new(config.crawler.max_requests_per_minute);

        Ok(Self {
            config: Arc::new(config),
            client,
            robots,
            dedup,
            budget,
            stop,
            queue,
            frontier,
            reporter,
            pacer,
        })
    }

    /// The stop signal for this run, for external shutdown triggers
    pub fn stop_flag(&self) -> Arc<StopFlag> {
        Arc::clone(&self.stop)
    }

    /// Runs the crawl to completion
    ///
    /// Fails fast when the start URL itself is disallowed by robots.txt;
    /// every later failure is contained to its page or candidate.
    pub async fn run(&self) -> crate::Result<()> {
        let start_url = self.config.crawler.start_url.clone();
        self.reporter.start_timer();

        self.robots.log_robots_info(&start_url).await;
        if !self.robots.is_allowed(&start_url).await {
            return Err(PracantError::StartUrlDisallowed { url: start_url });
        }

        // The seed page takes the first budget slot
        if self.budget.try_reserve() {
            self.queue.enqueue(vec![start_url]);
        }

        let ctrl_c = {
            let stop = Arc::clone(&self.stop);
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::info!("Stop requested; draining in-flight work");
                    stop.request_stop();
                }
            })
        };

        let semaphore = Arc::new(Semaphore::new(self.config.crawler.concurrency as usize));
        let mut handlers: JoinSet<()> = JoinSet::new();
        let mut pages_visited = 0u32;

        loop {
            if self.stop.is_stopped() {
                break;
            }

            let Some(url) = self.queue.pop() else {
                if handlers.is_empty() {
                    break;
                }
                // A running handler may still enqueue more pages
                if let Some(Err(e)) = handlers.join_next().await {
                    tracing::error!("Page handler task failed: {}", e);
                }
                continue;
            };

            self.pacer.wait().await;
            let Ok(permit) = semaphore.clone().acquire_owned().await else {
                break;
            };

            pages_visited += 1;
            let client = self.client.clone();
            let config = Arc::clone(&self.config);
            let frontier = Arc::clone(&self.frontier);
            let dedup = Arc::clone(&self.dedup);
            handlers.spawn(async move {
                let _permit = permit;
                let timeout = Duration::from_secs(config.crawler.request_handler_timeout_secs);
                let handler = handle_listing_page(&client, &config, &frontier, &dedup, &url);
                match tokio::time::timeout(timeout, handler).await {
                    Ok(Ok(())) => tracing::debug!("Closed listing page {}", url),
                    Ok(Err(e)) => tracing::error!("Error processing {}: {}", url, e),
                    Err(_) => tracing::error!("Handler for {} timed out", url),
                }
            });
        }

        // Drain whatever is still in flight
        while let Some(result) = handlers.join_next().await {
            if let Err(e) = result {
                tracing::error!("Page handler task failed: {}", e);
            }
        }
        ctrl_c.abort();

        self.reporter.end_timer();
        tracing::info!(
            "Crawl finished: {} listing pages visited, {}/{} budget slots used",
            pages_visited,
            self.budget.enqueued(),
            self.config.crawler.max_pages
        );

        Ok(())
    }
}

/// Handles one listing page: fetch, extract, hand over to the frontier
async fn handle_listing_page(
    client: &Client,
    config: &Config,
    frontier: &CrawlFrontier,
    dedup: &DedupRegistry,
    url: &str,
) -> crate::Result<()> {
    tracing::debug!("Visiting {}", url);
    dedup.mark_url_visited(url);

    let page = fetch_listing(client, config, url).await?;
    let base = Url::parse(url)?;
    let listing = parse_listing(&page.body, &base);

    tracing::debug!(
        "{}: {} job candidates, next page: {}, {} fallback links",
        url,
        listing.job_candidates.len(),
        listing.next_url.is_some(),
        listing.pagination_urls.len()
    );

    frontier.handle_page(listing).await;
    Ok(())
}

/// Fetches a listing page, retrying transient failures
async fn fetch_listing(client: &Client, config: &Config, url: &str) -> crate::Result<FetchedPage> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        match fetch_page(client, url).await {
            Ok(page) => return Ok(page),
            Err(e) if attempt <= config.crawler.max_request_retries => {
                tracing::warn!(
                    "Fetch attempt {} failed for {}: {}; retrying",
                    attempt,
                    url,
                    e
                );
                tokio::time::sleep(RETRY_DELAY).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Spaces out listing fetch dispatches to stay under a per-minute cap
struct RequestPacer {
    interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl RequestPacer {
    fn new(max_requests_per_minute: u32) -> Self {
        Self {
            interval: Duration::from_secs(60) / max_requests_per_minute.max(1),
            next_slot: Mutex::new(None),
        }
    }

    /// Claims the next dispatch slot, sleeping until it opens
    async fn wait(&self) {
        let sleep_for = {
            let mut next_slot = self.next_slot.lock().unwrap();
            let now = Instant::now();
            match *next_slot {
                Some(slot) if slot > now => {
                    *next_slot = Some(slot + self.interval);
                    slot - now
                }
                _ => {
                    *next_slot = Some(now + self.interval);
                    Duration::ZERO
                }
            }
        };

        if !sleep_for.is_zero() {
            tokio::time::sleep(sleep_for).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pacer_first_dispatch_is_immediate() {
        let pacer = RequestPacer::new(60);
        let started = Instant::now();
        pacer.wait().await;
        assert!(started.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_pacer_spaces_subsequent_dispatches() {
        // 1200 per minute = one dispatch every 50ms
        let pacer = RequestPacer::new(1200);
        let started = Instant::now();
        pacer.wait().await;
        pacer.wait().await;
        pacer.wait().await;
        assert!(started.elapsed() >= Duration::from_millis(90));
    }
}
