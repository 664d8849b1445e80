//! Run-scoped crawl state
//!
//! Dedup sets, the page budget, and the stop signal are owned per crawl run
//! and shared by reference into the frontier and pipeline; nothing here is
//! ambient or static. The crawler runs on a multi-threaded runtime, so every
//! check-then-mutate sequence is guarded by a lock.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Process-lifetime dedup sets for job ids and visited page URLs
///
/// Membership is monotonic: once inserted, an id or URL is never removed
/// for the lifetime of the run.
#[derive(Debug, Default)]
pub struct DedupRegistry {
    seen_job_ids: Mutex<HashSet<String>>,
    visited_urls: Mutex<HashSet<String>>,
}

impl DedupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a job id as seen
    ///
    /// Returns `true` if the id was newly inserted, `false` if it was
    /// already present. Check and insert happen under one lock.
    pub fn mark_job_seen(&self, id: &str) -> bool {
        self.seen_job_ids.lock().unwrap().insert(id.to_string())
    }

    /// Marks a page URL as visited; same contract as [`mark_job_seen`](Self::mark_job_seen)
    pub fn mark_url_visited(&self, url: &str) -> bool {
        self.visited_urls.lock().unwrap().insert(url.to_string())
    }
}

/// Shared page budget for one crawl run
///
/// A monotonically incremented counter bounded by `max_pages`; consulted
/// before every page enqueue.
#[derive(Debug)]
pub struct CrawlBudget {
    max_pages: u32,
    enqueued: Mutex<u32>,
}

impl CrawlBudget {
    pub fn new(max_pages: u32) -> Self {
        Self {
            max_pages,
            enqueued: Mutex::new(0),
        }
    }

    /// Reserves one page slot
    ///
    /// Returns `true` and increments the counter iff the current count is
    /// below `max_pages`; otherwise returns `false` without mutation. The
    /// check and increment happen under one lock.
    pub fn try_reserve(&self) -> bool {
        let mut enqueued = self.enqueued.lock().unwrap();
        if *enqueued < self.max_pages {
            *enqueued += 1;
            true
        } else {
            false
        }
    }

    /// Whether the budget has been fully reserved
    pub fn is_exhausted(&self) -> bool {
        *self.enqueued.lock().unwrap() >= self.max_pages
    }

    /// Number of pages reserved so far
    pub fn enqueued(&self) -> u32 {
        *self.enqueued.lock().unwrap()
    }
}

/// Cooperative stop signal
///
/// Once requested, the coordinator schedules no further pages and the
/// frontier stops reserving budget and enqueuing; in-flight job pipelines
/// drain normally.
#[derive(Debug, Default)]
pub struct StopFlag {
    stopped: AtomicBool,
}

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}
