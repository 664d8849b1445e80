//! Crawler module
//!
//! This module contains the crawl machinery: the HTTP fetcher, listing page
//! extraction, the page queue, the per-candidate job pipeline, the frontier
//! that decides pagination, and the coordinator that drives a whole run.

mod coordinator;
mod fetcher;
mod frontier;
mod listing;
mod pipeline;
mod queue;

pub use coordinator::Coordinator;
pub use fetcher::{build_http_client, fetch_page, FetchedPage};
pub use frontier::CrawlFrontier;
pub use listing::{parse_listing, JobCandidate, ListingPage};
pub use pipeline::JobFetchPipeline;
pub use queue::PageQueue;

use crate::config::Config;
use crate::output::{export_jobs, prepare_output_directory, Reporter};
use crate::storage::{JobSink, SqliteJobStore};
use std::path::Path;
use std::sync::Arc;

/// Runs a complete crawl operation
///
/// Prepares the output directory and job store, crawls from the configured
/// start URL, then exports the collected jobs and prints the run summary.
///
/// # Example
///
/// ```no_run
/// use pracant::config::load_config;
/// use pracant::crawler::crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// crawl(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: Config) -> crate::Result<()> {
    let output_dir = Path::new(&config.output.directory).to_path_buf();
    prepare_output_directory(&output_dir)?;

    let store = Arc::new(SqliteJobStore::new(Path::new(&config.output.database_path))?);
    // Each run starts from an empty dataset; dedup state is run-scoped too
    store.clear()?;

    let reporter = Arc::new(Reporter::new());
    let sink: Arc<dyn JobSink> = Arc::clone(&store) as Arc<dyn JobSink>;

    let coordinator = Coordinator::new(config, sink, Arc::clone(&reporter))?;
    coordinator.run().await?;

    let jobs = store.load_all()?;
    export_jobs(&jobs, &output_dir)?;
    reporter.print_summary();

    Ok(())
}
