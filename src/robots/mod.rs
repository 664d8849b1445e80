//! Robots.txt policy engine
//!
//! Fetches, parses, caches, and evaluates robots.txt permission per host.
//! The engine is permissive on every failure path: a URL that cannot be
//! parsed, a robots.txt that cannot be fetched, and a malformed body all
//! resolve to "allowed" with a diagnostic log. A host is fetched at most
//! once per run; concurrent first requests for the same host share one
//! fetch.

mod parser;

pub use parser::{check_rules, matches_pattern, parse_rules, AgentRules, RuleSet};

use reqwest::Client;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;
use url::Url;

/// Cached permission state for one host
///
/// `AllowAll` is the explicit permissive sentinel cached when robots.txt is
/// unreachable or unusable; it is distinct from "not yet fetched" (absence
/// from the cache).
#[derive(Debug)]
pub enum HostPolicy {
    Rules(RuleSet),
    AllowAll,
}

/// Robots.txt permission engine with a per-host, run-lifetime cache
pub struct RobotsPolicy {
    client: Client,
    cache: Mutex<HashMap<String, Arc<OnceCell<HostPolicy>>>>,
}

impl RobotsPolicy {
    /// Creates a new engine sharing the crawler's HTTP client
    pub fn new(client: Client) -> Self {
        Self {
            client,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Checks whether a URL may be fetched, using the `*` user-agent token
    pub async fn is_allowed(&self, url: &str) -> bool {
        self.is_allowed_for_agent(url, "*").await
    }

    /// Checks whether a URL may be fetched for a specific user-agent token
    ///
    /// Never fails: parse and fetch errors resolve to allowed.
    pub async fn is_allowed_for_agent(&self, url: &str, user_agent: &str) -> bool {
        let parsed = match Url::parse(url) {
            Ok(u) => u,
            Err(e) => {
                tracing::warn!("Error checking robots.txt for {}: {}", url, e);
                return true;
            }
        };

        let Some(robots_url) = robots_url_for(&parsed) else {
            tracing::warn!("Cannot derive robots.txt location for {}", url);
            return true;
        };

        let policy = self.host_policy(&robots_url).await;
        match policy.get() {
            Some(HostPolicy::Rules(rules)) => check_rules(parsed.path(), rules, user_agent),
            Some(HostPolicy::AllowAll) | None => true,
        }
    }

    /// Logs how robots.txt looks for the host of the given URL
    ///
    /// Diagnostic only; fetches (and caches) the host policy as a side
    /// effect but never affects permission results.
    pub async fn log_robots_info(&self, url: &str) {
        let Ok(parsed) = Url::parse(url) else {
            tracing::warn!("Error getting robots.txt info for {}", url);
            return;
        };
        let Some(robots_url) = robots_url_for(&parsed) else {
            return;
        };

        let policy = self.host_policy(&robots_url).await;
        match policy.get() {
            Some(HostPolicy::Rules(rules)) => {
                tracing::info!(
                    "robots.txt loaded from {} ({} user-agent group(s))",
                    robots_url,
                    rules.len()
                );
                for (agent, entry) in rules {
                    tracing::info!(
                        "  {}: {} disallow, {} allow rules",
                        agent,
                        entry.disallow.len(),
                        entry.allow.len()
                    );
                }
            }
            Some(HostPolicy::AllowAll) | None => {
                tracing::info!(
                    "robots.txt could not be loaded from {}; crawling defaults to allowed",
                    robots_url
                );
            }
        }
    }

    /// Returns the cached policy cell for a host, fetching on first use
    ///
    /// Concurrent callers for the same host share the cell, so the network
    /// fetch happens once; the cache lock only covers map access.
    async fn host_policy(&self, robots_url: &Url) -> Arc<OnceCell<HostPolicy>> {
        let cell = {
            let mut cache = self.cache.lock().unwrap();
            cache
                .entry(robots_url.to_string())
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .clone()
        };

        cell.get_or_init(|| self.fetch_policy(robots_url.clone()))
            .await;
        cell
    }

    /// Fetches and parses robots.txt for one host
    ///
    /// Any transport failure or non-success status yields the permissive
    /// sentinel; the failure is not retried within the run.
    async fn fetch_policy(&self, robots_url: Url) -> HostPolicy {
        match self.client.get(robots_url.clone()).send().await {
            Ok(response) if response.status().is_success() => match response.text().await {
                Ok(text) => HostPolicy::Rules(parse_rules(&text)),
                Err(e) => {
                    tracing::warn!("Failed to read {}: {}", robots_url, e);
                    HostPolicy::AllowAll
                }
            },
            Ok(response) => {
                tracing::debug!(
                    "No usable robots.txt at {} (HTTP {})",
                    robots_url,
                    response.status()
                );
                HostPolicy::AllowAll
            }
            Err(e) => {
                tracing::warn!("Failed to load {}: {}", robots_url, e);
                HostPolicy::AllowAll
            }
        }
    }
}

/// Derives `scheme://host[:port]/robots.txt` for a URL
fn robots_url_for(url: &Url) -> Option<Url> {
    url.host_str()?;
    let mut robots_url = url.clone();
    robots_url.set_path("/robots.txt");
    robots_url.set_query(None);
    robots_url.set_fragment(None);
    Some(robots_url)
}
