//! Robots.txt parsing and rule evaluation
//!
//! Hand-rolled, deliberately simplified semantics kept compatible with the
//! rest of the system:
//! - rules attach to the single most recently declared `User-agent` line;
//!   consecutive `User-agent` lines do NOT share a rule group
//! - evaluation is first-disallow-match with an allow override, not
//!   longest-match-wins
//! - `*` matches any substring, a trailing `$` anchors the end, and every
//!   pattern is anchored at the start of the path

use regex::Regex;
use std::collections::HashMap;

/// Allow/disallow patterns for a single user-agent token, in declared order
#[derive(Debug, Clone, Default)]
pub struct AgentRules {
    pub allow: Vec<String>,
    pub disallow: Vec<String>,
}

/// Parsed robots.txt rules for one host, keyed by lowercase user-agent token
pub type RuleSet = HashMap<String, AgentRules>;

/// Parses robots.txt content into a RuleSet
///
/// Lines are trimmed; blank lines and `#` comments are skipped. Each
/// remaining line is split on the first colon into directive and value.
/// A `User-agent` line resets the active agent; `Allow`/`Disallow` lines
/// append to the active agent's lists and are dropped when no agent has
/// been declared yet.
pub fn parse_rules(text: &str) -> RuleSet {
    let mut rules = RuleSet::new();
    let mut current_agent: Option<String> = None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((directive, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();

        match directive.to_lowercase().as_str() {
            "user-agent" => {
                let agent = value.to_lowercase();
                rules.entry(agent.clone()).or_default();
                current_agent = Some(agent);
            }
            "allow" => {
                if let Some(entry) = current_agent.as_ref().and_then(|a| rules.get_mut(a)) {
                    entry.allow.push(value.to_string());
                }
            }
            "disallow" => {
                if let Some(entry) = current_agent.as_ref().and_then(|a| rules.get_mut(a)) {
                    entry.disallow.push(value.to_string());
                }
            }
            _ => {}
        }
    }

    rules
}

/// Evaluates the rules for a path and user-agent token
///
/// Looks up the exact lowercase agent, falling back to `*`; with neither
/// present everything is allowed. Disallow patterns are scanned in declared
/// order (empty patterns mean "no restriction" and are skipped); the first
/// match triggers a scan of the allow list, and any allow match overrides
/// the disallow.
pub fn check_rules(path: &str, rules: &RuleSet, user_agent: &str) -> bool {
    let agent_rules = rules
        .get(&user_agent.to_lowercase())
        .or_else(|| rules.get("*"));

    let Some(agent_rules) = agent_rules else {
        return true;
    };

    for disallow in &agent_rules.disallow {
        if disallow.is_empty() {
            continue;
        }
        if matches_pattern(path, disallow) {
            return agent_rules
                .allow
                .iter()
                .any(|allow| matches_pattern(path, allow));
        }
    }

    true
}

/// Checks whether a path matches a robots.txt pattern
///
/// The pattern `/` matches only the exact root path. Anything else becomes a
/// start-anchored wildcard match: `*` translates to "any substring" and a
/// trailing `$` anchors the end of the path, so a pattern without `$` acts
/// as a prefix match.
pub fn matches_pattern(path: &str, pattern: &str) -> bool {
    if pattern == "/" {
        return path == "/";
    }

    match pattern_to_regex(pattern) {
        Some(re) => re.is_match(path),
        None => false,
    }
}

fn pattern_to_regex(pattern: &str) -> Option<Regex> {
    let (body, end_anchor) = match pattern.strip_suffix('$') {
        Some(body) => (body, true),
        None => (pattern, false),
    };

    let mut expr = String::with_capacity(body.len() + 8);
    expr.push('^');
    let translated: Vec<String> = body.split('*').map(|part| regex::escape(part)).collect();
    expr.push_str(&translated.join(".*"));
    if end_anchor {
        expr.push('$');
    }

    Regex::new(&expr).ok()
}
