//! robots.txt permission checks for the fetcher.
//!
//! Rules are parsed per origin and cached for the lifetime of the run in an
//! explicit [`RobotsCache`] owned by the fetcher, not in global state. A
//! robots.txt that cannot be fetched or parsed yields an allow-all rule
//! set, matching the usual crawler convention.

use reqwest::Client;
use std::collections::HashMap;
use tracing::{debug, warn};
use url::Url;

/// Parsed allow/disallow rules applicable to our user agent.
#[derive(Debug, Clone)]
pub struct RobotsRules {
    allow: Vec<String>,
    disallow: Vec<String>,
}

impl RobotsRules {
    /// Parse robots.txt content, keeping the group addressed to
    /// `user_agent` when one exists and the `*` group otherwise.
    pub fn parse(content: &str, user_agent: &str) -> Self {
        let ua_token = user_agent
            .split(['/', ' '])
            .next()
            .unwrap_or(user_agent)
            .to_lowercase();

        let mut wildcard = (Vec::new(), Vec::new());
        let mut specific = (Vec::new(), Vec::new());
        let mut found_specific = false;

        // Which groups the current rule lines belong to.
        let mut applies_wildcard = false;
        let mut applies_specific = false;
        let mut in_agent_header = false;

        for line in content.lines() {
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            let Some((directive, value)) = line.split_once(':') else {
                continue;
            };
            let directive = directive.trim().to_lowercase();
            let value = value.trim();

            match directive.as_str() {
                "user-agent" => {
                    // Consecutive user-agent lines share one rule group.
                    if !in_agent_header {
                        applies_wildcard = false;
                        applies_specific = false;
                        in_agent_header = true;
                    }
                    let agent = value.to_lowercase();
                    if agent == "*" {
                        applies_wildcard = true;
                    } else if !ua_token.is_empty() && ua_token.contains(&agent) {
                        applies_specific = true;
                        found_specific = true;
                    }
                }
                "allow" | "disallow" => {
                    in_agent_header = false;
                    if value.is_empty() {
                        continue;
                    }
                    if applies_specific {
                        if directive == "allow" {
                            specific.0.push(value.to_string());
                        } else {
                            specific.1.push(value.to_string());
                        }
                    }
                    if applies_wildcard {
                        if directive == "allow" {
                            wildcard.0.push(value.to_string());
                        } else {
                            wildcard.1.push(value.to_string());
                        }
                    }
                }
                _ => {
                    in_agent_header = false;
                }
            }
        }

        let (allow, disallow) = if found_specific { specific } else { wildcard };
        Self { allow, disallow }
    }

    /// Allow-all rules, used when robots.txt is missing or unreadable.
    pub fn allow_all() -> Self {
        Self {
            allow: Vec::new(),
            disallow: Vec::new(),
        }
    }

    /// Longest-match decision; on equal lengths, allow wins.
    pub fn is_allowed(&self, path: &str) -> bool {
        let longest_allow = self
            .allow
            .iter()
            .filter(|p| path_matches(path, p))
            .map(|p| p.len())
            .max()
            .unwrap_or(0);
        let longest_disallow = self
            .disallow
            .iter()
            .filter(|p| path_matches(path, p))
            .map(|p| p.len())
            .max()
            .unwrap_or(0);
        longest_allow >= longest_disallow
    }
}

/// Prefix match with `*` wildcards and an optional `$` end anchor.
fn path_matches(path: &str, pattern: &str) -> bool {
    let (pattern, anchored) = match pattern.strip_suffix('$') {
        Some(p) => (p, true),
        None => (pattern, false),
    };

    let mut pos = 0usize;
    let mut first = true;
    for piece in pattern.split('*') {
        if piece.is_empty() {
            first = false;
            continue;
        }
        match path[pos..].find(piece) {
            Some(idx) => {
                if first && idx != 0 {
                    return false;
                }
                pos += idx + piece.len();
            }
            None => return false,
        }
        first = false;
    }

    if anchored {
        // With a trailing wildcard the anchor is trivially satisfied.
        pattern.ends_with('*') || pos == path.len()
    } else {
        true
    }
}

/// Per-origin robots.txt cache, owned by the fetcher.
#[derive(Debug)]
pub struct RobotsCache {
    user_agent: String,
    rules: HashMap<String, RobotsRules>,
}

impl RobotsCache {
    pub fn new(user_agent: &str) -> Self {
        Self {
            user_agent: user_agent.to_string(),
            rules: HashMap::new(),
        }
    }

    /// Whether `url` may be fetched, consulting (and populating) the
    /// per-origin cache.
    pub async fn allowed(&mut self, client: &Client, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return true;
        };
        let origin = match url.port() {
            Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
            None => format!("{}://{}", url.scheme(), host),
        };

        if !self.rules.contains_key(&origin) {
            let rules = self.fetch_rules(client, &origin).await;
            self.rules.insert(origin.clone(), rules);
        }

        let allowed = self
            .rules
            .get(&origin)
            .map(|r| r.is_allowed(url.path()))
            .unwrap_or(true);
        if !allowed {
            debug!(%url, "robots.txt disallows fetch");
        }
        allowed
    }

    async fn fetch_rules(&self, client: &Client, origin: &str) -> RobotsRules {
        let robots_url = format!("{origin}/robots.txt");
        match client.get(&robots_url).send().await {
            Ok(resp) if resp.status().is_success() => match resp.text().await {
                Ok(body) => RobotsRules::parse(&body, &self.user_agent),
                Err(e) => {
                    warn!(%robots_url, error = %e, "Failed reading robots.txt body; assuming allowed");
                    RobotsRules::allow_all()
                }
            },
            Ok(resp) => {
                debug!(%robots_url, status = %resp.status(), "No usable robots.txt; assuming allowed");
                RobotsRules::allow_all()
            }
            Err(e) => {
                debug!(%robots_url, error = %e, "robots.txt fetch failed; assuming allowed");
                RobotsRules::allow_all()
            }
        }
    }
}
