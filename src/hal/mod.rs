//! Hypermedia link synthesis and content negotiation.
//!
//! Two representations exist: `application/hal+json`, embedding `_links` (and
//! `_embedded` on listing endpoints), and plain `application/json`, carrying
//! the same body with relations surfaced through an RFC 5988 `Link` header
//! instead.

pub mod negotiate;

pub use negotiate::{negotiate, Representation, HAL_JSON, JSON};

use serde_json::{Map, Value};

/// A single hypermedia link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub href: String,
}

impl Link {
    pub fn new(href: impl Into<String>) -> Self {
        Self { href: href.into() }
    }
}

/// The governance-query path for a resource.
pub fn governance_href(resource: &str) -> String {
    format!("/.well-known/governance?resource={resource}")
}

/// Merge links into an entity's `_links` object.
///
/// Pre-existing content under other relations is preserved; no `_links`
/// object is created when there is nothing to add.
pub fn merge_links(entity: &mut Map<String, Value>, links: Vec<(&str, Link)>) {
    if links.is_empty() {
        return;
    }
    let slot = entity
        .entry("_links")
        .or_insert_with(|| Value::Object(Map::new()));
    if let Value::Object(existing) = slot {
        for (relation, link) in links {
            let mut entry = Map::new();
            entry.insert("href".to_string(), Value::String(link.href));
            existing.insert(relation.to_string(), Value::Object(entry));
        }
    }
}

/// Format a `_links` object as an RFC 5988 `Link` header value.
pub fn format_link_header(links: &Map<String, Value>) -> String {
    links
        .iter()
        .filter_map(|(relation, link)| {
            let href = link.get("href")?.as_str()?;
            Some(format!("<{href}>; rel=\"{relation}\""))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a `Link` request header into `(relation, target)` pairs. Malformed
/// entries are skipped, not rejected.
pub fn parse_link_header(value: &str) -> Vec<(String, String)> {
    let mut links = Vec::new();
    for part in value.split(',') {
        let part = part.trim();
        let Some(rest) = part.strip_prefix('<') else {
            continue;
        };
        let Some((target, params)) = rest.split_once('>') else {
            continue;
        };
        for param in params.split(';') {
            let Some((name, relation)) = param.split_once('=') else {
                continue;
            };
            if name.trim() == "rel" {
                let relation = relation.trim().trim_matches('"');
                links.push((relation.to_string(), target.to_string()));
                break;
            }
        }
    }
    links
}
