use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;

use crate::types::{CatalogEntry, SourceGroup};
use crate::util;

/// Keys per source group: `rank * BAND + ordinal`, so ordinals 1..=99 fit a band.
const BAND: u64 = 100;

static EPISODE_NUM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"第([0-9]+)集").unwrap());

/// Order of accepted entries inside each source group. Groups always keep input order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EpisodeOrder {
    #[default]
    Ascending,
    NewestFirst,
}

/// Extracts N from "第N集". Zero marks trailers and teasers, so it counts as a miss.
pub fn parse_ordinal(label: &str) -> Option<u32> {
    EPISODE_NUM
        .captures(label)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .filter(|n| *n != 0)
}

/// Turns per-mirror episode listings into one catalog with globally unique numbers.
///
/// Every mirror numbers its own episodes from 1, so each group gets a band of keys
/// derived from its position in the input. Within a group, an entry whose key does
/// not exceed the last accepted one is dropped: some mirrors repeat earlier episodes
/// under a second season heading.
#[derive(Debug, Clone)]
pub struct CatalogBuilder {
    base_url: String,
    order: EpisodeOrder,
}

impl CatalogBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), order: EpisodeOrder::default() }
    }

    pub fn order(mut self, order: EpisodeOrder) -> Self {
        self.order = order;
        self
    }

    pub fn build(&self, groups: &[SourceGroup]) -> Vec<CatalogEntry> {
        let mut catalog = Vec::new();
        for (idx, group) in groups.iter().enumerate() {
            let rank = idx as u64 + 1;
            let mut accepted = self.build_group(group, rank);
            if accepted.is_empty() {
                util::debug(format!("source [{}] contributed no episodes", group.name));
                continue;
            }
            if self.order == EpisodeOrder::NewestFirst {
                accepted.reverse();
            }
            catalog.extend(accepted);
        }
        catalog
    }

    fn build_group(&self, group: &SourceGroup, rank: u64) -> Vec<CatalogEntry> {
        let mut accepted = Vec::new();
        let Some(offset) = rank.checked_mul(BAND) else {
            util::debug(format!("source [{}] rank {} out of key range", group.name, rank));
            return accepted;
        };

        let mut last_accepted = 0u64;
        for entry in &group.raw_entries {
            let Some(ordinal) = parse_ordinal(&entry.label) else {
                util::debug(format!("Skipped episode: [{}]", entry.label));
                continue;
            };
            if u64::from(ordinal) >= BAND {
                util::debug(format!("Skipped episode (out of band): [{}]", entry.label));
                continue;
            }
            let Some(number) = offset.checked_add(u64::from(ordinal)) else {
                util::debug(format!("Skipped episode (key overflow): [{}]", entry.label));
                continue;
            };
            if number <= last_accepted {
                util::debug(format!("Skipped duplicate episode: [{}] {} <= {}", entry.label, number, last_accepted));
                continue;
            }
            last_accepted = number;
            accepted.push(CatalogEntry {
                href: resolve_link(&self.base_url, &entry.link),
                number,
                title: format!("[{}] {}", group.name, entry.label),
            });
        }
        accepted
    }
}

pub fn resolve_link(base: &str, link: &str) -> String {
    let link = link.trim();
    if link.starts_with("http://") || link.starts_with("https://") {
        return link.to_string();
    }
    match Url::parse(base).and_then(|b| b.join(link)) {
        Ok(u) => u.to_string(),
        Err(_) => format!("{}/{}", base.trim_end_matches('/'), link.trim_start_matches('/')),
    }
}
