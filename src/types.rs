use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchItem {
    pub title: String,
    pub image: String,
    pub href: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Details {
    pub description: String,
    pub alias: String,
    pub airdate: String,
}

/// One mirror tab on a details page, with its episode links in page order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceGroup {
    pub name: String,
    pub raw_entries: Vec<RawEpisodeEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEpisodeEntry {
    pub link: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub href: String,
    pub number: u64,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamInfo {
    pub streams: Vec<String>,
}

impl SourceGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), raw_entries: Vec::new() }
    }

    pub fn push(&mut self, link: impl Into<String>, label: impl Into<String>) {
        self.raw_entries.push(RawEpisodeEntry { link: link.into(), label: label.into() });
    }
}
