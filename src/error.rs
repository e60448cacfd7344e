use thiserror::Error;

/// Failures of the fetch and extraction layer. Raised before any catalog is built.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("http client setup failed: {0}")]
    Client(reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Fetch { url: String, source: reqwest::Error },
    #[error("invalid {site} URL: {url}")]
    InvalidUrl { site: &'static str, url: String },
    #[error("{site}: could not find {section} on page")]
    MissingSection { site: &'static str, section: &'static str },
    #[error("invalid json from {url}: {source}")]
    Json { url: String, source: serde_json::Error },
    #[error("no stream found at {0}")]
    NoStream(String),
}
