use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};

use crate::episode::{CatalogBuilder, EpisodeOrder};
use crate::error::SourceError;
use crate::sources::{chinaq, gimy, Site};
use crate::types::{CatalogEntry, Details, SearchItem, StreamInfo};
use crate::util;

const UA: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0 Safari/537.36";

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(UA));
    headers.insert(ACCEPT, HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,application/json;q=0.8,*/*;q=0.7"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("zh-TW,zh;q=0.9,zh-CN;q=0.8,en-US;q=0.7"));
    headers
}

pub fn client() -> Result<reqwest::Client, SourceError> {
    let mut builder = reqwest::Client::builder()
        .default_headers(default_headers())
        .redirect(reqwest::redirect::Policy::limited(10))
        .cookie_store(true);
    if let Ok(proxy) = std::env::var("VODSCOUT_HTTP_PROXY") {
        match reqwest::Proxy::all(proxy.trim()) {
            Ok(px) => builder = builder.proxy(px),
            Err(e) => util::debug(format!("ignoring VODSCOUT_HTTP_PROXY: {}", e)),
        }
    }
    builder.build().map_err(SourceError::Client)
}

/// Single GET, no retries. Non-2xx statuses are failures.
pub async fn fetch_text(c: &reqwest::Client, url: &str) -> Result<String, SourceError> {
    util::debug(format!("GET {}", url));
    let fetch = |source| SourceError::Fetch { url: url.to_string(), source };
    c.get(url)
        .send()
        .await
        .map_err(fetch)?
        .error_for_status()
        .map_err(fetch)?
        .text()
        .await
        .map_err(fetch)
}

pub async fn search(site: Site, query: &str) -> Result<Vec<SearchItem>, SourceError> {
    let c = client()?;
    match site {
        Site::Chinaq => chinaq::search(&c, query).await,
        Site::Gimy => gimy::search(&c, query).await,
    }
}

pub async fn fetch_details(site: Site, url: &str) -> Result<Details, SourceError> {
    let c = client()?;
    match site {
        Site::Chinaq => chinaq::details(&c, url).await,
        Site::Gimy => gimy::details(&c, url).await,
    }
}

/// Episode catalog of a title page, merged across all of its mirrors.
pub async fn episodes(site: Site, url: &str, order: EpisodeOrder) -> Result<Vec<CatalogEntry>, SourceError> {
    let c = client()?;
    let (base, groups) = match site {
        Site::Chinaq => chinaq::source_groups(&c, url).await?,
        Site::Gimy => gimy::source_groups(&c, url).await?,
    };
    util::debug(format!("{}: {} source group(s) on {}", site.name(), groups.len(), url));
    Ok(CatalogBuilder::new(base).order(order).build(&groups))
}

pub async fn stream(site: Site, url: &str) -> Result<StreamInfo, SourceError> {
    let c = client()?;
    match site {
        Site::Chinaq => chinaq::stream(&c, url).await,
        Site::Gimy => gimy::stream(&c, url).await,
    }
}
