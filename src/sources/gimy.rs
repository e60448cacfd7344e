use regex::Regex;
use scraper::{Html, Selector};
use urlencoding::encode;

use crate::episode::resolve_link;
use crate::error::SourceError;
use crate::hls;
use crate::scraper::fetch_text;
use crate::sources::extract_first;
use crate::types::{Details, SearchItem, SourceGroup, StreamInfo};
use crate::util;

pub const SITE: &str = "gimy";
const UNKNOWN_SOURCE: &str = "Unknown Source";

pub fn base_url() -> String {
    std::env::var("VODSCOUT_GIMY_BASE")
        .ok()
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "https://gimy.tv".to_string())
}

pub async fn search(c: &reqwest::Client, keyword: &str) -> Result<Vec<SearchItem>, SourceError> {
    let base = base_url();
    let url = format!("{}/search/-------------.html?wd={}&submit=", base, encode(keyword.trim()));
    let html = fetch_text(c, &url).await?;
    Ok(parse_search(&html, &base))
}

pub fn parse_search(html: &str, base: &str) -> Vec<SearchItem> {
    let doc = Html::parse_document(html);
    let item_sel = Selector::parse("li.clearfix").unwrap();
    let thumb_sel = Selector::parse("a.myui-vodlist__thumb").unwrap();
    let title_sel = Selector::parse("h4.title a").unwrap();

    let mut items = Vec::new();
    for li in doc.select(&item_sel) {
        let thumb = li.select(&thumb_sel).next();
        let href = thumb
            .and_then(|a| a.value().attr("href"))
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let image = thumb
            .and_then(|a| a.value().attr("data-original"))
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let title = li
            .select(&title_sel)
            .next()
            .map(|n| n.text().collect::<String>().trim().to_string())
            .filter(|s| !s.is_empty());

        if let (Some(href), Some(image), Some(title)) = (href, image, title) {
            items.push(SearchItem { title, image: image.to_string(), href: resolve_link(base, href) });
        }
    }
    items
}

pub async fn details(c: &reqwest::Client, url: &str) -> Result<Details, SourceError> {
    let html = fetch_text(c, url).await?;
    Ok(parse_details(&html))
}

pub fn parse_details(html: &str) -> Details {
    Details {
        description: extract_first(html, r#"<div[^>]*content">[\s\S]*?<p>([\s\S]*?)</p>"#)
            .unwrap_or_else(|| "No description available".to_string()),
        alias: "N/A".to_string(),
        airdate: extract_first(html, r"年份：</span>[\s\S]*?<a[^>]*>([^<]+)</a>")
            .unwrap_or_else(|| "Aired: Unknown".to_string()),
    }
}

pub async fn source_groups(c: &reqwest::Client, url: &str) -> Result<(String, Vec<SourceGroup>), SourceError> {
    let html = fetch_text(c, url).await?;
    Ok((base_url(), parse_source_groups(&html)?))
}

/// Each playlist panel in the main column is one mirror.
pub fn parse_source_groups(html: &str) -> Result<Vec<SourceGroup>, SourceError> {
    let doc = Html::parse_document(html);
    let column_sel = Selector::parse(".col-md-wide-7").unwrap();
    let panel_sel = Selector::parse("div.myui-panel").unwrap();
    let list_sel = Selector::parse("ul").unwrap();
    let name_sel = Selector::parse("h3.title").unwrap();
    let episode_sel = Selector::parse("a.btn").unwrap();

    let column = doc
        .select(&column_sel)
        .next()
        .ok_or(SourceError::MissingSection { site: SITE, section: "episode sources" })?;

    let mut groups = Vec::new();
    for panel in column.select(&panel_sel) {
        if panel.select(&list_sel).next().is_none() {
            continue;
        }
        let name = panel
            .select(&name_sel)
            .next()
            .map(|n| n.text().collect::<String>().trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| UNKNOWN_SOURCE.to_string());

        let mut group = SourceGroup::new(name);
        for a in panel.select(&episode_sel) {
            let Some(href) = a.value().attr("href") else { continue };
            group.push(href.trim(), a.text().collect::<String>().trim());
        }
        if group.raw_entries.is_empty() {
            util::debug(format!("Gimy: no episodes in source [{}]", group.name));
        }
        groups.push(group);
    }
    Ok(groups)
}

/// Directory of the master playlist referenced by the player config.
pub fn parse_player_base(html: &str) -> Option<String> {
    let raw = extract_first(html, r#"player_data=[\s\S]*?"url":"([^"]*)index\.m3u8""#)?;
    let unescape = Regex::new(r"\\(.)").unwrap();
    Some(unescape.replace_all(&raw, "$1").into_owned())
}

pub async fn stream(c: &reqwest::Client, url: &str) -> Result<StreamInfo, SourceError> {
    let html = fetch_text(c, url).await?;
    let stream_base = parse_player_base(&html).ok_or_else(|| SourceError::NoStream(url.to_string()))?;
    let master = format!("{}index.m3u8", stream_base);
    let playlist = fetch_text(c, &master).await?;
    Ok(StreamInfo { streams: vec![pick_stream(&stream_base, &playlist)] })
}

/// First variant with a resolution, or the master playlist itself.
pub fn pick_stream(stream_base: &str, playlist: &str) -> String {
    match hls::parse_master_playlist(playlist).into_iter().next() {
        Some(variant) => {
            util::debug(format!("Gimy: variant {} -> {}", variant.resolution, variant.uri));
            hls::merge_url(stream_base, &variant.uri)
        }
        None => {
            util::debug(format!("Gimy: no variant in {}index.m3u8", stream_base));
            format!("{}index.m3u8", stream_base)
        }
    }
}
