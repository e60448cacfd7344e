use regex::Regex;
use serde::Deserialize;

use crate::episode::resolve_link;
use crate::error::SourceError;
use crate::scraper::fetch_text;
use crate::sources::extract_first;
use crate::types::{Details, SearchItem, SourceGroup, StreamInfo};
use crate::util;

pub const SITE: &str = "chinaq";
const SOURCE_NAME: &str = "ChinaQ";

#[derive(Debug, Deserialize)]
struct PlayResponse {
    #[serde(default)]
    video_plays: Vec<VideoPlay>,
}

#[derive(Debug, Deserialize)]
struct VideoPlay {
    play_data: Option<String>,
}

/// `https://[sub.]chinaq…` prefix of a page URL.
pub fn host_with_protocol(url: &str) -> Result<String, SourceError> {
    let re = Regex::new(r"(?i)^(https://(?:[^/]+\.)?chinaq[^/]+)").unwrap();
    re.captures(url.trim())
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| SourceError::InvalidUrl { site: SITE, url: url.to_string() })
}

/// ChinaQ has no keyword search; the query is the title page itself.
pub async fn search(c: &reqwest::Client, url: &str) -> Result<Vec<SearchItem>, SourceError> {
    let base = host_with_protocol(url)?;
    let html = fetch_text(c, url).await?;
    Ok(parse_search(&html, &base, url))
}

pub fn parse_search(html: &str, base: &str, url: &str) -> Vec<SearchItem> {
    let title = extract_first(html, r"<h1>([\s\S]*?) (?:ChinaQ)?線上看");
    let image = extract_first(html, r#"<div class="description[\s\S]*?img src="([^"]+)""#);
    match (title, image) {
        (Some(title), Some(image)) => vec![SearchItem {
            title,
            image: resolve_link(base, &image),
            href: url.to_string(),
        }],
        _ => {
            util::debug(format!("ChinaQ: no title/image on {}", url));
            Vec::new()
        }
    }
}

pub async fn details(c: &reqwest::Client, url: &str) -> Result<Details, SourceError> {
    host_with_protocol(url)?;
    let html = fetch_text(c, url).await?;
    Ok(parse_details(&html))
}

pub fn parse_details(html: &str) -> Details {
    Details {
        description: extract_first(html, r#"<div id="summary">([\s\S]*?)<br"#)
            .unwrap_or_else(|| "No description available".to_string()),
        alias: "N/A".to_string(),
        airdate: extract_first(html, r"【首播】(\d{4}-\d{2}-\d{2})")
            .unwrap_or_else(|| "Aired: Unknown".to_string()),
    }
}

/// Base address plus the single episode group of a title page.
pub async fn source_groups(c: &reqwest::Client, url: &str) -> Result<(String, Vec<SourceGroup>), SourceError> {
    let base = host_with_protocol(url)?;
    let html = fetch_text(c, url).await?;
    Ok((base, parse_source_groups(&html)?))
}

pub fn parse_source_groups(html: &str) -> Result<Vec<SourceGroup>, SourceError> {
    let list = extract_first(html, r#"id="all-ep"([\s\S]*?)</ul>"#)
        .ok_or(SourceError::MissingSection { site: SITE, section: "episode list" })?;

    let entry_re = Regex::new(r#"<h2><a href="([^"]+)">([\s\S]*?)</a>"#).unwrap();
    let mut group = SourceGroup::new(SOURCE_NAME);
    for cap in entry_re.captures_iter(&list) {
        group.push(play_link(&cap[1]), cap[2].trim());
    }
    Ok(vec![group])
}

/// Episode pages are served as JSON under `/qplays/…` without the `.html` suffix.
fn play_link(page: &str) -> String {
    let re = Regex::new(r"^/[^/]+").unwrap();
    re.replace(page.trim(), "/qplays").replace(".html", "")
}

pub async fn stream(c: &reqwest::Client, url: &str) -> Result<StreamInfo, SourceError> {
    let body = fetch_text(c, url).await?;
    parse_stream(&body, url)
}

pub fn parse_stream(body: &str, url: &str) -> Result<StreamInfo, SourceError> {
    let resp: PlayResponse = serde_json::from_str(body)
        .map_err(|source| SourceError::Json { url: url.to_string(), source })?;
    let streams: Vec<String> = resp
        .video_plays
        .into_iter()
        .filter_map(|p| p.play_data)
        .filter(|s| !s.trim().is_empty())
        .collect();
    if streams.is_empty() {
        return Err(SourceError::NoStream(url.to_string()));
    }
    Ok(StreamInfo { streams })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::episode::CatalogBuilder;

    const TITLE_PAGE: &str = r#"
<div class="container">
  <h1>繁花 ChinaQ線上看</h1>
  <div class="description clearfix"><div class="pic"><img src="/upload/cover/fanhua.jpg" alt=""></div></div>
  <div id="summary">上海九十年代，阿寶的故事。<br>主演：胡歌</div>
  <p>【首播】2023-12-27</p>
  <ul id="all-ep" class="ep-list">
    <li><h2><a href="/tw/fanhua/ep-1.html">第1集</a></h2></li>
    <li><h2><a href="/tw/fanhua/ep-2.html">第2集</a></h2></li>
    <li><h2><a href="/tw/fanhua/trailer.html">預告</a></h2></li>
    <li><h2><a href="/tw/fanhua/ep-3.html">第3集</a></h2></li>
  </ul>
</div>"#;

    #[test]
    fn test_host_with_protocol() {
        assert_eq!(host_with_protocol("https://www.chinaq.tv/tw/fanhua/").unwrap(), "https://www.chinaq.tv");
        assert_eq!(host_with_protocol("https://chinaq.fun/x").unwrap(), "https://chinaq.fun");
        assert!(matches!(
            host_with_protocol("https://gimy.tv/vod/1.html"),
            Err(SourceError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_parse_search() {
        let url = "https://www.chinaq.tv/tw/fanhua/";
        let items = parse_search(TITLE_PAGE, "https://www.chinaq.tv", url);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "繁花");
        assert_eq!(items[0].image, "https://www.chinaq.tv/upload/cover/fanhua.jpg");
        assert_eq!(items[0].href, url);
        assert!(parse_search("<html></html>", "https://www.chinaq.tv", url).is_empty());
    }

    #[test]
    fn test_parse_details() {
        let d = parse_details(TITLE_PAGE);
        assert_eq!(d.description, "上海九十年代，阿寶的故事。");
        assert_eq!(d.airdate, "2023-12-27");
        let empty = parse_details("");
        assert_eq!(empty.description, "No description available");
        assert_eq!(empty.airdate, "Aired: Unknown");
    }

    #[test]
    fn test_parse_source_groups() {
        let groups = parse_source_groups(TITLE_PAGE).unwrap();
        assert_eq!(groups.len(), 1);
        let g = &groups[0];
        assert_eq!(g.name, "ChinaQ");
        assert_eq!(g.raw_entries.len(), 4);
        assert_eq!(g.raw_entries[0].link, "/qplays/fanhua/ep-1");

        let catalog = CatalogBuilder::new("https://www.chinaq.tv").build(&groups);
        let numbers: Vec<u64> = catalog.iter().map(|e| e.number).collect();
        assert_eq!(numbers, vec![101, 102, 103]);
        assert_eq!(catalog[0].href, "https://www.chinaq.tv/qplays/fanhua/ep-1");
        assert_eq!(catalog[2].title, "[ChinaQ] 第3集");
    }

    #[test]
    fn test_missing_episode_list() {
        assert!(matches!(
            parse_source_groups("<h1>x</h1>"),
            Err(SourceError::MissingSection { .. })
        ));
    }

    #[test]
    fn test_parse_stream() {
        let body = r#"{"video_plays":[{"play_data":"https://cdn.example.com/a/index.m3u8"},{"play_data":""},{"other":1}]}"#;
        let info = parse_stream(body, "https://www.chinaq.tv/qplays/fanhua/ep-1").unwrap();
        assert_eq!(info.streams, vec!["https://cdn.example.com/a/index.m3u8".to_string()]);

        assert!(matches!(parse_stream(r#"{"video_plays":[]}"#, "u"), Err(SourceError::NoStream(_))));
        assert!(matches!(parse_stream("<html>", "u"), Err(SourceError::Json { .. })));
    }
}
