use regex::Regex;
use reqwest::Url;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variant {
    pub resolution: String,
    pub uri: String,
}

/// Variants of a master playlist, in playlist order. Only `#EXT-X-STREAM-INF` tags
/// that declare a RESOLUTION are kept; the URI is the next non-empty line.
pub fn parse_master_playlist(text: &str) -> Vec<Variant> {
    let res_re = Regex::new(r"RESOLUTION=(\d+x\d+)").unwrap();
    let mut variants = Vec::new();
    let mut lines = text.lines().map(str::trim);
    while let Some(line) = lines.next() {
        if !line.starts_with("#EXT-X-STREAM-INF:") {
            continue;
        }
        let Some(resolution) = res_re
            .captures(line)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
        else {
            continue;
        };
        if let Some(uri) = lines.by_ref().find(|l| !l.is_empty()) {
            variants.push(Variant { resolution, uri: uri.to_string() });
        }
    }
    variants
}

/// Joins a variant URI onto the directory that served the master playlist.
///
/// CDNs often repeat the tail of the playlist directory at the head of a relative
/// variant path (`20240101/abc/` + `20240101/abc/1000kb/index.m3u8`), so the longest
/// such overlap is collapsed.
pub fn merge_url(base: &str, relative: &str) -> String {
    let relative = relative.trim();
    if relative.starts_with("http://") || relative.starts_with("https://") {
        return relative.to_string();
    }
    let Ok(base_url) = Url::parse(base) else {
        return format!("{}/{}", base.trim_end_matches('/'), relative.trim_start_matches('/'));
    };
    if relative.starts_with('/') {
        return base_url
            .join(relative)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| relative.to_string());
    }

    let base_segments: Vec<&str> = base_url.path().split('/').filter(|s| !s.is_empty()).collect();
    let rel_segments: Vec<&str> = relative.split('/').filter(|s| !s.is_empty()).collect();
    let max_overlap = base_segments.len().min(rel_segments.len());
    let overlap = (1..=max_overlap)
        .rev()
        .find(|&n| base_segments[base_segments.len() - n..] == rel_segments[..n])
        .unwrap_or(0);

    let mut merged = base_segments;
    merged.extend_from_slice(&rel_segments[overlap..]);
    format!("{}/{}", base_url.origin().ascii_serialization(), merged.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MASTER: &str = "#EXTM3U\r\n\
#EXT-X-STREAM-INF:PROGRAM-ID=1,BANDWIDTH=800000,RESOLUTION=1280x720\r\n\
\r\n\
/20240101/abc/1000kb/hls/index.m3u8\r\n\
#EXT-X-STREAM-INF:PROGRAM-ID=1,BANDWIDTH=200000\r\n\
/20240101/abc/audio/index.m3u8\r\n\
#EXT-X-STREAM-INF:PROGRAM-ID=1,BANDWIDTH=2000000,RESOLUTION=1920x1080\r\n\
/20240101/abc/2000kb/hls/index.m3u8\r\n";

    #[test]
    fn test_parse_master_playlist() {
        let variants = parse_master_playlist(MASTER);
        assert_eq!(variants.len(), 2);
        assert_eq!(variants[0].resolution, "1280x720");
        assert_eq!(variants[0].uri, "/20240101/abc/1000kb/hls/index.m3u8");
        assert_eq!(variants[1].resolution, "1920x1080");
    }

    #[test]
    fn test_parse_media_playlist_has_no_variants() {
        let media = "#EXTM3U\n#EXTINF:10.0,\nseg0.ts\n#EXT-X-ENDLIST\n";
        assert!(parse_master_playlist(media).is_empty());
    }

    #[test]
    fn test_merge_url_overlap() {
        assert_eq!(
            merge_url("https://v.cdn.com/20240101/abc/", "20240101/abc/1000kb/hls/index.m3u8"),
            "https://v.cdn.com/20240101/abc/1000kb/hls/index.m3u8"
        );
    }

    #[test]
    fn test_merge_url_rooted_and_plain() {
        assert_eq!(
            merge_url("https://v.cdn.com/20240101/abc/", "/20240101/abc/1000kb/hls/index.m3u8"),
            "https://v.cdn.com/20240101/abc/1000kb/hls/index.m3u8"
        );
        assert_eq!(
            merge_url("https://v.cdn.com/20240101/abc/", "1000kb/hls/index.m3u8"),
            "https://v.cdn.com/20240101/abc/1000kb/hls/index.m3u8"
        );
        assert_eq!(
            merge_url("https://v.cdn.com:8443/a/", "b/index.m3u8"),
            "https://v.cdn.com:8443/a/b/index.m3u8"
        );
    }

    #[test]
    fn test_merge_url_absolute() {
        assert_eq!(
            merge_url("https://v.cdn.com/a/", "https://other.cdn.com/x/index.m3u8"),
            "https://other.cdn.com/x/index.m3u8"
        );
    }
}
