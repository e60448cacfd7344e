pub mod chinaq;
pub mod gimy;

use clap::ValueEnum;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Site {
    Chinaq,
    Gimy,
}

impl Site {
    pub fn name(self) -> &'static str {
        match self {
            Site::Chinaq => chinaq::SITE,
            Site::Gimy => gimy::SITE,
        }
    }

    /// Guess the provider from a page URL.
    pub fn detect(url: &str) -> Option<Site> {
        let lower = url.to_lowercase();
        if chinaq::host_with_protocol(url).is_ok() {
            Some(Site::Chinaq)
        } else if lower.contains("gimy") || lower.starts_with(&gimy::base_url().to_lowercase()) {
            Some(Site::Gimy)
        } else {
            None
        }
    }
}

/// First capture group of `pattern`, trimmed; `None` when absent or blank.
pub(crate) fn extract_first(text: &str, pattern: &str) -> Option<String> {
    Regex::new(pattern)
        .ok()?
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_site() {
        assert_eq!(Site::detect("https://www.chinaq.tv/tw/show-123/"), Some(Site::Chinaq));
        assert_eq!(Site::detect("https://gimy.tv/vod/12345.html"), Some(Site::Gimy));
        assert_eq!(Site::detect("https://example.com/vod/1.html"), None);
    }

    #[test]
    fn test_extract_first() {
        let html = "<p>【首播】2023-05-01 </p>";
        assert_eq!(extract_first(html, r"【首播】(\d{4}-\d{2}-\d{2})").as_deref(), Some("2023-05-01"));
        assert_eq!(extract_first(html, r"年份：(\d+)"), None);
        assert_eq!(extract_first("<b>  </b>", r"<b>([\s\S]*?)</b>"), None);
    }
}
