use anyhow::{bail, Context, Result};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::process::Stdio;
use std::time::Duration;
use which::which;

use crate::types::{CatalogEntry, Details, SearchItem, StreamInfo};

use std::sync::atomic::{AtomicBool, Ordering};

static DEBUG: AtomicBool = AtomicBool::new(false);

pub fn set_debug(on: bool) {
    DEBUG.store(on, Ordering::Relaxed);
}

pub fn is_debug() -> bool {
    DEBUG.load(Ordering::Relaxed)
}

pub fn debug<S: AsRef<str>>(msg: S) {
    if is_debug() {
        eprintln!("[DEBUG] {}", msg.as_ref());
    }
}

/// Pretty JSON, or the Debug form when the value cannot be serialized.
pub fn to_json<T: Serialize + std::fmt::Debug>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| format!("{:?}", value))
}

pub fn print_json<T: Serialize + std::fmt::Debug>(value: &T) {
    println!("{}", to_json(value));
}

/// Spinner on stderr while a request is in flight; hidden in debug mode so log lines stay readable.
pub fn spinner(msg: &str) -> ProgressBar {
    if is_debug() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub fn print_search_table(items: &[SearchItem]) {
    println!("{} {}", "共".bold(), items.len());

    let index_header = "#";
    let title_header = "标题";
    let href_header = "链接";

    let index_width = std::cmp::max(index_header.len(), format!("{}", items.len()).len());
    let title_width = std::cmp::max(
        title_header.chars().count(),
        items.iter().map(|i| i.title.chars().count()).max().unwrap_or(0),
    );

    println!(
        "{:<iw$}  {:<tw$}  {}",
        index_header.bold(),
        title_header.bold(),
        href_header.bold(),
        iw = index_width,
        tw = title_width
    );
    println!(
        "{:<iw$}  {:<tw$}  {}",
        "-".repeat(index_width),
        "-".repeat(title_width),
        "-".repeat(10),
        iw = index_width,
        tw = title_width
    );

    for (idx, item) in items.iter().enumerate() {
        println!(
            "{:<iw$}  {:<tw$}  {}",
            idx + 1,
            item.title,
            item.href.cyan(),
            iw = index_width,
            tw = title_width
        );
    }
}

pub fn print_catalog_table(entries: &[CatalogEntry]) {
    if entries.is_empty() {
        println!("{}", "暂无可用剧集".yellow().bold());
        return;
    }
    println!("{} {}", "共".bold(), entries.len());

    let number_header = "编号";
    let title_header = "标题";
    let number_width = std::cmp::max(
        number_header.chars().count(),
        entries.iter().map(|e| e.number.to_string().len()).max().unwrap_or(0),
    );
    let title_width = std::cmp::max(
        title_header.chars().count(),
        entries.iter().map(|e| e.title.chars().count()).max().unwrap_or(0),
    );

    println!(
        "{:<nw$}  {:<tw$}  {}",
        number_header.bold(),
        title_header.bold(),
        "链接".bold(),
        nw = number_width,
        tw = title_width
    );
    println!(
        "{:<nw$}  {:<tw$}  {}",
        "-".repeat(number_width),
        "-".repeat(title_width),
        "-".repeat(10),
        nw = number_width,
        tw = title_width
    );
    for e in entries {
        println!(
            "{:<nw$}  {:<tw$}  {}",
            e.number,
            e.title,
            e.href.cyan(),
            nw = number_width,
            tw = title_width
        );
    }
}

pub fn print_details_human(details: &Details) {
    println!("首播： {}", details.airdate);
    println!("别名： {}", details.alias);
    println!("简介：\n{}", details.description);
}

pub fn print_streams_human(info: &StreamInfo) {
    for (i, s) in info.streams.iter().enumerate() {
        println!("{}. {}", i + 1, s.cyan());
    }
}

pub async fn play_via_mpv(url: &str) -> Result<()> {
    let mut cmd = tokio::process::Command::new("mpv");
    cmd.arg(url).stdin(Stdio::null());

    let status = cmd.status().await.context("启动 mpv 失败")?;
    if !status.success() {
        bail!("mpv 播放失败，退出码: {:?}", status.code());
    }
    Ok(())
}

pub async fn open_system_uri(uri: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    let mut cmd = {
        let mut c = tokio::process::Command::new("open");
        c.arg(uri);
        c
    };

    #[cfg(target_os = "linux")]
    let mut cmd = {
        let mut c = tokio::process::Command::new("xdg-open");
        c.arg(uri);
        c
    };

    #[cfg(target_os = "windows")]
    let mut cmd = {
        let mut c = tokio::process::Command::new("cmd");
        c.arg("/C").arg("start").arg("").arg(uri);
        c
    };

    let status = cmd.status().await.context("调用系统打开 URI 失败")?;
    if !status.success() {
        bail!("系统无法打开: {}", uri);
    }
    println!("{} {}", "已交给系统默认播放器处理".green().bold(), uri);
    Ok(())
}

pub async fn play_stream(url: &str) -> Result<()> {
    if which("mpv").is_ok() {
        debug(format!("playing with mpv: {}", url));
        play_via_mpv(url).await
    } else {
        open_system_uri(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_json() {
        let entries = vec![CatalogEntry {
            href: "https://gimy.tv/eps/1-1-1.html".to_string(),
            number: 101,
            title: "[量子線] 第01集".to_string(),
        }];
        let out = to_json(&entries);
        assert!(out.starts_with('['));
        assert!(out.contains("\"number\": 101"));
        assert!(out.contains("[量子線] 第01集"));
    }
}
