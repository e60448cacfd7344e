use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::ProgressBar;

mod episode;
mod error;
mod hls;
mod scraper;
mod sources;
mod types;
mod util;

use episode::EpisodeOrder;
use sources::Site;

#[derive(Parser, Debug)]
#[command(name = "vodscout", version, about = "vodscout: ChinaQ / Gimy 片源搜索、剧集列表与播放地址解析", long_about = None)]
struct Cli {
    /// 统一输出为 JSON
    #[arg(long, global = true)]
    json: bool,

    /// 输出调试日志
    #[arg(long, global = true)]
    debug: bool,

    /// 指定站点（默认根据链接判断，搜索默认 gimy）
    #[arg(long, global = true, value_enum)]
    site: Option<Site>,

    /// 每个片源内按最新在前排列剧集
    #[arg(long, global = true)]
    newest_first: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 搜索片名（ChinaQ 需传入作品页链接）
    Search { query: String },

    /// 展示作品简介与首播信息
    Detail { url: String },

    /// 列出所有片源合并后的剧集
    #[command(visible_alias = "eps")]
    Episodes { url: String },

    /// 解析剧集的播放地址
    Stream { url: String },

    /// 解析并播放剧集（优先 mpv）
    #[command(visible_alias = "see")]
    Play { url: String },
}

fn resolve_site(explicit: Option<Site>, url: &str) -> Result<Site> {
    match explicit {
        Some(site) => Ok(site),
        None => Site::detect(url).with_context(|| format!("无法从链接判断站点，请使用 --site 指定: {}", url)),
    }
}

fn progress(json: bool, msg: &str) -> ProgressBar {
    if json {
        ProgressBar::hidden()
    } else {
        util::spinner(msg)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    util::set_debug(cli.debug);
    let order = if cli.newest_first { EpisodeOrder::NewestFirst } else { EpisodeOrder::Ascending };

    match cli.command {
        Commands::Search { query } => {
            let site = cli.site.or_else(|| Site::detect(&query)).unwrap_or(Site::Gimy);
            util::debug(format!("search on {}: {}", site.name(), query));
            let pb = progress(cli.json, "搜索中...");
            let items = scraper::search(site, &query).await;
            pb.finish_and_clear();
            let items = items?;
            if cli.json {
                util::print_json(&items);
            } else {
                util::print_search_table(&items);
            }
            Ok(())
        }
        Commands::Detail { url } => {
            let site = resolve_site(cli.site, &url)?;
            let pb = progress(cli.json, "读取详情...");
            let details = scraper::fetch_details(site, &url).await;
            pb.finish_and_clear();
            let details = details?;
            if cli.json {
                util::print_json(&details);
            } else {
                util::print_details_human(&details);
            }
            Ok(())
        }
        Commands::Episodes { url } => {
            let site = resolve_site(cli.site, &url)?;
            let pb = progress(cli.json, "读取剧集...");
            let entries = scraper::episodes(site, &url, order).await;
            pb.finish_and_clear();
            let entries = entries?;
            if cli.json {
                util::print_json(&entries);
            } else {
                util::print_catalog_table(&entries);
            }
            Ok(())
        }
        Commands::Stream { url } => {
            let site = resolve_site(cli.site, &url)?;
            let pb = progress(cli.json, "解析播放地址...");
            let info = scraper::stream(site, &url).await;
            pb.finish_and_clear();
            let info = info?;
            if cli.json {
                util::print_json(&info);
            } else {
                util::print_streams_human(&info);
            }
            Ok(())
        }
        Commands::Play { url } => {
            let site = resolve_site(cli.site, &url)?;
            let pb = progress(cli.json, "解析播放地址...");
            let info = scraper::stream(site, &url).await;
            pb.finish_and_clear();
            let info = info?;
            let first = info.streams.first().context("未找到可播放的地址")?;
            println!("{} {}", "播放:".green().bold(), first);
            util::play_stream(first).await
        }
    }
}
