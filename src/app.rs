use std::io::Write;
use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::counter::Counter;
use crate::model::ServerStats;
use crate::runner::{Options, Runner};
use crate::utils;

fn print_banner(no_color: bool) {
    let _ = no_color;
    const BANNER: &str = r#"
    ____         ___     ___
   / __/__  ____/ (_)___/ (_)____
  / /_/ _ \/ __  / / __  / / ___/
 / __/  __/ /_/ / / /_/ / / /
/_/  \___/\__,_/_/\__,_/_/_/

       v0.4.2 - Mastodon profile directory builder
    "#;
    print!("{}", BANNER);
    println!();
}

fn format_kv_line(label: &str, value: &str) {
    println!(":: {:<10}: {}", label, value);
}

fn format_bool(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

#[derive(Clone, Debug)]
struct RunConfig {
    instance: String,
    site_url: String,
    site_title: String,
    language: String,
    out_dir: String,
    data_dir: Option<String>,
    known_usernames: Vec<String>,
    directory_limit: u32,
    rate: u32,
    concurrency: u32,
    timeout: usize,
    workers: usize,
    skip_update: bool,
    skip_pages: bool,
    skip_feeds: bool,
    skip_sitemap: bool,
    show_stats: bool,
    no_color: bool,
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = args.no_color || cfg.no_color.unwrap_or(false);

    let instance = args
        .instance
        .or(cfg.instance)
        .unwrap_or_else(|| "https://social.5th.ro".to_string())
        .trim()
        .to_string();
    let site_url = args
        .site_url
        .or(cfg.site_url)
        .unwrap_or_else(|| "https://romania-rss-feed.github.io".to_string())
        .trim()
        .to_string();
    let site_title = args
        .site_title
        .or(cfg.site_title)
        .unwrap_or_else(|| "Romania RSS Feed".to_string());
    let language = args
        .language
        .or(cfg.language)
        .unwrap_or_else(|| "ro".to_string());

    let out_dir = config::expand_tilde_string(
        args.out_dir
            .or(cfg.out_dir)
            .unwrap_or_else(|| "./site".to_string())
            .as_str(),
    );
    let data_dir = args
        .data_dir
        .or(cfg.data_dir)
        .map(|p| config::expand_tilde_string(&p));

    let known_usernames: Vec<String> = if args.known_user.is_empty() {
        cfg.known_usernames.unwrap_or_default()
    } else {
        args.known_user
    }
    .into_iter()
    .map(|u| u.trim().trim_start_matches('@').to_string())
    .filter(|u| !u.is_empty())
    .collect();

    let directory_limit = args.directory_limit.or(cfg.directory_limit).unwrap_or(200);
    let rate = args.rate.or(cfg.rate).unwrap_or(10);
    let concurrency = args.concurrency.or(cfg.concurrency).unwrap_or(4);
    let timeout = args.timeout.or(cfg.timeout).unwrap_or(10);
    let workers = args.workers.or(cfg.workers).unwrap_or(4);

    let skip_update = args.skip_update || cfg.skip_update.unwrap_or(false);
    let skip_pages = args.skip_pages || cfg.skip_pages.unwrap_or(false);
    let skip_feeds = args.skip_feeds || cfg.skip_feeds.unwrap_or(false);
    let skip_sitemap = args.skip_sitemap || cfg.skip_sitemap.unwrap_or(false);
    let show_stats = args.show_stats || cfg.show_stats.unwrap_or(false);

    Ok(RunConfig {
        instance,
        site_url,
        site_title,
        language,
        out_dir,
        data_dir,
        known_usernames,
        directory_limit,
        rate,
        concurrency,
        timeout,
        workers,
        skip_update,
        skip_pages,
        skip_feeds,
        skip_sitemap,
        show_stats,
        no_color,
    })
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }
    print_banner(run.no_color);

    let refresh_summary = if run.skip_update {
        "disabled (--skip-update)".to_string()
    } else if run.known_usernames.is_empty() {
        "whole snapshot".to_string()
    } else {
        format!("known({})", run.known_usernames.len())
    };

    format_kv_line("Instance", &run.instance);
    format_kv_line(
        "Site",
        &format!(
            "url={} title={} lang={}",
            run.site_url, run.site_title, run.language
        ),
    );
    format_kv_line(
        "Output",
        &format!(
            "out={} data={}",
            run.out_dir,
            run.data_dir.as_deref().unwrap_or("<out>/data")
        ),
    );
    format_kv_line(
        "Update",
        &format!(
            "refresh={} limit={} rate={} conc={} timeout={}s",
            refresh_summary, run.directory_limit, run.rate, run.concurrency, run.timeout
        ),
    );
    format_kv_line(
        "Build",
        &format!(
            "pages={} feeds={} sitemap={}",
            format_bool(!run.skip_pages),
            format_bool(!run.skip_feeds),
            format_bool(!run.skip_sitemap),
        ),
    );
    println!();

    let pb = ProgressBar::new(0);
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.enable_steady_tick(Duration::from_millis(200));
    pb.set_style(
        ProgressStyle::with_template(
            ":: Progress: [{pos}/{len}] :: Duration: [{elapsed_precise}] :: {msg}",
        )
        .map_err(|e| format!("failed to build progress bar style: {e}"))?
        .progress_chars(r#"#>-"#),
    );

    let options = Options {
        instance: run.instance.clone(),
        site_url: run.site_url.clone(),
        site_title: run.site_title.clone(),
        language: run.language.clone(),
        out_dir: run.out_dir.clone(),
        data_dir: run.data_dir.clone(),
        known_usernames: run.known_usernames.clone(),
        directory_limit: run.directory_limit,
        rate: run.rate,
        concurrency: run.concurrency,
        timeout_seconds: run.timeout,
        skip_update: run.skip_update,
        skip_pages: run.skip_pages,
        skip_feeds: run.skip_feeds,
        skip_sitemap: run.skip_sitemap,
    };
    let runner = Runner::new(options).map_err(|e| e.to_string())?;
    let report = runner
        .run_with_progress(&pb)
        .await
        .map_err(|e| e.to_string())?;
    pb.finish_and_clear();

    format_kv_line(
        "Profiles",
        &format!(
            "total={} refreshed={} discovered={}",
            report.profiles_total, report.refreshed, report.discovered
        ),
    );
    format_kv_line(
        "Site",
        &format!(
            "pages={} feeds={} sitemap={}",
            report.pages_written,
            report.feeds_written,
            format_bool(report.sitemap_written),
        ),
    );
    if !report.missing.is_empty() {
        println!(
            ":: {} {}",
            "kept stale entries (profile gone):".yellow(),
            report.missing.join(", ")
        );
    }

    if run.show_stats {
        if let Some(stats) = report.server_stats.as_ref() {
            show_server_stats(stats).await;
        } else {
            println!(":: no server statistics snapshot available");
        }
    }

    println!();
    println!(
        ":: {} :: build took {}s ::",
        "Completed".bold().green(),
        report.elapsed.as_secs()
    );

    Ok(())
}

/// Terminal rendition of the stats-page count-up.
async fn show_server_stats(stats: &ServerStats) {
    println!();
    format_kv_line("Version", &stats.version);
    let rows = [
        ("Users", stats.stats.user_count),
        ("Statuses", stats.stats.status_count),
        ("Domains", stats.stats.domain_count),
    ];
    for (label, target) in rows {
        let counter = Counter::new(target);
        counter
            .run(|value| {
                print!("\r:: {:<10}: {}", label, utils::format_number(value));
                let _ = std::io::stdout().flush();
            })
            .await;
        println!();
    }
}

pub fn run_cli() -> Result<(), String> {
    let args = CliArgs::parse();

    let cfg = match args.config.clone() {
        Some(path) => {
            let path = config::expand_tilde(&path);
            config::load_config(&path, false)?
        }
        None => match config::default_config_path() {
            Some(path) => {
                // Drop a commented scaffold next to the user on first run;
                // a read-only home is not an error.
                let _ = config::ensure_default_config_file(&path);
                config::load_config(&path, true)?
            }
            None => ConfigFile::default(),
        },
    };

    let run = build_run_config(args, cfg)?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(run.workers)
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))?;
    Ok(())
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    #[test]
    fn defaults_apply_without_flags() {
        let args = CliArgs::parse_from(["fedidir"]);
        let cfg = ConfigFile::default();
        let run = build_run_config(args, cfg).unwrap();
        assert_eq!(run.instance, "https://social.5th.ro");
        assert_eq!(run.rate, 10);
        assert!(!run.skip_update);
    }

    #[test]
    fn known_user_flag_overrides_config_list() {
        let args = CliArgs::parse_from(["fedidir", "-k", "@ana", "-k", "bob"]);
        let cfg = ConfigFile {
            known_usernames: Some(vec!["ignored".to_string()]),
            ..Default::default()
        };
        let run = build_run_config(args, cfg).unwrap();
        assert_eq!(run.known_usernames, vec!["ana", "bob"]);
    }

    #[test]
    fn config_file_fills_missing_flags() {
        let args = CliArgs::parse_from(["fedidir"]);
        let cfg = ConfigFile {
            instance: Some("https://mstdn.ro".to_string()),
            skip_feeds: Some(true),
            ..Default::default()
        };
        let run = build_run_config(args, cfg).unwrap();
        assert_eq!(run.instance, "https://mstdn.ro");
        assert!(run.skip_feeds);
    }

    #[test]
    fn rejects_invalid_instance_url() {
        let args = CliArgs::parse_from(["fedidir", "-u", "not a url"]);
        let cfg = ConfigFile::default();
        assert!(build_run_config(args, cfg).is_err());
    }
}
