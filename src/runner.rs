use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use indicatif::ProgressBar;
use thiserror::Error;
use tokio::time::Instant;

use crate::directory::{self, SnapshotError};
use crate::fetcher::{self, FetchError};
use crate::model::{Profile, ServerStats};
use crate::site::{self, SiteContext};

#[derive(Clone, Debug)]
pub struct Options {
    /// Instance base URL the data comes from.
    pub instance: String,
    /// Public URL the generated site is served under.
    pub site_url: String,
    pub site_title: String,
    pub language: String,
    /// Site output directory; the page tree is written beneath it.
    pub out_dir: String,
    /// Snapshot directory; defaults to `<out_dir>/data`.
    pub data_dir: Option<String>,
    /// Usernames to refresh on update. Empty means the whole snapshot.
    pub known_usernames: Vec<String>,
    pub directory_limit: u32,
    /// Account lookups per second.
    pub rate: u32,
    /// In-flight account lookups.
    pub concurrency: u32,
    pub timeout_seconds: usize,
    pub skip_update: bool,
    pub skip_pages: bool,
    pub skip_feeds: bool,
    pub skip_sitemap: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            instance: "https://social.5th.ro".to_string(),
            site_url: "https://romania-rss-feed.github.io".to_string(),
            site_title: "Romania RSS Feed".to_string(),
            language: "ro".to_string(),
            out_dir: "./site".to_string(),
            data_dir: None,
            known_usernames: Vec::new(),
            directory_limit: 200,
            rate: 10,
            concurrency: 4,
            timeout_seconds: 10,
            skip_update: false,
            skip_pages: false,
            skip_feeds: false,
            skip_sitemap: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("no instance configured")]
    MissingInstance,

    #[error("no site url configured")]
    MissingSiteUrl,

    #[error("invalid directory_limit {value}, expected positive integer")]
    InvalidDirectoryLimit { value: u32 },

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Clone, Debug, Default)]
pub struct BuildReport {
    pub elapsed: Duration,
    pub profiles_total: usize,
    /// Entries replaced from the lookup endpoint during update.
    pub refreshed: usize,
    /// New local accounts appended from the directory endpoint.
    pub discovered: usize,
    /// Usernames that came back 404; their old entries were kept.
    pub missing: Vec<String>,
    pub pages_written: usize,
    pub feeds_written: usize,
    pub sitemap_written: bool,
    pub server_stats: Option<ServerStats>,
}

#[derive(Clone, Debug)]
pub struct Runner {
    options: Options,
}

impl Runner {
    pub fn new(options: Options) -> Result<Self, RunnerError> {
        if options.instance.trim().is_empty() {
            return Err(RunnerError::MissingInstance);
        }
        fetcher::host_of(&options.instance)?;
        if options.site_url.trim().is_empty() {
            return Err(RunnerError::MissingSiteUrl);
        }
        if options.directory_limit == 0 {
            return Err(RunnerError::InvalidDirectoryLimit {
                value: options.directory_limit,
            });
        }
        Ok(Self { options })
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub async fn run(&self) -> Result<BuildReport, RunnerError> {
        self.run_with_progress(&ProgressBar::hidden()).await
    }

    pub async fn run_with_progress(&self, pb: &ProgressBar) -> Result<BuildReport, RunnerError> {
        let started = Instant::now();

        let host = fetcher::host_of(&self.options.instance)?;
        let out_dir = PathBuf::from(&self.options.out_dir);
        let data_dir = self
            .options
            .data_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| out_dir.join("data"));
        let profiles_path = data_dir.join("profiles.json");
        let stats_path = data_dir.join("server-stats.json");

        let mut report = BuildReport::default();

        if !self.options.skip_update {
            self.update_snapshot(pb, &host, &data_dir, &profiles_path, &stats_path, &mut report)
                .await?;
        }

        // Build always renders from the snapshot on disk, so a run with
        // --skip-update sees exactly what the last update produced.
        let profiles = directory::load_profiles(&profiles_path).await?;
        let server_stats = directory::load_server_stats(&stats_path).await;
        report.profiles_total = profiles.len();
        report.server_stats = server_stats.clone();

        let ctx = SiteContext::new(
            &self.options.site_url,
            &self.options.site_title,
            &host,
            &self.options.language,
        );

        let styles_path = out_dir.join("assets").join("styles.css");
        if !styles_path.exists() {
            write_file(&styles_path, site::default_stylesheet()).await?;
        }

        if !self.options.skip_pages {
            pb.inc_length(profiles.len() as u64 + 2);

            let explorer_path = out_dir.join("profiles").join("index.html");
            write_file(&explorer_path, &site::explorer::render_page(&profiles, &ctx)).await?;
            report.pages_written += 1;
            pb.inc(1);

            for profile in profiles.iter().filter(|p| !p.username.is_empty()) {
                let page_path = out_dir
                    .join("profiles")
                    .join(&profile.username)
                    .join("index.html");
                write_file(&page_path, &site::profile::render_page(profile, &ctx)).await?;
                report.pages_written += 1;
                pb.set_message(profile.username.clone());
                pb.inc(1);
            }

            let stats_page_path = out_dir.join("stats").join("index.html");
            write_file(
                &stats_page_path,
                &site::stats::render_page(&profiles, server_stats.as_ref(), &ctx),
            )
            .await?;
            report.pages_written += 1;
            pb.inc(1);
        }

        if !self.options.skip_feeds {
            let now = Utc::now();
            write_file(
                &out_dir.join("feed.xml"),
                &site::feed::main_feed(&profiles, &ctx, now),
            )
            .await?;
            report.feeds_written += 1;

            for profile in profiles.iter().filter(|p| !p.username.is_empty()) {
                let feed_path = out_dir
                    .join("profiles")
                    .join(&profile.username)
                    .join("feed.xml");
                write_file(&feed_path, &site::feed::profile_feed(profile, &ctx, now)).await?;
                report.feeds_written += 1;
            }
        }

        if !self.options.skip_sitemap {
            write_file(
                &out_dir.join("sitemap.xml"),
                &site::sitemap::render(&profiles, &ctx),
            )
            .await?;
            report.sitemap_written = true;
        }

        report.elapsed = started.elapsed();
        Ok(report)
    }

    async fn update_snapshot(
        &self,
        pb: &ProgressBar,
        host: &str,
        data_dir: &Path,
        profiles_path: &Path,
        stats_path: &Path,
        report: &mut BuildReport,
    ) -> Result<(), RunnerError> {
        tokio::fs::create_dir_all(data_dir)
            .await
            .map_err(|e| RunnerError::CreateDir {
                path: data_dir.to_path_buf(),
                source: e,
            })?;

        // First run has no snapshot yet; anything else broken should stop us.
        let existing = match directory::load_profiles(profiles_path).await {
            Ok(profiles) => profiles,
            Err(SnapshotError::NotFound { .. }) => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        let client = fetcher::build_client(self.options.timeout_seconds)?;

        // Discovery is best-effort: not every instance exposes the
        // directory endpoint.
        let discovered_accounts =
            match fetcher::fetch_directory(&client, &self.options.instance, self.options.directory_limit)
                .await
            {
                Ok(accounts) => accounts,
                Err(e) => {
                    pb.println(format!("directory discovery failed: {e}"));
                    Vec::new()
                }
            };
        let discovered_profiles: Vec<Profile> = discovered_accounts
            .iter()
            .filter(|a| !a.username.is_empty() && fetcher::is_local_account(a, host))
            .map(|a| Profile::from_account(a, host))
            .collect();

        let refresh_usernames =
            directory::refresh_set(&existing, &self.options.known_usernames);
        pb.inc_length(refresh_usernames.len() as u64);
        let outcome = fetcher::refresh_accounts(
            &client,
            &self.options.instance,
            host,
            &refresh_usernames,
            self.options.rate,
            self.options.concurrency.max(1) as usize,
            pb,
        )
        .await;

        report.refreshed = outcome.profiles.len();
        report.missing = outcome.missing;

        let merged = directory::merge_profiles(existing, outcome.profiles, discovered_profiles);
        report.discovered = merged.added;
        directory::save_profiles(profiles_path, &merged.profiles).await?;

        match fetcher::fetch_instance_stats(&client, &self.options.instance).await {
            Ok(stats) => directory::save_server_stats(stats_path, &stats).await?,
            Err(e) => pb.println(format!("failed to fetch server statistics: {e}")),
        }

        Ok(())
    }
}

async fn write_file(path: &Path, contents: &str) -> Result<(), RunnerError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| RunnerError::CreateDir {
                path: parent.to_path_buf(),
                source: e,
            })?;
    }
    tokio::fs::write(path, contents)
        .await
        .map_err(|e| RunnerError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_instance() {
        let options = Options {
            instance: "".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            Runner::new(options),
            Err(RunnerError::MissingInstance)
        ));
    }

    #[test]
    fn rejects_unparseable_instance() {
        let options = Options {
            instance: "not a url".to_string(),
            ..Default::default()
        };
        assert!(Runner::new(options).is_err());
    }

    #[test]
    fn rejects_zero_directory_limit() {
        let options = Options {
            directory_limit: 0,
            ..Default::default()
        };
        assert!(matches!(
            Runner::new(options),
            Err(RunnerError::InvalidDirectoryLimit { value: 0 })
        ));
    }
}
