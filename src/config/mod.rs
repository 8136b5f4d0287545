use std::env;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct ConfigFile {
    pub instance: Option<String>,
    pub site_url: Option<String>,
    pub site_title: Option<String>,
    pub language: Option<String>,
    pub out_dir: Option<String>,
    pub data_dir: Option<String>,
    pub known_usernames: Option<Vec<String>>,
    pub directory_limit: Option<u32>,
    pub rate: Option<u32>,
    pub concurrency: Option<u32>,
    pub timeout: Option<usize>,
    pub workers: Option<usize>,
    pub skip_update: Option<bool>,
    pub skip_pages: Option<bool>,
    pub skip_feeds: Option<bool>,
    pub skip_sitemap: Option<bool>,
    pub show_stats: Option<bool>,
    pub no_color: Option<bool>,
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("USERPROFILE").map(PathBuf::from))
        .or_else(|| {
            let drive = env::var_os("HOMEDRIVE")?;
            let path = env::var_os("HOMEPATH")?;
            Some(PathBuf::from(drive).join(path))
        })
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(home_dir()?.join(".fedidir").join("config.yml"))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn expand_tilde_string(path: &str) -> String {
    expand_tilde(path).to_string_lossy().to_string()
}

pub fn load_config(path: &PathBuf, allow_missing: bool) -> Result<ConfigFile, String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => serde_yaml::from_str::<ConfigFile>(&contents)
            .map_err(|e| format!("failed to parse config '{}': {e}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(format!("config file not found '{}'", path.display()))
        }
        Err(e) => Err(format!("failed to read config '{}': {e}", path.display())),
    }
}

fn default_config_yaml() -> String {
    r#"# fedidir config
#
# Location (default):
#   ~/.fedidir/config.yml

# Instance the directory is built from
instance: https://social.5th.ro

# Public site identity
site_url: https://romania-rss-feed.github.io
site_title: Romania RSS Feed
language: ro

# Output
out_dir: ./site
# data_dir defaults to <out_dir>/data
# data_dir: ./site/data

# Usernames to refresh on update. Leave empty to refresh every profile
# already in the snapshot.
known_usernames: []

# Update
directory_limit: 200

# Performance
rate: 10
concurrency: 4
timeout: 10
workers: 4

# Phases
skip_update: false
skip_pages: false
skip_feeds: false
skip_sitemap: false

# Output styling
show_stats: false
no_color: false
"#
    .to_string()
}

pub fn ensure_default_config_file(path: &PathBuf) -> Result<(), String> {
    if path.exists() {
        return Ok(());
    }
    let parent = path
        .parent()
        .ok_or_else(|| format!("invalid config path '{}'", path.display()))?;
    std::fs::create_dir_all(parent).map_err(|e| {
        format!(
            "failed to create config directory '{}': {e}",
            parent.display()
        )
    })?;
    let contents = default_config_yaml();
    std::fs::write(path, contents)
        .map_err(|e| format!("failed to write config file '{}': {e}", path.display()))?;
    Ok(())
}
