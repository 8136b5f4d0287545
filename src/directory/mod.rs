use std::collections::HashMap;
use std::path::{Path, PathBuf};

use itertools::Itertools;
use thiserror::Error;

use crate::model::{Profile, ServerStats};

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("profiles snapshot not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Loads the profile snapshot. A missing file is its own variant so callers
/// can tell "never updated" apart from a broken snapshot.
pub async fn load_profiles(path: &Path) -> Result<Vec<Profile>, SnapshotError> {
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(SnapshotError::NotFound {
                path: path.to_path_buf(),
            })
        }
        Err(e) => {
            return Err(SnapshotError::Read {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };
    serde_json::from_str(&contents).map_err(|e| SnapshotError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

pub async fn save_profiles(path: &Path, profiles: &[Profile]) -> Result<(), SnapshotError> {
    let mut contents = serde_json::to_string_pretty(profiles).unwrap_or_else(|_| "[]".to_string());
    contents.push('\n');
    tokio::fs::write(path, contents)
        .await
        .map_err(|e| SnapshotError::Write {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Server stats are optional everywhere they are used, so any failure here
/// degrades to `None` and the caller renders the placeholder block.
pub async fn load_server_stats(path: &Path) -> Option<ServerStats> {
    let contents = tokio::fs::read_to_string(path).await.ok()?;
    serde_json::from_str(&contents).ok()
}

pub async fn save_server_stats(path: &Path, stats: &ServerStats) -> Result<(), SnapshotError> {
    let mut contents = serde_json::to_string_pretty(stats).unwrap_or_else(|_| "{}".to_string());
    contents.push('\n');
    tokio::fs::write(path, contents)
        .await
        .map_err(|e| SnapshotError::Write {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Free-text match against display name, username, and the HTML-stripped
/// biography. Case-insensitive substring, no ranking. An empty query
/// matches everything.
pub fn matches_query(profile: &Profile, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    profile.display_name.to_lowercase().contains(&needle)
        || profile.username.to_lowercase().contains(&needle)
        || profile.plain_note().to_lowercase().contains(&needle)
}

/// Filters without reordering; source order is preserved.
pub fn filter_profiles(profiles: &[Profile], query: &str) -> Vec<Profile> {
    profiles
        .iter()
        .filter(|p| matches_query(p, query))
        .cloned()
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Posts,
    Followers,
    Newest,
}

impl SortKey {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "name" | "alphabetical" => Some(Self::Name),
            "posts" | "statuses" => Some(Self::Posts),
            "followers" => Some(Self::Followers),
            "newest" | "created" => Some(Self::Newest),
            _ => None,
        }
    }
}

/// Sorts in place. Name ascends case-insensitively; the count and date keys
/// descend. Ties keep their relative order (stable sort), no secondary key.
pub fn sort_profiles(profiles: &mut [Profile], key: SortKey) {
    match key {
        SortKey::Name => {
            profiles.sort_by(|a, b| a.name().to_lowercase().cmp(&b.name().to_lowercase()))
        }
        SortKey::Posts => profiles.sort_by(|a, b| b.statuses_count.cmp(&a.statuses_count)),
        SortKey::Followers => profiles.sort_by(|a, b| b.followers_count.cmp(&a.followers_count)),
        SortKey::Newest => profiles.sort_by(|a, b| b.created_at_time().cmp(&a.created_at_time())),
    }
}

pub fn top_by_posts(profiles: &[Profile], n: usize) -> Vec<Profile> {
    let mut out = profiles.to_vec();
    sort_profiles(&mut out, SortKey::Posts);
    out.truncate(n);
    out
}

pub fn top_by_followers(profiles: &[Profile], n: usize) -> Vec<Profile> {
    let mut out = profiles.to_vec();
    sort_profiles(&mut out, SortKey::Followers);
    out.truncate(n);
    out
}

#[derive(Clone, Debug, Default)]
pub struct MergeOutcome {
    pub profiles: Vec<Profile>,
    pub updated: usize,
    pub added: usize,
}

/// Merges an update run into the existing snapshot: refreshed entries
/// replace their username's slot, discovered entries append when the
/// username is new, and the result sorts by lowercase username.
pub fn merge_profiles(
    existing: Vec<Profile>,
    refreshed: Vec<Profile>,
    discovered: Vec<Profile>,
) -> MergeOutcome {
    let mut profiles = existing;
    let mut index: HashMap<String, usize> = profiles
        .iter()
        .enumerate()
        .map(|(i, p)| (p.username.clone(), i))
        .collect();

    let mut updated = 0;
    for profile in refreshed {
        if let Some(&i) = index.get(&profile.username) {
            profiles[i] = profile;
            updated += 1;
        }
    }

    let mut added = 0;
    for profile in discovered {
        if profile.username.is_empty() || index.contains_key(&profile.username) {
            continue;
        }
        index.insert(profile.username.clone(), profiles.len());
        profiles.push(profile);
        added += 1;
    }

    profiles.sort_by(|a, b| a.username.to_lowercase().cmp(&b.username.to_lowercase()));

    MergeOutcome {
        profiles,
        updated,
        added,
    }
}

/// Usernames the update phase should refresh: the configured list when one
/// is given (restricted to usernames we actually track), otherwise the
/// whole snapshot.
pub fn refresh_set(existing: &[Profile], known_usernames: &[String]) -> Vec<String> {
    if known_usernames.is_empty() {
        return existing.iter().map(|p| p.username.clone()).collect();
    }
    let tracked: Vec<&str> = existing.iter().map(|p| p.username.as_str()).collect();
    known_usernames
        .iter()
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty() && tracked.contains(&u.as_str()))
        .unique()
        .collect()
}
