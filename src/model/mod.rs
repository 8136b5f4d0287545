use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils;

/// A directory entry as stored in `data/profiles.json`.
///
/// The shape matches what the site serves statically: a normalized subset of
/// the Mastodon account entity plus the synthesized `rss_url`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub display_name: String,
    /// Biography as HTML, stripped before text display.
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub header: String,
    #[serde(default)]
    pub statuses_count: u64,
    #[serde(default)]
    pub followers_count: u64,
    #[serde(default)]
    pub following_count: u64,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub last_status_at: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub rss_url: String,
    /// Hosting instance; absent entries belong to the configured host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    /// Fully-qualified handle when it differs from the bare username.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acct: Option<String>,
}

impl Profile {
    /// Display name, falling back to the username.
    pub fn name(&self) -> &str {
        if self.display_name.trim().is_empty() {
            &self.username
        } else {
            &self.display_name
        }
    }

    /// First letter of the display name (or username), used as the avatar
    /// fallback badge. `?` when there is nothing to take a letter from.
    pub fn initial(&self) -> char {
        self.name()
            .chars()
            .next()
            .and_then(|c| c.to_uppercase().next())
            .unwrap_or('?')
    }

    pub fn instance_or<'a>(&'a self, host: &'a str) -> &'a str {
        match self.instance.as_deref().map(str::trim) {
            Some(instance) if !instance.is_empty() => instance,
            _ => host,
        }
    }

    /// `username@instance` handle, preferring the stored acct.
    pub fn acct_or_default(&self, host: &str) -> String {
        match self.acct.as_deref().map(str::trim) {
            Some(acct) if !acct.is_empty() => acct.to_string(),
            _ => format!("{}@{}", self.username, self.instance_or(host)),
        }
    }

    pub fn plain_note(&self) -> String {
        utils::strip_html(&self.note)
    }

    pub fn url_or_default(&self, host: &str) -> String {
        if self.url.trim().is_empty() {
            format!("https://{}/@{}", self.instance_or(host), self.username)
        } else {
            self.url.clone()
        }
    }

    pub fn rss_url_or_default(&self, host: &str) -> String {
        if self.rss_url.trim().is_empty() {
            format!("https://{}/@{}.rss", self.instance_or(host), self.username)
        } else {
            self.rss_url.clone()
        }
    }

    /// Creation time for sorting; missing or unparseable dates count as the
    /// Unix epoch so they sink to the bottom of a newest-first ordering.
    pub fn created_at_time(&self) -> DateTime<Utc> {
        self.created_at
            .as_deref()
            .and_then(utils::parse_timestamp)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }
}

/// Raw account entity from the Mastodon API.
///
/// [docs.joinmastodon.org/entities/Account](https://docs.joinmastodon.org/entities/Account)
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Account {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub username: String,
    /// `username` for local accounts, `username@domain` for federated ones.
    #[serde(default)]
    pub acct: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub header: String,
    #[serde(default)]
    pub statuses_count: u64,
    #[serde(default)]
    pub followers_count: u64,
    #[serde(default)]
    pub following_count: u64,
    #[serde(default)]
    pub created_at: Option<String>,
    /// ISO date of the most recent status, or null if none.
    #[serde(default)]
    pub last_status_at: Option<String>,
    #[serde(default)]
    pub url: String,
}

impl Profile {
    /// Normalizes an API account into the snapshot shape.
    pub fn from_account(account: &Account, host: &str) -> Self {
        let acct = account.acct.trim();
        Profile {
            id: account.id.clone(),
            username: account.username.clone(),
            display_name: account.display_name.clone(),
            note: account.note.clone(),
            avatar: account.avatar.clone(),
            header: account.header.clone(),
            statuses_count: account.statuses_count,
            followers_count: account.followers_count,
            following_count: account.following_count,
            created_at: account.created_at.clone(),
            last_status_at: account.last_status_at.clone(),
            url: if account.url.trim().is_empty() {
                format!("https://{host}/@{}", account.username)
            } else {
                account.url.clone()
            },
            rss_url: format!("https://{host}/@{}.rss", account.username),
            instance: None,
            acct: if acct.is_empty() || acct == account.username {
                None
            } else {
                Some(acct.to_string())
            },
        }
    }
}

/// Server statistics snapshot (`data/server-stats.json`).
///
/// [docs.joinmastodon.org/entities/Instance](https://docs.joinmastodon.org/entities/Instance)
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ServerStats {
    #[serde(default)]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(default)]
    pub stats: UsageCounts,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct UsageCounts {
    #[serde(default)]
    pub user_count: u64,
    #[serde(default)]
    pub status_count: u64,
    #[serde(default)]
    pub domain_count: u64,
}
