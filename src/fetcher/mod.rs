use std::num::NonZeroU32;
use std::time::Duration;

use futures::StreamExt;
use governor::{Quota, RateLimiter};
use indicatif::ProgressBar;
use thiserror::Error;

use crate::model::{Account, Profile, ServerStats};

const USER_AGENT: &str = concat!("fedidir/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build http client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid instance url: {url}")]
    InvalidInstanceUrl { url: String },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

pub fn build_client(timeout_seconds: usize) -> Result<reqwest::Client, FetchError> {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::USER_AGENT,
        reqwest::header::HeaderValue::from_static(USER_AGENT),
    );
    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(timeout_seconds.try_into().unwrap_or(10)))
        .build()
        .map_err(|e| FetchError::HttpClientBuild { source: e })
}

/// Hostname of an instance base URL ("https://social.5th.ro" -> "social.5th.ro").
pub fn host_of(base: &str) -> Result<String, FetchError> {
    let parsed = reqwest::Url::parse(base.trim()).map_err(|_| FetchError::InvalidInstanceUrl {
        url: base.to_string(),
    })?;
    parsed
        .host_str()
        .map(|h| h.to_string())
        .ok_or_else(|| FetchError::InvalidInstanceUrl {
            url: base.to_string(),
        })
}

fn api_url(base: &str, path: &str) -> String {
    format!("{}/api/v1/{path}", base.trim_end_matches('/'))
}

/// Looks an account up by handle. A 404 means the profile is gone, which
/// the update phase treats as "keep the existing entry", so it maps to
/// `Ok(None)` rather than an error.
pub async fn lookup_account(
    client: &reqwest::Client,
    base: &str,
    acct: &str,
) -> Result<Option<Account>, FetchError> {
    let url = api_url(base, "accounts/lookup");
    let resp = client
        .get(&url)
        .query(&[("acct", acct)])
        .send()
        .await
        .map_err(|e| FetchError::Request {
            url: url.clone(),
            source: e,
        })?;
    if resp.status() == reqwest::StatusCode::NOT_FOUND {
        return Ok(None);
    }
    if !resp.status().is_success() {
        return Err(FetchError::Status {
            url,
            status: resp.status().as_u16(),
        });
    }
    resp.json::<Account>()
        .await
        .map(Some)
        .map_err(|e| FetchError::Decode { url, source: e })
}

/// Fetches the public account directory, most recently active first,
/// restricted to local accounts (the server-side filter is advisory; the
/// caller still applies `is_local_account`).
pub async fn fetch_directory(
    client: &reqwest::Client,
    base: &str,
    limit: u32,
) -> Result<Vec<Account>, FetchError> {
    let url = api_url(base, "directory");
    let resp = client
        .get(&url)
        .query(&[
            ("limit", limit.to_string().as_str()),
            ("order", "active"),
            ("local", "true"),
        ])
        .send()
        .await
        .map_err(|e| FetchError::Request {
            url: url.clone(),
            source: e,
        })?;
    if !resp.status().is_success() {
        return Err(FetchError::Status {
            url,
            status: resp.status().as_u16(),
        });
    }
    resp.json::<Vec<Account>>()
        .await
        .map_err(|e| FetchError::Decode { url, source: e })
}

pub async fn fetch_instance_stats(
    client: &reqwest::Client,
    base: &str,
) -> Result<ServerStats, FetchError> {
    let url = api_url(base, "instance");
    let resp = client
        .get(&url)
        .send()
        .await
        .map_err(|e| FetchError::Request {
            url: url.clone(),
            source: e,
        })?;
    if !resp.status().is_success() {
        return Err(FetchError::Status {
            url,
            status: resp.status().as_u16(),
        });
    }
    resp.json::<ServerStats>()
        .await
        .map_err(|e| FetchError::Decode { url, source: e })
}

/// Strict locality check for directory results. Some instances return
/// federated accounts even with `local=true`, so the account URL must live
/// on the host and the acct must not point at another domain.
pub fn is_local_account(account: &Account, host: &str) -> bool {
    let on_host = reqwest::Url::parse(&account.url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.eq_ignore_ascii_case(host)))
        .unwrap_or(false);
    if !on_host {
        return false;
    }
    let acct = account.acct.trim();
    if acct.is_empty() {
        return true;
    }
    if !acct.contains('@') {
        return true;
    }
    if acct == account.username {
        return true;
    }
    acct.to_lowercase().ends_with(&format!("@{}", host.to_lowercase()))
}

#[derive(Clone, Debug, Default)]
pub struct RefreshOutcome {
    /// Normalized profiles for every account that answered.
    pub profiles: Vec<Profile>,
    /// Usernames that came back 404; their existing entries stay.
    pub missing: Vec<String>,
    /// Usernames whose refresh failed; their existing entries stay too.
    pub failed: Vec<String>,
}

/// Refreshes a set of usernames against the lookup endpoint, bounded by the
/// per-second quota and in-flight concurrency.
pub async fn refresh_accounts(
    client: &reqwest::Client,
    base: &str,
    host: &str,
    usernames: &[String],
    rate: u32,
    concurrency: usize,
    pb: &ProgressBar,
) -> RefreshOutcome {
    let quota = Quota::per_second(NonZeroU32::new(rate.max(1)).unwrap());
    let lim = RateLimiter::direct(quota);
    let lim = &lim;

    let results: Vec<(String, Result<Option<Account>, FetchError>)> =
        futures::stream::iter(usernames.iter().cloned())
            .map(|username| async move {
                lim.until_ready().await;
                pb.set_message(username.clone());
                let result = lookup_account(client, base, &username).await;
                pb.inc(1);
                (username, result)
            })
            .buffer_unordered(concurrency.max(1))
            .collect()
            .await;

    let mut outcome = RefreshOutcome::default();
    for (username, result) in results {
        match result {
            Ok(Some(account)) => outcome.profiles.push(Profile::from_account(&account, host)),
            Ok(None) => outcome.missing.push(username),
            Err(e) => {
                pb.println(format!("failed to refresh {username}: {e}"));
                outcome.failed.push(username);
            }
        }
    }
    outcome.profiles.sort_by(|a, b| a.username.cmp(&b.username));
    outcome.missing.sort();
    outcome.failed.sort();
    outcome
}
