pub mod explorer;
pub mod feed;
pub mod profile;
pub mod sitemap;
pub mod stats;

use crate::model::Profile;
use crate::utils::{escape_html, percent_encode_segment};

// User-facing strings on generated pages. The site is single-locale
// (Romanian), like the hub it renders.
pub const STR_NO_RESULTS: &str = "Nu s-au găsit profile.";
pub const STR_LOAD_ERROR: &str =
    "Nu s-au putut încărca profilurile. Încercați din nou mai târziu.";
pub const STR_STATS_UNAVAILABLE: &str =
    "Statisticile serverului nu sunt disponibile momentan.";

pub const STR_POSTS: &str = "Postări";
pub const STR_FOLLOWERS: &str = "Urmăritori";
pub const STR_FOLLOWING: &str = "Urmărește";
pub const STR_MEMBER_SINCE: &str = "Membru din";

pub const STR_NAV_HOME: &str = "Acasă";
pub const STR_NAV_EXPLORER: &str = "Explorator";
pub const STR_NAV_STATS: &str = "Statistici";
pub const STR_NAV_FEED: &str = "RSS Feed";

pub const STR_SEARCH_PLACEHOLDER: &str = "Caută după nume, utilizator sau descriere...";
pub const STR_SORT_LABEL: &str = "Sortează după";
pub const STR_SORT_NAME: &str = "Nume";
pub const STR_SORT_POSTS: &str = "Postări";
pub const STR_SORT_FOLLOWERS: &str = "Urmăritori";
pub const STR_SORT_NEWEST: &str = "Cele mai noi";

pub const STR_EXPLORER_TITLE: &str = "Explorator profiluri";
pub const STR_STATS_TITLE: &str = "Statistici server";
pub const STR_VERSION: &str = "Versiune";
pub const STR_USERS: &str = "Utilizatori";
pub const STR_STATUSES: &str = "Statusuri";
pub const STR_DOMAINS: &str = "Domenii";
pub const STR_TOP_POSTS: &str = "Top 10 după postări";
pub const STR_TOP_FOLLOWERS: &str = "Top 10 după urmăritori";

pub const STR_LINKS: &str = "Link-uri";
pub const STR_VIEW_ON_MASTODON: &str = "Vezi pe Mastodon";
pub const STR_SUBSCRIBE_RSS: &str = "Abonează-te la RSS Feed";

/// Everything the page renderers need to know about the site identity.
#[derive(Clone, Debug)]
pub struct SiteContext {
    site_url: String,
    pub site_title: String,
    pub host: String,
    pub language: String,
}

impl SiteContext {
    pub fn new(site_url: &str, site_title: &str, host: &str, language: &str) -> Self {
        Self {
            site_url: site_url.trim().trim_end_matches('/').to_string(),
            site_title: site_title.trim().to_string(),
            host: host.trim().to_string(),
            language: language.trim().to_string(),
        }
    }

    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    /// Absolute URL for a site-root path ("/profiles/").
    pub fn absolute(&self, path: &str) -> String {
        format!("{}{}", self.site_url, path)
    }

    pub fn profile_path(&self, username: &str) -> String {
        format!("/profiles/{}/", percent_encode_segment(username))
    }

    pub fn profile_url(&self, username: &str) -> String {
        self.absolute(&self.profile_path(username))
    }
}

/// Avatar image with the initial-letter fallback badge. The badge also
/// stands in entirely when no avatar URL is known.
pub fn avatar_html(profile: &Profile) -> String {
    let initial = escape_html(&profile.initial().to_string());
    if profile.avatar.trim().is_empty() {
        return format!(r#"<span class="avatar-fallback">{initial}</span>"#);
    }
    format!(
        r#"<img src="{src}" alt="{alt}" loading="lazy" onerror="this.style.display='none'; this.nextElementSibling.style.display='flex';"><span class="avatar-fallback" style="display:none;">{initial}</span>"#,
        src = escape_html(profile.avatar.trim()),
        alt = escape_html(profile.name()),
    )
}

fn nav_html(ctx: &SiteContext) -> String {
    format!(
        r#"  <nav class="nav">
    <div class="nav-inner">
      <a class="brand" href="/" aria-label="{title} homepage">
        <svg class="brand-logo" width="32" height="32" viewBox="0 0 32 32" fill="none" xmlns="http://www.w3.org/2000/svg">
          <circle cx="16" cy="16" r="14" fill="var(--accent)"/>
          <path d="M16 8 L20 16 L16 20 L12 16 Z" fill="var(--bg)"/>
        </svg>
        <span>{title}</span>
      </a>
      <div class="nav-links">
        <a href="/profiles/">{explorer}</a>
        <a href="/stats/">{stats}</a>
        <a href="/feed.xml">{feed}</a>
        <a href="https://{host}/" target="_blank" rel="noopener">Mastodon</a>
      </div>
    </div>
  </nav>"#,
        title = escape_html(&ctx.site_title),
        explorer = STR_NAV_EXPLORER,
        stats = STR_NAV_STATS,
        feed = STR_NAV_FEED,
        host = escape_html(&ctx.host),
    )
}

fn footer_html(ctx: &SiteContext) -> String {
    format!(
        r#"  <footer class="footer">
    <div class="footer-inner">
      <div class="footer-content">
        <div class="footer-section">
          <h3>Link-uri Rapide</h3>
          <nav>
            <a href="/">{home}</a>
            <a href="/profiles/">{explorer}</a>
            <a href="/stats/">{stats}</a>
            <a href="/feed.xml">{feed}</a>
          </nav>
        </div>
        <div class="footer-section">
          <h3>Despre</h3>
          <p>{title} este un explorator modern pentru profilurile Mastodon de pe {host}.</p>
        </div>
        <div class="footer-section">
          <h3>Server Mastodon</h3>
          <a href="https://{host}/" target="_blank" rel="noopener">{host}</a>
        </div>
      </div>
      <div class="footer-bottom">
        <p>&copy; 2025 {title}. Hub pentru profiluri Mastodon din România.</p>
      </div>
    </div>
  </footer>"#,
        home = STR_NAV_HOME,
        explorer = STR_NAV_EXPLORER,
        stats = STR_NAV_STATS,
        feed = STR_NAV_FEED,
        title = escape_html(&ctx.site_title),
        host = escape_html(&ctx.host),
    )
}

/// Common document shell: head, nav, main content, footer, trailing
/// scripts. Titles and descriptions arrive pre-escaped where needed.
pub fn page_shell(
    ctx: &SiteContext,
    title: &str,
    description: &str,
    canonical: &str,
    extra_head: &str,
    main: &str,
    scripts: &str,
) -> String {
    format!(
        r#"<!doctype html>
<html lang="{lang}" dir="ltr">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1, viewport-fit=cover">
  <title>{title}</title>
  <meta name="description" content="{description}">
  <link rel="canonical" href="{canonical}">
{extra_head}  <link rel="stylesheet" href="/assets/styles.css">
</head>
<body>
{nav}

  <main class="container">
{main}
  </main>

{footer}
{scripts}</body>
</html>
"#,
        lang = escape_html(&ctx.language),
        title = title,
        description = description,
        canonical = escape_html(canonical),
        extra_head = extra_head,
        nav = nav_html(ctx),
        main = main,
        footer = footer_html(ctx),
        scripts = scripts,
    )
}

/// Baseline stylesheet written to `assets/styles.css` when the site has
/// none yet; kept to the variables and classes the templates use.
pub fn default_stylesheet() -> &'static str {
    r#":root {
  --bg: #0f1115;
  --surface: #181b22;
  --border: #2a2f3a;
  --text: #e8eaf0;
  --muted: #9aa3b2;
  --accent: #4f8cff;
  --radius-lg: 14px;
}

* { box-sizing: border-box; }

body {
  margin: 0;
  background: var(--bg);
  color: var(--text);
  font-family: system-ui, -apple-system, "Segoe UI", sans-serif;
  line-height: 1.5;
}

a { color: var(--accent); text-decoration: none; }

.container { max-width: 1080px; margin: 0 auto; padding: 24px 16px 64px; }

.nav { border-bottom: 1px solid var(--border); background: var(--surface); }
.nav-inner {
  max-width: 1080px; margin: 0 auto; padding: 12px 16px;
  display: flex; align-items: center; justify-content: space-between; gap: 16px;
}
.brand { display: flex; align-items: center; gap: 10px; color: var(--text); font-weight: 700; }
.nav-links { display: flex; gap: 18px; }
.nav-links a { color: var(--muted); }
.nav-links a:hover { color: var(--text); }

.page-title { font-size: 28px; font-weight: 800; margin: 24px 0 8px; }
.page-subtitle { color: var(--muted); margin: 0 0 24px; }

.toolbar { display: flex; flex-wrap: wrap; gap: 12px; margin: 0 0 24px; }
.toolbar input, .toolbar select {
  background: var(--surface); border: 1px solid var(--border); color: var(--text);
  border-radius: 10px; padding: 10px 14px; font-size: 14px;
}
.toolbar input { flex: 1; min-width: 240px; }

.profile-grid {
  display: grid; grid-template-columns: repeat(auto-fill, minmax(280px, 1fr)); gap: 16px;
}
.profile-card {
  display: flex; gap: 14px; padding: 16px; color: var(--text);
  background: var(--surface); border: 1px solid var(--border); border-radius: var(--radius-lg);
}
.profile-card:hover { border-color: var(--accent); }
.profile-avatar {
  width: 56px; height: 56px; flex: none; border-radius: 12px; overflow: hidden;
  background: var(--border); display: flex; align-items: center; justify-content: center;
}
.profile-avatar img { width: 100%; height: 100%; object-fit: cover; }
.avatar-fallback {
  width: 100%; height: 100%; display: flex; align-items: center; justify-content: center;
  font-size: 22px; font-weight: 700; color: var(--accent);
}
.profile-name { margin: 0; font-size: 16px; font-weight: 700; }
.profile-username { margin: 2px 0 8px; color: var(--muted); font-size: 13px; }
.profile-bio { margin: 0 0 10px; font-size: 13px; color: var(--muted); }
.profile-stats { display: flex; gap: 14px; font-size: 13px; color: var(--muted); }
.profile-stats strong { color: var(--text); }

.empty-state, .error-state {
  padding: 48px 16px; text-align: center; color: var(--muted);
  background: var(--surface); border: 1px dashed var(--border); border-radius: var(--radius-lg);
}

.stats-grid {
  display: grid; grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
  gap: 16px; margin: 0 0 32px;
}
.stat-tile {
  padding: 24px 16px; text-align: center;
  background: var(--surface); border: 1px solid var(--border); border-radius: var(--radius-lg);
}
.stat-value { font-size: 30px; font-weight: 800; }
.stat-label { color: var(--muted); font-size: 13px; margin-top: 4px; }

.top-lists { display: grid; grid-template-columns: repeat(auto-fit, minmax(280px, 1fr)); gap: 16px; }
.top-list {
  background: var(--surface); border: 1px solid var(--border);
  border-radius: var(--radius-lg); padding: 20px;
}
.top-list h2 { margin: 0 0 12px; font-size: 18px; }
.top-list ol { margin: 0; padding-left: 22px; }
.top-list li { margin: 6px 0; }
.top-list .count { color: var(--muted); font-size: 13px; }

.profile-banner { height: 140px; border-radius: var(--radius-lg); background: var(--surface); }
.profile-header-large { display: flex; gap: 24px; margin: -40px 0 24px; padding: 0 24px; align-items: flex-end; }
.profile-avatar-large {
  width: 120px; height: 120px; flex: none; border-radius: var(--radius-lg); overflow: hidden;
  background: var(--border); border: 4px solid var(--bg);
  display: flex; align-items: center; justify-content: center; font-size: 44px;
}
.profile-avatar-large img { width: 100%; height: 100%; object-fit: cover; }
.profile-name-large { margin: 0; font-size: 26px; }
.profile-username-large { margin: 2px 0 10px; color: var(--muted); }
.profile-description-large { color: var(--muted); max-width: 640px; }
.profile-stats-large {
  display: grid; grid-template-columns: repeat(auto-fit, minmax(150px, 1fr));
  gap: 16px; margin: 0 0 32px;
}
.profile-stat-large {
  padding: 20px 16px; text-align: center;
  background: var(--surface); border: 1px solid var(--border); border-radius: var(--radius-lg);
}

.links-block {
  margin: 40px 0; padding: 32px;
  background: var(--surface); border: 1px solid var(--border); border-radius: var(--radius-lg);
}
.links-block h2 { margin: 0 0 24px; font-size: 24px; }
.links-block .links { display: flex; flex-direction: column; gap: 16px; align-items: flex-start; }
.btn {
  display: inline-flex; align-items: center; gap: 8px;
  padding: 10px 18px; border-radius: 10px; font-weight: 600;
}
.btn-primary { background: var(--accent); color: #fff; }
.rss-link { display: inline-flex; align-items: center; gap: 8px; font-size: 16px; }

.footer { border-top: 1px solid var(--border); background: var(--surface); }
.footer-inner { max-width: 1080px; margin: 0 auto; padding: 32px 16px; }
.footer-content { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 24px; }
.footer-section h3 { margin: 0 0 10px; font-size: 14px; }
.footer-section nav { display: flex; flex-direction: column; gap: 6px; }
.footer-section p, .footer-section a { color: var(--muted); font-size: 14px; }
.footer-bottom { margin-top: 24px; color: var(--muted); font-size: 13px; }
"#
}
