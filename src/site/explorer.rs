use serde::Serialize;

use super::{avatar_html, SiteContext};
use crate::model::Profile;
use crate::site;
use crate::utils::{escape_html, format_number, truncate_chars};

/// Subset of a profile embedded into the page for the client-side
/// search/sort script.
#[derive(Serialize)]
struct CardRecord<'a> {
    username: &'a str,
    display_name: &'a str,
    acct: String,
    avatar: &'a str,
    note: String,
    statuses_count: u64,
    followers_count: u64,
    created_at: Option<&'a str>,
}

fn json_for_script_tag(value: &str) -> String {
    value.replace("</", "<\\/")
}

fn profiles_json(profiles: &[Profile], ctx: &SiteContext) -> String {
    let records: Vec<CardRecord> = profiles
        .iter()
        .map(|p| CardRecord {
            username: &p.username,
            display_name: &p.display_name,
            acct: p.acct_or_default(&ctx.host),
            avatar: &p.avatar,
            note: p.plain_note().trim().to_string(),
            statuses_count: p.statuses_count,
            followers_count: p.followers_count,
            created_at: p.created_at.as_deref(),
        })
        .collect();
    let json = serde_json::to_string(&records).unwrap_or_else(|_| "[]".to_string());
    json_for_script_tag(&json)
}

pub fn render_card(profile: &Profile, ctx: &SiteContext) -> String {
    let bio = truncate_chars(profile.plain_note().trim(), 160);
    let bio_html = if bio.is_empty() {
        String::new()
    } else {
        format!(
            "      <p class=\"profile-bio\">{}</p>\n",
            escape_html(&bio)
        )
    };
    format!(
        r#"<a class="profile-card" href="{href}">
      <div class="profile-avatar">{avatar}</div>
      <div class="profile-info">
      <h3 class="profile-name">{name}</h3>
      <p class="profile-username">@{acct}</p>
{bio_html}      <div class="profile-stats">
        <span class="profile-stat"><strong>{posts}</strong> {posts_label}</span>
        <span class="profile-stat"><strong>{followers}</strong> {followers_label}</span>
      </div>
      </div>
    </a>"#,
        href = ctx.profile_path(&profile.username),
        avatar = avatar_html(profile),
        name = escape_html(profile.name()),
        acct = escape_html(&profile.acct_or_default(&ctx.host)),
        bio_html = bio_html,
        posts = format_number(profile.statuses_count),
        posts_label = site::STR_POSTS,
        followers = format_number(profile.followers_count),
        followers_label = site::STR_FOLLOWERS,
    )
}

/// Card grid, or the localized empty state when nothing survives.
pub fn render_cards(profiles: &[Profile], ctx: &SiteContext) -> String {
    if profiles.is_empty() {
        return format!(
            r#"<div class="empty-state">{}</div>"#,
            site::STR_NO_RESULTS
        );
    }
    let cards: Vec<String> = profiles.iter().map(|p| render_card(p, ctx)).collect();
    format!(
        "<div class=\"profile-grid\">\n    {}\n    </div>",
        cards.join("\n    ")
    )
}

/// The explorer page: server-rendered grid plus the embedded data and
/// script that drive search and sort in the browser.
pub fn render_page(profiles: &[Profile], ctx: &SiteContext) -> String {
    let main = format!(
        r#"    <h1 class="page-title">{title}</h1>
    <p class="page-subtitle">{count} profiluri de pe {host}</p>
    <div class="toolbar">
      <input id="search" type="text" placeholder="{placeholder}" aria-label="{placeholder}">
      <label for="sort" class="visually-hidden">{sort_label}</label>
      <select id="sort">
        <option value="name">{sort_name}</option>
        <option value="posts">{sort_posts}</option>
        <option value="followers">{sort_followers}</option>
        <option value="newest">{sort_newest}</option>
      </select>
    </div>
    <div id="cards">{cards}</div>"#,
        title = site::STR_EXPLORER_TITLE,
        count = format_number(profiles.len() as u64),
        host = escape_html(&ctx.host),
        placeholder = site::STR_SEARCH_PLACEHOLDER,
        sort_label = site::STR_SORT_LABEL,
        sort_name = site::STR_SORT_NAME,
        sort_posts = site::STR_SORT_POSTS,
        sort_followers = site::STR_SORT_FOLLOWERS,
        sort_newest = site::STR_SORT_NEWEST,
        cards = render_cards(profiles, ctx),
    );

    let scripts = format!(
        r#"  <script type="application/json" id="profiles-data">{json}</script>
  <script>
    (function() {{
      function escapeHtml(value) {{
        return String(value == null ? '' : value)
          .replaceAll('&', '&amp;')
          .replaceAll('<', '&lt;')
          .replaceAll('>', '&gt;')
          .replaceAll('"', '&quot;')
          .replaceAll("'", '&#39;');
      }}

      function formatWithCommas(n) {{
        const s = String(Number(n || 0));
        return s.replace(/\B(?=(\d{{3}})+(?!\d))/g, ",");
      }}

      function truncate(value, max) {{
        const s = String(value || '');
        return s.length > max ? s.slice(0, max) + '…' : s;
      }}

      function createdTime(value) {{
        const t = Date.parse(value || '');
        return isNaN(t) ? 0 : t;
      }}

      let profiles;
      try {{
        profiles = JSON.parse(document.getElementById('profiles-data').textContent || '[]');
      }} catch (e) {{
        document.getElementById('cards').innerHTML =
          '<div class="error-state">{load_error}</div>';
        return;
      }}

      const cardsEl = document.getElementById('cards');
      const searchEl = document.getElementById('search');
      const sortEl = document.getElementById('sort');

      function matches(p, q) {{
        if (!q) return true;
        return (p.display_name || '').toLowerCase().includes(q)
          || (p.username || '').toLowerCase().includes(q)
          || (p.note || '').toLowerCase().includes(q);
      }}

      function sorted(items, key) {{
        const out = items.slice();
        if (key === 'name') {{
          out.sort((a, b) => (a.display_name || a.username).localeCompare(b.display_name || b.username));
        }} else if (key === 'posts') {{
          out.sort((a, b) => Number(b.statuses_count || 0) - Number(a.statuses_count || 0));
        }} else if (key === 'followers') {{
          out.sort((a, b) => Number(b.followers_count || 0) - Number(a.followers_count || 0));
        }} else if (key === 'newest') {{
          out.sort((a, b) => createdTime(b.created_at) - createdTime(a.created_at));
        }}
        return out;
      }}

      function cardHtml(p) {{
        const name = escapeHtml(p.display_name || p.username);
        const initial = escapeHtml((p.display_name || p.username || '?').charAt(0).toUpperCase());
        const avatar = p.avatar
          ? `<img src="${{escapeHtml(p.avatar)}}" alt="${{name}}" loading="lazy" onerror="this.style.display='none'; this.nextElementSibling.style.display='flex';"><span class="avatar-fallback" style="display:none;">${{initial}}</span>`
          : `<span class="avatar-fallback">${{initial}}</span>`;
        const bio = truncate(p.note || '', 160);
        const bioHtml = bio ? `<p class="profile-bio">${{escapeHtml(bio)}}</p>` : '';
        return `<a class="profile-card" href="/profiles/${{encodeURIComponent(p.username)}}/">
          <div class="profile-avatar">${{avatar}}</div>
          <div class="profile-info">
          <h3 class="profile-name">${{name}}</h3>
          <p class="profile-username">@${{escapeHtml(p.acct)}}</p>
          ${{bioHtml}}
          <div class="profile-stats">
            <span class="profile-stat"><strong>${{formatWithCommas(p.statuses_count)}}</strong> {posts_label}</span>
            <span class="profile-stat"><strong>${{formatWithCommas(p.followers_count)}}</strong> {followers_label}</span>
          </div>
          </div>
        </a>`;
      }}

      function render() {{
        const q = (searchEl.value || '').trim().toLowerCase();
        const visible = sorted(profiles.filter(p => matches(p, q)), sortEl.value);
        if (visible.length === 0) {{
          cardsEl.innerHTML = '<div class="empty-state">{no_results}</div>';
          return;
        }}
        cardsEl.innerHTML = '<div class="profile-grid">' + visible.map(cardHtml).join('') + '</div>';
      }}

      let searchTimer = null;
      searchEl.addEventListener('input', function() {{
        clearTimeout(searchTimer);
        searchTimer = setTimeout(render, 80);
      }});
      sortEl.addEventListener('change', render);
    }})();
  </script>
"#,
        json = profiles_json(profiles, ctx),
        load_error = site::STR_LOAD_ERROR,
        no_results = site::STR_NO_RESULTS,
        posts_label = site::STR_POSTS,
        followers_label = site::STR_FOLLOWERS,
    );

    let title = format!(
        "{} — {}",
        site::STR_EXPLORER_TITLE,
        escape_html(&ctx.site_title)
    );
    let description = format!(
        "Explorator pentru profilurile Mastodon de pe {}.",
        escape_html(&ctx.host)
    );
    site::page_shell(
        ctx,
        &title,
        &description,
        &ctx.absolute("/profiles/"),
        "",
        &main,
        &scripts,
    )
}
