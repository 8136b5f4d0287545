use super::{avatar_html, SiteContext};
use crate::model::Profile;
use crate::site;
use crate::utils::{digest_bucket, escape_html, format_date, format_number, truncate_chars};

/// Outbound-link rel attribute. mstdn.ro profiles are always nofollow; on
/// the home instance a stable hash keeps roughly one profile in five
/// nofollow across rebuilds.
pub fn rel_attribute(username: &str, instance: &str) -> &'static str {
    if instance == "mstdn.ro" {
        return "noopener nofollow";
    }
    if digest_bucket(username) < 20 {
        "noopener nofollow"
    } else {
        "noopener"
    }
}

/// Static page for one profile.
pub fn render_page(profile: &Profile, ctx: &SiteContext) -> String {
    let display_name = escape_html(profile.name());
    let acct = escape_html(&profile.acct_or_default(&ctx.host));
    let instance = profile.instance_or(&ctx.host).to_string();
    let rel_attr = rel_attribute(&profile.username, &instance);
    let description_meta = escape_html(&truncate_chars(profile.plain_note().trim(), 200));
    let canonical = ctx.profile_url(&profile.username);
    let rss_url = profile.rss_url_or_default(&ctx.host);

    let extra_head = format!(
        "  <link rel=\"alternate\" type=\"application/rss+xml\" title=\"{display_name} RSS\" href=\"{rss}\">\n",
        rss = escape_html(&rss_url),
    );

    let main = format!(
        r#"    <div class="profile-page">
      <div class="profile-banner"></div>
      <div class="profile-header-large">
        <div class="profile-avatar-large">
          {avatar}
        </div>
        <div class="profile-details">
          <h1 class="profile-name-large">{display_name}</h1>
          <p class="profile-username-large">@{acct}</p>
          <div class="profile-description-large">{description}</div>
        </div>
      </div>

      <div class="profile-stats-large">
        <div class="profile-stat-large">
          <div class="stat-value">{statuses_count}</div>
          <div class="stat-label">{posts_label}</div>
        </div>
        <div class="profile-stat-large">
          <div class="stat-value">{followers_count}</div>
          <div class="stat-label">{followers_label}</div>
        </div>
        <div class="profile-stat-large">
          <div class="stat-value">{following_count}</div>
          <div class="stat-label">{following_label}</div>
        </div>
        <div class="profile-stat-large">
          <div class="stat-value">{created_date}</div>
          <div class="stat-label">{member_since_label}</div>
        </div>
      </div>

      <div class="links-block">
        <h2>{links_label}</h2>
        <div class="links">
          <a href="{url}" target="_blank" rel="{rel_attr}" class="btn btn-primary">
            <svg width="20" height="20" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2">
              <path d="M18 13v6a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2V8a2 2 0 0 1 2-2h6"></path>
              <polyline points="15 3 21 3 21 9"></polyline>
              <line x1="10" y1="14" x2="21" y2="3"></line>
            </svg>
            {view_label}
          </a>
          <a href="{rss_url}" target="_blank" rel="{rel_attr}" class="rss-link">
            <svg width="20" height="20" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2">
              <path d="M4 11a9 9 0 0 1 9 9"></path>
              <path d="M4 4a16 16 0 0 1 16 16"></path>
              <circle cx="5" cy="19" r="1"></circle>
            </svg>
            {subscribe_label}
          </a>
        </div>
      </div>
    </div>"#,
        avatar = avatar_html(profile),
        display_name = display_name,
        acct = acct,
        // biography keeps its original HTML on the dedicated page
        description = profile.note,
        statuses_count = format_number(profile.statuses_count),
        posts_label = site::STR_POSTS,
        followers_count = format_number(profile.followers_count),
        followers_label = site::STR_FOLLOWERS,
        following_count = format_number(profile.following_count),
        following_label = site::STR_FOLLOWING,
        created_date = format_date(profile.created_at.as_deref()),
        member_since_label = site::STR_MEMBER_SINCE,
        links_label = site::STR_LINKS,
        url = escape_html(&profile.url_or_default(&ctx.host)),
        rel_attr = rel_attr,
        rss_url = escape_html(&rss_url),
        view_label = site::STR_VIEW_ON_MASTODON,
        subscribe_label = site::STR_SUBSCRIBE_RSS,
    );

    let title = format!(
        "{display_name} (@{acct}) — {}",
        escape_html(&ctx.site_title)
    );
    site::page_shell(
        ctx,
        &title,
        &description_meta,
        &canonical,
        &extra_head,
        &main,
        "",
    )
}
