use super::SiteContext;
use crate::counter;
use crate::directory;
use crate::model::{Profile, ServerStats};
use crate::site;
use crate::utils::{escape_html, format_number};

fn top_list_html(heading: &str, profiles: &[Profile], ctx: &SiteContext, counts: &[u64]) -> String {
    let mut items = String::new();
    for (profile, count) in profiles.iter().zip(counts.iter()) {
        items.push_str(&format!(
            "          <li><a href=\"{href}\">{name}</a> <span class=\"count\">{count}</span></li>\n",
            href = ctx.profile_path(&profile.username),
            name = escape_html(profile.name()),
            count = format_number(*count),
        ));
    }
    format!(
        r#"      <div class="top-list">
        <h2>{heading}</h2>
        <ol>
{items}        </ol>
      </div>"#
    )
}

fn server_block_html(stats: Option<&ServerStats>) -> String {
    let stats = match stats {
        Some(stats) => stats,
        None => {
            return format!(
                r#"    <div class="error-state">{}</div>"#,
                site::STR_STATS_UNAVAILABLE
            )
        }
    };

    let mut about = String::new();
    if let Some(title) = stats.title.as_deref().filter(|t| !t.trim().is_empty()) {
        about.push_str(&format!(
            "    <h2 class=\"page-subtitle\">{}</h2>\n",
            escape_html(title)
        ));
    }
    if let Some(description) = stats
        .short_description
        .as_deref()
        .filter(|d| !d.trim().is_empty())
    {
        about.push_str(&format!(
            "    <p class=\"page-subtitle\">{}</p>\n",
            escape_html(description)
        ));
    }

    format!(
        r#"{about}    <div class="stats-grid">
      <div class="stat-tile">
        <div class="stat-value">{version}</div>
        <div class="stat-label">{version_label}</div>
      </div>
      <div class="stat-tile">
        <div class="stat-value" data-counter data-target="{users}">0</div>
        <div class="stat-label">{users_label}</div>
      </div>
      <div class="stat-tile">
        <div class="stat-value" data-counter data-target="{statuses}">0</div>
        <div class="stat-label">{statuses_label}</div>
      </div>
      <div class="stat-tile">
        <div class="stat-value" data-counter data-target="{domains}">0</div>
        <div class="stat-label">{domains_label}</div>
      </div>
    </div>"#,
        about = about,
        version = escape_html(&stats.version),
        version_label = site::STR_VERSION,
        users = stats.stats.user_count,
        users_label = site::STR_USERS,
        statuses = stats.stats.status_count,
        statuses_label = site::STR_STATUSES,
        domains = stats.stats.domain_count,
        domains_label = site::STR_DOMAINS,
    )
}

/// Count-up script for the stat tiles. Same constants as the Rust counter;
/// the interval keeps ticking even if the tile leaves the document.
fn counter_script() -> String {
    format!(
        r#"  <script>
    (function() {{
      const DURATION = {duration};
      const TICK = {tick};

      function formatWithCommas(n) {{
        const s = String(Number(n || 0));
        return s.replace(/\B(?=(\d{{3}})+(?!\d))/g, ",");
      }}

      for (const el of document.querySelectorAll('[data-counter]')) {{
        const target = Number(el.getAttribute('data-target') || 0);
        let elapsed = 0;
        const timer = setInterval(function() {{
          elapsed += TICK;
          if (elapsed >= DURATION) {{
            el.textContent = formatWithCommas(target);
            clearInterval(timer);
            return;
          }}
          el.textContent = formatWithCommas(Math.floor(target * elapsed / DURATION));
        }}, TICK);
      }}
    }})();
  </script>
"#,
        duration = counter::DEFAULT_DURATION_MS,
        tick = counter::TICK_MS,
    )
}

/// The statistics page: server block (or placeholder), then the two top-10
/// lists computed from the same snapshot the explorer uses.
pub fn render_page(
    profiles: &[Profile],
    stats: Option<&ServerStats>,
    ctx: &SiteContext,
) -> String {
    let top_posts = directory::top_by_posts(profiles, 10);
    let top_posts_counts: Vec<u64> = top_posts.iter().map(|p| p.statuses_count).collect();
    let top_followers = directory::top_by_followers(profiles, 10);
    let top_followers_counts: Vec<u64> = top_followers.iter().map(|p| p.followers_count).collect();

    let main = format!(
        r#"    <h1 class="page-title">{title}</h1>
{server_block}
    <div class="top-lists">
{top_posts}
{top_followers}
    </div>"#,
        title = site::STR_STATS_TITLE,
        server_block = server_block_html(stats),
        top_posts = top_list_html(site::STR_TOP_POSTS, &top_posts, ctx, &top_posts_counts),
        top_followers = top_list_html(
            site::STR_TOP_FOLLOWERS,
            &top_followers,
            ctx,
            &top_followers_counts
        ),
    );

    let title = format!(
        "{} — {}",
        site::STR_STATS_TITLE,
        escape_html(&ctx.site_title)
    );
    let description = format!(
        "Statistici pentru serverul Mastodon {}.",
        escape_html(&ctx.host)
    );
    // nothing to animate when the server block degraded to the placeholder
    let scripts = if stats.is_some() {
        counter_script()
    } else {
        String::new()
    };
    site::page_shell(
        ctx,
        &title,
        &description,
        &ctx.absolute("/stats/"),
        "",
        &main,
        &scripts,
    )
}
