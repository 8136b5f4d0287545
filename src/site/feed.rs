use chrono::{DateTime, Utc};

use super::SiteContext;
use crate::model::Profile;
use crate::utils::{escape_xml, truncate_chars};

fn feed_date(now: DateTime<Utc>) -> String {
    now.to_rfc2822()
}

fn push_tag(out: &mut String, indent: &str, tag: &str, value: &str) {
    out.push_str(&format!("{indent}<{tag}>{value}</{tag}>\n"));
}

/// The site-wide RSS feed: one item per profile, ordered by username.
pub fn main_feed(profiles: &[Profile], ctx: &SiteContext, now: DateTime<Utc>) -> String {
    let mut ordered: Vec<&Profile> = profiles.iter().collect();
    ordered.sort_by(|a, b| a.username.to_lowercase().cmp(&b.username.to_lowercase()));

    let mut out = String::new();
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    out.push('\n');
    out.push_str(r#"<rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom">"#);
    out.push('\n');
    out.push_str("  <channel>\n");
    push_tag(
        &mut out,
        "    ",
        "title",
        &escape_xml(&format!("{} - Profile Mastodon", ctx.site_title)),
    );
    push_tag(&mut out, "    ", "link", &format!("{}/", ctx.site_url()));
    push_tag(
        &mut out,
        "    ",
        "description",
        &escape_xml(&format!(
            "Feed RSS pentru profilele Mastodon de pe {}",
            ctx.host
        )),
    );
    push_tag(&mut out, "    ", "language", &escape_xml(&ctx.language));
    push_tag(&mut out, "    ", "lastBuildDate", &feed_date(now));
    out.push_str(&format!(
        "    <atom:link href=\"{}/feed.xml\" rel=\"self\" type=\"application/rss+xml\"/>\n",
        ctx.site_url()
    ));

    for profile in ordered {
        out.push_str("    <item>\n");
        push_tag(
            &mut out,
            "      ",
            "title",
            &escape_xml(&format!("{} (@{})", profile.name(), profile.username)),
        );
        push_tag(
            &mut out,
            "      ",
            "link",
            &ctx.profile_url(&profile.username),
        );
        push_tag(
            &mut out,
            "      ",
            "description",
            &escape_xml(&truncate_chars(&profile.note, 500)),
        );
        out.push_str(&format!(
            "      <guid isPermaLink=\"false\">profile-{}</guid>\n",
            escape_xml(&profile.username)
        ));
        push_tag(&mut out, "      ", "pubDate", &feed_date(now));
        out.push_str("    </item>\n");
    }

    out.push_str("  </channel>\n");
    out.push_str("</rss>\n");
    out
}

/// A profile's own feed: channel metadata pointing at both the generated
/// page and the instance RSS.
pub fn profile_feed(profile: &Profile, ctx: &SiteContext, now: DateTime<Utc>) -> String {
    let page_url = ctx.profile_url(&profile.username);
    let rss_url = profile.rss_url_or_default(&ctx.host);

    let mut out = String::new();
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    out.push('\n');
    out.push_str(r#"<rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom">"#);
    out.push('\n');
    out.push_str("  <channel>\n");
    push_tag(
        &mut out,
        "    ",
        "title",
        &escape_xml(&format!(
            "{} (@{}) - {}",
            profile.name(),
            profile.acct_or_default(&ctx.host),
            ctx.site_title
        )),
    );
    push_tag(&mut out, "    ", "link", &page_url);
    push_tag(
        &mut out,
        "    ",
        "description",
        &escape_xml(&truncate_chars(&profile.note, 500)),
    );
    push_tag(&mut out, "    ", "language", &escape_xml(&ctx.language));
    push_tag(&mut out, "    ", "lastBuildDate", &feed_date(now));
    out.push_str(&format!(
        "    <atom:link href=\"{}\" rel=\"alternate\" type=\"application/rss+xml\"/>\n",
        escape_xml(&rss_url)
    ));
    out.push_str(&format!(
        "    <atom:link href=\"{page_url}feed.xml\" rel=\"self\" type=\"application/rss+xml\"/>\n"
    ));
    out.push_str("  </channel>\n");
    out.push_str("</rss>\n");
    out
}
