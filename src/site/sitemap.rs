use super::SiteContext;
use crate::model::Profile;
use crate::utils::{escape_xml, parse_timestamp};

fn push_url(out: &mut String, loc: &str, changefreq: &str, priority: &str, lastmod: Option<&str>) {
    out.push_str("  <url>\n");
    out.push_str(&format!("    <loc>{}</loc>\n", escape_xml(loc)));
    out.push_str(&format!("    <changefreq>{changefreq}</changefreq>\n"));
    out.push_str(&format!("    <priority>{priority}</priority>\n"));
    if let Some(lastmod) = lastmod {
        out.push_str(&format!("    <lastmod>{lastmod}</lastmod>\n"));
    }
    out.push_str("  </url>\n");
}

pub fn render(profiles: &[Profile], ctx: &SiteContext) -> String {
    let mut out = String::new();
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    out.push('\n');
    out.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
    out.push('\n');

    push_url(&mut out, &format!("{}/", ctx.site_url()), "daily", "1.0", None);
    push_url(&mut out, &ctx.absolute("/profiles/"), "daily", "0.9", None);
    push_url(&mut out, &ctx.absolute("/stats/"), "daily", "0.8", None);
    push_url(&mut out, &ctx.absolute("/feed.xml"), "hourly", "0.7", None);

    for profile in profiles {
        if profile.username.is_empty() {
            continue;
        }
        let lastmod = profile
            .last_status_at
            .as_deref()
            .and_then(parse_timestamp)
            .map(|t| t.format("%Y-%m-%d").to_string());
        push_url(
            &mut out,
            &ctx.profile_url(&profile.username),
            "daily",
            "0.6",
            lastmod.as_deref(),
        );
    }

    out.push_str("</urlset>\n");
    out
}
