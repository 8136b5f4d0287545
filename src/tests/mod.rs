use chrono::TimeZone;
use chrono::Utc;

use crate::directory::{self, SortKey};
use crate::model::{Account, Profile, ServerStats};
use crate::site::{self, SiteContext};

fn profile(username: &str) -> Profile {
    Profile {
        username: username.to_string(),
        ..Default::default()
    }
}

fn ctx() -> SiteContext {
    SiteContext::new("https://example.org", "Test Hub", "social.5th.ro", "ro")
}

#[test]
fn format_number_inserts_thousands_separators() {
    assert_eq!(crate::utils::format_number(0), "0");
    assert_eq!(crate::utils::format_number(999), "999");
    assert_eq!(crate::utils::format_number(1000), "1,000");
    assert_eq!(crate::utils::format_number(1234567), "1,234,567");
}

#[test]
fn strip_html_removes_tags_only() {
    assert_eq!(
        crate::utils::strip_html("<p>Hello <b>world</b></p>"),
        "Hello world"
    );
    assert_eq!(crate::utils::strip_html(""), "");
    assert_eq!(crate::utils::strip_html("no tags"), "no tags");
}

#[test]
fn format_date_handles_iso_missing_and_garbage() {
    assert_eq!(
        crate::utils::format_date(Some("2023-01-15T10:00:00.000Z")),
        "15 Jan 2023"
    );
    assert_eq!(crate::utils::format_date(Some("2024-05-01")), "01 May 2024");
    assert_eq!(crate::utils::format_date(None), "N/A");
    assert_eq!(crate::utils::format_date(Some("")), "N/A");
    // unparseable values keep their date-sized prefix
    assert_eq!(
        crate::utils::format_date(Some("gibberish-value")),
        "gibberish-"
    );
}

#[test]
fn truncate_chars_is_boundary_safe() {
    assert_eq!(crate::utils::truncate_chars("scurt", 10), "scurt");
    assert_eq!(crate::utils::truncate_chars("abcdef", 3), "abc…");
    assert_eq!(crate::utils::truncate_chars("șțîăâ!", 5), "șțîăâ…");
}

#[test]
fn percent_encode_keeps_unreserved() {
    assert_eq!(crate::utils::percent_encode_segment("ana_maria-01"), "ana_maria-01");
    assert_eq!(crate::utils::percent_encode_segment("ana maria"), "ana%20maria");
}

#[test]
fn digest_bucket_is_stable_and_bounded() {
    let a = crate::utils::digest_bucket("pentruoameni");
    let b = crate::utils::digest_bucket("pentruoameni");
    assert_eq!(a, b);
    assert!(a < 100);
}

#[test]
fn query_matches_name_username_and_stripped_bio() {
    let mut p = profile("recent_news");
    p.display_name = "Știri Recente".to_string();
    p.note = "<p>Noutăți din Cluj</p>".to_string();

    assert!(directory::matches_query(&p, "știri"));
    assert!(directory::matches_query(&p, "RECENT_NEWS"));
    assert!(directory::matches_query(&p, "cluj"));
    assert!(!directory::matches_query(&p, "<p>"));
    assert!(!directory::matches_query(&p, "bucurești"));
}

#[test]
fn empty_query_returns_everything_in_order() {
    let profiles = vec![profile("zed"), profile("ana"), profile("bob")];
    let filtered = directory::filter_profiles(&profiles, "   ");
    let usernames: Vec<&str> = filtered.iter().map(|p| p.username.as_str()).collect();
    assert_eq!(usernames, vec!["zed", "ana", "bob"]);
}

#[test]
fn filtered_survivors_all_match() {
    let mut a = profile("ana");
    a.note = "<b>ziar local</b>".to_string();
    let b = profile("bob");
    let profiles = vec![a, b];

    let filtered = directory::filter_profiles(&profiles, "ziar");
    assert_eq!(filtered.len(), 1);
    assert!(filtered
        .iter()
        .all(|p| directory::matches_query(p, "ziar")));
}

#[test]
fn sort_by_posts_places_busier_profile_first() {
    let mut ana = profile("ana");
    ana.statuses_count = 150;
    ana.followers_count = 10;
    let mut bob = profile("bob");
    bob.statuses_count = 5;

    let mut profiles = vec![bob, ana];
    directory::sort_profiles(&mut profiles, SortKey::Posts);
    assert_eq!(profiles[0].username, "ana");
}

#[test]
fn sort_by_followers_is_non_increasing() {
    let mut profiles: Vec<Profile> = [7u64, 300, 0, 42, 42, 9001]
        .iter()
        .enumerate()
        .map(|(i, &count)| {
            let mut p = profile(&format!("user{i}"));
            p.followers_count = count;
            p
        })
        .collect();
    directory::sort_profiles(&mut profiles, SortKey::Followers);
    for pair in profiles.windows(2) {
        assert!(pair[0].followers_count >= pair[1].followers_count);
    }
}

#[test]
fn sort_by_name_ignores_case() {
    let mut a = profile("x1");
    a.display_name = "banat".to_string();
    let mut b = profile("x2");
    b.display_name = "Ardeal".to_string();

    let mut profiles = vec![a, b];
    directory::sort_profiles(&mut profiles, SortKey::Name);
    assert_eq!(profiles[0].display_name, "Ardeal");
}

#[test]
fn sort_by_newest_treats_missing_dates_as_epoch() {
    let mut old = profile("old");
    old.created_at = Some("2020-03-01T00:00:00.000Z".to_string());
    let mut new = profile("new");
    new.created_at = Some("2024-03-01T00:00:00.000Z".to_string());
    let undated = profile("undated");

    let mut profiles = vec![undated, old, new];
    directory::sort_profiles(&mut profiles, SortKey::Newest);
    let usernames: Vec<&str> = profiles.iter().map(|p| p.username.as_str()).collect();
    assert_eq!(usernames, vec!["new", "old", "undated"]);
}

#[test]
fn sort_key_parses_known_values() {
    assert_eq!(SortKey::parse("Posts"), Some(SortKey::Posts));
    assert_eq!(SortKey::parse("newest"), Some(SortKey::Newest));
    assert_eq!(SortKey::parse("rank"), None);
}

#[test]
fn top_lists_take_ten_in_descending_order() {
    let profiles: Vec<Profile> = (0..25u64)
        .map(|i| {
            let mut p = profile(&format!("user{i}"));
            p.statuses_count = i * 3;
            p.followers_count = 100 - i;
            p
        })
        .collect();

    let top = directory::top_by_posts(&profiles, 10);
    assert_eq!(top.len(), 10);
    assert_eq!(top[0].statuses_count, 72);
    for pair in top.windows(2) {
        assert!(pair[0].statuses_count >= pair[1].statuses_count);
    }

    let top = directory::top_by_followers(&profiles, 10);
    assert_eq!(top[0].followers_count, 100);
}

#[test]
fn merge_updates_appends_and_sorts() {
    let mut ana = profile("ana");
    ana.statuses_count = 1;
    let existing = vec![profile("Zed"), ana];

    let mut refreshed_ana = profile("ana");
    refreshed_ana.statuses_count = 99;
    // a refresh for a username we do not track is ignored
    let stray = profile("stray");

    let discovered = vec![profile("mara"), profile("ana")];

    let outcome =
        directory::merge_profiles(existing, vec![refreshed_ana, stray], discovered);
    assert_eq!(outcome.updated, 1);
    assert_eq!(outcome.added, 1);

    let usernames: Vec<&str> = outcome.profiles.iter().map(|p| p.username.as_str()).collect();
    assert_eq!(usernames, vec!["ana", "mara", "Zed"]);
    assert_eq!(outcome.profiles[0].statuses_count, 99);
}

#[test]
fn refresh_set_defaults_to_whole_snapshot() {
    let existing = vec![profile("ana"), profile("bob")];
    assert_eq!(
        directory::refresh_set(&existing, &[]),
        vec!["ana".to_string(), "bob".to_string()]
    );
    assert_eq!(
        directory::refresh_set(&existing, &["bob".to_string(), "ghost".to_string()]),
        vec!["bob".to_string()]
    );
}

#[test]
fn local_account_filter_accepts_and_rejects() {
    let mut account = Account {
        username: "ana".to_string(),
        url: "https://social.5th.ro/@ana".to_string(),
        ..Default::default()
    };
    assert!(crate::fetcher::is_local_account(&account, "social.5th.ro"));

    account.acct = "ana".to_string();
    assert!(crate::fetcher::is_local_account(&account, "social.5th.ro"));

    account.acct = "ana@social.5th.ro".to_string();
    assert!(crate::fetcher::is_local_account(&account, "social.5th.ro"));

    account.acct = "ana@mstdn.ro".to_string();
    assert!(!crate::fetcher::is_local_account(&account, "social.5th.ro"));

    account.acct = String::new();
    account.url = "https://mstdn.ro/@ana".to_string();
    assert!(!crate::fetcher::is_local_account(&account, "social.5th.ro"));
}

#[test]
fn normalized_profile_gets_synthesized_urls() {
    let account = Account {
        id: "1".to_string(),
        username: "ana".to_string(),
        acct: "ana".to_string(),
        statuses_count: 3,
        ..Default::default()
    };
    let p = Profile::from_account(&account, "social.5th.ro");
    assert_eq!(p.url, "https://social.5th.ro/@ana");
    assert_eq!(p.rss_url, "https://social.5th.ro/@ana.rss");
    assert_eq!(p.acct, None);
    assert_eq!(p.statuses_count, 3);
}

#[test]
fn profile_deserializes_with_defaults() {
    let p: Profile = serde_json::from_str(r#"{"username":"ana"}"#).unwrap();
    assert_eq!(p.username, "ana");
    assert_eq!(p.statuses_count, 0);
    assert_eq!(p.created_at, None);
    assert_eq!(p.instance, None);
}

#[test]
fn server_stats_deserialize_ignores_extra_fields() {
    let raw = r#"{
        "uri": "social.5th.ro",
        "title": "Social 5th",
        "short_description": "hub",
        "version": "4.2.1",
        "stats": {"user_count": 120, "status_count": 4500, "domain_count": 90},
        "languages": ["ro"]
    }"#;
    let stats: ServerStats = serde_json::from_str(raw).unwrap();
    assert_eq!(stats.version, "4.2.1");
    assert_eq!(stats.stats.user_count, 120);
    assert_eq!(stats.title.as_deref(), Some("Social 5th"));
}

#[test]
fn initial_falls_back_to_username_then_question_mark() {
    let mut p = profile("bob");
    assert_eq!(p.initial(), 'B');
    p.display_name = "ana".to_string();
    assert_eq!(p.initial(), 'A');
    let empty = profile("");
    assert_eq!(empty.initial(), '?');
}

#[test]
fn card_without_avatar_shows_initial_badge() {
    let mut p = profile("ana");
    p.display_name = "Ana Pop".to_string();
    p.statuses_count = 1234;
    p.followers_count = 56;

    let card = site::explorer::render_card(&p, &ctx());
    assert!(card.contains("avatar-fallback"));
    assert!(card.contains(">A</span>"));
    assert!(card.contains("1,234"));
    assert!(card.contains("href=\"/profiles/ana/\""));
    assert!(!card.contains("<img"));
}

#[test]
fn card_escapes_name_and_strips_bio() {
    let mut p = profile("ana");
    p.display_name = "Ana <script>".to_string();
    p.note = "<p>ziar <b>local</b></p>".to_string();

    let card = site::explorer::render_card(&p, &ctx());
    assert!(card.contains("Ana &lt;script&gt;"));
    assert!(card.contains("ziar local"));
    assert!(!card.contains("<b>local</b>"));
}

#[test]
fn empty_profile_list_renders_no_results_state() {
    let html = site::explorer::render_cards(&[], &ctx());
    assert!(html.contains(site::STR_NO_RESULTS));
    assert!(!html.contains("profile-card"));
}

#[test]
fn explorer_page_embeds_data_and_controls() {
    let mut p = profile("ana");
    p.display_name = "Ana".to_string();
    let html = site::explorer::render_page(&[p], &ctx());
    assert!(html.contains("id=\"profiles-data\""));
    assert!(html.contains("id=\"search\""));
    assert!(html.contains("id=\"sort\""));
    assert!(html.contains(site::STR_SEARCH_PLACEHOLDER));
}

#[test]
fn embedded_json_cannot_break_out_of_script_tag() {
    let mut p = profile("ana");
    p.note = "</script><script>alert(1)</script>".to_string();
    let html = site::explorer::render_page(&[p], &ctx());
    assert!(!html.contains("</script><script>alert(1)"));
}

#[test]
fn profile_page_renders_stats_and_member_since() {
    let mut p = profile("ana");
    p.display_name = "Ana".to_string();
    p.followers_count = 7654;
    p.created_at = Some("2022-11-02T08:00:00.000Z".to_string());

    let html = site::profile::render_page(&p, &ctx());
    assert!(html.contains(site::STR_MEMBER_SINCE));
    assert!(html.contains("02 Nov 2022"));
    assert!(html.contains("7,654"));
    assert!(html.contains("https://social.5th.ro/@ana.rss"));
}

#[test]
fn rel_attribute_follows_instance_rule() {
    assert_eq!(
        site::profile::rel_attribute("anything", "mstdn.ro"),
        "noopener nofollow"
    );
    let rel = site::profile::rel_attribute("ana", "social.5th.ro");
    assert!(rel == "noopener" || rel == "noopener nofollow");
    // stable across calls
    assert_eq!(rel, site::profile::rel_attribute("ana", "social.5th.ro"));
}

#[test]
fn stats_page_shows_placeholder_without_snapshot() {
    let html = site::stats::render_page(&[profile("ana")], None, &ctx());
    assert!(html.contains(site::STR_STATS_UNAVAILABLE));
    assert!(!html.contains("data-counter"));
}

#[test]
fn stats_page_renders_counters_and_top_lists() {
    let mut profiles = Vec::new();
    for i in 0..12u64 {
        let mut p = profile(&format!("user{i}"));
        p.statuses_count = i;
        p.followers_count = i * 2;
        profiles.push(p);
    }
    let stats = ServerStats {
        version: "4.2.1".to_string(),
        title: Some("Social 5th".to_string()),
        short_description: None,
        stats: crate::model::UsageCounts {
            user_count: 120,
            status_count: 4500,
            domain_count: 90,
        },
    };

    let html = site::stats::render_page(&profiles, Some(&stats), &ctx());
    assert!(html.contains("data-target=\"120\""));
    assert!(html.contains("data-target=\"4500\""));
    assert!(html.contains(site::STR_TOP_POSTS));
    assert!(html.contains(site::STR_TOP_FOLLOWERS));
    // ten entries per list, not twelve
    assert!(html.contains("user11"));
    assert!(!html.contains(">user0<"));
}

#[test]
fn counter_is_linear_and_clamped() {
    let counter = crate::counter::Counter::with_duration(100, 1000);
    assert_eq!(counter.value_at(0), 0);
    assert_eq!(counter.value_at(500), 50);
    assert_eq!(counter.value_at(1000), 100);
    assert_eq!(counter.value_at(90_000), 100);
}

#[test]
fn counter_frames_are_monotone_and_finish_on_target() {
    let counter = crate::counter::Counter::new(987_654);
    let frames = counter.frames();
    assert_eq!(frames.first().copied(), Some(0));
    assert_eq!(frames.last().copied(), Some(987_654));
    for pair in frames.windows(2) {
        assert!(pair[0] <= pair[1]);
        assert!(pair[1] <= 987_654);
    }
}

#[tokio::test]
async fn counter_run_hands_out_final_value() {
    let counter = crate::counter::Counter::with_duration(10, 50);
    let mut last = 0;
    counter.run(|value| last = value).await;
    assert_eq!(last, 10);
}

#[test]
fn main_feed_escapes_and_orders_items() {
    let mut b = profile("Bravo");
    b.display_name = "B <&> B".to_string();
    b.note = "<p>bio</p>".to_string();
    let a = profile("alpha");

    let now = Utc.with_ymd_and_hms(2025, 8, 1, 12, 0, 0).unwrap();
    let xml = site::feed::main_feed(&[b, a], &ctx(), now);

    assert!(xml.contains("B &lt;&amp;&gt; B"));
    assert!(xml.contains("&lt;p&gt;bio&lt;/p&gt;"));
    assert!(xml.contains("<guid isPermaLink=\"false\">profile-alpha</guid>"));
    assert!(xml.contains("Aug 2025 12:00:00 +0000"));
    // alpha sorts before Bravo case-insensitively
    let alpha_at = xml.find("profile-alpha").unwrap();
    let bravo_at = xml.find("profile-Bravo").unwrap();
    assert!(alpha_at < bravo_at);
}

#[test]
fn profile_feed_links_page_and_instance_rss() {
    let p = profile("ana");
    let now = Utc.with_ymd_and_hms(2025, 8, 1, 12, 0, 0).unwrap();
    let xml = site::feed::profile_feed(&p, &ctx(), now);
    assert!(xml.contains("https://example.org/profiles/ana/</link>"));
    assert!(xml.contains("https://social.5th.ro/@ana.rss"));
    assert!(xml.contains("rel=\"self\""));
}

#[test]
fn sitemap_lists_static_pages_and_profiles() {
    let mut p = profile("ana");
    p.last_status_at = Some("2024-05-01".to_string());
    let xml = site::sitemap::render(&[p], &ctx());

    assert!(xml.contains("<loc>https://example.org/</loc>"));
    assert!(xml.contains("<loc>https://example.org/profiles/</loc>"));
    assert!(xml.contains("<loc>https://example.org/stats/</loc>"));
    assert!(xml.contains("<loc>https://example.org/profiles/ana/</loc>"));
    assert!(xml.contains("<lastmod>2024-05-01</lastmod>"));
    assert!(xml.contains("<priority>1.0</priority>"));
}

#[tokio::test]
async fn missing_snapshot_is_a_distinct_error() {
    let path = std::env::temp_dir().join("fedidir-missing-snapshot/profiles.json");
    let err = directory::load_profiles(&path).await.unwrap_err();
    assert!(matches!(err, directory::SnapshotError::NotFound { .. }));
}

#[tokio::test]
async fn snapshot_roundtrips_through_disk() {
    let dir = std::env::temp_dir().join(format!("fedidir-test-{}", std::process::id()));
    tokio::fs::create_dir_all(&dir).await.unwrap();
    let path = dir.join("profiles.json");

    let mut p = profile("ana");
    p.display_name = "Ana".to_string();
    p.statuses_count = 42;
    directory::save_profiles(&path, &[p]).await.unwrap();

    let loaded = directory::load_profiles(&path).await.unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].username, "ana");
    assert_eq!(loaded[0].statuses_count, 42);

    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[test]
fn config_yaml_parses_partial_files() {
    let raw = "instance: https://social.5th.ro\nknown_usernames:\n  - ana\n  - bob\nskip_feeds: true\n";
    let cfg: crate::config::ConfigFile = serde_yaml::from_str(raw).unwrap();
    assert_eq!(cfg.instance.as_deref(), Some("https://social.5th.ro"));
    assert_eq!(
        cfg.known_usernames,
        Some(vec!["ana".to_string(), "bob".to_string()])
    );
    assert_eq!(cfg.skip_feeds, Some(true));
    assert_eq!(cfg.rate, None);
}
