use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "fedidir",
    version,
    about = "Mastodon profile-directory static-site builder",
    long_about = "fedidir refreshes a profile snapshot from a Mastodon instance and generates the\ndirectory site around it: the explorer page, one static page and RSS feed per\nprofile, the statistics page, the main feed, and the sitemap.\n\nExamples:\n  fedidir -u https://social.5th.ro -o ./site\n  fedidir --skip-update -o ./site\n  fedidir -u https://social.5th.ro --config ~/.fedidir/config.yml\n\nTip: Use --config to persist site settings and keep CLI invocations short."
)]
pub struct CliArgs {
    #[arg(
        short = 'u',
        long = "instance",
        value_name = "URL",
        help_heading = "Input",
        help = "Mastodon instance base URL the data comes from."
    )]
    pub instance: Option<String>,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.fedidir/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        short = 'k',
        long = "known-user",
        value_name = "USERNAME",
        action = ArgAction::Append,
        help_heading = "Update",
        help = "Username to refresh on update (repeatable; default: whole snapshot)."
    )]
    pub known_user: Vec<String>,

    #[arg(
        long = "dl",
        visible_alias = "directory-limit",
        value_name = "N",
        help_heading = "Update",
        help = "Maximum accounts to request from the directory endpoint."
    )]
    pub directory_limit: Option<u32>,

    #[arg(
        short = 'o',
        long = "out",
        value_name = "DIR",
        help_heading = "Output",
        help = "Site output directory."
    )]
    pub out_dir: Option<String>,

    #[arg(
        long = "data-dir",
        value_name = "DIR",
        help_heading = "Output",
        help = "Snapshot directory (defaults to <out>/data)."
    )]
    pub data_dir: Option<String>,

    #[arg(
        short = 's',
        long = "site-url",
        value_name = "URL",
        help_heading = "Site",
        help = "Public URL the generated site is served under."
    )]
    pub site_url: Option<String>,

    #[arg(
        long = "site-title",
        value_name = "TITLE",
        help_heading = "Site",
        help = "Site title used in page headers and feeds."
    )]
    pub site_title: Option<String>,

    #[arg(
        long = "lang",
        value_name = "CODE",
        help_heading = "Site",
        help = "Page language code (html lang attribute and feed language)."
    )]
    pub language: Option<String>,

    #[arg(
        short = 'r',
        long = "rt",
        visible_alias = "rate",
        value_name = "RPS",
        help_heading = "Performance",
        help = "Account lookups per second during update."
    )]
    pub rate: Option<u32>,

    #[arg(
        short = 't',
        long = "cnc",
        visible_alias = "concurrency",
        value_name = "N",
        help_heading = "Performance",
        help = "Max in-flight account lookups during update."
    )]
    pub concurrency: Option<u32>,

    #[arg(
        short = 'T',
        long = "to",
        visible_alias = "timeout",
        value_name = "SECONDS",
        help_heading = "Performance",
        help = "Per-request timeout in seconds."
    )]
    pub timeout: Option<usize>,

    #[arg(
        short = 'w',
        long = "wrk",
        visible_alias = "workers",
        value_name = "N",
        help_heading = "Performance",
        help = "Number of runtime worker threads."
    )]
    pub workers: Option<usize>,

    #[arg(
        short = 'U',
        long = "su",
        visible_alias = "skip-update",
        help_heading = "Phases",
        help = "Skip the update phase and build from the existing snapshot."
    )]
    pub skip_update: bool,

    #[arg(
        long = "sp",
        visible_alias = "skip-pages",
        help_heading = "Phases",
        help = "Skip HTML page generation."
    )]
    pub skip_pages: bool,

    #[arg(
        long = "sf",
        visible_alias = "skip-feeds",
        help_heading = "Phases",
        help = "Skip RSS feed generation."
    )]
    pub skip_feeds: bool,

    #[arg(
        long = "sm",
        visible_alias = "skip-sitemap",
        help_heading = "Phases",
        help = "Skip sitemap generation."
    )]
    pub skip_sitemap: bool,

    #[arg(
        short = 'S',
        long = "show-stats",
        help_heading = "Output",
        help = "Animate the server counters in the terminal after the run."
    )]
    pub show_stats: bool,

    #[arg(
        short = 'n',
        long = "nc",
        visible_alias = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,
}
