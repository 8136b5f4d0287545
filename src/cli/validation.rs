use crate::cli::args::CliArgs;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(instance) = args.instance.as_deref() {
        if reqwest::Url::parse(instance.trim()).is_err() {
            return Err(format!("invalid --instance '{instance}'"));
        }
    }
    if let Some(site_url) = args.site_url.as_deref() {
        if reqwest::Url::parse(site_url.trim()).is_err() {
            return Err(format!("invalid --site-url '{site_url}'"));
        }
    }
    if let Some(rate) = args.rate {
        if rate == 0 {
            return Err("invalid --rate, expected positive integer".to_string());
        }
    }
    if let Some(limit) = args.directory_limit {
        if limit == 0 {
            return Err("invalid --directory-limit, expected positive integer".to_string());
        }
    }
    if let Some(workers) = args.workers {
        if workers == 0 {
            return Err("invalid --workers, expected positive integer".to_string());
        }
    }
    Ok(())
}
