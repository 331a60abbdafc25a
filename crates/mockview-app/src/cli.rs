use std::path::PathBuf;

use clap::Parser;

/// mockview: load an HTML page in a headless WebView and print its events.
#[derive(Parser, Debug)]
#[command(name = "mockview", version, about)]
pub struct Args {
    /// HTML file to load.
    pub file: PathBuf,

    /// Document URL (defaults to the config's base_url).
    #[arg(long)]
    pub url: Option<String>,

    /// Script run after parsing, before DOMContentLoaded listeners.
    #[arg(long)]
    pub inject: Option<String>,

    /// Script run before any page script.
    #[arg(long)]
    pub inject_before: Option<String>,

    /// Disable page scripts and the injected script.
    #[arg(long)]
    pub no_js: bool,

    /// navigator.userAgent override.
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Reload the page this many times after the first load.
    #[arg(long, default_value_t = 0)]
    pub reload: u32,

    /// Expression evaluated in the loaded page (repeatable).
    #[arg(long = "eval")]
    pub eval: Vec<String>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_repeatable_eval_and_flags() {
        let args = Args::try_parse_from([
            "mockview",
            "page.html",
            "--no-js",
            "--reload",
            "2",
            "--eval",
            "document.title",
            "--eval",
            "1 + 1",
        ])
        .unwrap();
        assert_eq!(args.file, PathBuf::from("page.html"));
        assert!(args.no_js);
        assert_eq!(args.reload, 2);
        assert_eq!(args.eval, vec!["document.title", "1 + 1"]);
    }

    #[test]
    fn file_is_required() {
        assert!(Args::try_parse_from(["mockview"]).is_err());
    }
}
