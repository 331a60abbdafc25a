mod cli;
mod run;

use mockview_common::ConfigError;
use mockview_config::MockviewConfig;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

fn load_config(args: &cli::Args) -> Result<MockviewConfig, ConfigError> {
    match &args.config {
        Some(path) => {
            let config = mockview_config::load_from_path(path)?;
            mockview_config::validation::validate(&config)?;
            Ok(config)
        }
        None => mockview_config::load_config(),
    }
}

fn main() {
    let args = cli::parse();

    // Config is read before logging so its level can apply; errors are
    // reported once the subscriber exists.
    let loaded = load_config(&args);
    let config = loaded.as_ref().cloned().unwrap_or_default();

    let log_directive = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.as_directive().to_string());
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                log_directive
                    .parse()
                    .unwrap_or_else(|_| LevelFilter::INFO.into()),
            ),
        )
        .init();

    tracing::debug!("mockview v{} starting", env!("CARGO_PKG_VERSION"));
    if let Some(path) = &args.config {
        tracing::info!("Using config override: {}", path.display());
    }
    if let Err(e) = &loaded {
        tracing::warn!("Config load failed, using defaults: {e}");
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = run::run(&args, &config, &mut out) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
