use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use gabriel::{Config, Monitor};
use log::{error, info};

/// Fire a webhook when a fragment of a web page changes
#[derive(Parser, Debug)]
#[command(name = "gabriel", version, about)]
struct Cli {
    /// Configuration file (TOML, or a legacy .json file)
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let Some(path) = cli.config.or_else(Config::default_path) else {
        error!("No configuration file given and no default config directory available");
        return ExitCode::FAILURE;
    };

    let monitor = match Config::load(&path).and_then(Monitor::new) {
        Ok(monitor) => monitor,
        Err(e) => {
            error!("Failed to load {}: {e}", path.display());
            return ExitCode::FAILURE;
        }
    };
    info!("Loaded configuration from {}", path.display());

    let outcome = monitor.run().await;
    info!("Finished: {outcome:?}");
    outcome.exit_code()
}
