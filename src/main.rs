use airdrop_claimer::cli::{self, Cli, Commands};
use airdrop_claimer::config::{AppConfig, LoggingConfig};
use airdrop_claimer::error::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

mod main_modes;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::load_from(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            let _guard = init_logging(&LoggingConfig::default());
            error!("Failed to load config from {}: {}", cli.config.display(), e);
            std::process::exit(1);
        }
    };

    let guard = init_logging(&config.logging);

    if let Err(e) = run(cli, config).await {
        error!("{}", e);
        drop(guard);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: AppConfig) -> Result<()> {
    let command = match cli.command {
        Some(command) => command,
        None => {
            let (raw, choice) = cli::prompt_menu().await?;
            match choice {
                Some(choice) => choice.into(),
                None => {
                    error!("[MANAGER] Wrong module selected: `{}`", raw);
                    return Ok(());
                }
            }
        }
    };

    info!("Running {:?}", command);
    match command {
        Commands::InitStore => main_modes::run_store_init(&config).await,
        Commands::Claim => main_modes::run_claimer(config).await,
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `logging.level`. The returned guard flushes the file
/// writer and must live until exit.
fn init_logging(logging: &LoggingConfig) -> Option<WorkerGuard> {
    let default_filter = format!("{},airdrop_claimer=debug", logging.level);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    // `rolling::daily` panics when it cannot create the file
    let (file_writer, guard) = match &logging.file {
        Some(dir) if std::fs::create_dir_all(dir).is_ok() => {
            let appender = tracing_appender::rolling::daily(dir, "airdrop-claimer.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(writer), Some(guard))
        }
        Some(dir) => {
            eprintln!("Log directory {} is not writable, logging to stdout only", dir.display());
            (None, None)
        }
        None => (None, None),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let result = match (logging.json, file_writer) {
        (true, Some(file)) => builder
            .json()
            .with_ansi(false)
            .with_writer(std::io::stdout.and(file))
            .try_init(),
        (true, None) => builder.json().try_init(),
        (false, Some(file)) => builder
            .with_ansi(false)
            .with_writer(std::io::stdout.and(file))
            .try_init(),
        (false, None) => builder.try_init(),
    };

    if let Err(e) = result {
        eprintln!("Logging already initialised: {}", e);
    }
    guard
}
