//! symsync - Symbol Path Synchronizer - Main Entry Point
//!
//! Composes the process directory with the symbol path service: while
//! the tracked application runs, the symbol path variable points at the
//! directory holding its executable.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use symsync_core::domain::settings::DEFAULT_SYMBOL_PATH_VAR;
use symsync_core::{Settings, SymbolPathService, UpdateError};
use symsync_infra_system::{OsEnvironment, OsFileSystem, ProcessDirectory};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "symsync")]
#[command(about = "Keep a debugger's symbol search path synced to a running application", long_about = None)]
#[command(version)]
struct Cli {
    /// Executable name of the application to track
    #[arg(short, long, env = "SYMSYNC_PROCESS_NAME")]
    process_name: String,

    /// Symbol server marker kept as the first path segment
    #[arg(long, env = "SYMSYNC_SYMBOL_SERVER", default_value = "*SRV")]
    symbol_server: String,

    /// Environment variable holding the symbol search path
    #[arg(long, env = "SYMSYNC_VARIABLE", default_value = DEFAULT_SYMBOL_PATH_VAR)]
    variable: String,

    /// Seconds between process table polls (at least 1)
    #[arg(
        long,
        env = "SYMSYNC_POLL_INTERVAL",
        default_value = "5",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    poll_interval: u64,

    /// Sync once and exit instead of watching
    #[arg(long)]
    once: bool,
}

fn main() -> Result<()> {
    // Logging: pretty for development, JSON for production
    let log_format = std::env::var("SYMSYNC_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("symsync=info"))
        .expect("Failed to create env filter");

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }

    let cli = Cli::parse();

    info!("symsync v{} starting...", VERSION);

    let settings = Settings::new(cli.symbol_server.clone()).with_variable_name(cli.variable.clone());
    let environment = Arc::new(OsEnvironment::new());
    let file_system = Arc::new(OsFileSystem::new());
    let mut service = SymbolPathService::new(settings, environment, file_system);
    let directory = ProcessDirectory::new();

    info!(
        process_name = %cli.process_name,
        variable = %cli.variable,
        poll_interval_secs = %cli.poll_interval,
        "Watching process table"
    );

    loop {
        sync_once(&directory, &mut service, &cli.process_name);

        if cli.once {
            break;
        }
        thread::sleep(Duration::from_secs(cli.poll_interval));
    }

    Ok(())
}

/// One poll: resolve the tracked application's executable and point the
/// symbol path at its directory
fn sync_once(directory: &ProcessDirectory, service: &mut SymbolPathService, process_name: &str) {
    let Some(executable) = directory.resolve_path_of_running_process(process_name) else {
        debug!(process_name, "Tracked application not running");
        return;
    };
    let Some(application_dir) = executable.parent() else {
        warn!(executable = %executable.display(), "Executable path has no parent directory");
        return;
    };

    let application_dir = application_dir.to_string_lossy().into_owned();
    let changed = service.application_path() != Some(application_dir.as_str());

    match service.update_application_path(&application_dir) {
        Ok(()) => {
            if changed {
                info!(
                    application_dir = %application_dir,
                    value = %service.current_value(),
                    "Symbol path now tracks application"
                );
            }
        }
        Err(UpdateError::Validation(reason)) => {
            // Directory can vanish between resolution and validation
            debug!(application_dir = %application_dir, %reason, "Update rejected");
        }
        Err(error @ UpdateError::Persistence { .. }) => {
            warn!(%error, "Symbol path write failed, will retry next poll");
        }
    }
}
