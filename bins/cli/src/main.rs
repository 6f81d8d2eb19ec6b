//! Invsplit command-line driver
//!
//! Reads rows from JSON files, splits them and prints the JSON result.

mod cli;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use invsplit_shared::{AppError, LogSettings};

fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let args = cli::Cli::parse();

    // Load configuration
    let config = match args.load_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err}");
            return exit_code(err.exit_code());
        }
    };

    init_tracing(&config.log);

    match cli::run(&args, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "run failed");
            eprintln!("Error: {err:#}");
            exit_code(err.downcast_ref::<AppError>().map_or(1, AppError::exit_code))
        }
    }
}

/// Initialize tracing on stderr; stdout carries the JSON result.
fn init_tracing(settings: &LogSettings) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.filter));
    let registry = tracing_subscriber::registry().with(filter);

    if settings.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
