// SPDX-FileCopyrightText: 2026 Tavola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tavola - asynchronous dining-request fulfillment service.
//!
//! This is the binary entry point for the Tavola service.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};

mod enqueue;
mod serve;
mod status;

/// Tavola - asynchronous dining-request fulfillment service.
#[derive(Parser, Debug)]
#[command(name = "tavola", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the fulfillment worker.
    Serve,
    /// Show queue, dead-letter, and notification counts.
    Status,
    /// Validate and enqueue a dining request from the command line.
    Enqueue(enqueue::EnqueueArgs),
    /// Print the resolved configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match tavola_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            tavola_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Status) => status::run_status(&config).await,
        Some(Commands::Enqueue(args)) => enqueue::run_enqueue(&config, args).await,
        Some(Commands::Config) => {
            match toml::to_string_pretty(&config) {
                Ok(rendered) => {
                    println!("{rendered}");
                    Ok(())
                }
                Err(e) => Err(tavola_core::TavolaError::Internal(format!(
                    "failed to render config: {e}"
                ))),
            }
        }
        None => {
            println!("tavola: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
