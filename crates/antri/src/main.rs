// SPDX-FileCopyrightText: 2026 Antri Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Antri - a shared queue tracker for service counters.
//!
//! This is the binary entry point: operator shell, display board,
//! registration, status, and join links.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod bootstrap;
mod display;
mod link;
mod register;
mod shell;
mod status;

use clap::{Parser, Subcommand};

/// Antri - a shared queue tracker for service counters.
#[derive(Parser, Debug)]
#[command(name = "antri", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch the interactive operator console.
    Shell {
        /// Join link overriding the configured room.
        #[arg(long)]
        join: Option<String>,
    },
    /// Run the passive display board with the call countdown.
    Display {
        /// Join link overriding the configured room.
        #[arg(long)]
        join: Option<String>,
    },
    /// Register one visitor and print the assigned ticket.
    Register {
        /// Visitor name.
        name: String,
        /// Contact (phone) for call notifications.
        contact: String,
    },
    /// Show the locally persisted queue state.
    Status {
        /// Output structured JSON for scripting.
        #[arg(long)]
        json: bool,
        /// Disable colors.
        #[arg(long)]
        plain: bool,
    },
    /// Print the shareable join link for this room.
    Link {
        /// Requested initial view (register, display, operator).
        #[arg(long)]
        view: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match antri_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            antri_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.node.log_level);

    let result = match cli.command {
        Some(Commands::Shell { join }) => shell::run_shell(config, join.as_deref()).await,
        Some(Commands::Display { join }) => display::run_display(config, join.as_deref()).await,
        Some(Commands::Register { name, contact }) => {
            register::run_register(config, &name, &contact).await
        }
        Some(Commands::Status { json, plain }) => status::run_status(&config, json, plain).await,
        Some(Commands::Link { view }) => link::run_link(&config, view.as_deref()).await,
        None => {
            println!("antri: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// Install the tracing subscriber, honoring `RUST_LOG` over the configured
/// level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
