// SPDX-FileCopyrightText: 2026 Antri Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `antri register` command implementation.
//!
//! One-shot kiosk registration: join the room, take a ticket, print it,
//! leave. Validation errors surface here synchronously; everything else
//! degrades to registering locally.

use std::time::Duration;

use antri_config::AntriConfig;
use antri_core::{AntriError, ConnectionState};
use colored::Colorize;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::bootstrap::{self, format_ticket_number};

/// How long a one-shot command waits for the bootstrap sync before
/// registering, so the assigned number continues from the room's state
/// rather than a stale local copy.
const SYNC_GRACE: Duration = Duration::from_secs(2);

/// Time for the outbound publish to flush before the process exits.
const PUBLISH_FLUSH: Duration = Duration::from_millis(300);

/// Registers one visitor and prints the ticket.
pub async fn run_register(
    config: AntriConfig,
    name: &str,
    contact: &str,
) -> Result<(), AntriError> {
    let cancel = CancellationToken::new();
    let node = bootstrap::start_node(&config, None, cancel.clone()).await?;

    if let Some(mut status) = node.status.clone() {
        // Best effort: if the relay is unreachable the registration still
        // goes through locally.
        let connected = tokio::time::timeout(
            SYNC_GRACE,
            status.wait_for(|s| *s == ConnectionState::Connected),
        )
        .await;
        match connected {
            Ok(Ok(_)) => tokio::time::sleep(SYNC_GRACE).await,
            _ => debug!("no connection yet, registering locally"),
        }
    }

    let number = node.handle.register(name, contact).await?;

    println!();
    println!("  queue ticket {}", format_ticket_number(number).bold().cyan());
    println!("  {name}");
    println!("  {}", "keep this number until you are called".dimmed());
    println!();

    if node.status.is_some() {
        tokio::time::sleep(PUBLISH_FLUSH).await;
    }
    node.stop().await;
    Ok(())
}
