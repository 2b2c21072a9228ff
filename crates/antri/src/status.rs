// SPDX-FileCopyrightText: 2026 Antri Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `antri status` command implementation.
//!
//! Reads the locally persisted snapshot and prints a queue summary.
//! Deliberately does not join the room: status must work offline and
//! without disturbing a running console on the same machine.

use std::io::IsTerminal;

use antri_config::AntriConfig;
use antri_core::{AntriError, SnapshotStore, TicketStatus, now_ms};
use antri_queue::remaining_in;
use antri_storage::SqliteStore;
use serde::Serialize;

/// Structured status output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub tickets: usize,
    pub waiting: usize,
    pub current_number: Option<u32>,
    pub last_number: u32,
    pub call_remaining_secs: Option<u32>,
    pub room_id: Option<String>,
    pub database_path: String,
}

/// Runs the `antri status` command.
///
/// If `--json` is passed, outputs structured JSON for scripting.
/// If `--plain` is passed or stdout is not a TTY, disables colors.
pub async fn run_status(config: &AntriConfig, json: bool, plain: bool) -> Result<(), AntriError> {
    let storage = SqliteStore::new(config.storage.clone());
    storage.initialize().await?;
    let snapshot = storage.load().await?.unwrap_or_default();
    storage.close().await?;

    let waiting = snapshot
        .tickets
        .iter()
        .filter(|t| t.status == TicketStatus::Waiting)
        .count();
    let response = StatusResponse {
        tickets: snapshot.tickets.len(),
        waiting,
        current_number: snapshot.current_number,
        last_number: snapshot.last_number,
        call_remaining_secs: remaining_in(&snapshot, now_ms(), config.display.call_window_secs),
        room_id: snapshot.room_config.as_ref().map(|r| r.room_id.clone()),
        database_path: config.storage.database_path.clone(),
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&response).unwrap_or_else(|_| "{}".to_string())
        );
        return Ok(());
    }

    let use_color = !plain && std::io::stdout().is_terminal();
    print_summary(&response, use_color);
    Ok(())
}

fn print_summary(response: &StatusResponse, use_color: bool) {
    println!();
    println!("  antri status");
    println!("  {}", "-".repeat(35));

    let serving = response
        .current_number
        .map(|n| format!("{n:02}"))
        .unwrap_or_else(|| "--".to_string());
    if use_color {
        use colored::Colorize;
        println!("    Serving:  {}", serving.cyan().bold());
    } else {
        println!("    Serving:  {serving}");
    }
    if let Some(remaining) = response.call_remaining_secs {
        println!(
            "    Window:   {:02}:{:02} remaining",
            remaining / 60,
            remaining % 60
        );
    }
    println!("    Waiting:  {}", response.waiting);
    println!("    Issued:   {}", response.last_number);
    match &response.room_id {
        Some(room) => println!("    Room:     {room}"),
        None => println!("    Room:     local-only"),
    }
    println!("    Database: {}", response.database_path);
    println!();
}
