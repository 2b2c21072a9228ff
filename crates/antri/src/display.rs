// SPDX-FileCopyrightText: 2026 Antri Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `antri display` command implementation.
//!
//! Passive board for a public screen: the called number large, the call
//! countdown, and the next tickets in line. Redraws on a one-second tick;
//! the countdown is recomputed from the stored timestamp every time, never
//! stored.

use std::time::Duration;

use antri_config::AntriConfig;
use antri_core::{AntriError, now_ms};
use antri_queue::{QueueStore, remaining_in};
use colored::Colorize;

use crate::bootstrap::{self, format_ticket_number, status_label};

/// Runs the display board until interrupted.
pub async fn run_display(config: AntriConfig, join: Option<&str>) -> Result<(), AntriError> {
    let cancel = antri_node::shutdown::install_signal_handler();
    let node = bootstrap::start_node(&config, join, cancel.clone()).await?;

    let mut tick = tokio::time::interval(Duration::from_secs(1));
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tick.tick() => {
                let snapshot = node.handle.snapshot().await?;
                render(&QueueStore::new(snapshot), &node, &config);
            }
        }
    }

    node.stop().await;
    Ok(())
}

fn render(store: &QueueStore, node: &bootstrap::RunningNode, config: &AntriConfig) {
    let snapshot = store.snapshot();

    // Clear and home; a fresh frame every tick beats diffing for a board.
    print!("\x1b[2J\x1b[H");

    let room = node
        .room
        .as_ref()
        .map(|r| r.room_id.as_str())
        .unwrap_or("local");
    println!(
        "  {}    room: {}    [{}]",
        "ANTRI".bold(),
        room,
        status_label(&node.status)
    );
    println!();

    match snapshot.current_number {
        Some(number) => {
            println!("  {}", "NOW SERVING".bold());
            println!();
            println!("      {}", big_number(number).bold().cyan());
            match remaining_in(snapshot, now_ms(), config.display.call_window_secs) {
                Some(0) => println!("\n  {}", "time is up -- please come forward".red().bold()),
                Some(remaining) => println!(
                    "\n  please come to the counter   {}",
                    format!("{:02}:{:02}", remaining / 60, remaining % 60).bold()
                ),
                // Countdown cleared: the number stays up as "last called".
                None => println!("\n  {}", "served".dimmed()),
            }
        }
        None => {
            println!("  {}", "standby...".dimmed());
        }
    }

    println!();
    let next = store.next_up(config.display.next_up);
    if next.is_empty() {
        println!("  next in line: {}", "nobody waiting".dimmed());
    } else {
        println!("  next in line:");
        for ticket in next {
            println!(
                "    {} {}",
                format_ticket_number(ticket.number).cyan(),
                ticket.name
            );
        }
    }
    println!();
    println!("  waiting: {}", store.waiting().len());
}

/// Oversized two-digit rendering for across-the-room readability.
fn big_number(number: u32) -> String {
    format!("  {}  ", format_ticket_number(number))
}
