// SPDX-FileCopyrightText: 2026 Antri Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `antri shell` command implementation.
//!
//! Interactive operator console with readline history: register visitors,
//! call tickets (in order or out of order), close them out, and reset the
//! queue. Destructive commands confirm here, at the boundary -- the core
//! never prompts.

use antri_config::AntriConfig;
use antri_core::{AntriError, TicketStatus, now_ms};
use antri_queue::remaining_secs;
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use crate::bootstrap::{self, RunningNode, format_ticket_number, status_label};

enum Flow {
    Continue,
    Quit,
}

/// Runs the interactive operator console.
pub async fn run_shell(config: AntriConfig, join: Option<&str>) -> Result<(), AntriError> {
    let cancel = antri_node::shutdown::install_signal_handler();
    let node = bootstrap::start_node(&config, join, cancel.clone()).await?;

    match &node.room {
        Some(room) => println!("antri operator console -- room `{}`", room.room_id),
        None => println!("antri operator console -- local-only"),
    }
    println!("type `help` for commands\n");

    let mut rl =
        DefaultEditor::new().map_err(|e| AntriError::Internal(format!("readline init: {e}")))?;

    loop {
        if cancel.is_cancelled() {
            break;
        }
        let prompt = format!("antri [{}]> ", status_label(&node.status));
        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);
                match handle_line(&line, &node, &config, &mut rl).await {
                    Ok(Flow::Quit) => break,
                    Ok(Flow::Continue) => {}
                    Err(e) => println!("{} {e}", "error:".red()),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                debug!(error = %e, "readline failed");
                break;
            }
        }
    }

    println!("bye");
    node.stop().await;
    Ok(())
}

async fn handle_line(
    line: &str,
    node: &RunningNode,
    config: &AntriConfig,
    rl: &mut DefaultEditor,
) -> Result<Flow, AntriError> {
    let mut parts = line.split_whitespace();
    let command = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    match command {
        "help" => print_help(),
        "add" => {
            // Everything up to the last token is the name; phones have no
            // spaces, names often do.
            if args.len() < 2 {
                println!("usage: add <name> <contact>");
                return Ok(Flow::Continue);
            }
            let contact = args[args.len() - 1];
            let name = args[..args.len() - 1].join(" ");
            let number = node.handle.register(&name, contact).await?;
            println!(
                "ticket {} for {}",
                format_ticket_number(number).bold().cyan(),
                name
            );
        }
        "next" => match node.handle.call_next().await? {
            Some(number) => println!("calling {}", format_ticket_number(number).bold().cyan()),
            None => println!("queue is empty"),
        },
        "call" | "done" | "skip" => {
            let Some(number) = args.first().and_then(|a| a.parse::<u32>().ok()) else {
                println!("usage: {command} <number>");
                return Ok(Flow::Continue);
            };
            let changed = match command {
                "call" => node.handle.call(number).await?,
                "done" => node.handle.complete(number).await?,
                _ => node.handle.skip(number).await?,
            };
            if changed {
                println!("ticket {} {}", format_ticket_number(number), past_tense(command));
            } else {
                println!("nothing to do for ticket {number}");
            }
        }
        "list" => print_list(node, config).await?,
        "status" => print_status(node, config).await?,
        "reset" => {
            let answer = rl
                .readline("clear the whole queue? type `yes` to confirm: ")
                .unwrap_or_default();
            if answer.trim() == "yes" {
                node.handle.reset().await?;
                println!("queue cleared");
            } else {
                println!("kept as-is");
            }
        }
        "quit" | "exit" => return Ok(Flow::Quit),
        _ => println!("unknown command `{command}`, try `help`"),
    }

    Ok(Flow::Continue)
}

fn past_tense(command: &str) -> &'static str {
    match command {
        "call" => "called",
        "done" => "completed",
        _ => "skipped",
    }
}

fn print_help() {
    println!("  add <name> <contact>   register a visitor");
    println!("  next                   call the first waiting ticket");
    println!("  call <number>          call a specific waiting ticket");
    println!("  done <number>          mark the called ticket served");
    println!("  skip <number>          mark the called ticket a no-show");
    println!("  list                   waiting / active / recent tickets");
    println!("  status                 queue summary and connection state");
    println!("  reset                  clear everything (asks first)");
    println!("  quit                   leave the console");
}

async fn print_list(node: &RunningNode, config: &AntriConfig) -> Result<(), AntriError> {
    let snapshot = node.handle.snapshot().await?;
    let store = antri_queue::QueueStore::new(snapshot);
    let window = config.display.call_window_secs;

    let active = store.active();
    if active.is_empty() {
        println!("{}", "no active ticket".dimmed());
    } else {
        for ticket in active {
            let countdown = store
                .snapshot()
                .calling_started_at
                .filter(|_| store.snapshot().current_number == Some(ticket.number))
                .map(|started| format_countdown(remaining_secs(started, now_ms(), window)))
                .unwrap_or_default();
            println!(
                "{} {} {} {}",
                "serving".green().bold(),
                format_ticket_number(ticket.number).bold(),
                ticket.name,
                countdown.dimmed()
            );
        }
    }

    let waiting = store.waiting();
    println!("waiting ({}):", waiting.len());
    for ticket in &waiting {
        println!(
            "  {} {} ({})",
            format_ticket_number(ticket.number).cyan(),
            ticket.name,
            ticket.contact
        );
    }

    let done = store.recently_completed(config.display.history);
    if !done.is_empty() {
        let numbers: Vec<String> = done
            .iter()
            .map(|t| format_ticket_number(t.number))
            .collect();
        println!("recently served: {}", numbers.join(", ").dimmed());
    }

    Ok(())
}

async fn print_status(node: &RunningNode, config: &AntriConfig) -> Result<(), AntriError> {
    let snapshot = node.handle.snapshot().await?;
    let waiting = snapshot
        .tickets
        .iter()
        .filter(|t| t.status == TicketStatus::Waiting)
        .count();

    println!("  connection:  {}", status_label(&node.status));
    println!(
        "  now serving: {}",
        snapshot
            .current_number
            .map(format_ticket_number)
            .unwrap_or_else(|| "--".into())
    );
    println!("  waiting:     {waiting}");
    println!("  last issued: {}", snapshot.last_number);
    if let Some(remaining) =
        antri_queue::remaining_in(&snapshot, now_ms(), config.display.call_window_secs)
    {
        println!("  call window: {}", format_countdown(remaining));
    }
    Ok(())
}

fn format_countdown(remaining: u32) -> String {
    format!("{:02}:{:02}", remaining / 60, remaining % 60)
}
