// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Command-line surface and plain-text rendering of results.

use clap::{Parser, Subcommand, ValueEnum};

use crate::models::subscription::{PurgeOutcome, Subscription};

#[derive(Parser, Debug)]
#[command(
    name = "mailsweep",
    version,
    about = "Scan an IMAP mailbox for newsletter senders and bulk-delete their mail"
)]
pub struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// IMAP server hostname. Inferred from the account domain when omitted.
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// IMAP server port.
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Account email address.
    #[arg(long, global = true)]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan the mailbox for senders exposing a List-Unsubscribe header
    Scan {
        /// How many of the most recent messages to scan.
        #[arg(long)]
        limit: Option<usize>,

        /// Mailbox to scan.
        #[arg(long)]
        mailbox: Option<String>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Delete all messages from the given senders, then expunge
    Purge {
        /// Sender email addresses to purge.
        #[arg(required = true)]
        senders: Vec<String>,

        /// Mailbox to purge from.
        #[arg(long)]
        mailbox: Option<String>,

        /// Count matches without flagging or expunging anything.
        #[arg(long, short = 'n')]
        dry_run: bool,

        /// Skip the confirmation prompt.
        #[arg(long, short = 'y')]
        yes: bool,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Renders scan results as a fixed-width table, one row per sender.
pub fn render_subscriptions(subscriptions: &[Subscription]) -> String {
    if subscriptions.is_empty() {
        return "Clean inbox! No subscriptions found.".to_string();
    }

    let mut rows: Vec<[String; 5]> = vec![[
        "Sender".to_string(),
        "Address".to_string(),
        "Method".to_string(),
        "Last seen".to_string(),
        "Unsubscribe".to_string(),
    ]];
    for sub in subscriptions {
        rows.push([
            sub.sender_name.clone(),
            sub.sender_address.clone(),
            sub.method.to_string(),
            sub.last_seen
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string()),
            sub.action.clone(),
        ]);
    }

    let mut out = format!("Found {} subscriptions\n\n", subscriptions.len());
    out.push_str(&render_rows(&rows));
    out
}

/// Renders purge results as a fixed-width table, one row per sender.
pub fn render_purge_outcomes(outcomes: &[PurgeOutcome], dry_run: bool) -> String {
    let mut rows: Vec<[String; 3]> = vec![[
        "Sender".to_string(),
        "Matched".to_string(),
        if dry_run { "Would delete" } else { "Deleted" }.to_string(),
    ]];
    for outcome in outcomes {
        rows.push([
            outcome.sender.clone(),
            outcome.matched.to_string(),
            if dry_run {
                outcome.matched.to_string()
            } else {
                outcome.deleted.to_string()
            },
        ]);
    }
    render_rows(&rows)
}

fn render_rows<const N: usize>(rows: &[[String; N]]) -> String {
    let mut widths = [0usize; N];
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for (idx, row) in rows.iter().enumerate() {
        for (i, cell) in row.iter().enumerate() {
            if i + 1 == N {
                out.push_str(cell);
            } else {
                let pad = widths[i] - cell.chars().count();
                out.push_str(cell);
                out.extend(std::iter::repeat(' ').take(pad + 2));
            }
        }
        out.push('\n');
        if idx == 0 {
            let total: usize = widths.iter().sum::<usize>() + 2 * (N - 1);
            out.extend(std::iter::repeat('-').take(total));
            out.push('\n');
        }
    }
    out
}
