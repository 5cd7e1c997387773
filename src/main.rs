// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use clap::Parser;
use env_logger::Env;
use log::warn;
use std::io::{self, Write};

use mailsweep::cli::{render_purge_outcomes, render_subscriptions, Cli, Command, OutputFormat};
use mailsweep::config::{clamp_scan_limit, Settings};
use mailsweep::error::AppError;
use mailsweep::imap::client::ImapClient;
use mailsweep::{purge, scan};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let mut settings = Settings::new(cli.config.as_deref())?;

    // CLI flags override file and environment configuration.
    if let Some(host) = cli.host {
        settings.imap_host = host;
    }
    if let Some(port) = cli.port {
        settings.imap_port = port;
    }
    if let Some(user) = cli.user {
        settings.imap_user = user;
    }

    // Initialize logger
    env_logger::Builder::from_env(Env::default().default_filter_or(settings.log.level.as_str()))
        .init();

    match cli.command {
        Command::Scan {
            limit,
            mailbox,
            format,
        } => {
            let limit = clamp_scan_limit(limit.unwrap_or(settings.scan_limit));
            let mailbox = mailbox.unwrap_or_else(|| settings.mailbox.clone());

            let client = connect(&settings).await?;
            let result = scan::scan(&client, &mailbox, limit).await;
            logout(client).await;
            let subscriptions = result?;

            match format {
                OutputFormat::Table => println!("{}", render_subscriptions(&subscriptions)),
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&subscriptions)?)
                }
            }
        }

        Command::Purge {
            senders,
            mailbox,
            dry_run,
            yes,
            format,
        } => {
            let mailbox = mailbox.unwrap_or_else(|| settings.mailbox.clone());

            if !dry_run && !yes && !confirm_purge(&senders, &mailbox)? {
                println!("Aborted.");
                return Ok(());
            }

            let client = connect(&settings).await?;
            let result = purge::purge(&client, &mailbox, &senders, dry_run).await;
            logout(client).await;
            let outcomes = result?;

            match format {
                OutputFormat::Table => println!("{}", render_purge_outcomes(&outcomes, dry_run)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcomes)?),
            }
        }
    }

    Ok(())
}

async fn connect(settings: &Settings) -> Result<ImapClient, AppError> {
    let user = settings.validate_user()?.to_string();
    let host = settings.resolve_host()?;
    let password = resolve_password(settings)?;
    let client = ImapClient::connect(&host, settings.imap_port, &user, &password).await?;
    Ok(client)
}

async fn logout(client: ImapClient) {
    if let Err(e) = client.logout().await {
        warn!("Logout failed: {}", e);
    }
}

fn resolve_password(settings: &Settings) -> Result<String, AppError> {
    match settings.imap_pass.as_deref() {
        Some(pass) if !pass.is_empty() => Ok(pass.to_string()),
        _ => Ok(rpassword::prompt_password("IMAP password: ")?),
    }
}

/// Deletion is irreversible; require an explicit yes unless --yes was given.
fn confirm_purge(senders: &[String], mailbox: &str) -> Result<bool, AppError> {
    eprint!(
        "Permanently delete all messages from {} sender(s) in '{}'? [y/N] ",
        senders.len(),
        mailbox
    );
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    let answer = line.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}
