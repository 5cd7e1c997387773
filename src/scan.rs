// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Inbox scan: one linear pass over the most recent N messages, newest first,
//! collecting one `Subscription` per distinct sender that exposes an
//! actionable `List-Unsubscribe` header.

use log::{debug, info};
use std::collections::HashSet;

use crate::headers::{header_value, parse_date, parse_from};
use crate::imap::client::ImapClient;
use crate::imap::error::ImapError;
use crate::imap::types::{HeaderBlock, SearchCriteria};
use crate::models::subscription::Subscription;
use crate::unsubscribe::parse_unsubscribe;

/// Messages fetched per UID FETCH round trip.
const FETCH_CHUNK_SIZE: usize = 50;

/// Scans the mailbox and returns one entry per distinct sender.
///
/// Only header fields are fetched; bodies never leave the server. Messages
/// whose `List-Unsubscribe` header yields no actionable link are skipped.
pub async fn scan(
    client: &ImapClient,
    mailbox: &str,
    limit: usize,
) -> Result<Vec<Subscription>, ImapError> {
    let mailbox_info = client.select_mailbox(mailbox).await?;
    info!(
        "Scanning '{}': {} messages, limit {}",
        mailbox, mailbox_info.exists, limit
    );

    let mut uids = client.search(&SearchCriteria::All).await?;
    uids.sort_unstable();

    // Keep the most recent N, then walk them newest-first.
    let skip = uids.len().saturating_sub(limit);
    let mut recent: Vec<u32> = uids[skip..].to_vec();
    recent.reverse();

    let mut aggregator = ScanAggregator::new();
    for chunk in recent.chunks(FETCH_CHUNK_SIZE) {
        let mut blocks = client.fetch_header_fields(chunk).await?;
        // Servers return fetch results in mailbox order; restore newest-first.
        blocks.sort_unstable_by(|a, b| b.uid.cmp(&a.uid));
        for block in &blocks {
            aggregator.push(block);
        }
        debug!(
            "Scanned chunk of {}, {} senders so far",
            chunk.len(),
            aggregator.len()
        );
    }

    let subscriptions = aggregator.into_subscriptions();
    info!("Scan complete: {} subscriptions found", subscriptions.len());
    Ok(subscriptions)
}

/// Accumulates subscriptions across fetch chunks, deduplicating by sender.
///
/// Feed blocks newest-first: the first block seen for a sender wins, so each
/// entry carries the most recent date and unsubscribe link.
#[derive(Debug, Default)]
pub struct ScanAggregator {
    seen_senders: HashSet<String>,
    subscriptions: Vec<Subscription>,
}

impl ScanAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    pub fn push(&mut self, block: &HeaderBlock) {
        let subscription = match subscription_from_block(&block.raw) {
            Some(s) => s,
            None => return,
        };

        // Dedupe on the address; display name is the fallback key for the
        // rare sender without a parseable addr-spec.
        let key = if subscription.sender_address.is_empty() {
            subscription.sender_name.to_lowercase()
        } else {
            subscription.sender_address.clone()
        };
        if !self.seen_senders.insert(key) {
            return;
        }

        info!(
            "Found subscription: {} <{}>",
            subscription.sender_name, subscription.sender_address
        );
        self.subscriptions.push(subscription);
    }

    pub fn into_subscriptions(self) -> Vec<Subscription> {
        self.subscriptions
    }
}

/// Builds a `Subscription` from one raw header block, if the message exposes
/// an actionable unsubscribe link.
pub fn subscription_from_block(raw: &[u8]) -> Option<Subscription> {
    let unsub_header = header_value(raw, "List-Unsubscribe")?;
    let action = parse_unsubscribe(&unsub_header)?;

    let sender = header_value(raw, "From")
        .map(|v| parse_from(&v))
        .unwrap_or_else(|| crate::headers::SenderMailbox {
            name: None,
            address: String::new(),
        });

    let sender_name = match (&sender.name, sender.address.is_empty()) {
        (Some(name), _) => name.clone(),
        (None, false) => sender.address.clone(),
        (None, true) => "Unknown".to_string(),
    };

    let last_seen = header_value(raw, "Date").and_then(|v| parse_date(&v));

    Some(Subscription {
        sender_name,
        sender_address: sender.address,
        last_seen,
        method: action.method,
        action: action.target,
    })
}
