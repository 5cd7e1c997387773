// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Bulk delete: for each selected sender, flag every matching message
//! \Deleted and expunge once at the end.

use log::{info, warn};

use crate::imap::client::ImapClient;
use crate::imap::error::ImapError;
use crate::imap::types::SearchCriteria;
use crate::models::subscription::PurgeOutcome;

/// UIDs flagged per STORE round trip.
const STORE_CHUNK_SIZE: usize = 500;

/// Deletes all messages from each sender in the selected mailbox.
///
/// With `dry_run` set, matches are counted and reported but nothing is
/// flagged or expunged. Expunge runs once, after all senders are flagged.
pub async fn purge(
    client: &ImapClient,
    mailbox: &str,
    senders: &[String],
    dry_run: bool,
) -> Result<Vec<PurgeOutcome>, ImapError> {
    client.select_mailbox(mailbox).await?;

    let mut outcomes = Vec::with_capacity(senders.len());
    let mut flagged_any = false;

    for sender in senders {
        let uids = client
            .search(&SearchCriteria::From(sender.clone()))
            .await?;
        let matched = uids.len();

        if matched == 0 {
            warn!("No messages from '{}' in '{}'", sender, mailbox);
            outcomes.push(PurgeOutcome {
                sender: sender.clone(),
                matched: 0,
                deleted: 0,
            });
            continue;
        }

        if dry_run {
            info!("[dry-run] {} messages from '{}' would be deleted", matched, sender);
            outcomes.push(PurgeOutcome {
                sender: sender.clone(),
                matched,
                deleted: 0,
            });
            continue;
        }

        for chunk in uids.chunks(STORE_CHUNK_SIZE) {
            client.mark_deleted(chunk).await?;
        }
        flagged_any = true;
        info!("Flagged {} messages from '{}' as deleted", matched, sender);

        outcomes.push(PurgeOutcome {
            sender: sender.clone(),
            matched,
            deleted: matched,
        });
    }

    if flagged_any {
        client.expunge().await?;
        info!("Expunge complete");
    }

    Ok(outcomes)
}
