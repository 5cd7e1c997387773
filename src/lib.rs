// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Library core for mailsweep.
//!
//! Scans an IMAP mailbox for messages carrying a `List-Unsubscribe` header,
//! aggregates one entry per distinct sender, and optionally bulk-deletes all
//! mail from selected senders.

// --- Modules ---
pub mod cli;
pub mod config;
pub mod error;
pub mod headers;
pub mod imap;
pub mod models;
pub mod purge;
pub mod scan;
pub mod unsubscribe;
pub mod utils;

// CONSOLIDATED PRELUDE
pub mod prelude {
    // Config
    pub use crate::config::Settings;

    // IMAP
    pub use crate::imap::client::ImapClient;
    pub use crate::imap::error::ImapError;
    pub use crate::imap::session::ImapSession;
    pub use crate::imap::types::{HeaderBlock, MailboxInfo, SearchCriteria};

    // Domain models
    pub use crate::models::subscription::{PurgeOutcome, Subscription, UnsubscribeMethod};
    pub use crate::unsubscribe::UnsubscribeAction;

    // Common Libs
    pub use log::{debug, error, info, trace, warn};
    pub use std::sync::Arc;
    pub use thiserror::Error;
    pub use tokio::sync::Mutex as TokioMutex;
}
