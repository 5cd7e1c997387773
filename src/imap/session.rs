// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use async_imap::Session as AsyncImapSession;
use async_trait::async_trait;
use futures_util::stream::TryStreamExt;
use log::debug;
use std::fmt::Debug;
use tokio::net::TcpStream as TokioTcpStream;
use tokio_rustls::client::TlsStream as TokioTlsStream;
use tokio_util::compat::Compat;

use crate::imap::error::ImapError;
use crate::imap::types::{HeaderBlock, MailboxInfo, SearchCriteria};

// Type aliases for the concrete stream stack.
pub type TlsCompatibleStream = Compat<TokioTlsStream<TokioTcpStream>>;
pub type TlsImapSession = AsyncImapSession<TlsCompatibleStream>;

/// Header fields requested during a scan. Only headers, never the body, and
/// PEEK so the fetch does not set \Seen.
const HEADER_FETCH_QUERY: &str =
    "(UID BODY.PEEK[HEADER.FIELDS (FROM LIST-UNSUBSCRIBE DATE)])";

/// Trait defining the mailbox operations the scanner needs.
///
/// `AsyncImapSessionWrapper` implements this over a live `async_imap`
/// session; tests substitute a mock.
#[async_trait]
pub trait ImapSession: Send + Sync + Debug {
    /// Selects a mailbox for subsequent operations.
    async fn select(&mut self, mailbox: &str) -> Result<MailboxInfo, ImapError>;

    /// Runs UID SEARCH and returns the matching UIDs (unordered).
    async fn uid_search(&mut self, criteria: &SearchCriteria) -> Result<Vec<u32>, ImapError>;

    /// Fetches the From / List-Unsubscribe / Date header fields for a UID set.
    async fn fetch_header_fields(&mut self, uid_set: &str) -> Result<Vec<HeaderBlock>, ImapError>;

    /// Marks a UID set \Deleted without echoing the resulting flag updates.
    async fn add_deleted_flag(&mut self, uid_set: &str) -> Result<(), ImapError>;

    /// Permanently removes messages marked with the \Deleted flag.
    async fn expunge(&mut self) -> Result<(), ImapError>;

    /// Logs out the current session.
    async fn logout(&mut self) -> Result<(), ImapError>;
}

/// Wrapper implementing `ImapSession` over the concrete async-imap session.
pub struct AsyncImapSessionWrapper {
    session: TlsImapSession,
}

impl Debug for AsyncImapSessionWrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncImapSessionWrapper").finish_non_exhaustive()
    }
}

impl AsyncImapSessionWrapper {
    pub fn new(session: TlsImapSession) -> Self {
        Self { session }
    }
}

#[async_trait]
impl ImapSession for AsyncImapSessionWrapper {
    async fn select(&mut self, mailbox: &str) -> Result<MailboxInfo, ImapError> {
        let mailbox_info = self.session.select(mailbox).await.map_err(ImapError::from)?;
        debug!(
            "Selected '{}': {} messages exist",
            mailbox, mailbox_info.exists
        );
        Ok(MailboxInfo {
            exists: mailbox_info.exists,
            uid_validity: mailbox_info.uid_validity,
        })
    }

    async fn uid_search(&mut self, criteria: &SearchCriteria) -> Result<Vec<u32>, ImapError> {
        let query = criteria.to_string();
        let uid_set = self
            .session
            .uid_search(&query)
            .await
            .map_err(ImapError::from)?;
        Ok(uid_set.into_iter().collect())
    }

    async fn fetch_header_fields(&mut self, uid_set: &str) -> Result<Vec<HeaderBlock>, ImapError> {
        let fetches: Vec<_> = self
            .session
            .uid_fetch(uid_set, HEADER_FETCH_QUERY)
            .await
            .map_err(ImapError::from)?
            .try_collect()
            .await
            .map_err(ImapError::from)?;

        let mut blocks = Vec::with_capacity(fetches.len());
        for fetch in &fetches {
            // A fetch without a UID cannot be correlated; skip it.
            let uid = match fetch.uid {
                Some(uid) => uid,
                None => continue,
            };
            let raw = match fetch.header() {
                Some(header) => header.to_vec(),
                None => continue,
            };
            blocks.push(HeaderBlock { uid, raw });
        }
        Ok(blocks)
    }

    async fn add_deleted_flag(&mut self, uid_set: &str) -> Result<(), ImapError> {
        self.session
            .uid_store(uid_set, "+FLAGS.SILENT (\\Deleted)")
            .await
            .map_err(ImapError::from)?
            .try_collect::<Vec<_>>()
            .await
            .map(|_| ())
            .map_err(ImapError::from)
    }

    async fn expunge(&mut self) -> Result<(), ImapError> {
        self.session
            .expunge()
            .await
            .map_err(ImapError::from)?
            .try_collect::<Vec<_>>()
            .await
            .map(|_| ())
            .map_err(ImapError::from)
    }

    async fn logout(&mut self) -> Result<(), ImapError> {
        self.session.logout().await.map_err(ImapError::from)
    }
}
