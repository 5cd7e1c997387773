// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

// Integration tests driving scan and purge against a mock IMAP session.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use mailsweep::imap::client::ImapClient;
use mailsweep::imap::error::ImapError;
use mailsweep::imap::session::ImapSession;
use mailsweep::imap::types::{HeaderBlock, MailboxInfo, SearchCriteria};
use mailsweep::models::subscription::UnsubscribeMethod;
use mailsweep::{purge, scan};
use tokio::sync::Mutex as TokioMutex;

// --- Mock IMAP Session ---

#[derive(Debug, Default)]
struct CallTracker {
    select_calls: StdMutex<Vec<String>>,
    search_queries: StdMutex<Vec<String>>,
    fetch_sets: StdMutex<Vec<String>>,
    store_sets: StdMutex<Vec<String>>,
    expunge_called: AtomicBool,
    logout_called: AtomicBool,
}

#[derive(Debug)]
struct MockImapSession {
    tracker: Arc<CallTracker>,
    /// Search results keyed by the rendered query string.
    search_results: HashMap<String, Vec<u32>>,
    /// Header blocks served by fetch, keyed by UID.
    blocks: HashMap<u32, Vec<u8>>,
}

impl MockImapSession {
    fn new(tracker: Arc<CallTracker>) -> Self {
        Self {
            tracker,
            search_results: HashMap::new(),
            blocks: HashMap::new(),
        }
    }

    fn with_search_result(mut self, query: &str, uids: Vec<u32>) -> Self {
        self.search_results.insert(query.to_string(), uids);
        self
    }

    fn with_block(mut self, uid: u32, raw: &str) -> Self {
        self.blocks.insert(uid, raw.as_bytes().to_vec());
        self
    }
}

#[async_trait]
impl ImapSession for MockImapSession {
    async fn select(&mut self, mailbox: &str) -> Result<MailboxInfo, ImapError> {
        self.tracker
            .select_calls
            .lock()
            .unwrap()
            .push(mailbox.to_string());
        Ok(MailboxInfo {
            exists: self.blocks.len() as u32,
            uid_validity: Some(1),
        })
    }

    async fn uid_search(&mut self, criteria: &SearchCriteria) -> Result<Vec<u32>, ImapError> {
        let query = criteria.to_string();
        self.tracker
            .search_queries
            .lock()
            .unwrap()
            .push(query.clone());
        Ok(self.search_results.get(&query).cloned().unwrap_or_default())
    }

    async fn fetch_header_fields(&mut self, uid_set: &str) -> Result<Vec<HeaderBlock>, ImapError> {
        self.tracker
            .fetch_sets
            .lock()
            .unwrap()
            .push(uid_set.to_string());
        let mut blocks = Vec::new();
        for uid_str in uid_set.split(',') {
            let uid: u32 = uid_str.parse().expect("mock got malformed uid set");
            if let Some(raw) = self.blocks.get(&uid) {
                blocks.push(HeaderBlock {
                    uid,
                    raw: raw.clone(),
                });
            }
        }
        Ok(blocks)
    }

    async fn add_deleted_flag(&mut self, uid_set: &str) -> Result<(), ImapError> {
        self.tracker
            .store_sets
            .lock()
            .unwrap()
            .push(uid_set.to_string());
        Ok(())
    }

    async fn expunge(&mut self) -> Result<(), ImapError> {
        self.tracker.expunge_called.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn logout(&mut self) -> Result<(), ImapError> {
        self.tracker.logout_called.store(true, Ordering::SeqCst);
        Ok(())
    }
}

fn client_for(mock: MockImapSession) -> ImapClient {
    ImapClient::new_with_session(Arc::new(TokioMutex::new(mock)))
}

const ACME_NEW: &str = "From: \"Acme Deals\" <deals@acme.example>\r\n\
List-Unsubscribe: <https://acme.example/unsub?u=new>\r\n\
Date: Tue, 14 Jan 2025 09:30:00 +0000\r\n\r\n";

const ACME_OLD: &str = "From: Acme <deals@acme.example>\r\n\
List-Unsubscribe: <https://acme.example/unsub?u=old>\r\n\
Date: Mon, 06 Jan 2025 08:00:00 +0000\r\n\r\n";

const WIDGET: &str = "From: Widget Weekly <news@widget.example>\r\n\
List-Unsubscribe: <mailto:unsub@widget.example>\r\n\
Date: Sun, 05 Jan 2025 10:00:00 +0000\r\n\r\n";

const PLAIN: &str = "From: A Friend <friend@home.example>\r\n\
Date: Sat, 04 Jan 2025 12:00:00 +0000\r\n\r\n";

// --- Scan ---

#[tokio::test]
async fn scan_dedupes_senders_newest_first() {
    let tracker = Arc::new(CallTracker::default());
    let mock = MockImapSession::new(tracker.clone())
        .with_search_result("ALL", vec![1, 2, 3, 4])
        .with_block(1, WIDGET)
        .with_block(2, ACME_OLD)
        .with_block(3, PLAIN)
        .with_block(4, ACME_NEW);

    let client = client_for(mock);
    let subscriptions = scan::scan(&client, "INBOX", 100).await.unwrap();

    assert_eq!(*tracker.select_calls.lock().unwrap(), vec!["INBOX"]);

    // Two distinct senders; the duplicate Acme entry collapsed to the newest.
    assert_eq!(subscriptions.len(), 2);
    assert_eq!(subscriptions[0].sender_address, "deals@acme.example");
    assert_eq!(subscriptions[0].action, "https://acme.example/unsub?u=new");
    assert_eq!(subscriptions[0].method, UnsubscribeMethod::Web);
    assert_eq!(subscriptions[1].sender_address, "news@widget.example");
    assert_eq!(subscriptions[1].action, "mailto:unsub@widget.example");
    assert_eq!(subscriptions[1].method, UnsubscribeMethod::Mailto);
}

#[tokio::test]
async fn scan_restricts_to_most_recent_limit() {
    let tracker = Arc::new(CallTracker::default());
    let mock = MockImapSession::new(tracker.clone())
        .with_search_result("ALL", vec![10, 11, 12, 13])
        .with_block(12, ACME_OLD)
        .with_block(13, WIDGET);

    let client = client_for(mock);
    let subscriptions = scan::scan(&client, "INBOX", 2).await.unwrap();

    // Only the two newest UIDs were fetched, newest first.
    assert_eq!(*tracker.fetch_sets.lock().unwrap(), vec!["13,12"]);
    assert_eq!(subscriptions.len(), 2);
}

#[tokio::test]
async fn scan_of_empty_mailbox_is_empty() {
    let tracker = Arc::new(CallTracker::default());
    let mock = MockImapSession::new(tracker.clone()).with_search_result("ALL", vec![]);

    let client = client_for(mock);
    let subscriptions = scan::scan(&client, "INBOX", 100).await.unwrap();

    assert!(subscriptions.is_empty());
    // No fetch round trip for an empty uid set.
    assert!(tracker.fetch_sets.lock().unwrap().is_empty());
}

// --- Purge ---

#[tokio::test]
async fn purge_flags_matches_and_expunges_once() {
    let tracker = Arc::new(CallTracker::default());
    let mock = MockImapSession::new(tracker.clone())
        .with_search_result("FROM \"deals@acme.example\"", vec![4, 9, 17])
        .with_search_result("FROM \"news@widget.example\"", vec![21]);

    let client = client_for(mock);
    let senders = vec![
        "deals@acme.example".to_string(),
        "news@widget.example".to_string(),
    ];
    let outcomes = purge::purge(&client, "INBOX", &senders, false).await.unwrap();

    assert_eq!(
        *tracker.store_sets.lock().unwrap(),
        vec!["4,9,17", "21"]
    );
    assert!(tracker.expunge_called.load(Ordering::SeqCst));

    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].matched, 3);
    assert_eq!(outcomes[0].deleted, 3);
    assert_eq!(outcomes[1].matched, 1);
}

#[tokio::test]
async fn purge_dry_run_touches_nothing() {
    let tracker = Arc::new(CallTracker::default());
    let mock = MockImapSession::new(tracker.clone())
        .with_search_result("FROM \"deals@acme.example\"", vec![4, 9]);

    let client = client_for(mock);
    let senders = vec!["deals@acme.example".to_string()];
    let outcomes = purge::purge(&client, "INBOX", &senders, true).await.unwrap();

    assert!(tracker.store_sets.lock().unwrap().is_empty());
    assert!(!tracker.expunge_called.load(Ordering::SeqCst));
    assert_eq!(outcomes[0].matched, 2);
    assert_eq!(outcomes[0].deleted, 0);
}

#[tokio::test]
async fn purge_with_no_matches_skips_expunge() {
    let tracker = Arc::new(CallTracker::default());
    let mock = MockImapSession::new(tracker.clone());

    let client = client_for(mock);
    let senders = vec!["ghost@nowhere.example".to_string()];
    let outcomes = purge::purge(&client, "INBOX", &senders, false).await.unwrap();

    assert!(tracker.store_sets.lock().unwrap().is_empty());
    assert!(!tracker.expunge_called.load(Ordering::SeqCst));
    assert_eq!(outcomes[0].matched, 0);
    assert_eq!(outcomes[0].deleted, 0);
}
