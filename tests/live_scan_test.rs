// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

// Live test against a real mailbox. Run with:
//   IMAP_HOST=... IMAP_USER=... IMAP_PASS=... cargo test --features live_tests
#![cfg(feature = "live_tests")]

use mailsweep::imap::client::ImapClient;
use mailsweep::scan;
use std::env;

#[tokio::test]
async fn live_scan_completes() {
    let host = env::var("IMAP_HOST").expect("IMAP_HOST required for live tests");
    let user = env::var("IMAP_USER").expect("IMAP_USER required for live tests");
    let pass = env::var("IMAP_PASS").expect("IMAP_PASS required for live tests");

    let client = ImapClient::connect(&host, 993, &user, &pass)
        .await
        .expect("connect failed");

    let subscriptions = scan::scan(&client, "INBOX", 50).await.expect("scan failed");
    for sub in &subscriptions {
        assert!(
            sub.action.starts_with("http") || sub.action.starts_with("mailto:"),
            "unexpected action link: {}",
            sub.action
        );
    }

    client.logout().await.expect("logout failed");
}
