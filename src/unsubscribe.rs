// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! `List-Unsubscribe` header parsing (RFC 2369).
//!
//! The header carries a comma-separated list of `<...>`-wrapped URIs, usually
//! one `https` endpoint and/or one `mailto`. Some senders omit the angle
//! brackets around the web link, so a bare-URL fallback is applied.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::subscription::UnsubscribeMethod;

lazy_static::lazy_static! {
    static ref HTTP_BRACKETED_RE: Regex = Regex::new(r"<(https?://[^>]+)>").unwrap();
    static ref HTTP_BARE_RE: Regex = Regex::new(r"(https?://\S+)").unwrap();
    static ref MAILTO_RE: Regex = Regex::new(r"<mailto:([^>]+)>").unwrap();
}

/// An actionable unsubscribe target extracted from a List-Unsubscribe header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsubscribeAction {
    pub method: UnsubscribeMethod,
    /// Full actionable link: `https://...` or `mailto:...`.
    pub target: String,
}

/// Extracts an unsubscribe action from a raw List-Unsubscribe header value.
///
/// The web link wins when both forms are present. Returns `None` when the
/// header contains neither form, in which case the message is skipped.
pub fn parse_unsubscribe(header_text: &str) -> Option<UnsubscribeAction> {
    let http_link = HTTP_BRACKETED_RE
        .captures(header_text)
        .or_else(|| HTTP_BARE_RE.captures(header_text))
        .map(|cap| cap[1].to_string());

    if let Some(link) = http_link {
        return Some(UnsubscribeAction {
            method: UnsubscribeMethod::Web,
            target: link,
        });
    }

    MAILTO_RE
        .captures(header_text)
        .map(|cap| UnsubscribeAction {
            method: UnsubscribeMethod::Mailto,
            target: format!("mailto:{}", &cap[1]),
        })
}
