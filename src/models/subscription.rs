// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a subscription can be cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnsubscribeMethod {
    Web,
    Mailto,
}

impl fmt::Display for UnsubscribeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnsubscribeMethod::Web => write!(f, "Web Link"),
            UnsubscribeMethod::Mailto => write!(f, "Email"),
        }
    }
}

/// One row of scan output: a distinct sender exposing List-Unsubscribe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub sender_name: String,
    pub sender_address: String,
    /// Date header of the most recent matching message, when parseable.
    pub last_seen: Option<DateTime<FixedOffset>>,
    pub method: UnsubscribeMethod,
    /// Actionable link: `https://...` or `mailto:...`.
    pub action: String,
}

impl Subscription {
    /// Whether this entry identifies a sender that can be purged by address.
    pub fn purgeable(&self) -> bool {
        !self.sender_address.is_empty()
    }
}

/// Result of a purge pass for one sender.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurgeOutcome {
    pub sender: String,
    pub matched: usize,
    pub deleted: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_display_labels() {
        assert_eq!(UnsubscribeMethod::Web.to_string(), "Web Link");
        assert_eq!(UnsubscribeMethod::Mailto.to_string(), "Email");
    }

    #[test]
    fn nameless_sender_is_not_purgeable() {
        let sub = Subscription {
            sender_name: "Unknown".to_string(),
            sender_address: String::new(),
            last_seen: None,
            method: UnsubscribeMethod::Web,
            action: "https://x.example/u".to_string(),
        };
        assert!(!sub.purgeable());
    }
}
