// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw header block returned by a HEADER.FIELDS fetch for a single message.
#[derive(Debug, Clone)]
pub struct HeaderBlock {
    pub uid: u32,
    pub raw: Vec<u8>,
}

/// Snapshot of the selected mailbox, from the SELECT response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailboxInfo {
    pub exists: u32,
    pub uid_validity: Option<u32>,
}

// Custom SearchCriteria enum (ensure it's public)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCriteria {
    All,
    From(String),
}

impl fmt::Display for SearchCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchCriteria::All => write!(f, "ALL"),
            SearchCriteria::From(addr) => write!(f, "FROM \"{}\"", quote_escape(addr)),
        }
    }
}

// IMAP quoted-string escaping: backslash and double-quote only.
fn quote_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if ch == '\\' || ch == '"' {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_criteria_creation() {
        let criteria = SearchCriteria::From("news@example.com".to_string());
        assert_eq!(criteria.to_string(), "FROM \"news@example.com\"");

        assert_eq!(SearchCriteria::All.to_string(), "ALL");
    }

    #[test]
    fn test_search_criteria_escapes_quotes() {
        let criteria = SearchCriteria::From("we\"ird@example.com".to_string());
        assert_eq!(criteria.to_string(), "FROM \"we\\\"ird@example.com\"");
    }
}
