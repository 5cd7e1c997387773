// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Field extraction from raw HEADER.FIELDS blocks.
//!
//! A fetch for `BODY.PEEK[HEADER.FIELDS (...)]` returns the selected header
//! lines verbatim, CRLF-separated and possibly folded. This module pulls
//! individual field values out of that block and parses the From mailbox.

use chrono::{DateTime, FixedOffset};

use crate::utils::mime_decoder::decode_mime_header;

/// Sender mailbox parsed from a From header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderMailbox {
    pub name: Option<String>,
    /// addr-spec, lowercased. Empty when the header had no recognizable address.
    pub address: String,
}

/// Extracts the value of a named header field from a raw header block.
///
/// Matching is case-insensitive and folded continuation lines (leading
/// whitespace) are unfolded into a single value.
pub fn header_value(raw: &[u8], name: &str) -> Option<String> {
    let text = String::from_utf8_lossy(raw);
    let mut value: Option<String> = None;

    for line in text.split("\r\n").flat_map(|l| l.split('\n')) {
        if line.is_empty() {
            continue;
        }
        let is_continuation = line.starts_with(' ') || line.starts_with('\t');
        if is_continuation {
            if let Some(v) = value.as_mut() {
                v.push(' ');
                v.push_str(line.trim_start());
            }
            continue;
        }
        if value.is_some() {
            // The field we wanted is complete.
            break;
        }
        if let Some((field, rest)) = line.split_once(':') {
            if field.eq_ignore_ascii_case(name) {
                value = Some(rest.trim().to_string());
            }
        }
    }

    value
}

/// Parses a From header value into display name and address.
///
/// Display names are RFC 2047 decoded and stripped of quote characters, the
/// way they are meant to be shown. Addresses are lowercased so they can key
/// sender deduplication.
pub fn parse_from(value: &str) -> SenderMailbox {
    let decoded = decode_mime_header(value);

    if let Some(open) = decoded.find('<') {
        let name = decoded[..open].trim().replace('"', "");
        let address = decoded[open + 1..]
            .split('>')
            .next()
            .unwrap_or("")
            .trim()
            .to_lowercase();
        SenderMailbox {
            name: if name.is_empty() { None } else { Some(name) },
            address,
        }
    } else {
        let bare = decoded.trim().trim_matches('"');
        if bare.contains('@') {
            SenderMailbox {
                name: None,
                address: bare.to_lowercase(),
            }
        } else {
            SenderMailbox {
                name: if bare.is_empty() {
                    None
                } else {
                    Some(bare.to_string())
                },
                address: String::new(),
            }
        }
    }
}

/// Parses an RFC 2822 Date header value.
///
/// Trailing comments like `(UTC)` are stripped first; anything still
/// unparseable yields `None` rather than an error.
pub fn parse_date(value: &str) -> Option<DateTime<FixedOffset>> {
    let trimmed = match value.find('(') {
        Some(idx) => value[..idx].trim(),
        None => value.trim(),
    };
    DateTime::parse_from_rfc2822(trimmed).ok()
}
