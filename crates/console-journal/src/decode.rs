// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Per-row payload decoding. Malformed payloads never fail the journal pass:
//! every decoder degrades to `None`/[`DecodedPayload::Missing`] and the row
//! still renders with whatever the convenience columns carry.

use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use chrono::{DateTime, Local};
use tracing::warn;

use restate_console_client::JournalRow;
use restate_console_types::identifiers::{CommandIndex, EntryIndex};
use restate_console_types::journal_v1;
use restate_console_types::journal_v2::{Entry, lite::EntryLite};

pub fn bytes_to_base64(bytes: &Bytes) -> String {
    BASE64.encode(bytes)
}

/// Short lossy-UTF-8 rendering of a payload for inline display. Full values
/// go through [`bytes_to_base64`].
pub fn utf8_preview(bytes: &Bytes, max_chars: usize) -> String {
    let text = String::from_utf8_lossy(bytes);
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.into_owned(),
    }
}

/// Decodes the hex-decoded `raw` column of a version 1 row. The entry type
/// tag selects the protobuf message.
pub fn decode_v1_raw(entry_type: &journal_v1::EntryType, raw: &[u8]) -> Option<journal_v1::Entry> {
    match journal_v1::decode_entry(entry_type, Bytes::copy_from_slice(raw)) {
        Ok(entry) => Some(entry),
        Err(err) => {
            warn!("Cannot decode a version 1 journal entry, rendering it bare: {err}");
            None
        }
    }
}

/// Parses the `entry_json` column. Parse failures are swallowed, including
/// entry variants written by a newer runtime.
pub fn decode_v2_json(json: &str) -> Option<Entry> {
    serde_json::from_str(json).ok()
}

/// Parses the `entry_lite_json` column.
pub fn decode_v2_lite_json(json: &str) -> Option<EntryLite> {
    serde_json::from_str(json).ok()
}

/// Decoded payload of one row, tagged by encoding generation.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedPayload {
    V1(journal_v1::Entry),
    Full(Entry),
    Lite(EntryLite),
    /// No payload column, an unknown version or a payload that failed to
    /// decode. The row still renders from its convenience columns.
    Missing,
}

/// Denormalized convenience columns of `sys_journal`, usable without any
/// payload decoding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowConvenience {
    pub invoked_id: Option<String>,
    pub invoked_target: Option<String>,
    pub sleep_wakeup_at: Option<DateTime<Local>>,
    pub promise_name: Option<String>,
}

/// One journal row with its payload decoded, the unit the correlation engine
/// and the entry builders work over.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRow {
    pub index: EntryIndex,
    pub entry_type: String,
    pub name: Option<String>,
    pub completed: bool,
    pub version: u32,
    pub appended_at: Option<DateTime<Local>>,
    pub convenience: RowConvenience,
    pub payload: DecodedPayload,
    /// Assigned by the assembler, on Command-category rows only.
    pub command_index: Option<CommandIndex>,
}

pub fn decode_row(row: &JournalRow) -> DecodedRow {
    let payload = match row.version {
        1 => {
            let entry_type = journal_v1::EntryType::from_str(&row.entry_type)
                .unwrap_or_else(|_| journal_v1::EntryType::Other(row.entry_type.clone()));
            match &row.raw {
                Some(raw) => decode_v1_raw(&entry_type, raw)
                    .map(DecodedPayload::V1)
                    .unwrap_or(DecodedPayload::Missing),
                None => DecodedPayload::V1(journal_v1::Entry::Unknown(entry_type)),
            }
        }
        2 => {
            if let Some(json) = &row.entry_json {
                decode_v2_json(json)
                    .map(DecodedPayload::Full)
                    .unwrap_or(DecodedPayload::Missing)
            } else if let Some(json) = &row.entry_lite_json {
                decode_v2_lite_json(json)
                    .map(DecodedPayload::Lite)
                    .unwrap_or(DecodedPayload::Missing)
            } else {
                DecodedPayload::Missing
            }
        }
        version => {
            warn!(
                "Unknown journal row version {version} at index {}, rendering it bare",
                row.index
            );
            DecodedPayload::Missing
        }
    };

    DecodedRow {
        index: row.index,
        entry_type: row.entry_type.clone(),
        name: row.name.clone(),
        completed: row.completed,
        version: row.version,
        appended_at: row.appended_at,
        convenience: RowConvenience {
            invoked_id: row.invoked_id.clone(),
            invoked_target: row.invoked_target.clone(),
            sleep_wakeup_at: row.sleep_wakeup_at,
            promise_name: row.promise_name.clone(),
        },
        payload,
        command_index: None,
    }
}
