// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! On-demand payload loading. The cheap journal page reads the lite
//! projection; when the console opens a detail view it re-fetches exactly one
//! row with full columns. The row that carries a field is not always the
//! entry's own row: results of asynchronous commands live on the completion
//! row.

use std::collections::HashMap;

use restate_console_client::{JournalRow, QueryClient, sql};
use restate_console_types::errors::Failure;
use restate_console_types::identifiers::{EntryIndex, InvocationId};
use restate_console_types::invocation::Header;

use crate::JournalError;
use crate::correlate::CompletionIndex;
use crate::decode::decode_row;
use crate::entries::{BuildContext, resolve_row};
use crate::resolved::{EntryCategory, ResolvedJournalEntry};

/// A payload field the console can ask to load for one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadField {
    Parameters,
    Value,
    Headers,
    Keys,
    Failure,
    Metadata,
}

/// The row whose full columns must be fetched to show `field` for `entry`.
/// `None` means there is nothing to fetch: the entry is already loaded, the
/// field does not apply, or the result has not been written yet.
pub fn payload_row_index(
    entry: &ResolvedJournalEntry,
    field: PayloadField,
) -> Option<EntryIndex> {
    // Version 1 rows decode entirely from the `raw` column, which every
    // journal page selects.
    let ResolvedJournalEntry::V2(entry) = entry else {
        return None;
    };
    if entry.is_loaded {
        return None;
    }

    match field {
        PayloadField::Value | PayloadField::Failure | PayloadField::Keys => {
            if entry.category == EntryCategory::Command && entry.completion_id.is_some() {
                // Pending commands have no completion row yet.
                entry.completion_index
            } else {
                Some(entry.index)
            }
        }
        PayloadField::Parameters | PayloadField::Headers => {
            (entry.category == EntryCategory::Command).then_some(entry.index)
        }
        PayloadField::Metadata => {
            (entry.category == EntryCategory::Event).then_some(entry.index)
        }
    }
}

/// The decoded payload fields of one re-fetched row.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct EntryPayload {
    pub parameters: Option<String>,
    pub value: Option<String>,
    pub headers: Option<Vec<Header>>,
    pub keys: Option<Vec<String>>,
    pub failure: Option<Failure>,
    pub metadata: Option<HashMap<String, String>>,
}

/// Re-fetches one row with its full payload columns and decodes the fields
/// relevant to its type.
pub async fn get_entry_payload(
    client: &QueryClient,
    invocation_id: &InvocationId,
    index: EntryIndex,
) -> Result<EntryPayload, JournalError> {
    let rows: Vec<JournalRow> = client
        .run_json_query(sql::journal_row_payload_query(invocation_id, index))
        .await?;
    let Some(row) = rows.first() else {
        return Err(JournalError::RowNotFound {
            invocation_id: invocation_id.clone(),
            index,
        });
    };
    Ok(extract_payload(row))
}

pub(crate) fn extract_payload(row: &JournalRow) -> EntryPayload {
    let rows = [decode_row(row)];
    let completions = CompletionIndex::build(&rows);
    let cx = BuildContext {
        rows: &rows,
        position: 0,
        completions: &completions,
    };
    match resolve_row(&cx) {
        Some(ResolvedJournalEntry::V1(entry)) => EntryPayload {
            parameters: entry.fields.parameters,
            value: entry.fields.value,
            headers: entry.fields.headers,
            keys: entry.fields.keys,
            failure: entry.failure,
            metadata: entry.fields.metadata,
        },
        Some(ResolvedJournalEntry::V2(entry)) => EntryPayload {
            parameters: entry.fields.parameters,
            value: entry.fields.value,
            headers: entry.fields.headers,
            keys: entry.fields.keys,
            failure: entry.error,
            metadata: entry.fields.metadata,
        },
        None => EntryPayload::default(),
    }
}
