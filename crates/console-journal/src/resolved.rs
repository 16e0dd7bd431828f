// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The display model the engine produces: one resolved entry per journal row
//! that survives assembly, in a shape the console renders directly.

use std::collections::HashMap;

use chrono::{DateTime, Local};

use restate_console_types::errors::Failure;
use restate_console_types::identifiers::{CommandIndex, CompletionId, EntryIndex};
use restate_console_types::invocation::Header;
use restate_console_types::journal_v1;

use crate::outcome::ResultType;

/// Category of a version 2 row. Version 1 predates the split; all its rows
/// act as commands for display purposes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum EntryCategory {
    Command,
    Notification,
    Event,
}

/// Decoded payload fields of an entry. All optional; a field is absent when
/// the entry type does not carry it, when decoding failed, or when the lite
/// projection omitted it (`is_loaded` tells those apart).
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EntryFields {
    /// State or promise key.
    pub key: Option<String>,
    /// State keys, for the key-listing entries.
    pub keys: Option<Vec<String>>,
    /// Request payload, base64-encoded.
    pub parameters: Option<String>,
    /// Result payload, base64-encoded.
    pub value: Option<String>,
    pub headers: Option<Vec<Header>>,
    pub wake_up_at: Option<DateTime<Local>>,
    pub invoked_id: Option<String>,
    pub invoked_target: Option<String>,
    pub promise_name: Option<String>,
    pub awakeable_id: Option<String>,
    pub idempotency_key: Option<String>,
    /// Free-form event metadata.
    pub metadata: Option<HashMap<String, String>>,
}

/// A resolved entry of the first journal generation: a flat record keyed by
/// the version 1 entry type, with the merged completion already applied.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ResolvedEntryV1 {
    pub index: EntryIndex,
    #[serde(serialize_with = "serialize_v1_type")]
    pub entry_type: journal_v1::EntryType,
    pub name: Option<String>,
    pub completed: bool,
    pub start: Option<DateTime<Local>>,
    pub fields: EntryFields,
    pub failure: Option<Failure>,
}

fn serialize_v1_type<S: serde::Serializer>(
    ty: &journal_v1::EntryType,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(ty)
}

/// A resolved entry of the current journal generation, discriminated by
/// `(category, entry_type)`.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ResolvedEntryV2 {
    pub index: EntryIndex,
    pub category: EntryCategory,
    /// Bare type tag, e.g. `Call`, `Sleep`, `Cancel`.
    pub entry_type: String,
    pub name: Option<String>,
    /// Sequence number among Command rows only.
    pub command_index: Option<CommandIndex>,
    /// The id under which this command expects its completion.
    pub completion_id: Option<CompletionId>,
    /// Index of the row that completed this command.
    pub completion_index: Option<EntryIndex>,
    /// Rows causally tied to this one, for UI nesting. Populated on Command
    /// rows only, referencing strictly greater indexes.
    pub related_indexes: Vec<EntryIndex>,
    pub start: Option<DateTime<Local>>,
    pub end: Option<DateTime<Local>>,
    pub is_pending: bool,
    pub is_retrying: bool,
    /// Whether payload fields were fetched, or the row came from the lite
    /// projection.
    pub is_loaded: bool,
    pub result_type: Option<ResultType>,
    pub error: Option<Failure>,
    pub fields: EntryFields,
}

/// Output unit of the journal pass, polymorphic over the two wire
/// generations an invocation's journal can be persisted in.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "version")]
pub enum ResolvedJournalEntry {
    #[serde(rename = "1")]
    V1(ResolvedEntryV1),
    #[serde(rename = "2")]
    V2(ResolvedEntryV2),
}

impl ResolvedJournalEntry {
    pub fn index(&self) -> EntryIndex {
        match self {
            ResolvedJournalEntry::V1(entry) => entry.index,
            ResolvedJournalEntry::V2(entry) => entry.index,
        }
    }

    pub fn start(&self) -> Option<DateTime<Local>> {
        match self {
            ResolvedJournalEntry::V1(entry) => entry.start,
            ResolvedJournalEntry::V2(entry) => entry.start,
        }
    }

    pub fn category(&self) -> EntryCategory {
        match self {
            ResolvedJournalEntry::V1(_) => EntryCategory::Command,
            ResolvedJournalEntry::V2(entry) => entry.category,
        }
    }

    pub fn entry_type(&self) -> String {
        match self {
            ResolvedJournalEntry::V1(entry) => entry.entry_type.to_string(),
            ResolvedJournalEntry::V2(entry) => entry.entry_type.clone(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            ResolvedJournalEntry::V1(entry) => entry.name.as_deref(),
            ResolvedJournalEntry::V2(entry) => entry.name.as_deref(),
        }
    }

    pub fn command_index(&self) -> Option<CommandIndex> {
        match self {
            ResolvedJournalEntry::V1(_) => None,
            ResolvedJournalEntry::V2(entry) => entry.command_index,
        }
    }

    pub fn fields(&self) -> &EntryFields {
        match self {
            ResolvedJournalEntry::V1(entry) => &entry.fields,
            ResolvedJournalEntry::V2(entry) => &entry.fields,
        }
    }

    pub fn is_pending(&self) -> bool {
        match self {
            ResolvedJournalEntry::V1(entry) => !entry.completed,
            ResolvedJournalEntry::V2(entry) => entry.is_pending,
        }
    }

    /// Index of the row that carries this entry's result payload: the
    /// completion row for correlated commands, the row itself otherwise.
    pub fn result_row_index(&self) -> EntryIndex {
        match self {
            ResolvedJournalEntry::V1(entry) => entry.index,
            ResolvedJournalEntry::V2(entry) => entry.completion_index.unwrap_or(entry.index),
        }
    }
}
