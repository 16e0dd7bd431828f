// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The journal engine behind the invocation view: decodes the two journal
//! wire generations, correlates commands with their completions, derives the
//! invocation status, and merges everything into one ordered timeline.
//!
//! The conversion itself is a pure, synchronous transform over one snapshot
//! of rows; the async functions here only tie it to the introspection SQL
//! endpoint. Callers re-poll and re-run the transform, nothing is cached.

pub mod assemble;
mod correlate;
pub mod decode;
mod entries;
pub mod nested;
pub mod outcome;
pub mod payload;
pub mod resolved;
pub mod status;
pub mod timeline;

use restate_console_client::{InvocationRow, JournalEventRow, JournalRow, QueryClient, sql};
use restate_console_types::identifiers::{EntryIndex, IdDecodeError, InvocationId};
use restate_console_types::invocation::{InvocationStatusView, InvocationSummary};

pub use assemble::assemble_journal;
pub use nested::{CallTreeChild, CallTreeNode, expand_call_tree};
pub use outcome::{Outcome, ResultType};
pub use payload::{EntryPayload, PayloadField, get_entry_payload, payload_row_index};
pub use resolved::{
    EntryCategory, EntryFields, ResolvedEntryV1, ResolvedEntryV2, ResolvedJournalEntry,
};
pub use status::{StatusClassificationError, classify_status};
pub use timeline::{
    JournalEvent, LifecycleMarker, LifecycleMarkerKind, TimelineItem, decode_event_row,
    lifecycle_markers, merge_timeline,
};

#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    #[error(transparent)]
    Client(#[from] restate_console_client::Error),
    #[error(transparent)]
    Id(#[from] IdDecodeError),
    #[error(transparent)]
    StatusClassification(#[from] StatusClassificationError),
    #[error("unknown invocation '{0}'")]
    UnknownInvocation(InvocationId),
    #[error("invocation '{invocation_id}' has no journal row at index {index}")]
    RowNotFound {
        invocation_id: InvocationId,
        index: EntryIndex,
    },
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JournalQueryOptions {
    /// Read the full `entry_json` column instead of the lite projection.
    /// Large payloads can also be loaded per entry later, see
    /// [`get_entry_payload`].
    pub include_payloads: bool,
}

/// Fetches one invocation's summary.
pub async fn get_invocation(
    client: &QueryClient,
    invocation_id: &InvocationId,
) -> Result<InvocationSummary, JournalError> {
    let rows: Vec<InvocationRow> = client
        .run_json_query(sql::invocation_query(invocation_id))
        .await?;
    let Some(row) = rows.into_iter().next() else {
        return Err(JournalError::UnknownInvocation(invocation_id.clone()));
    };
    Ok(row.into_summary()?)
}

/// Fetches and resolves one invocation's journal.
pub async fn get_invocation_journal(
    client: &QueryClient,
    invocation_id: &InvocationId,
    options: JournalQueryOptions,
) -> Result<Vec<ResolvedJournalEntry>, JournalError> {
    let summary = get_invocation(client, invocation_id).await?;
    fetch_journal(client, invocation_id, &summary, options).await
}

async fn fetch_journal(
    client: &QueryClient,
    invocation_id: &InvocationId,
    summary: &InvocationSummary,
    options: JournalQueryOptions,
) -> Result<Vec<ResolvedJournalEntry>, JournalError> {
    let limit = summary.journal_size.map(|size| size as usize);
    let rows: Vec<JournalRow> = client
        .run_json_query(sql::journal_query(
            invocation_id,
            options.include_payloads,
            limit,
        ))
        .await?;
    Ok(assemble_journal(&rows, Some(summary)))
}

/// Fetches the events recorded for one invocation.
pub async fn get_journal_events(
    client: &QueryClient,
    invocation_id: &InvocationId,
) -> Result<Vec<JournalEvent>, JournalError> {
    let rows: Vec<JournalEventRow> = client
        .run_json_query(sql::journal_events_query(invocation_id))
        .await?;
    Ok(rows.iter().map(decode_event_row).collect())
}

/// Everything the invocation view renders in one refresh.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct InvocationTimeline {
    #[serde(skip)]
    pub summary: InvocationSummary,
    pub status: InvocationStatusView,
    pub items: Vec<TimelineItem>,
}

/// Fetches one invocation's journal and events, derives its status, and
/// merges everything with the synthesized lifecycle markers.
///
/// Status classification failures fail the whole call: presenting an
/// invocation under a guessed status would mislead the operator.
pub async fn get_invocation_timeline(
    client: &QueryClient,
    invocation_id: &InvocationId,
    options: JournalQueryOptions,
) -> Result<InvocationTimeline, JournalError> {
    let summary = get_invocation(client, invocation_id).await?;
    let status = classify_status(&summary)?;
    let entries = fetch_journal(client, invocation_id, &summary, options).await?;
    let events = get_journal_events(client, invocation_id).await?;
    let markers = lifecycle_markers(&summary, Some(&status));
    let items = merge_timeline(entries, events, markers);
    Ok(InvocationTimeline {
        summary,
        status,
        items,
    })
}
