// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Typed projections of the introspection tables. One struct per statement in
//! [`crate::sql`], with field names matching the selected columns.

use chrono::{DateTime, Local};
use serde::Deserialize;
use serde_with::serde_as;

use restate_console_types::identifiers::{EntryIndex, IdDecodeError};
use restate_console_types::invocation::{CompletionSummary, InvocationSummary};

/// One row of `sys_journal`. Immutable input to the journal engine; the
/// engine never writes rows back.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JournalRow {
    pub index: EntryIndex,
    pub entry_type: String,
    pub name: Option<String>,
    #[serde(default)]
    pub completed: bool,
    pub invoked_id: Option<String>,
    pub invoked_target: Option<String>,
    pub sleep_wakeup_at: Option<DateTime<Local>>,
    pub promise_name: Option<String>,

    /// Version 1 payload, a hex-encoded protobuf message.
    #[serde_as(as = "Option<serde_with::hex::Hex>")]
    #[serde(default)]
    pub raw: Option<Vec<u8>>,

    // --- V2 columns
    pub version: u32,
    pub entry_json: Option<String>,
    pub entry_lite_json: Option<String>,
    pub appended_at: Option<DateTime<Local>>,
}

/// One row of `sys_journal_events`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JournalEventRow {
    pub after_journal_entry_index: Option<EntryIndex>,
    pub appended_at: Option<DateTime<Local>>,
    pub event_type: String,
    pub event_json: Option<String>,
}

/// One row of `sys_invocation`, the projection backing
/// [`InvocationSummary`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InvocationRow {
    pub id: String,
    pub target: String,
    pub status: String,
    pub completion_result: Option<String>,
    pub completion_failure: Option<String>,
    #[serde(default)]
    pub retry_count: u64,
    pub last_failure: Option<String>,
    pub last_failure_related_command_index: Option<u64>,
    pub last_failure_related_command_name: Option<String>,
    pub last_failure_related_command_type: Option<String>,
    pub next_retry_at: Option<DateTime<Local>>,
    pub created_at: Option<DateTime<Local>>,
    pub modified_at: Option<DateTime<Local>>,
    pub inboxed_at: Option<DateTime<Local>>,
    pub scheduled_at: Option<DateTime<Local>>,
    pub running_at: Option<DateTime<Local>>,
    pub completed_at: Option<DateTime<Local>>,
    pub journal_size: Option<u32>,
    pub journal_commands_size: Option<u32>,
}

impl InvocationRow {
    /// Lifts the raw row into the shared summary model. Fails only when the
    /// table hands back an id the console cannot recognize.
    pub fn into_summary(self) -> Result<InvocationSummary, IdDecodeError> {
        Ok(InvocationSummary {
            id: self.id.parse()?,
            target: self.target,
            status: self.status,
            completion: CompletionSummary::from_sql(
                self.completion_result,
                self.completion_failure,
            ),
            retry_count: self.retry_count,
            last_failure: self.last_failure,
            last_failure_related_command_index: self.last_failure_related_command_index,
            last_failure_related_command_name: self.last_failure_related_command_name,
            last_failure_related_command_type: self.last_failure_related_command_type,
            next_retry_at: self.next_retry_at,
            created_at: self.created_at,
            modified_at: self.modified_at,
            inboxed_at: self.inboxed_at,
            scheduled_at: self.scheduled_at,
            running_at: self.running_at,
            completed_at: self.completed_at,
            journal_size: self.journal_size,
            journal_commands_size: self.journal_commands_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use googletest::prelude::*;

    #[test]
    fn journal_row_from_json() {
        let row: JournalRow = serde_json::from_str(
            r#"{
                "index": 3,
                "entry_type": "Command: Call",
                "name": "my-call",
                "invoked_id": null,
                "invoked_target": null,
                "sleep_wakeup_at": null,
                "promise_name": null,
                "version": 2,
                "entry_json": "{}",
                "entry_lite_json": null,
                "appended_at": null
            }"#,
        )
        .unwrap();
        assert_that!(row.index, eq(3));
        assert_that!(row.completed, eq(false));
        assert_that!(row.raw, none());
    }

    #[test]
    fn raw_column_is_hex_decoded() {
        let row: JournalRow = serde_json::from_str(
            r#"{
                "index": 0,
                "entry_type": "Input",
                "name": null,
                "completed": true,
                "invoked_id": null,
                "invoked_target": null,
                "sleep_wakeup_at": null,
                "promise_name": null,
                "raw": "0a00",
                "version": 1,
                "entry_json": null,
                "entry_lite_json": null,
                "appended_at": null
            }"#,
        )
        .unwrap();
        assert_that!(row.raw, some(eq(&vec![0x0a, 0x00])));
    }

    #[test]
    fn invocation_row_into_summary() {
        let row: InvocationRow = serde_json::from_str(
            r#"{
                "id": "inv_1gdJBtdVEcM942bjcDmb1c1khoaJe11Hbz",
                "target": "Greeter/greet",
                "status": "completed",
                "completion_result": "success",
                "completion_failure": null,
                "retry_count": 1,
                "last_failure": null,
                "last_failure_related_command_index": null,
                "last_failure_related_command_name": null,
                "last_failure_related_command_type": null,
                "next_retry_at": null,
                "created_at": null,
                "modified_at": null,
                "inboxed_at": null,
                "scheduled_at": null,
                "running_at": null,
                "completed_at": null,
                "journal_size": 4,
                "journal_commands_size": 2
            }"#,
        )
        .unwrap();
        let summary = row.into_summary().unwrap();
        assert_that!(summary.completion, some(eq(&CompletionSummary::Success)));
        assert_that!(summary.journal_commands_size, some(eq(2)));
    }

    #[test]
    fn bad_id_is_rejected() {
        let row = InvocationRow {
            id: "not-an-id".to_owned(),
            target: "Greeter/greet".to_owned(),
            status: "running".to_owned(),
            completion_result: None,
            completion_failure: None,
            retry_count: 0,
            last_failure: None,
            last_failure_related_command_index: None,
            last_failure_related_command_name: None,
            last_failure_related_command_type: None,
            next_retry_at: None,
            created_at: None,
            modified_at: None,
            inboxed_at: None,
            scheduled_at: None,
            running_at: None,
            completed_at: None,
            journal_size: None,
            journal_commands_size: None,
        };
        assert_that!(row.into_summary(), err(anything()));
    }
}
