// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! One pass over an invocation's journal snapshot: decode every row, number
//! the commands, correlate and build each entry, then reconcile what is still
//! pending against the invocation summary. The pass is a pure function of its
//! inputs; re-running it on the same snapshot yields the same sequence.

use restate_console_client::JournalRow;
use restate_console_types::identifiers::CommandIndex;
use restate_console_types::invocation::InvocationSummary;
use restate_console_types::journal_v2::{Entry, lite::EntryLite};

use crate::correlate::CompletionIndex;
use crate::decode::{DecodedPayload, DecodedRow, decode_row};
use crate::entries::{BuildContext, resolve_row, split_row_tag};
use crate::resolved::{EntryCategory, ResolvedJournalEntry};
use crate::status::{classify_status, parse_failure_column};

/// Converts one invocation's rows into the resolved journal. Rows may arrive
/// in any order (the SQL page reads them index-descending); the summary, when
/// available, settles entries the journal alone leaves pending.
pub fn assemble_journal(
    rows: &[JournalRow],
    summary: Option<&InvocationSummary>,
) -> Vec<ResolvedJournalEntry> {
    let mut decoded: Vec<DecodedRow> = rows.iter().map(decode_row).collect();
    decoded.sort_by_key(|row| row.index);
    assign_command_indexes(&mut decoded);

    let completions = CompletionIndex::build(&decoded);

    // Convert back to front, so every row's potential completions are
    // already decoded when the builder asks for them.
    let mut entries = Vec::with_capacity(decoded.len());
    for position in (0..decoded.len()).rev() {
        let cx = BuildContext {
            rows: &decoded,
            position,
            completions: &completions,
        };
        if let Some(entry) = resolve_row(&cx) {
            entries.push(entry);
        }
    }
    entries.reverse();

    if let Some(summary) = summary {
        reconcile_with_summary(&mut entries, summary);
    }
    entries
}

/// Numbers the Command-category rows of the current generation, in row order.
/// Notification and Event rows do not consume an index.
fn assign_command_indexes(rows: &mut [DecodedRow]) {
    let mut next: CommandIndex = 0;
    for row in rows.iter_mut() {
        let is_command = match &row.payload {
            DecodedPayload::Full(Entry::Command(_))
            | DecodedPayload::Lite(EntryLite::Command(_)) => true,
            DecodedPayload::Missing if row.version >= 2 => {
                split_row_tag(&row.entry_type).0 == EntryCategory::Command
            }
            _ => false,
        };
        if is_command {
            row.command_index = Some(next);
            next += 1;
        }
    }
}

/// Settles entries the journal alone could not: a command with no completion
/// row is only pending while the invocation still runs, and the invocation's
/// last failure is attached to the command the summary attributes it to.
fn reconcile_with_summary(entries: &mut [ResolvedJournalEntry], summary: &InvocationSummary) {
    let finished = summary.status.eq_ignore_ascii_case("completed");
    let is_retrying = classify_status(summary)
        .map(|view| view.is_retrying)
        .unwrap_or(false);
    let attributed_failure = summary
        .last_failure
        .as_deref()
        .map(parse_failure_column)
        .zip(summary.last_failure_related_command_index);

    for entry in entries.iter_mut() {
        let ResolvedJournalEntry::V2(entry) = entry else {
            continue;
        };
        if !entry.is_pending {
            continue;
        }
        let attributed = match (&attributed_failure, entry.command_index) {
            (Some((_, failed_index)), Some(command_index)) => {
                u64::from(command_index) == *failed_index
            }
            _ => false,
        };
        if finished {
            entry.is_pending = false;
            if attributed && entry.error.is_none() {
                entry.error = attributed_failure.as_ref().map(|(f, _)| f.clone());
            }
        } else if is_retrying && attributed {
            entry.is_retrying = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use googletest::prelude::*;

    use restate_console_types::identifiers::InvocationId;
    use restate_console_types::invocation::CompletionSummary;

    use crate::outcome::ResultType;
    use crate::resolved::ResolvedEntryV2;

    fn v2_row(index: u32, entry_type: &str, entry_json: &str) -> JournalRow {
        JournalRow {
            index,
            entry_type: entry_type.to_owned(),
            name: None,
            completed: false,
            invoked_id: None,
            invoked_target: None,
            sleep_wakeup_at: None,
            promise_name: None,
            raw: None,
            version: 2,
            entry_json: Some(entry_json.to_owned()),
            entry_lite_json: None,
            appended_at: None,
        }
    }

    fn input_row(index: u32) -> JournalRow {
        v2_row(
            index,
            "Command: Input",
            r#"{"Command":{"Input":{"headers":[],"payload":[],"name":""}}}"#,
        )
    }

    fn call_row(index: u32, result_completion_id: u32) -> JournalRow {
        v2_row(
            index,
            "Command: Call",
            &format!(
                r#"{{"Command":{{"Call":{{
                    "request":{{
                        "invocation_id":"inv_1gdJBtdVEcM942bjcDmb1c1khoaJe11Hbz",
                        "invocation_target":{{"Service":{{"name":"Greeter","handler":"greet"}}}},
                        "parameter":[],
                        "headers":[]
                    }},
                    "invocation_id_completion_id":4,
                    "result_completion_id":{result_completion_id},
                    "name":""
                }}}}}}"#
            ),
        )
    }

    fn expect_v2(entry: &ResolvedJournalEntry) -> &ResolvedEntryV2 {
        let ResolvedJournalEntry::V2(entry) = entry else {
            panic!("expected a v2 entry, got {entry:?}");
        };
        entry
    }

    fn summary(
        status: &str,
        completion: Option<CompletionSummary>,
        last_failure: Option<&str>,
        related_command_index: Option<u64>,
    ) -> InvocationSummary {
        InvocationSummary {
            id: "inv_1gdJBtdVEcM942bjcDmb1c1khoaJe11Hbz"
                .parse::<InvocationId>()
                .unwrap(),
            target: "Greeter/greet".to_owned(),
            status: status.to_owned(),
            completion,
            retry_count: 0,
            last_failure: last_failure.map(str::to_owned),
            last_failure_related_command_index: related_command_index,
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
        }
    }

    #[test]
    fn completed_call_resolves_against_its_notification() {
        let rows = vec![
            call_row(0, 5),
            v2_row(
                3,
                "Notification: Call",
                r#"{"Notification":{"Completion":{"Call":{"completion_id":5,"result":{"Success":[1,2,3]}}}}}"#,
            ),
        ];

        let entries = assemble_journal(&rows, None);
        assert_that!(entries.len(), eq(2));

        let call = expect_v2(&entries[0]);
        assert_that!(call.is_pending, eq(false));
        assert_that!(call.result_type, some(eq(ResultType::Success)));
        assert_that!(call.fields.value, some(eq("AQID")));
        assert_that!(call.related_indexes, elements_are![eq(&3)]);
        assert_that!(call.completion_index, some(eq(3)));
    }

    #[test]
    fn pending_sleep_has_no_end() {
        let rows = vec![v2_row(
            0,
            "Command: Sleep",
            r#"{"Command":{"Sleep":{"wake_up_time":1700000000000,"completion_id":9,"name":""}}}"#,
        )];
        let entries = assemble_journal(&rows, None);
        let sleep = expect_v2(&entries[0]);
        assert_that!(sleep.is_pending, eq(true));
        assert_that!(sleep.end, none());
        assert_that!(sleep.fields.wake_up_at, some(anything()));
    }

    #[test]
    fn assembly_is_idempotent() {
        let rows = vec![
            input_row(0),
            call_row(1, 5),
            v2_row(
                2,
                "Notification: Call",
                r#"{"Notification":{"Completion":{"Call":{"completion_id":5,"result":{"Failure":{"code":500,"message":"boom"}}}}}}"#,
            ),
        ];
        let summary = summary("running", None, None, None);
        let first = assemble_journal(&rows, Some(&summary));
        let second = assemble_journal(&rows, Some(&summary));
        assert_that!(first, eq(&second));
        assert_that!(
            serde_json::to_string(&first).unwrap(),
            eq(&serde_json::to_string(&second).unwrap())
        );
    }

    #[test]
    fn command_indexes_are_dense_and_increasing() {
        // Rows arrive index-descending, as the SQL page reads them.
        let rows = vec![
            v2_row(
                3,
                "Command: Sleep",
                r#"{"Command":{"Sleep":{"wake_up_time":1700000000000,"completion_id":9,"name":""}}}"#,
            ),
            v2_row(
                2,
                "Notification: Call",
                r#"{"Notification":{"Completion":{"Call":{"completion_id":5,"result":{"Success":[]}}}}}"#,
            ),
            call_row(1, 5),
            input_row(0),
        ];
        let entries = assemble_journal(&rows, None);

        let command_indexes: Vec<_> = entries
            .iter()
            .filter(|entry| entry.category() == EntryCategory::Command)
            .map(|entry| entry.command_index())
            .collect();
        assert_that!(
            command_indexes,
            elements_are![some(eq(&0)), some(eq(&1)), some(eq(&2))]
        );
    }

    #[test]
    fn malformed_payload_still_yields_an_entry() {
        let rows = vec![v2_row(2, "Command: Call", "{not json")];
        let entries = assemble_journal(&rows, None);
        assert_that!(entries.len(), eq(1));
        let entry = expect_v2(&entries[0]);
        assert_that!(entry.entry_type, eq("Call"));
        assert_that!(entry.is_loaded, eq(false));
        assert_that!(entry.fields, eq(&crate::resolved::EntryFields::default()));
    }

    #[test]
    fn finished_invocation_settles_pending_commands() {
        let rows = vec![call_row(0, 5)];
        let summary = summary(
            "completed",
            Some(CompletionSummary::Failure("[500] boom".to_owned())),
            Some("[500] boom"),
            Some(0),
        );
        let entries = assemble_journal(&rows, Some(&summary));

        let call = expect_v2(&entries[0]);
        assert_that!(call.is_pending, eq(false));
        assert_that!(
            call.error.as_ref().map(|f| f.to_string()),
            some(eq("[500] boom"))
        );
    }

    #[test]
    fn unattributed_invocation_failure_is_not_copied_onto_commands() {
        let rows = vec![input_row(0), call_row(1, 5)];
        let summary = summary(
            "completed",
            Some(CompletionSummary::Failure("[500] boom".to_owned())),
            Some("[500] boom"),
            // Attributed to a command index the journal page does not hold.
            Some(7),
        );
        let entries = assemble_journal(&rows, Some(&summary));
        let call = expect_v2(&entries[1]);
        assert_that!(call.is_pending, eq(false));
        assert_that!(call.error, none());
    }

    #[test]
    fn retrying_invocation_marks_the_attributed_command() {
        let rows = vec![call_row(0, 5)];
        let mut summary = summary("backing-off", None, Some("[500] boom"), Some(0));
        summary.retry_count = 4;
        let entries = assemble_journal(&rows, Some(&summary));
        let call = expect_v2(&entries[0]);
        assert_that!(call.is_pending, eq(true));
        assert_that!(call.is_retrying, eq(true));
    }
}
