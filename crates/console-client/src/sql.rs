// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The SQL statements the console issues. Kept in one place so row structs in
//! [`crate::rows`] and the selected columns stay in sync.

use restate_console_types::identifiers::{EntryIndex, InvocationId};

/// Upper bound on journal rows fetched in one page, applied when the
/// invocation's journal size is not known.
pub const JOURNAL_QUERY_LIMIT: usize = 1024;

const INVOCATION_COLUMNS: &str = "inv.id,
    inv.target,
    inv.status,
    inv.completion_result,
    inv.completion_failure,
    inv.retry_count,
    inv.last_failure,
    inv.last_failure_related_command_index,
    inv.last_failure_related_command_name,
    inv.last_failure_related_command_type,
    inv.next_retry_at,
    inv.created_at,
    inv.modified_at,
    inv.inboxed_at,
    inv.scheduled_at,
    inv.running_at,
    inv.completed_at,
    inv.journal_size,
    inv.journal_commands_size";

/// Summary of one invocation, for [`crate::rows::InvocationRow`].
pub fn invocation_query(invocation_id: &InvocationId) -> String {
    format!(
        "SELECT
            {INVOCATION_COLUMNS}
        FROM sys_invocation inv
        WHERE inv.id = '{invocation_id}'"
    )
}

/// The journal page of one invocation, for [`crate::rows::JournalRow`].
///
/// `include_payloads` selects the full `entry_json` column; without it the
/// statement reads the cheap `entry_lite_json` projection and large payload
/// fields are fetched later, row by row, with [`journal_row_payload_query`].
pub fn journal_query(
    invocation_id: &InvocationId,
    include_payloads: bool,
    limit: Option<usize>,
) -> String {
    let select_json_columns = if include_payloads {
        "sj.entry_json, CAST(NULL AS STRING) AS entry_lite_json"
    } else {
        "CAST(NULL AS STRING) AS entry_json, sj.entry_lite_json"
    };
    let limit = limit.unwrap_or(JOURNAL_QUERY_LIMIT);

    format!(
        "SELECT
            sj.index,
            sj.entry_type,
            sj.name,
            sj.completed,
            sj.invoked_id,
            sj.invoked_target,
            sj.sleep_wakeup_at,
            sj.promise_name,
            sj.raw,
            sj.version,
            {select_json_columns},
            sj.appended_at
        FROM sys_journal sj
        WHERE
            sj.id = '{invocation_id}'
        ORDER BY index DESC
        LIMIT {limit}"
    )
}

/// One journal row with its full payload columns, for the on-demand payload
/// fetch path.
pub fn journal_row_payload_query(invocation_id: &InvocationId, index: EntryIndex) -> String {
    format!(
        "SELECT
            sj.index,
            sj.entry_type,
            sj.name,
            sj.completed,
            sj.invoked_id,
            sj.invoked_target,
            sj.sleep_wakeup_at,
            sj.promise_name,
            sj.raw,
            sj.version,
            sj.entry_json,
            CAST(NULL AS STRING) AS entry_lite_json,
            sj.appended_at
        FROM sys_journal sj
        WHERE
            sj.id = '{invocation_id}' AND sj.index = {index}"
    )
}

/// The events recorded for one invocation, for
/// [`crate::rows::JournalEventRow`].
pub fn journal_events_query(invocation_id: &InvocationId) -> String {
    format!(
        "SELECT
            sje.after_journal_entry_index,
            sje.appended_at,
            sje.event_type,
            sje.event_json
        FROM sys_journal_events sje
        WHERE
            sje.id = '{invocation_id}'
        ORDER BY appended_at ASC"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use googletest::prelude::*;

    fn test_id() -> InvocationId {
        "inv_1gdJBtdVEcM942bjcDmb1c1khoaJe11Hbz".parse().unwrap()
    }

    #[test]
    fn journal_query_selects_the_requested_payload_column() {
        let lite = journal_query(&test_id(), false, None);
        assert_that!(lite, contains_substring("sj.entry_lite_json"));
        assert_that!(lite, not(contains_substring("sj.entry_json,")));

        let full = journal_query(&test_id(), true, Some(16));
        assert_that!(full, contains_substring("sj.entry_json"));
        assert_that!(full, contains_substring("LIMIT 16"));
    }

    #[test]
    fn payload_query_pins_one_row() {
        let sql = journal_row_payload_query(&test_id(), 7);
        assert_that!(sql, contains_substring("sj.index = 7"));
        assert_that!(sql, contains_substring("sj.entry_json"));
    }
}
