// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! One builder per journal entry kind. Each is a pure function from the
//! decoded row (plus the correlation context) to a resolved entry;
//! asynchronous kinds consult correlation, synchronous kinds never do.
//! Builders are total: rows with no known builder or no readable payload
//! degrade to a bare entry instead of failing the pass.

mod attach;
mod call;
mod event;
mod input;
mod lite;
mod output;
mod promise;
mod run;
mod signal;
mod sleep;
mod state;
mod v1;

use restate_console_types::journal_v2::{Command, Entry, NotificationId, lite::EntryLite};

use crate::correlate::{CompletionIndex, Correlation, correlate};
use crate::decode::{DecodedPayload, DecodedRow};
use crate::resolved::{EntryCategory, EntryFields, ResolvedEntryV2, ResolvedJournalEntry};

/// Everything a builder may look at: the full decoded row list, the position
/// of the row being built and the completion index over the snapshot.
pub(crate) struct BuildContext<'a> {
    pub rows: &'a [DecodedRow],
    pub position: usize,
    pub completions: &'a CompletionIndex,
}

impl BuildContext<'_> {
    pub(crate) fn row(&self) -> &DecodedRow {
        &self.rows[self.position]
    }

    pub(crate) fn correlate(&self, id: NotificationId) -> Correlation {
        correlate(self.rows, self.position, self.completions, &id)
    }

    /// A resolved entry with only the row-level facts filled in. Builders
    /// add payload fields and correlation on top.
    pub(crate) fn base(
        &self,
        category: EntryCategory,
        entry_type: impl Into<String>,
    ) -> ResolvedEntryV2 {
        let row = self.row();
        ResolvedEntryV2 {
            index: row.index,
            category,
            entry_type: entry_type.into(),
            name: row.name.clone(),
            command_index: row.command_index,
            completion_id: None,
            completion_index: None,
            related_indexes: Vec::new(),
            start: row.appended_at,
            end: None,
            is_pending: false,
            is_retrying: false,
            is_loaded: matches!(row.payload, DecodedPayload::Full(_)),
            result_type: None,
            error: None,
            fields: EntryFields::default(),
        }
    }
}

/// Folds a correlation result into a command entry.
pub(crate) fn apply_correlation(entry: &mut ResolvedEntryV2, correlation: Correlation) {
    entry.is_pending = correlation.is_pending;
    entry.end = correlation.end;
    entry.completion_index = correlation.completion_index;
    entry.related_indexes = correlation.related_indexes;
    entry.result_type = correlation.result_type;
    if let Some(outcome) = correlation.outcome {
        entry.fields.value = outcome.value;
        entry.error = outcome.failure;
    }
    if let Some(keys) = correlation.state_keys {
        entry.fields.keys = Some(keys);
    }
}

/// Converts one decoded row. `None` means the row is pure plumbing
/// (a version 1 `CompletionResult` marker, a `CallInvocationId`
/// notification) and never reaches the display model.
pub(crate) fn resolve_row(cx: &BuildContext<'_>) -> Option<ResolvedJournalEntry> {
    match &cx.row().payload {
        DecodedPayload::V1(entry) => v1::build(cx, entry).map(ResolvedJournalEntry::V1),
        DecodedPayload::Full(Entry::Command(command)) => {
            Some(ResolvedJournalEntry::V2(build_command(cx, command)))
        }
        DecodedPayload::Full(Entry::Notification(notification)) => {
            signal::build_notification(cx, notification).map(ResolvedJournalEntry::V2)
        }
        DecodedPayload::Full(Entry::Event(journal_event)) => {
            Some(ResolvedJournalEntry::V2(event::build(cx, journal_event)))
        }
        DecodedPayload::Lite(EntryLite::Command(command)) => {
            Some(ResolvedJournalEntry::V2(lite::build_command(cx, command)))
        }
        DecodedPayload::Lite(EntryLite::Notification(notification)) => {
            lite::build_notification(cx, notification).map(ResolvedJournalEntry::V2)
        }
        DecodedPayload::Missing => Some(bare_entry(cx)),
    }
}

fn build_command(cx: &BuildContext<'_>, command: &Command) -> ResolvedEntryV2 {
    match command {
        Command::Input(cmd) => input::build(cx, cmd),
        Command::Output(cmd) => output::build(cx, cmd),
        Command::GetLazyState(cmd) => state::build_get_lazy_state(cx, cmd),
        Command::SetState(cmd) => state::build_set_state(cx, cmd),
        Command::ClearState(cmd) => state::build_clear_state(cx, cmd),
        Command::ClearAllState(cmd) => state::build_clear_all_state(cx, cmd),
        Command::GetLazyStateKeys(cmd) => state::build_get_lazy_state_keys(cx, cmd),
        Command::GetEagerState(cmd) => state::build_get_eager_state(cx, cmd),
        Command::GetEagerStateKeys(cmd) => state::build_get_eager_state_keys(cx, cmd),
        Command::GetPromise(cmd) => promise::build_get_promise(cx, cmd),
        Command::PeekPromise(cmd) => promise::build_peek_promise(cx, cmd),
        Command::CompletePromise(cmd) => promise::build_complete_promise(cx, cmd),
        Command::Sleep(cmd) => sleep::build(cx, cmd),
        Command::Call(cmd) => call::build_call(cx, cmd),
        Command::OneWayCall(cmd) => call::build_one_way_call(cx, cmd),
        Command::SendSignal(cmd) => signal::build_send_signal(cx, cmd),
        Command::Run(cmd) => run::build(cx, cmd),
        Command::AttachInvocation(cmd) => attach::build_attach_invocation(cx, cmd),
        Command::GetInvocationOutput(cmd) => attach::build_get_invocation_output(cx, cmd),
        Command::CompleteAwakeable(cmd) => signal::build_complete_awakeable(cx, cmd),
    }
}

/// Fallback for rows with no readable payload: the raw type tag is preserved
/// so the row still renders by name.
fn bare_entry(cx: &BuildContext<'_>) -> ResolvedJournalEntry {
    let row = cx.row();
    let (category, entry_type) = split_row_tag(&row.entry_type);
    let mut entry = cx.base(category, entry_type);
    entry.is_loaded = false;
    entry.fields.invoked_id = row.convenience.invoked_id.clone();
    entry.fields.invoked_target = row.convenience.invoked_target.clone();
    entry.fields.wake_up_at = row.convenience.sleep_wakeup_at;
    entry.fields.promise_name = row.convenience.promise_name.clone();
    ResolvedJournalEntry::V2(entry)
}

/// Splits a version 2 `entry_type` column value into category and bare tag.
/// Unprefixed tags count as commands, matching how version 1 rows display.
pub(crate) fn split_row_tag(tag: &str) -> (EntryCategory, String) {
    if let Some(bare) = tag.strip_prefix("Command: ") {
        (EntryCategory::Command, bare.to_owned())
    } else if let Some(bare) = tag.strip_prefix("Notification: ") {
        (EntryCategory::Notification, bare.to_owned())
    } else if tag == "Event" || tag.starts_with("Event: ") {
        let bare = tag.strip_prefix("Event: ").unwrap_or(tag);
        (EntryCategory::Event, bare.to_owned())
    } else {
        (EntryCategory::Command, tag.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use googletest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("Command: Call", EntryCategory::Command, "Call")]
    #[case("Notification: Sleep", EntryCategory::Notification, "Sleep")]
    #[case("Event", EntryCategory::Event, "Event")]
    #[case("SomethingNew", EntryCategory::Command, "SomethingNew")]
    fn row_tag_split(
        #[case] tag: &str,
        #[case] category: EntryCategory,
        #[case] bare: &str,
    ) {
        assert_that!(split_row_tag(tag), eq(&(category, bare.to_owned())));
    }
}
