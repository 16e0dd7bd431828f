// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Links a command row to the row that completes it. Version 2 commands name
//! their completion explicitly; built-in interrupt channels (cancellation,
//! externally resolved awakeables) are addressed by fixed signal index
//! instead. Version 1 entries merge the completion into the entry itself and
//! only need a forward scan for the transient marker rows.

use std::collections::HashMap;

use chrono::{DateTime, Local};

use restate_console_types::identifiers::EntryIndex;
use restate_console_types::journal_v2::{
    BuiltInSignal, Completion, EXTERNAL_AWAKEABLE_SIGNAL_INDEX, Entry, Notification,
    NotificationId, SignalId,
    lite::{EntryLite, NotificationResultLite},
};

use crate::decode::{DecodedPayload, DecodedRow};
use crate::outcome::{Outcome, ResultType, completion_outcome};

/// `notification id -> row position` over one journal snapshot, built in a
/// single pass so per-command correlation stays O(1). The first notification
/// bearing an id wins; duplicates are never attached to a command.
#[derive(Debug, Default)]
pub(crate) struct CompletionIndex {
    by_notification_id: HashMap<NotificationId, usize>,
    cancel_signal: Option<usize>,
    external_awakeable_signal: Option<usize>,
}

impl CompletionIndex {
    pub(crate) fn build(rows: &[DecodedRow]) -> Self {
        let mut index = CompletionIndex::default();
        for (position, row) in rows.iter().enumerate() {
            let id = match &row.payload {
                DecodedPayload::Full(Entry::Notification(notification)) => notification.id(),
                DecodedPayload::Lite(EntryLite::Notification(notification)) => {
                    notification.id.clone()
                }
                _ => continue,
            };
            match id {
                NotificationId::SignalIndex(idx) if idx == BuiltInSignal::Cancel as u32 => {
                    index.cancel_signal.get_or_insert(position);
                }
                NotificationId::SignalIndex(EXTERNAL_AWAKEABLE_SIGNAL_INDEX) => {
                    index.external_awakeable_signal.get_or_insert(position);
                }
                id => {
                    index.by_notification_id.entry(id).or_insert(position);
                }
            }
        }
        index
    }

    /// Position of the notification row carrying `id`. The two built-in
    /// signal channels are checked before the generic completion-id map.
    pub(crate) fn position_of(&self, id: &NotificationId) -> Option<usize> {
        if let NotificationId::SignalIndex(idx) = id {
            if *idx == BuiltInSignal::Cancel as u32 {
                return self.cancel_signal;
            }
            if *idx == EXTERNAL_AWAKEABLE_SIGNAL_INDEX {
                return self.external_awakeable_signal;
            }
        }
        self.by_notification_id.get(id).copied()
    }
}

/// What correlation found out about one command. A miss is not an error:
/// `is_pending` stays set and the invocation's own failure fields decide how
/// the caller renders it.
#[derive(Debug, Default)]
pub(crate) struct Correlation {
    pub is_pending: bool,
    pub end: Option<DateTime<Local>>,
    pub completion_index: Option<EntryIndex>,
    pub related_indexes: Vec<EntryIndex>,
    pub result_type: Option<ResultType>,
    /// Decoded outcome; absent when the completion row came from the lite
    /// projection.
    pub outcome: Option<Outcome>,
    pub state_keys: Option<Vec<String>>,
}

/// Resolves the completion a command at `command_position` expects under
/// `id`. Only rows strictly after the command qualify.
pub(crate) fn correlate(
    rows: &[DecodedRow],
    command_position: usize,
    index: &CompletionIndex,
    id: &NotificationId,
) -> Correlation {
    let Some(position) = index.position_of(id).filter(|p| *p > command_position) else {
        return Correlation {
            is_pending: true,
            ..Correlation::default()
        };
    };

    let completion_row = &rows[position];
    let mut correlation = Correlation {
        is_pending: false,
        end: completion_row.appended_at,
        completion_index: Some(completion_row.index),
        related_indexes: vec![completion_row.index],
        ..Correlation::default()
    };

    match &completion_row.payload {
        DecodedPayload::Full(Entry::Notification(Notification::Completion(completion))) => {
            let outcome = completion_outcome(completion);
            correlation.result_type = Some(completion_result_type(completion, &outcome));
            correlation.state_keys = match completion {
                Completion::GetLazyStateKeys(c) => Some(c.state_keys.clone()),
                _ => None,
            };
            correlation.outcome = Some(outcome);
        }
        DecodedPayload::Full(Entry::Notification(Notification::Signal(signal))) => {
            let outcome = Outcome::from(&signal.result);
            correlation.result_type = Some(outcome.result_type());
            correlation.outcome = Some(outcome);
        }
        DecodedPayload::Lite(EntryLite::Notification(notification)) => {
            correlation.result_type = match notification.result {
                NotificationResultLite::Void => Some(ResultType::Void),
                NotificationResultLite::Success | NotificationResultLite::StateKeys => {
                    Some(ResultType::Success)
                }
                NotificationResultLite::Failure => Some(ResultType::Failure),
                NotificationResultLite::InvocationId => None,
            };
        }
        // Completion row exists but its payload did not decode; the command
        // is still completed, just without a readable result.
        _ => {}
    }

    correlation
}

fn completion_result_type(completion: &Completion, outcome: &Outcome) -> ResultType {
    match completion {
        // Keys travel outside the byte-shaped outcome.
        Completion::GetLazyStateKeys(_) => ResultType::Success,
        _ => outcome.result_type(),
    }
}

/// Version 1 fallback: linear forward scan from the row after `from`,
/// returning the first row matching `predicate`.
pub(crate) fn v1_find_following<'a>(
    rows: &'a [DecodedRow],
    from: usize,
    predicate: impl Fn(&DecodedRow) -> bool,
) -> Option<&'a DecodedRow> {
    rows.iter().skip(from + 1).find(|row| predicate(row))
}

/// True when a notification row was resolved as a cancellation signal.
pub(crate) fn is_cancel_signal_id(id: &SignalId) -> bool {
    id.index() == Some(BuiltInSignal::Cancel as u32)
}

/// True when a notification row carries an externally resolved awakeable.
pub(crate) fn is_external_awakeable_signal_id(id: &SignalId) -> bool {
    id.index() == Some(EXTERNAL_AWAKEABLE_SIGNAL_INDEX)
}

#[cfg(test)]
mod tests {
    use super::*;

    use bytes::Bytes;
    use googletest::prelude::*;
    use restate_console_types::journal_v2::{CallCompletion, CallResult, Signal, SignalResult};

    use crate::decode::RowConvenience;

    fn notification_row(index: EntryIndex, completion: Completion) -> DecodedRow {
        DecodedRow {
            index,
            entry_type: format!("Notification: {}", completion.ty()),
            name: None,
            completed: false,
            version: 2,
            appended_at: None,
            convenience: RowConvenience::default(),
            payload: DecodedPayload::Full(Entry::Notification(completion.into())),
            command_index: None,
        }
    }

    fn signal_row(index: EntryIndex, signal: Signal) -> DecodedRow {
        DecodedRow {
            index,
            entry_type: "Notification: Signal".to_owned(),
            name: None,
            completed: false,
            version: 2,
            appended_at: None,
            convenience: RowConvenience::default(),
            payload: DecodedPayload::Full(Entry::Notification(signal.into())),
            command_index: None,
        }
    }

    fn placeholder_command(index: EntryIndex) -> DecodedRow {
        DecodedRow {
            index,
            entry_type: "Command: Call".to_owned(),
            name: None,
            completed: false,
            version: 2,
            appended_at: None,
            convenience: RowConvenience::default(),
            payload: DecodedPayload::Missing,
            command_index: Some(0),
        }
    }

    fn call_completion(completion_id: u32, bytes: &'static [u8]) -> Completion {
        Completion::Call(CallCompletion {
            completion_id,
            result: CallResult::Success(Bytes::from_static(bytes)),
        })
    }

    #[test]
    fn completion_id_lookup() {
        let rows = vec![
            placeholder_command(0),
            notification_row(3, call_completion(5, &[1, 2, 3])),
        ];
        let index = CompletionIndex::build(&rows);

        let correlation = correlate(&rows, 0, &index, &NotificationId::CompletionId(5));
        assert_that!(correlation.is_pending, eq(false));
        assert_that!(correlation.completion_index, some(eq(3)));
        assert_that!(correlation.related_indexes, elements_are![eq(&3)]);
        assert_that!(correlation.result_type, some(eq(ResultType::Success)));
        assert_that!(
            correlation.outcome.unwrap().value,
            some(eq("AQID"))
        );
    }

    #[test]
    fn missing_completion_is_pending() {
        let rows = vec![placeholder_command(0)];
        let index = CompletionIndex::build(&rows);
        let correlation = correlate(&rows, 0, &index, &NotificationId::CompletionId(9));
        assert_that!(correlation.is_pending, eq(true));
        assert_that!(correlation.end, none());
        assert_that!(correlation.related_indexes, empty());
    }

    #[test]
    fn completions_before_the_command_do_not_match() {
        let rows = vec![
            notification_row(0, call_completion(5, &[1])),
            placeholder_command(1),
        ];
        let index = CompletionIndex::build(&rows);
        let correlation = correlate(&rows, 1, &index, &NotificationId::CompletionId(5));
        assert_that!(correlation.is_pending, eq(true));
    }

    #[test]
    fn duplicate_completion_ids_first_wins() {
        let rows = vec![
            placeholder_command(0),
            notification_row(1, call_completion(5, &[1])),
            notification_row(2, call_completion(5, &[2])),
        ];
        let index = CompletionIndex::build(&rows);
        let correlation = correlate(&rows, 0, &index, &NotificationId::CompletionId(5));
        assert_that!(correlation.completion_index, some(eq(1)));
    }

    #[test]
    fn cancel_signal_is_not_reachable_via_completion_ids() {
        let rows = vec![
            placeholder_command(0),
            signal_row(1, Signal::new(SignalId::for_index(1), SignalResult::Void)),
        ];
        let index = CompletionIndex::build(&rows);

        // The cancellation channel answers only to its fixed signal index.
        assert_that!(
            correlate(&rows, 0, &index, &NotificationId::CompletionId(1)).is_pending,
            eq(true)
        );
        let correlation = correlate(&rows, 0, &index, &NotificationId::SignalIndex(1));
        assert_that!(correlation.is_pending, eq(false));
        assert_that!(correlation.completion_index, some(eq(1)));
    }

    #[test]
    fn external_awakeable_signal_resolves_by_fixed_index() {
        let rows = vec![
            placeholder_command(0),
            signal_row(
                4,
                Signal::new(
                    SignalId::for_index(EXTERNAL_AWAKEABLE_SIGNAL_INDEX),
                    SignalResult::Success(Bytes::from_static(b"done")),
                ),
            ),
        ];
        let index = CompletionIndex::build(&rows);
        let correlation = correlate(
            &rows,
            0,
            &index,
            &NotificationId::SignalIndex(EXTERNAL_AWAKEABLE_SIGNAL_INDEX),
        );
        assert_that!(correlation.is_pending, eq(false));
        assert_that!(correlation.result_type, some(eq(ResultType::Success)));
    }

    #[test]
    fn forward_scan_finds_the_first_match() {
        let rows = vec![
            placeholder_command(0),
            placeholder_command(1),
            placeholder_command(2),
        ];
        let found = v1_find_following(&rows, 0, |row| row.index == 2);
        assert_that!(found.map(|r| r.index), some(eq(2)));
        assert_that!(v1_find_following(&rows, 2, |_| true), none());
    }
}
