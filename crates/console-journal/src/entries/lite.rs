// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Builders over the lite projection. Structure (keys, targets, completion
//! ids) is all there; payload bytes are not, so entries come out with
//! `is_loaded = false` and results reduced to their type.

use restate_console_types::journal_v2::{
    NotificationId,
    lite::{CommandLite, NotificationLite, NotificationResultLite},
};

use crate::correlate::{is_cancel_signal_id, is_external_awakeable_signal_id};
use crate::entries::{BuildContext, apply_correlation};
use crate::outcome::ResultType;
use crate::resolved::{EntryCategory, ResolvedEntryV2};

pub(super) fn build_command(cx: &BuildContext<'_>, command: &CommandLite) -> ResolvedEntryV2 {
    let mut entry = cx.base(EntryCategory::Command, command.ty().to_string());
    entry.is_loaded = false;
    fill_lite_fields(&mut entry, command);
    if let Some(completion_id) = command.result_completion_id() {
        entry.completion_id = Some(completion_id);
        apply_correlation(
            &mut entry,
            cx.correlate(NotificationId::for_completion(completion_id)),
        );
    }
    entry
}

fn fill_lite_fields(entry: &mut ResolvedEntryV2, command: &CommandLite) {
    match command {
        CommandLite::GetLazyState(cmd) => entry.fields.key = Some(cmd.key.to_string()),
        CommandLite::SetState(cmd) => entry.fields.key = Some(cmd.key.to_string()),
        CommandLite::ClearState(cmd) => entry.fields.key = Some(cmd.key.to_string()),
        CommandLite::GetEagerState(cmd) => entry.fields.key = Some(cmd.key.to_string()),
        CommandLite::GetPromise(cmd) => {
            entry.fields.promise_name = Some(cmd.key.to_string());
        }
        CommandLite::PeekPromise(cmd) => {
            entry.fields.promise_name = Some(cmd.key.to_string());
        }
        CommandLite::CompletePromise(cmd) => {
            entry.fields.promise_name = Some(cmd.key.to_string());
        }
        CommandLite::Sleep(cmd) => {
            entry.fields.wake_up_at = cmd.wake_up_time.to_datetime();
        }
        CommandLite::Call(cmd) => {
            entry.fields.invoked_id = Some(cmd.invocation_id.to_string());
            entry.fields.invoked_target = Some(cmd.invocation_target.to_string());
        }
        CommandLite::OneWayCall(cmd) => {
            entry.fields.invoked_id = Some(cmd.invocation_id.to_string());
            entry.fields.invoked_target = Some(cmd.invocation_target.to_string());
            entry.fields.wake_up_at = cmd.invoke_time.to_datetime();
        }
        CommandLite::SendSignal(cmd) => {
            entry.fields.invoked_id = Some(cmd.target_invocation_id.to_string());
            if is_cancel_signal_id(&cmd.signal_id) {
                entry.entry_type = "Cancel".to_owned();
            }
        }
        CommandLite::CompleteAwakeable(cmd) => {
            entry.fields.awakeable_id = Some(cmd.id.to_string());
        }
        CommandLite::Input(_)
        | CommandLite::Output(_)
        | CommandLite::ClearAllState(_)
        | CommandLite::GetLazyStateKeys(_)
        | CommandLite::GetEagerStateKeys(_)
        | CommandLite::Run(_)
        | CommandLite::AttachInvocation(_)
        | CommandLite::GetInvocationOutput(_) => {}
    }
}

/// Lite notifications keep the id and the result shape. `CallInvocationId`
/// results are dropped like their full counterparts.
pub(super) fn build_notification(
    cx: &BuildContext<'_>,
    notification: &NotificationLite,
) -> Option<ResolvedEntryV2> {
    if notification.result == NotificationResultLite::InvocationId {
        return None;
    }

    let entry_type = match &notification.id {
        NotificationId::SignalIndex(idx) => {
            let signal_id =
                restate_console_types::journal_v2::SignalId::for_index(*idx);
            if is_cancel_signal_id(&signal_id) {
                "Cancel".to_owned()
            } else if is_external_awakeable_signal_id(&signal_id) {
                "Awakeable".to_owned()
            } else {
                notification.ty.to_string()
            }
        }
        _ => notification.ty.to_string(),
    };

    let mut entry = cx.base(EntryCategory::Notification, entry_type);
    entry.is_loaded = false;
    if let NotificationId::CompletionId(completion_id) = &notification.id {
        entry.completion_id = Some(*completion_id);
    }
    entry.result_type = match notification.result {
        NotificationResultLite::Void => Some(ResultType::Void),
        NotificationResultLite::Success | NotificationResultLite::StateKeys => {
            Some(ResultType::Success)
        }
        NotificationResultLite::Failure => Some(ResultType::Failure),
        NotificationResultLite::InvocationId => None,
    };
    Some(entry)
}

#[cfg(test)]
mod tests {
    use super::*;

    use googletest::prelude::*;
    use restate_console_types::journal_v2::{
        CompletionType, NotificationType, lite::EntryLite,
    };

    use crate::correlate::CompletionIndex;
    use crate::decode::{DecodedPayload, DecodedRow, RowConvenience};

    fn notification_row(index: u32, notification: &NotificationLite) -> DecodedRow {
        DecodedRow {
            index,
            entry_type: format!("Notification: {}", notification.ty),
            name: None,
            completed: false,
            version: 2,
            appended_at: None,
            convenience: RowConvenience::default(),
            payload: DecodedPayload::Lite(EntryLite::Notification(notification.clone())),
            command_index: None,
        }
    }

    #[test]
    fn lite_notification_keeps_the_result_shape() {
        let notification = NotificationLite {
            ty: NotificationType::Completion(CompletionType::Call),
            id: NotificationId::CompletionId(5),
            result: NotificationResultLite::Success,
        };
        let rows = vec![notification_row(3, &notification)];
        let completions = CompletionIndex::build(&rows);
        let cx = BuildContext {
            rows: &rows,
            position: 0,
            completions: &completions,
        };

        let entry = build_notification(&cx, &notification).unwrap();
        assert_that!(entry.category, eq(EntryCategory::Notification));
        assert_that!(entry.completion_id, some(eq(5)));
        assert_that!(entry.result_type, some(eq(ResultType::Success)));
        assert_that!(entry.is_loaded, eq(false));
    }

    #[test]
    fn invocation_id_results_are_dropped() {
        let notification = NotificationLite {
            ty: NotificationType::Completion(CompletionType::CallInvocationId),
            id: NotificationId::CompletionId(4),
            result: NotificationResultLite::InvocationId,
        };
        let rows = vec![notification_row(2, &notification)];
        let completions = CompletionIndex::build(&rows);
        let cx = BuildContext {
            rows: &rows,
            position: 0,
            completions: &completions,
        };

        assert_that!(build_notification(&cx, &notification), none());
    }
}
