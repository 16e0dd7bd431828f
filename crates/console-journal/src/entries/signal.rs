// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Signals, awakeables and the notification rows. The two built-in signal
//! channels render under their own names: index 1 is a cancellation, index
//! 17 an externally resolved awakeable. Neither goes through completion-id
//! matching.

use restate_console_types::journal_v2::{
    CommandType, CompleteAwakeableCommand, Completion, Notification, SendSignalCommand, Signal,
    SignalId,
};

use crate::correlate::{is_cancel_signal_id, is_external_awakeable_signal_id};
use crate::entries::BuildContext;
use crate::outcome::{Outcome, completion_outcome};
use crate::resolved::{EntryCategory, ResolvedEntryV2};

/// Display tag of a signal row: the built-in channels get their own names.
fn signal_entry_type(id: &SignalId) -> &'static str {
    if is_cancel_signal_id(id) {
        "Cancel"
    } else if is_external_awakeable_signal_id(id) {
        "Awakeable"
    } else {
        "Signal"
    }
}

pub(super) fn build_send_signal(
    cx: &BuildContext<'_>,
    command: &SendSignalCommand,
) -> ResolvedEntryV2 {
    let entry_type = if is_cancel_signal_id(&command.signal_id) {
        "Cancel".to_owned()
    } else {
        CommandType::SendSignal.to_string()
    };
    let mut entry = cx.base(EntryCategory::Command, entry_type);
    entry.fields.invoked_id = Some(command.target_invocation_id.to_string());
    let outcome = Outcome::from(&command.result);
    entry.result_type = Some(outcome.result_type());
    entry.fields.value = outcome.value;
    entry.error = outcome.failure;
    entry
}

pub(super) fn build_complete_awakeable(
    cx: &BuildContext<'_>,
    command: &CompleteAwakeableCommand,
) -> ResolvedEntryV2 {
    let mut entry = cx.base(
        EntryCategory::Command,
        CommandType::CompleteAwakeable.to_string(),
    );
    entry.fields.awakeable_id = Some(command.id.to_string());
    let outcome = Outcome::from(&command.result);
    entry.result_type = Some(outcome.result_type());
    entry.fields.value = outcome.value;
    entry.error = outcome.failure;
    entry
}

/// Builds the entry for a notification row. `CallInvocationId` completions
/// are plumbing and dropped from the display model.
pub(super) fn build_notification(
    cx: &BuildContext<'_>,
    notification: &Notification,
) -> Option<ResolvedEntryV2> {
    match notification {
        Notification::Completion(Completion::CallInvocationId(_)) => None,
        Notification::Completion(completion) => {
            let mut entry =
                cx.base(EntryCategory::Notification, completion.ty().to_string());
            entry.completion_id = Some(completion.completion_id());
            let outcome = completion_outcome(completion);
            entry.result_type = Some(outcome.result_type());
            entry.fields.value = outcome.value;
            entry.error = outcome.failure;
            if let Completion::GetLazyStateKeys(keys_completion) = completion {
                entry.fields.keys = Some(keys_completion.state_keys.clone());
                entry.result_type = Some(crate::outcome::ResultType::Success);
            }
            Some(entry)
        }
        Notification::Signal(signal) => Some(build_signal(cx, signal)),
    }
}

fn build_signal(cx: &BuildContext<'_>, signal: &Signal) -> ResolvedEntryV2 {
    let mut entry = cx.base(EntryCategory::Notification, signal_entry_type(&signal.id));
    if let SignalId::Name(name) = &signal.id {
        entry.name.get_or_insert_with(|| name.to_string());
    }
    let outcome = Outcome::from(&signal.result);
    entry.result_type = Some(outcome.result_type());
    entry.fields.value = outcome.value;
    entry.error = outcome.failure;
    entry
}
