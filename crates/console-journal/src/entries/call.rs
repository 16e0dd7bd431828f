// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use restate_console_types::journal_v2::{
    CallCommand, CallRequest, CommandType, NotificationId, OneWayCallCommand,
};

use crate::decode::bytes_to_base64;
use crate::entries::{BuildContext, apply_correlation};
use crate::resolved::{EntryCategory, EntryFields, ResolvedEntryV2};

fn fill_request(fields: &mut EntryFields, request: &CallRequest) {
    fields.invoked_id = Some(request.invocation_id.to_string());
    fields.invoked_target = Some(request.invocation_target.to_string());
    fields.parameters = Some(bytes_to_base64(&request.parameter));
    if !request.headers.is_empty() {
        fields.headers = Some(request.headers.clone());
    }
    fields.idempotency_key = request.idempotency_key.as_ref().map(|key| key.to_string());
}

pub(super) fn build_call(cx: &BuildContext<'_>, command: &CallCommand) -> ResolvedEntryV2 {
    let mut entry = cx.base(EntryCategory::Command, CommandType::Call.to_string());
    fill_request(&mut entry.fields, &command.request);
    entry.completion_id = Some(command.result_completion_id);
    apply_correlation(
        &mut entry,
        cx.correlate(NotificationId::for_completion(command.result_completion_id)),
    );
    entry
}

/// One-way calls detach from the caller: there is no result to wait for and
/// the entry never pends. The invocation-id leg still correlates, so the
/// notification confirming the callee's id is linked as a related row. A
/// scheduled send surfaces its invoke time.
pub(super) fn build_one_way_call(
    cx: &BuildContext<'_>,
    command: &OneWayCallCommand,
) -> ResolvedEntryV2 {
    let mut entry = cx.base(EntryCategory::Command, CommandType::OneWayCall.to_string());
    fill_request(&mut entry.fields, &command.request);
    entry.fields.wake_up_at = command.invoke_time.to_datetime();
    let id_leg = cx.correlate(NotificationId::for_completion(
        command.invocation_id_completion_id,
    ));
    entry.related_indexes.extend(id_leg.related_indexes);
    entry
}

#[cfg(test)]
mod tests {
    use super::*;

    use bytes::Bytes;
    use googletest::prelude::*;
    use restate_console_types::invocation::InvocationTarget;
    use restate_console_types::journal_v2::{
        CallCompletion, CallInvocationIdCompletion, CallResult, Completion, Entry, Notification,
    };
    use restate_console_types::time::MillisSinceEpoch;

    use crate::correlate::CompletionIndex;
    use crate::decode::{DecodedPayload, DecodedRow, RowConvenience};
    use crate::outcome::ResultType;

    fn row(index: u32, entry_type: &str, payload: DecodedPayload) -> DecodedRow {
        DecodedRow {
            index,
            entry_type: entry_type.to_owned(),
            name: None,
            completed: false,
            version: 2,
            appended_at: None,
            convenience: RowConvenience::default(),
            payload,
            command_index: Some(0),
        }
    }

    fn call_command(result_completion_id: u32) -> CallCommand {
        CallCommand {
            request: CallRequest {
                invocation_id: "inv_1gdJBtdVEcM942bjcDmb1c1khoaJe11Hbz".parse().unwrap(),
                invocation_target: InvocationTarget::service("Greeter", "greet"),
                parameter: Bytes::from_static(b"{}"),
                headers: vec![],
                idempotency_key: None,
            },
            invocation_id_completion_id: result_completion_id - 1,
            result_completion_id,
            name: "".into(),
        }
    }

    #[test]
    fn completed_call_resolves_value_and_related_indexes() {
        let command = call_command(5);
        let rows = vec![
            row(
                0,
                "Command: Call",
                DecodedPayload::Full(Entry::Command(command.clone().into())),
            ),
            row(
                3,
                "Notification: Call",
                DecodedPayload::Full(Entry::Notification(Notification::Completion(
                    Completion::Call(CallCompletion {
                        completion_id: 5,
                        result: CallResult::Success(Bytes::from_static(&[1, 2, 3])),
                    }),
                ))),
            ),
        ];
        let completions = CompletionIndex::build(&rows);
        let cx = BuildContext {
            rows: &rows,
            position: 0,
            completions: &completions,
        };

        let entry = build_call(&cx, &command);
        assert_that!(entry.is_pending, eq(false));
        assert_that!(entry.result_type, some(eq(ResultType::Success)));
        assert_that!(entry.fields.value, some(eq("AQID")));
        assert_that!(entry.related_indexes, elements_are![eq(&3)]);
        assert_that!(entry.completion_index, some(eq(3)));
        assert_that!(entry.fields.invoked_target, some(eq("Greeter/greet")));
    }

    #[test]
    fn uncompleted_call_is_pending() {
        let command = call_command(5);
        let rows = vec![row(
            0,
            "Command: Call",
            DecodedPayload::Full(Entry::Command(command.clone().into())),
        )];
        let completions = CompletionIndex::build(&rows);
        let cx = BuildContext {
            rows: &rows,
            position: 0,
            completions: &completions,
        };

        let entry = build_call(&cx, &command);
        assert_that!(entry.is_pending, eq(true));
        assert_that!(entry.end, none());
        assert_that!(entry.error, none());
    }

    #[test]
    fn one_way_call_links_its_invocation_id_notification() {
        let command = OneWayCallCommand {
            request: call_command(5).request,
            invoke_time: MillisSinceEpoch::new(0),
            invocation_id_completion_id: 4,
            name: "".into(),
        };
        let rows = vec![
            row(
                0,
                "Command: OneWayCall",
                DecodedPayload::Full(Entry::Command(command.clone().into())),
            ),
            row(
                2,
                "Notification: CallInvocationId",
                DecodedPayload::Full(Entry::Notification(Notification::Completion(
                    Completion::CallInvocationId(CallInvocationIdCompletion {
                        completion_id: 4,
                        invocation_id: "inv_1gdJBtdVEcM942bjcDmb1c1khoaJe11Hbz"
                            .parse()
                            .unwrap(),
                    }),
                ))),
            ),
        ];
        let completions = CompletionIndex::build(&rows);
        let cx = BuildContext {
            rows: &rows,
            position: 0,
            completions: &completions,
        };

        let entry = build_one_way_call(&cx, &command);
        assert_that!(entry.is_pending, eq(false));
        assert_that!(entry.completion_index, none());
        assert_that!(entry.related_indexes, elements_are![eq(&2)]);
    }
}
