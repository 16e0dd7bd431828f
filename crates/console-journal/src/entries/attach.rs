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
    AttachInvocationCommand, AttachInvocationTarget, CommandType, GetInvocationOutputCommand,
    NotificationId,
};

use crate::entries::{BuildContext, apply_correlation};
use crate::resolved::{EntryCategory, EntryFields, ResolvedEntryV2};

fn fill_target(fields: &mut EntryFields, target: &AttachInvocationTarget) {
    match target {
        AttachInvocationTarget::InvocationId(id) => {
            fields.invoked_id = Some(id.to_string());
        }
        AttachInvocationTarget::IdempotentRequest(id) => {
            fields.invoked_target = Some(format!(
                "{}/{}",
                id.service_name, id.service_handler
            ));
            fields.idempotency_key = Some(id.idempotency_key.to_string());
        }
        AttachInvocationTarget::Workflow(service_id) => {
            fields.invoked_target = Some(service_id.service_name.to_string());
            fields.key = Some(service_id.key.to_string());
        }
    }
}

pub(super) fn build_attach_invocation(
    cx: &BuildContext<'_>,
    command: &AttachInvocationCommand,
) -> ResolvedEntryV2 {
    let mut entry = cx.base(
        EntryCategory::Command,
        CommandType::AttachInvocation.to_string(),
    );
    fill_target(&mut entry.fields, &command.target);
    entry.completion_id = Some(command.completion_id);
    apply_correlation(
        &mut entry,
        cx.correlate(NotificationId::for_completion(command.completion_id)),
    );
    entry
}

pub(super) fn build_get_invocation_output(
    cx: &BuildContext<'_>,
    command: &GetInvocationOutputCommand,
) -> ResolvedEntryV2 {
    let mut entry = cx.base(
        EntryCategory::Command,
        CommandType::GetInvocationOutput.to_string(),
    );
    fill_target(&mut entry.fields, &command.target);
    entry.completion_id = Some(command.completion_id);
    apply_correlation(
        &mut entry,
        cx.correlate(NotificationId::for_completion(command.completion_id)),
    );
    entry
}
