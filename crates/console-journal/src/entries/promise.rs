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
    CommandType, CompletePromiseCommand, CompletePromiseValue, GetPromiseCommand, NotificationId,
    PeekPromiseCommand,
};

use crate::decode::bytes_to_base64;
use crate::entries::{BuildContext, apply_correlation};
use crate::resolved::{EntryCategory, ResolvedEntryV2};

pub(super) fn build_get_promise(
    cx: &BuildContext<'_>,
    command: &GetPromiseCommand,
) -> ResolvedEntryV2 {
    let mut entry = cx.base(EntryCategory::Command, CommandType::GetPromise.to_string());
    entry.fields.promise_name = Some(command.key.to_string());
    entry.completion_id = Some(command.completion_id);
    apply_correlation(
        &mut entry,
        cx.correlate(NotificationId::for_completion(command.completion_id)),
    );
    entry
}

pub(super) fn build_peek_promise(
    cx: &BuildContext<'_>,
    command: &PeekPromiseCommand,
) -> ResolvedEntryV2 {
    let mut entry = cx.base(EntryCategory::Command, CommandType::PeekPromise.to_string());
    entry.fields.promise_name = Some(command.key.to_string());
    entry.completion_id = Some(command.completion_id);
    apply_correlation(
        &mut entry,
        cx.correlate(NotificationId::for_completion(command.completion_id)),
    );
    entry
}

pub(super) fn build_complete_promise(
    cx: &BuildContext<'_>,
    command: &CompletePromiseCommand,
) -> ResolvedEntryV2 {
    let mut entry = cx.base(
        EntryCategory::Command,
        CommandType::CompletePromise.to_string(),
    );
    entry.fields.promise_name = Some(command.key.to_string());
    // The value being written to the promise is the command's argument, not
    // its outcome.
    if let CompletePromiseValue::Success(bytes) = &command.value {
        entry.fields.parameters = Some(bytes_to_base64(bytes));
    }
    entry.completion_id = Some(command.completion_id);
    apply_correlation(
        &mut entry,
        cx.correlate(NotificationId::for_completion(command.completion_id)),
    );
    entry
}
