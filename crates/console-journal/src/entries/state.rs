// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The state access family. Lazy reads are asynchronous and correlate to a
//! completion; eager reads and writes carry their result inline.

use restate_console_types::journal_v2::{
    ClearAllStateCommand, ClearStateCommand, CommandType, GetEagerStateCommand,
    GetEagerStateKeysCommand, GetLazyStateCommand, GetLazyStateKeysCommand, NotificationId,
    SetStateCommand,
};

use crate::decode::bytes_to_base64;
use crate::entries::{BuildContext, apply_correlation};
use crate::outcome::Outcome;
use crate::resolved::{EntryCategory, ResolvedEntryV2};

pub(super) fn build_get_lazy_state(
    cx: &BuildContext<'_>,
    command: &GetLazyStateCommand,
) -> ResolvedEntryV2 {
    let mut entry = cx.base(EntryCategory::Command, CommandType::GetLazyState.to_string());
    entry.fields.key = Some(command.key.to_string());
    entry.completion_id = Some(command.completion_id);
    apply_correlation(
        &mut entry,
        cx.correlate(NotificationId::for_completion(command.completion_id)),
    );
    entry
}

pub(super) fn build_set_state(
    cx: &BuildContext<'_>,
    command: &SetStateCommand,
) -> ResolvedEntryV2 {
    let mut entry = cx.base(EntryCategory::Command, CommandType::SetState.to_string());
    entry.fields.key = Some(command.key.to_string());
    entry.fields.value = Some(bytes_to_base64(&command.value));
    entry
}

pub(super) fn build_clear_state(
    cx: &BuildContext<'_>,
    command: &ClearStateCommand,
) -> ResolvedEntryV2 {
    let mut entry = cx.base(EntryCategory::Command, CommandType::ClearState.to_string());
    entry.fields.key = Some(command.key.to_string());
    entry
}

pub(super) fn build_clear_all_state(
    cx: &BuildContext<'_>,
    _command: &ClearAllStateCommand,
) -> ResolvedEntryV2 {
    cx.base(EntryCategory::Command, CommandType::ClearAllState.to_string())
}

pub(super) fn build_get_lazy_state_keys(
    cx: &BuildContext<'_>,
    command: &GetLazyStateKeysCommand,
) -> ResolvedEntryV2 {
    let mut entry = cx.base(
        EntryCategory::Command,
        CommandType::GetLazyStateKeys.to_string(),
    );
    entry.completion_id = Some(command.completion_id);
    apply_correlation(
        &mut entry,
        cx.correlate(NotificationId::for_completion(command.completion_id)),
    );
    entry
}

pub(super) fn build_get_eager_state(
    cx: &BuildContext<'_>,
    command: &GetEagerStateCommand,
) -> ResolvedEntryV2 {
    let mut entry = cx.base(EntryCategory::Command, CommandType::GetEagerState.to_string());
    entry.fields.key = Some(command.key.to_string());
    let outcome = Outcome::from(&command.result);
    entry.result_type = Some(outcome.result_type());
    entry.fields.value = outcome.value;
    entry
}

pub(super) fn build_get_eager_state_keys(
    cx: &BuildContext<'_>,
    command: &GetEagerStateKeysCommand,
) -> ResolvedEntryV2 {
    let mut entry = cx.base(
        EntryCategory::Command,
        CommandType::GetEagerStateKeys.to_string(),
    );
    entry.fields.keys = Some(command.state_keys.clone());
    entry
}
