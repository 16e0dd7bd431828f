// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use restate_console_types::journal_v2::{CommandType, NotificationId, SleepCommand};

use crate::entries::{BuildContext, apply_correlation};
use crate::resolved::{EntryCategory, ResolvedEntryV2};

pub(super) fn build(cx: &BuildContext<'_>, command: &SleepCommand) -> ResolvedEntryV2 {
    let mut entry = cx.base(EntryCategory::Command, CommandType::Sleep.to_string());
    entry.fields.wake_up_at = command
        .wake_up_time
        .to_datetime()
        .or(cx.row().convenience.sleep_wakeup_at);
    entry.completion_id = Some(command.completion_id);
    apply_correlation(
        &mut entry,
        cx.correlate(NotificationId::for_completion(command.completion_id)),
    );
    entry
}
