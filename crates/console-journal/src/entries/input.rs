// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use restate_console_types::journal_v2::{CommandType, InputCommand};

use crate::decode::bytes_to_base64;
use crate::entries::BuildContext;
use crate::resolved::{EntryCategory, ResolvedEntryV2};

pub(super) fn build(cx: &BuildContext<'_>, command: &InputCommand) -> ResolvedEntryV2 {
    let mut entry = cx.base(EntryCategory::Command, CommandType::Input.to_string());
    entry.fields.parameters = Some(bytes_to_base64(&command.payload));
    if !command.headers.is_empty() {
        entry.fields.headers = Some(command.headers.clone());
    }
    entry
}
