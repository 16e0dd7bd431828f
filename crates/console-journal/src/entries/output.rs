// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use restate_console_types::journal_v2::{CommandType, OutputCommand};

use crate::entries::BuildContext;
use crate::outcome::Outcome;
use crate::resolved::{EntryCategory, ResolvedEntryV2};

pub(super) fn build(cx: &BuildContext<'_>, command: &OutputCommand) -> ResolvedEntryV2 {
    let mut entry = cx.base(EntryCategory::Command, CommandType::Output.to_string());
    let outcome = Outcome::from(&command.result);
    entry.result_type = Some(outcome.result_type());
    entry.fields.value = outcome.value;
    entry.error = outcome.failure;
    entry
}
