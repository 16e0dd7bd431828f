// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use restate_console_types::journal_v2::Event;

use crate::entries::BuildContext;
use crate::resolved::{EntryCategory, ResolvedEntryV2};

pub(super) fn build(cx: &BuildContext<'_>, event: &Event) -> ResolvedEntryV2 {
    let mut entry = cx.base(EntryCategory::Event, event.ty.to_string());
    if !event.metadata.is_empty() {
        entry.fields.metadata = Some(
            event
                .metadata
                .iter()
                .map(|(key, value)| (key.clone(), value.to_string()))
                .collect(),
        );
    }
    entry
}
