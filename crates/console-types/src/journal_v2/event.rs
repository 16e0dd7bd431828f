// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::HashMap;

use bytestring::ByteString;
use strum::EnumString;

/// An event recorded in the journal itself, as opposed to the events table.
/// Carries free-form metadata, the console renders it verbatim.
#[derive(
    Debug, Clone, PartialEq, Eq, EnumString, strum::Display, serde::Serialize, serde::Deserialize,
)]
pub enum EventType {
    Lifecycle,
    TransientError,
    Paused,
    #[strum(default)]
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Event {
    pub ty: EventType,
    pub metadata: HashMap<String, ByteString>,
}
