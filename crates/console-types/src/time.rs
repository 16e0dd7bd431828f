// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt::{Display, Formatter};
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Local, TimeZone, Utc};

/// Milliseconds since the unix epoch. This is the representation the runtime
/// uses for wake-up times and entry append times on the wire.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct MillisSinceEpoch(u64);

impl MillisSinceEpoch {
    pub const UNIX_EPOCH: MillisSinceEpoch = MillisSinceEpoch::new(0);
    pub const MAX: MillisSinceEpoch = MillisSinceEpoch::new(u64::MAX);

    pub const fn new(millis_since_epoch: u64) -> Self {
        MillisSinceEpoch(millis_since_epoch)
    }

    pub fn now() -> Self {
        SystemTime::now().into()
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Conversion to a wall-clock timestamp. `None` when the value does not
    /// fit chrono's representable range (e.g. `MillisSinceEpoch::MAX`).
    pub fn to_datetime(&self) -> Option<DateTime<Local>> {
        let millis = i64::try_from(self.0).ok()?;
        match Utc.timestamp_millis_opt(millis) {
            chrono::LocalResult::Single(dt) => Some(dt.with_timezone(&Local)),
            _ => None,
        }
    }
}

impl From<u64> for MillisSinceEpoch {
    fn from(value: u64) -> Self {
        MillisSinceEpoch::new(value)
    }
}

impl From<SystemTime> for MillisSinceEpoch {
    fn from(value: SystemTime) -> Self {
        MillisSinceEpoch::new(
            u64::try_from(
                value
                    .duration_since(SystemTime::UNIX_EPOCH)
                    .unwrap_or(Duration::ZERO)
                    .as_millis(),
            )
            .unwrap_or(u64::MAX),
        )
    }
}

impl<T: TimeZone> From<DateTime<T>> for MillisSinceEpoch {
    fn from(value: DateTime<T>) -> Self {
        MillisSinceEpoch::new(u64::try_from(value.timestamp_millis()).unwrap_or(0))
    }
}

impl Display for MillisSinceEpoch {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ms since epoch", self.0)
    }
}
