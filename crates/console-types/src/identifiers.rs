// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Identifiers as the console sees them: strings produced by the runtime,
//! validated by prefix and passed back verbatim in queries. The console never
//! needs to open them up into partition keys or raw bytes.

use std::fmt;
use std::str::FromStr;

use bytestring::ByteString;

/// Index of an entry in the per-invocation journal.
pub type EntryIndex = u32;

/// Sequence number among the Command rows of a journal, skipping
/// notifications and events.
pub type CommandIndex = u32;

/// Identifies a completion within a journal. Commands carry the id they
/// expect their completion to be delivered under.
pub type CompletionId = u32;

const INVOCATION_ID_PREFIX: &str = "inv_";
const AWAKEABLE_ID_PREFIX: &str = "prom_1";
const SIGNAL_ID_PREFIX: &str = "sign_1";

#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum IdDecodeError {
    #[error("id is empty")]
    Empty,
    #[error("unexpected id format: '{0}'")]
    Format(String),
}

/// An invocation id, e.g. `inv_1gdJBtdVEcM942bjcDmb1c1khoaJe11Hbz`.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde_with::SerializeDisplay,
    serde_with::DeserializeFromStr,
)]
pub struct InvocationId(ByteString);

impl InvocationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for InvocationId {
    type Err = IdDecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(IdDecodeError::Empty);
        }
        if !s.starts_with(INVOCATION_ID_PREFIX) || s.len() == INVOCATION_ID_PREFIX.len() {
            return Err(IdDecodeError::Format(s.to_owned()));
        }
        Ok(InvocationId(ByteString::from(s)))
    }
}

impl fmt::Display for InvocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Id of an awakeable, in either generation: `prom_1…` ids minted by the old
/// protocol, `sign_1…` ids minted by the current one. The target invocation
/// id and entry index stay encoded inside; the console treats the whole id as
/// an opaque handle to display and to pass to the completion API.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    serde_with::SerializeDisplay,
    serde_with::DeserializeFromStr,
)]
pub struct AwakeableId(ByteString);

impl AwakeableId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for ids minted by the current protocol generation.
    pub fn is_signal(&self) -> bool {
        self.0.starts_with(SIGNAL_ID_PREFIX)
    }
}

impl FromStr for AwakeableId {
    type Err = IdDecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(IdDecodeError::Empty);
        }
        if !s.starts_with(AWAKEABLE_ID_PREFIX) && !s.starts_with(SIGNAL_ID_PREFIX) {
            return Err(IdDecodeError::Format(s.to_owned()));
        }
        Ok(AwakeableId(ByteString::from(s)))
    }
}

impl fmt::Display for AwakeableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Id of a keyed service instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ServiceId {
    pub service_name: ByteString,
    pub key: ByteString,
}

impl ServiceId {
    pub fn new(service_name: impl Into<ByteString>, key: impl Into<ByteString>) -> Self {
        Self {
            service_name: service_name.into(),
            key: key.into(),
        }
    }
}

/// Id of an idempotent request against a specific handler.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct IdempotencyId {
    pub service_name: ByteString,
    pub service_key: Option<ByteString>,
    pub service_handler: ByteString,
    pub idempotency_key: ByteString,
}

impl IdempotencyId {
    pub fn new(
        service_name: impl Into<ByteString>,
        service_key: Option<ByteString>,
        service_handler: impl Into<ByteString>,
        idempotency_key: impl Into<ByteString>,
    ) -> Self {
        Self {
            service_name: service_name.into(),
            service_key,
            service_handler: service_handler.into(),
            idempotency_key: idempotency_key.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use googletest::prelude::*;
    use rstest::rstest;

    #[test]
    fn invocation_id_roundtrip() {
        let id: InvocationId = "inv_1gdJBtdVEcM942bjcDmb1c1khoaJe11Hbz".parse().unwrap();
        assert_that!(
            id.to_string(),
            eq("inv_1gdJBtdVEcM942bjcDmb1c1khoaJe11Hbz")
        );
        let json = serde_json::to_string(&id).unwrap();
        assert_that!(
            serde_json::from_str::<InvocationId>(&json).unwrap(),
            eq(&id)
        );
    }

    #[rstest]
    #[case("")]
    #[case("inv_")]
    #[case("not-an-id")]
    fn invalid_invocation_ids(#[case] input: &str) {
        assert_that!(input.parse::<InvocationId>(), err(anything()));
    }

    #[rstest]
    #[case("prom_1i3dS69dEG5SS0XRLjlhq9JMRPprovXnZB0AAAAQ", false)]
    #[case("sign_1i3dS69dEG5SS0XRLjlhq9JMRPprovXnZB0AAABB", true)]
    fn awakeable_ids(#[case] input: &str, #[case] is_signal: bool) {
        let id: AwakeableId = input.parse().unwrap();
        assert_that!(id.is_signal(), eq(is_signal));
        assert_that!(id.to_string(), eq(input));
    }
}
