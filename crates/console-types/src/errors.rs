// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt;

use bytestring::ByteString;

pub type GenericError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error codes used by the runtime, aligned with HTTP status code semantics.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct InvocationErrorCode(u16);

impl InvocationErrorCode {
    pub const fn new(code: u16) -> Self {
        InvocationErrorCode(code)
    }

    pub const fn code(self) -> u16 {
        self.0
    }
}

impl fmt::Display for InvocationErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u16> for InvocationErrorCode {
    fn from(value: u16) -> Self {
        InvocationErrorCode(value)
    }
}

impl From<u32> for InvocationErrorCode {
    fn from(value: u32) -> Self {
        value
            .try_into()
            .map(InvocationErrorCode)
            .unwrap_or(codes::INTERNAL)
    }
}

impl From<InvocationErrorCode> for u16 {
    fn from(value: InvocationErrorCode) -> Self {
        value.0
    }
}

impl From<InvocationErrorCode> for u32 {
    fn from(value: InvocationErrorCode) -> Self {
        value.0 as u32
    }
}

pub mod codes {
    use super::InvocationErrorCode;

    pub const BAD_REQUEST: InvocationErrorCode = InvocationErrorCode(400);
    pub const NOT_FOUND: InvocationErrorCode = InvocationErrorCode(404);
    pub const CONFLICT: InvocationErrorCode = InvocationErrorCode(409);
    pub const INTERNAL: InvocationErrorCode = InvocationErrorCode(500);
    pub const ABORTED: InvocationErrorCode = InvocationErrorCode(409);
}

/// A failure outcome recorded in the journal, either as the result of a
/// command or as the terminal result of the whole invocation.
#[derive(
    Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize, thiserror::Error,
)]
#[error("[{code}] {message}")]
pub struct Failure {
    pub code: InvocationErrorCode,
    pub message: ByteString,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metadata: Vec<FailureMetadata>,
}

impl Failure {
    pub fn new(code: impl Into<InvocationErrorCode>, message: impl Into<ByteString>) -> Self {
        Failure {
            code: code.into(),
            message: message.into(),
            metadata: vec![],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FailureMetadata {
    pub key: ByteString,
    pub value: ByteString,
}

#[cfg(test)]
mod tests {
    use super::*;

    use googletest::prelude::*;

    #[test]
    fn failure_display_carries_code_and_message() {
        let failure = Failure::new(409u16, "canceled");
        assert_that!(failure.to_string(), eq("[409] canceled"));
    }

    #[test]
    fn failure_json_shape() {
        let failure: Failure =
            serde_json::from_str(r#"{"code":500,"message":"boom"}"#).unwrap();
        assert_that!(failure, eq(&Failure::new(500u16, "boom")));
    }
}
