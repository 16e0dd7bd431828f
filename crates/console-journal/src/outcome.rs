// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Uniform success/failure/void shape for everything a command can return.
//! Every entry builder funnels its result through [`Outcome`], whichever wire
//! generation or result enum it came from.

use bytes::Bytes;

use restate_console_types::errors::Failure;
use restate_console_types::journal_v2::{
    CallResult, Completion, CompleteAwakeableResult, CompletePromiseResult,
    GetInvocationOutputResult, GetPromiseResult, GetStateResult, OutputResult, PeekPromiseResult,
    RunResult, SignalResult,
};

use crate::decode::bytes_to_base64;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ResultType {
    Success,
    Failure,
    Void,
}

/// A normalized command result. At most one of `value`/`failure` is set;
/// both absent means the command completed with no payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Outcome {
    /// Result bytes, base64-encoded for display.
    pub value: Option<String>,
    pub failure: Option<Failure>,
}

impl Outcome {
    pub fn success(bytes: &Bytes) -> Self {
        Outcome {
            value: Some(bytes_to_base64(bytes)),
            failure: None,
        }
    }

    pub fn failure(failure: Failure) -> Self {
        Outcome {
            value: None,
            failure: Some(failure),
        }
    }

    pub fn void() -> Self {
        Outcome::default()
    }

    pub fn result_type(&self) -> ResultType {
        match (&self.value, &self.failure) {
            (Some(_), _) => ResultType::Success,
            (None, Some(_)) => ResultType::Failure,
            (None, None) => ResultType::Void,
        }
    }
}

impl From<&OutputResult> for Outcome {
    fn from(result: &OutputResult) -> Self {
        match result {
            OutputResult::Success(bytes) => Outcome::success(bytes),
            OutputResult::Failure(failure) => Outcome::failure(failure.clone()),
        }
    }
}

impl From<&GetStateResult> for Outcome {
    fn from(result: &GetStateResult) -> Self {
        match result {
            GetStateResult::Void => Outcome::void(),
            GetStateResult::Success(bytes) => Outcome::success(bytes),
        }
    }
}

impl From<&GetPromiseResult> for Outcome {
    fn from(result: &GetPromiseResult) -> Self {
        match result {
            GetPromiseResult::Success(bytes) => Outcome::success(bytes),
            GetPromiseResult::Failure(failure) => Outcome::failure(failure.clone()),
        }
    }
}

impl From<&PeekPromiseResult> for Outcome {
    fn from(result: &PeekPromiseResult) -> Self {
        match result {
            PeekPromiseResult::Void => Outcome::void(),
            PeekPromiseResult::Success(bytes) => Outcome::success(bytes),
            PeekPromiseResult::Failure(failure) => Outcome::failure(failure.clone()),
        }
    }
}

impl From<&CompletePromiseResult> for Outcome {
    fn from(result: &CompletePromiseResult) -> Self {
        match result {
            CompletePromiseResult::Void => Outcome::void(),
            CompletePromiseResult::Failure(failure) => Outcome::failure(failure.clone()),
        }
    }
}

impl From<&CallResult> for Outcome {
    fn from(result: &CallResult) -> Self {
        match result {
            CallResult::Success(bytes) => Outcome::success(bytes),
            CallResult::Failure(failure) => Outcome::failure(failure.clone()),
        }
    }
}

impl From<&RunResult> for Outcome {
    fn from(result: &RunResult) -> Self {
        match result {
            RunResult::Success(bytes) => Outcome::success(bytes),
            RunResult::Failure(failure) => Outcome::failure(failure.clone()),
        }
    }
}

impl From<&restate_console_types::journal_v2::AttachInvocationResult> for Outcome {
    fn from(result: &restate_console_types::journal_v2::AttachInvocationResult) -> Self {
        use restate_console_types::journal_v2::AttachInvocationResult;
        match result {
            AttachInvocationResult::Success(bytes) => Outcome::success(bytes),
            AttachInvocationResult::Failure(failure) => Outcome::failure(failure.clone()),
        }
    }
}

impl From<&GetInvocationOutputResult> for Outcome {
    fn from(result: &GetInvocationOutputResult) -> Self {
        match result {
            GetInvocationOutputResult::Void => Outcome::void(),
            GetInvocationOutputResult::Success(bytes) => Outcome::success(bytes),
            GetInvocationOutputResult::Failure(failure) => Outcome::failure(failure.clone()),
        }
    }
}

impl From<&SignalResult> for Outcome {
    fn from(result: &SignalResult) -> Self {
        match result {
            SignalResult::Void => Outcome::void(),
            SignalResult::Success(bytes) => Outcome::success(bytes),
            SignalResult::Failure(failure) => Outcome::failure(failure.clone()),
        }
    }
}

impl From<&CompleteAwakeableResult> for Outcome {
    fn from(result: &CompleteAwakeableResult) -> Self {
        match result {
            CompleteAwakeableResult::Success(bytes) => Outcome::success(bytes),
            CompleteAwakeableResult::Failure(failure) => Outcome::failure(failure.clone()),
        }
    }
}

/// The outcome a completion notification delivers to its command. Sleep and
/// `CallInvocationId` completions carry no user-visible payload.
pub fn completion_outcome(completion: &Completion) -> Outcome {
    match completion {
        Completion::GetLazyState(c) => Outcome::from(&c.result),
        // State keys travel through the `keys` payload field, not as bytes.
        Completion::GetLazyStateKeys(_) => Outcome::void(),
        Completion::GetPromise(c) => Outcome::from(&c.result),
        Completion::PeekPromise(c) => Outcome::from(&c.result),
        Completion::CompletePromise(c) => Outcome::from(&c.result),
        Completion::Sleep(_) => Outcome::void(),
        Completion::CallInvocationId(_) => Outcome::void(),
        Completion::Call(c) => Outcome::from(&c.result),
        Completion::Run(c) => Outcome::from(&c.result),
        Completion::AttachInvocation(c) => Outcome::from(&c.result),
        Completion::GetInvocationOutput(c) => Outcome::from(&c.result),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use googletest::prelude::*;
    use restate_console_types::errors::Failure as TypesFailure;

    #[test]
    fn at_most_one_of_value_and_failure() {
        let success = Outcome::success(&Bytes::from_static(&[1, 2, 3]));
        assert_that!(success.result_type(), eq(ResultType::Success));
        assert_that!(success.failure, none());
        assert_that!(success.value, some(eq("AQID")));

        let failure = Outcome::failure(TypesFailure::new(500u16, "boom"));
        assert_that!(failure.result_type(), eq(ResultType::Failure));
        assert_that!(failure.value, none());

        let void = Outcome::void();
        assert_that!(void.result_type(), eq(ResultType::Void));
        assert_that!(void.value, none());
        assert_that!(void.failure, none());
    }

    #[test]
    fn void_results_normalize_to_void() {
        assert_that!(
            Outcome::from(&GetStateResult::Void).result_type(),
            eq(ResultType::Void)
        );
        assert_that!(
            Outcome::from(&PeekPromiseResult::Void).result_type(),
            eq(ResultType::Void)
        );
    }

    #[test]
    fn sleep_completion_is_void() {
        use restate_console_types::journal_v2::SleepCompletion;
        let outcome =
            completion_outcome(&Completion::Sleep(SleepCompletion { completion_id: 9 }));
        assert_that!(outcome.result_type(), eq(ResultType::Void));
    }
}
