// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Derives the status the console shows for an invocation. `sys_invocation`
//! reports terminal invocations as `completed` plus a completion column pair;
//! cancellations and kills arrive as failed completions with well-known
//! messages and are told apart here. Combinations outside the documented set
//! are an explicit error: guessing a status would mislead an operator.

use std::str::FromStr;

use restate_console_types::errors::{Failure, codes};
use restate_console_types::invocation::{
    CompletionSummary, InvocationStatus, InvocationStatusView, InvocationSummary,
};

/// Failure messages the runtime writes for a cancelled invocation.
const CANCELLED_MESSAGES: [&str; 4] = [
    "[409] canceled",
    "[409] cancelled",
    "[409 aborted] canceled",
    "[409 aborted] cancelled",
];

/// Failure messages the runtime writes for a killed invocation.
const KILLED_MESSAGES: [&str; 2] = ["[409] killed", "[409 aborted] killed"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatusClassificationError {
    #[error("unknown invocation status '{0}'")]
    UnknownStatus(String),
    #[error("invocation reported as completed without a completion result")]
    CompletedWithoutResult,
}

/// Classifies one invocation summary into the status view.
pub fn classify_status(
    summary: &InvocationSummary,
) -> Result<InvocationStatusView, StatusClassificationError> {
    classify(
        &summary.status,
        summary.completion.as_ref(),
        summary.retry_count,
        summary.last_failure.as_deref(),
    )
}

pub fn classify(
    raw_status: &str,
    completion: Option<&CompletionSummary>,
    retry_count: u64,
    last_failure: Option<&str>,
) -> Result<InvocationStatusView, StatusClassificationError> {
    if raw_status.eq_ignore_ascii_case("completed") {
        let status = match completion {
            Some(CompletionSummary::Success) => InvocationStatus::Succeeded,
            Some(CompletionSummary::Failure(message)) => classify_failure_message(message),
            None => return Err(StatusClassificationError::CompletedWithoutResult),
        };
        return Ok(InvocationStatusView {
            status,
            is_retrying: false,
        });
    }

    let status = InvocationStatus::from_str(raw_status)
        .map_err(|_| StatusClassificationError::UnknownStatus(raw_status.to_owned()))?;
    let is_retrying = status == InvocationStatus::BackingOff
        || (retry_count > 1 && status == InvocationStatus::Running && last_failure.is_some());
    Ok(InvocationStatusView {
        status,
        is_retrying,
    })
}

fn classify_failure_message(message: &str) -> InvocationStatus {
    let lowered = message.to_lowercase();
    if CANCELLED_MESSAGES.iter().any(|m| lowered.contains(m)) {
        InvocationStatus::Cancelled
    } else if KILLED_MESSAGES.iter().any(|m| lowered.contains(m)) {
        InvocationStatus::Killed
    } else {
        InvocationStatus::Failed
    }
}

/// Parses a failure back out of its `[{code}] {message}` display form, as
/// carried by the `last_failure` and `completion_failure` columns. Strings
/// not in that form come back whole, coded as an internal error.
pub(crate) fn parse_failure_column(column: &str) -> Failure {
    if let Some(rest) = column.strip_prefix('[') {
        if let Some((code, message)) = rest.split_once("] ") {
            if let Ok(code) = code.parse::<u16>() {
                return Failure::new(code, message.to_owned());
            }
        }
    }
    Failure::new(codes::INTERNAL, column.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    use googletest::prelude::*;
    use rstest::rstest;

    #[test]
    fn completed_with_cancellation_failure_is_cancelled() {
        let view = classify(
            "completed",
            Some(&CompletionSummary::Failure("[409] canceled".to_owned())),
            0,
            None,
        )
        .unwrap();
        assert_that!(view.status, eq(InvocationStatus::Cancelled));
        assert_that!(view.is_retrying, eq(false));
    }

    #[rstest]
    #[case("[409] cancelled", InvocationStatus::Cancelled)]
    #[case("[409 Aborted] Canceled", InvocationStatus::Cancelled)]
    #[case("[409] killed", InvocationStatus::Killed)]
    #[case("[409 aborted] killed", InvocationStatus::Killed)]
    #[case("[500] boom", InvocationStatus::Failed)]
    fn failure_message_patterns(#[case] message: &str, #[case] expected: InvocationStatus) {
        let view = classify(
            "completed",
            Some(&CompletionSummary::Failure(message.to_owned())),
            0,
            None,
        )
        .unwrap();
        assert_that!(view.status, eq(expected));
    }

    #[test]
    fn completed_success_is_succeeded() {
        let view = classify("completed", Some(&CompletionSummary::Success), 3, None).unwrap();
        assert_that!(view.status, eq(InvocationStatus::Succeeded));
    }

    #[test]
    fn backing_off_keeps_its_raw_status_and_retries() {
        let view = classify("backing-off", None, 1, Some("[500] boom")).unwrap();
        assert_that!(view.status, eq(InvocationStatus::BackingOff));
        assert_that!(view.is_retrying, eq(true));
    }

    #[test]
    fn running_with_repeated_failures_is_retrying() {
        let view = classify("running", None, 2, Some("[500] boom")).unwrap();
        assert_that!(view.status, eq(InvocationStatus::Running));
        assert_that!(view.is_retrying, eq(true));

        // A first attempt with no recorded failure is a plain run.
        let view = classify("running", None, 1, None).unwrap();
        assert_that!(view.is_retrying, eq(false));
    }

    // Every status tag the table can emit classifies without an error.
    #[rstest]
    fn total_over_documented_statuses(
        #[values(
            "pending",
            "ready",
            "scheduled",
            "running",
            "suspended",
            "backing-off",
            "paused"
        )]
        raw_status: &str,
    ) {
        assert_that!(classify(raw_status, None, 0, None), ok(anything()));
    }

    #[test]
    fn unknown_status_is_an_explicit_error() {
        assert_that!(
            classify("hibernating", None, 0, None),
            err(eq(&StatusClassificationError::UnknownStatus(
                "hibernating".to_owned()
            )))
        );
        assert_that!(
            classify("completed", None, 0, None),
            err(eq(&StatusClassificationError::CompletedWithoutResult))
        );
    }

    #[test]
    fn failure_column_roundtrip() {
        let failure = parse_failure_column("[409] canceled");
        assert_that!(u16::from(failure.code), eq(409));
        assert_that!(&*failure.message, eq("canceled"));

        let failure = parse_failure_column("no brackets here");
        assert_that!(u16::from(failure.code), eq(500));
    }
}
