// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Invocation-level model: targets, the summary record read from
//! `sys_invocation`, and the status view derived from it.

use std::fmt;

use bytestring::ByteString;
use chrono::{DateTime, Local};

use crate::identifiers::InvocationId;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum VirtualObjectHandlerType {
    Exclusive,
    Shared,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum WorkflowHandlerType {
    Workflow,
    Shared,
}

/// The target of an invocation or of a call journaled by one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum InvocationTarget {
    Service {
        name: ByteString,
        handler: ByteString,
    },
    VirtualObject {
        name: ByteString,
        key: ByteString,
        handler: ByteString,
        handler_ty: VirtualObjectHandlerType,
    },
    Workflow {
        name: ByteString,
        key: ByteString,
        handler: ByteString,
        handler_ty: WorkflowHandlerType,
    },
}

impl InvocationTarget {
    pub fn service(name: impl Into<ByteString>, handler: impl Into<ByteString>) -> Self {
        Self::Service {
            name: name.into(),
            handler: handler.into(),
        }
    }

    pub fn virtual_object(
        name: impl Into<ByteString>,
        key: impl Into<ByteString>,
        handler: impl Into<ByteString>,
        handler_ty: VirtualObjectHandlerType,
    ) -> Self {
        Self::VirtualObject {
            name: name.into(),
            key: key.into(),
            handler: handler.into(),
            handler_ty,
        }
    }

    pub fn service_name(&self) -> &ByteString {
        match self {
            InvocationTarget::Service { name, .. }
            | InvocationTarget::VirtualObject { name, .. }
            | InvocationTarget::Workflow { name, .. } => name,
        }
    }

    pub fn handler_name(&self) -> &ByteString {
        match self {
            InvocationTarget::Service { handler, .. }
            | InvocationTarget::VirtualObject { handler, .. }
            | InvocationTarget::Workflow { handler, .. } => handler,
        }
    }

    pub fn key(&self) -> Option<&ByteString> {
        match self {
            InvocationTarget::Service { .. } => None,
            InvocationTarget::VirtualObject { key, .. }
            | InvocationTarget::Workflow { key, .. } => Some(key),
        }
    }
}

impl fmt::Display for InvocationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/", self.service_name())?;
        if let Some(key) = self.key() {
            write!(f, "{key}/")?;
        }
        write!(f, "{}", self.handler_name())
    }
}

/// A header journaled with a call or forwarded from the ingress.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Header {
    pub name: ByteString,
    pub value: ByteString,
}

impl Header {
    pub fn new(name: impl Into<ByteString>, value: impl Into<ByteString>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}

/// Terminal result of an invocation, parsed from the `completion_result` and
/// `completion_failure` column pair of `sys_invocation`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionSummary {
    Success,
    Failure(String),
}

impl CompletionSummary {
    pub fn from_sql(
        completion_result: Option<String>,
        completion_failure: Option<String>,
    ) -> Option<Self> {
        match completion_result.as_deref() {
            Some("success") => Some(CompletionSummary::Success),
            Some("failure") => Some(CompletionSummary::Failure(
                completion_failure.unwrap_or_default(),
            )),
            // Invocation not completed yet, or pre-1.1 row without the column.
            _ => None,
        }
    }
}

/// One invocation as the console lists it, read from `sys_invocation` joined
/// with the in-flight state columns.
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationSummary {
    pub id: InvocationId,
    pub target: String,
    /// Raw status tag as reported by the table, e.g. `backing-off`.
    pub status: String,
    pub completion: Option<CompletionSummary>,
    pub retry_count: u64,
    pub last_failure: Option<String>,
    pub last_failure_related_command_index: Option<u64>,
    pub last_failure_related_command_name: Option<String>,
    pub last_failure_related_command_type: Option<String>,
    pub next_retry_at: Option<DateTime<Local>>,
    pub created_at: Option<DateTime<Local>>,
    pub modified_at: Option<DateTime<Local>>,
    pub inboxed_at: Option<DateTime<Local>>,
    pub scheduled_at: Option<DateTime<Local>>,
    pub running_at: Option<DateTime<Local>>,
    pub completed_at: Option<DateTime<Local>>,
    pub journal_size: Option<u32>,
    pub journal_commands_size: Option<u32>,
}

/// Status of an invocation as the console presents it. In-flight statuses
/// pass through from the table; terminal ones are derived from the completion
/// columns.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    serde::Serialize,
    serde::Deserialize,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum InvocationStatus {
    Pending,
    Ready,
    Scheduled,
    Running,
    Suspended,
    BackingOff,
    Paused,
    Succeeded,
    Failed,
    Cancelled,
    Killed,
}

impl InvocationStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            InvocationStatus::Succeeded
                | InvocationStatus::Failed
                | InvocationStatus::Cancelled
                | InvocationStatus::Killed
        )
    }
}

/// What the journal view shows in the header: the effective status plus
/// whether the invocation is currently in a retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct InvocationStatusView {
    pub status: InvocationStatus,
    pub is_retrying: bool,
}
