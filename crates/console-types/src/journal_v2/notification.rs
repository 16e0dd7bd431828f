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

use bytes::Bytes;
use bytestring::ByteString;

use crate::errors::Failure;
use crate::identifiers::{CompletionId, InvocationId};
use crate::journal_v2::{CompletionType, NotificationType};

pub type SignalIndex = u32;
pub type SignalName = ByteString;

/// See [`Notification`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum NotificationId {
    CompletionId(CompletionId),
    SignalIndex(SignalIndex),
    SignalName(SignalName),
}

impl NotificationId {
    pub const fn for_completion(id: CompletionId) -> Self {
        Self::CompletionId(id)
    }

    pub fn for_signal(signal_id: SignalId) -> Self {
        match signal_id {
            SignalId::Index(idx) => NotificationId::SignalIndex(idx),
            SignalId::Name(n) => NotificationId::SignalName(n),
        }
    }
}

impl From<SignalId> for NotificationId {
    fn from(value: SignalId) -> Self {
        NotificationId::for_signal(value)
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationId::SignalIndex(idx) => write!(f, "SignalIndex: {idx}"),
            NotificationId::SignalName(name) => write!(f, "SignalName: {name}"),
            NotificationId::CompletionId(idx) => write!(f, "CompletionId: {idx}"),
        }
    }
}

/// The asynchronous result of a prior command, or an out-of-band signal.
#[derive(
    Debug, Clone, PartialEq, Eq, derive_more::From, serde::Serialize, serde::Deserialize,
)]
pub enum Notification {
    Completion(Completion),
    Signal(Signal),
}

impl Notification {
    pub fn ty(&self) -> NotificationType {
        match self {
            Notification::Completion(completion) => {
                NotificationType::Completion(completion.ty())
            }
            Notification::Signal(_) => NotificationType::Signal,
        }
    }

    pub fn id(&self) -> NotificationId {
        match self {
            Notification::Completion(completion) => {
                NotificationId::CompletionId(completion.completion_id())
            }
            Notification::Signal(signal) => signal.id.clone().into(),
        }
    }
}

#[derive(
    Debug, Clone, PartialEq, Eq, derive_more::From, serde::Serialize, serde::Deserialize,
)]
pub enum Completion {
    GetLazyState(GetLazyStateCompletion),
    GetLazyStateKeys(GetLazyStateKeysCompletion),
    GetPromise(GetPromiseCompletion),
    PeekPromise(PeekPromiseCompletion),
    CompletePromise(CompletePromiseCompletion),
    Sleep(SleepCompletion),
    CallInvocationId(CallInvocationIdCompletion),
    Call(CallCompletion),
    Run(RunCompletion),
    AttachInvocation(AttachInvocationCompletion),
    GetInvocationOutput(GetInvocationOutputCompletion),
}

impl Completion {
    pub fn ty(&self) -> CompletionType {
        match self {
            Completion::GetLazyState(_) => CompletionType::GetLazyState,
            Completion::GetLazyStateKeys(_) => CompletionType::GetLazyStateKeys,
            Completion::GetPromise(_) => CompletionType::GetPromise,
            Completion::PeekPromise(_) => CompletionType::PeekPromise,
            Completion::CompletePromise(_) => CompletionType::CompletePromise,
            Completion::Sleep(_) => CompletionType::Sleep,
            Completion::CallInvocationId(_) => CompletionType::CallInvocationId,
            Completion::Call(_) => CompletionType::Call,
            Completion::Run(_) => CompletionType::Run,
            Completion::AttachInvocation(_) => CompletionType::AttachInvocation,
            Completion::GetInvocationOutput(_) => CompletionType::GetInvocationOutput,
        }
    }

    pub fn completion_id(&self) -> CompletionId {
        match self {
            Completion::GetLazyState(c) => c.completion_id,
            Completion::GetLazyStateKeys(c) => c.completion_id,
            Completion::GetPromise(c) => c.completion_id,
            Completion::PeekPromise(c) => c.completion_id,
            Completion::CompletePromise(c) => c.completion_id,
            Completion::Sleep(c) => c.completion_id,
            Completion::CallInvocationId(c) => c.completion_id,
            Completion::Call(c) => c.completion_id,
            Completion::Run(c) => c.completion_id,
            Completion::AttachInvocation(c) => c.completion_id,
            Completion::GetInvocationOutput(c) => c.completion_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GetLazyStateCompletion {
    pub completion_id: CompletionId,
    pub result: GetStateResult,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum GetStateResult {
    Void,
    Success(Bytes),
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GetLazyStateKeysCompletion {
    pub completion_id: CompletionId,
    pub state_keys: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GetPromiseCompletion {
    pub completion_id: CompletionId,
    pub result: GetPromiseResult,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum GetPromiseResult {
    Success(Bytes),
    Failure(Failure),
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PeekPromiseCompletion {
    pub completion_id: CompletionId,
    pub result: PeekPromiseResult,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PeekPromiseResult {
    Void,
    Success(Bytes),
    Failure(Failure),
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CompletePromiseCompletion {
    pub completion_id: CompletionId,
    pub result: CompletePromiseResult,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CompletePromiseResult {
    Void,
    Failure(Failure),
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SleepCompletion {
    pub completion_id: CompletionId,
}

/// Carries the callee invocation id back to a `Call`/`OneWayCall` command.
/// Plumbing for the runtime, not something an operator acts on.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CallInvocationIdCompletion {
    pub completion_id: CompletionId,
    pub invocation_id: InvocationId,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CallCompletion {
    pub completion_id: CompletionId,
    pub result: CallResult,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CallResult {
    Success(Bytes),
    Failure(Failure),
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RunCompletion {
    pub completion_id: CompletionId,
    pub result: RunResult,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RunResult {
    Success(Bytes),
    Failure(Failure),
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AttachInvocationCompletion {
    pub completion_id: CompletionId,
    pub result: AttachInvocationResult,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AttachInvocationResult {
    Success(Bytes),
    Failure(Failure),
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GetInvocationOutputCompletion {
    pub completion_id: CompletionId,
    pub result: GetInvocationOutputResult,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum GetInvocationOutputResult {
    Void,
    Success(Bytes),
    Failure(Failure),
}

// Signal

#[repr(u32)]
#[derive(Debug, strum::FromRepr)]
pub enum BuiltInSignal {
    Cancel = 1,
}

pub const CANCEL_NOTIFICATION_ID: NotificationId =
    NotificationId::SignalIndex(BuiltInSignal::Cancel as u32);

/// Signal index carrying an externally resolved awakeable back into the
/// journal. Indexes below this are reserved for built-ins.
pub const EXTERNAL_AWAKEABLE_SIGNAL_INDEX: SignalIndex = 17;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SignalId {
    Index(SignalIndex),
    Name(SignalName),
}

impl fmt::Display for SignalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalId::Index(idx) => {
                if let Some(built_in_signal) = BuiltInSignal::from_repr(*idx) {
                    write!(f, "{built_in_signal:?}")
                } else {
                    write!(f, "index {idx}")
                }
            }
            SignalId::Name(name) => write!(f, "{name}"),
        }
    }
}

impl SignalId {
    pub const fn for_builtin_signal(signal: BuiltInSignal) -> Self {
        Self::for_index(signal as u32)
    }

    pub const fn for_index(id: SignalIndex) -> Self {
        Self::Index(id)
    }

    pub fn for_name(id: SignalName) -> Self {
        Self::Name(id)
    }

    pub fn index(&self) -> Option<SignalIndex> {
        match self {
            SignalId::Index(idx) => Some(*idx),
            SignalId::Name(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Signal {
    pub id: SignalId,
    pub result: SignalResult,
}

impl Signal {
    pub const fn new(id: SignalId, result: SignalResult) -> Self {
        Self { id, result }
    }

    pub fn is_cancel(&self) -> bool {
        self.id.index() == Some(BuiltInSignal::Cancel as u32)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SignalResult {
    Void,
    Success(Bytes),
    Failure(Failure),
}
