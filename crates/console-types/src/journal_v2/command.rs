// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use bytes::Bytes;
use bytestring::ByteString;

use crate::errors::Failure;
use crate::identifiers::{AwakeableId, CompletionId, InvocationId};
use crate::invocation::{Header, InvocationTarget};
use crate::journal_v2::notification::{GetStateResult, SignalId, SignalResult};
use crate::journal_v2::{AttachInvocationTarget, CommandType};
use crate::time::MillisSinceEpoch;

/// A user-visible effect requested by the service, in journal order.
#[derive(
    Debug, Clone, PartialEq, Eq, derive_more::From, serde::Serialize, serde::Deserialize,
)]
pub enum Command {
    Input(InputCommand),
    Output(OutputCommand),
    GetLazyState(GetLazyStateCommand),
    SetState(SetStateCommand),
    ClearState(ClearStateCommand),
    ClearAllState(ClearAllStateCommand),
    GetLazyStateKeys(GetLazyStateKeysCommand),
    GetEagerState(GetEagerStateCommand),
    GetEagerStateKeys(GetEagerStateKeysCommand),
    GetPromise(GetPromiseCommand),
    PeekPromise(PeekPromiseCommand),
    CompletePromise(CompletePromiseCommand),
    Sleep(SleepCommand),
    Call(CallCommand),
    OneWayCall(OneWayCallCommand),
    SendSignal(SendSignalCommand),
    Run(RunCommand),
    AttachInvocation(AttachInvocationCommand),
    GetInvocationOutput(GetInvocationOutputCommand),
    CompleteAwakeable(CompleteAwakeableCommand),
}

impl Command {
    pub fn ty(&self) -> CommandType {
        match self {
            Command::Input(_) => CommandType::Input,
            Command::Output(_) => CommandType::Output,
            Command::GetLazyState(_) => CommandType::GetLazyState,
            Command::SetState(_) => CommandType::SetState,
            Command::ClearState(_) => CommandType::ClearState,
            Command::ClearAllState(_) => CommandType::ClearAllState,
            Command::GetLazyStateKeys(_) => CommandType::GetLazyStateKeys,
            Command::GetEagerState(_) => CommandType::GetEagerState,
            Command::GetEagerStateKeys(_) => CommandType::GetEagerStateKeys,
            Command::GetPromise(_) => CommandType::GetPromise,
            Command::PeekPromise(_) => CommandType::PeekPromise,
            Command::CompletePromise(_) => CommandType::CompletePromise,
            Command::Sleep(_) => CommandType::Sleep,
            Command::Call(_) => CommandType::Call,
            Command::OneWayCall(_) => CommandType::OneWayCall,
            Command::SendSignal(_) => CommandType::SendSignal,
            Command::Run(_) => CommandType::Run,
            Command::AttachInvocation(_) => CommandType::AttachInvocation,
            Command::GetInvocationOutput(_) => CommandType::GetInvocationOutput,
            Command::CompleteAwakeable(_) => CommandType::CompleteAwakeable,
        }
    }

    pub fn name(&self) -> &ByteString {
        match self {
            Command::Input(cmd) => &cmd.name,
            Command::Output(cmd) => &cmd.name,
            Command::GetLazyState(cmd) => &cmd.name,
            Command::SetState(cmd) => &cmd.name,
            Command::ClearState(cmd) => &cmd.name,
            Command::ClearAllState(cmd) => &cmd.name,
            Command::GetLazyStateKeys(cmd) => &cmd.name,
            Command::GetEagerState(cmd) => &cmd.name,
            Command::GetEagerStateKeys(cmd) => &cmd.name,
            Command::GetPromise(cmd) => &cmd.name,
            Command::PeekPromise(cmd) => &cmd.name,
            Command::CompletePromise(cmd) => &cmd.name,
            Command::Sleep(cmd) => &cmd.name,
            Command::Call(cmd) => &cmd.name,
            Command::OneWayCall(cmd) => &cmd.name,
            Command::SendSignal(cmd) => &cmd.name,
            Command::Run(cmd) => &cmd.name,
            Command::AttachInvocation(cmd) => &cmd.name,
            Command::GetInvocationOutput(cmd) => &cmd.name,
            Command::CompleteAwakeable(cmd) => &cmd.name,
        }
    }

    /// The completion id under which this command expects its result, if the
    /// command is completable.
    pub fn result_completion_id(&self) -> Option<CompletionId> {
        match self {
            Command::GetLazyState(cmd) => Some(cmd.completion_id),
            Command::GetLazyStateKeys(cmd) => Some(cmd.completion_id),
            Command::GetPromise(cmd) => Some(cmd.completion_id),
            Command::PeekPromise(cmd) => Some(cmd.completion_id),
            Command::CompletePromise(cmd) => Some(cmd.completion_id),
            Command::Sleep(cmd) => Some(cmd.completion_id),
            Command::Call(cmd) => Some(cmd.result_completion_id),
            Command::Run(cmd) => Some(cmd.completion_id),
            Command::AttachInvocation(cmd) => Some(cmd.completion_id),
            Command::GetInvocationOutput(cmd) => Some(cmd.completion_id),
            Command::Input(_)
            | Command::Output(_)
            | Command::SetState(_)
            | Command::ClearState(_)
            | Command::ClearAllState(_)
            | Command::GetEagerState(_)
            | Command::GetEagerStateKeys(_)
            | Command::OneWayCall(_)
            | Command::SendSignal(_)
            | Command::CompleteAwakeable(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct InputCommand {
    #[serde(default)]
    pub headers: Vec<Header>,
    #[serde(default)]
    pub payload: Bytes,
    #[serde(default)]
    pub name: ByteString,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OutputCommand {
    pub result: OutputResult,
    #[serde(default)]
    pub name: ByteString,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum OutputResult {
    Success(Bytes),
    Failure(Failure),
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GetLazyStateCommand {
    pub key: ByteString,
    pub completion_id: CompletionId,
    #[serde(default)]
    pub name: ByteString,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SetStateCommand {
    pub key: ByteString,
    #[serde(default)]
    pub value: Bytes,
    #[serde(default)]
    pub name: ByteString,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ClearStateCommand {
    pub key: ByteString,
    #[serde(default)]
    pub name: ByteString,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ClearAllStateCommand {
    #[serde(default)]
    pub name: ByteString,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GetLazyStateKeysCommand {
    pub completion_id: CompletionId,
    #[serde(default)]
    pub name: ByteString,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GetEagerStateCommand {
    pub key: ByteString,
    pub result: GetStateResult,
    #[serde(default)]
    pub name: ByteString,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GetEagerStateKeysCommand {
    #[serde(default)]
    pub state_keys: Vec<String>,
    #[serde(default)]
    pub name: ByteString,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GetPromiseCommand {
    pub key: ByteString,
    pub completion_id: CompletionId,
    #[serde(default)]
    pub name: ByteString,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PeekPromiseCommand {
    pub key: ByteString,
    pub completion_id: CompletionId,
    #[serde(default)]
    pub name: ByteString,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CompletePromiseCommand {
    pub key: ByteString,
    pub value: CompletePromiseValue,
    pub completion_id: CompletionId,
    #[serde(default)]
    pub name: ByteString,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CompletePromiseValue {
    Success(Bytes),
    Failure(Failure),
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SleepCommand {
    pub wake_up_time: MillisSinceEpoch,
    pub completion_id: CompletionId,
    #[serde(default)]
    pub name: ByteString,
}

/// Request shared by `Call` and `OneWayCall`. The runtime journals more
/// metadata here (span context, retention); the console only reads the
/// fields it renders, unknown ones are skipped on decode.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CallRequest {
    pub invocation_id: InvocationId,
    pub invocation_target: InvocationTarget,
    #[serde(default)]
    pub parameter: Bytes,
    #[serde(default)]
    pub headers: Vec<Header>,
    #[serde(default)]
    pub idempotency_key: Option<ByteString>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CallCommand {
    pub request: CallRequest,
    pub invocation_id_completion_id: CompletionId,
    pub result_completion_id: CompletionId,
    #[serde(default)]
    pub name: ByteString,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OneWayCallCommand {
    pub request: CallRequest,
    pub invoke_time: MillisSinceEpoch,
    pub invocation_id_completion_id: CompletionId,
    #[serde(default)]
    pub name: ByteString,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SendSignalCommand {
    pub target_invocation_id: InvocationId,
    pub signal_id: SignalId,
    pub result: SignalResult,
    #[serde(default)]
    pub name: ByteString,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RunCommand {
    pub completion_id: CompletionId,
    #[serde(default)]
    pub name: ByteString,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AttachInvocationCommand {
    pub target: AttachInvocationTarget,
    pub completion_id: CompletionId,
    #[serde(default)]
    pub name: ByteString,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GetInvocationOutputCommand {
    pub target: AttachInvocationTarget,
    pub completion_id: CompletionId,
    #[serde(default)]
    pub name: ByteString,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CompleteAwakeableCommand {
    pub id: AwakeableId,
    pub result: CompleteAwakeableResult,
    #[serde(default)]
    pub name: ByteString,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CompleteAwakeableResult {
    Success(Bytes),
    Failure(Failure),
}
