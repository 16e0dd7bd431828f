// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Lite data model, exposing fewer info about the entries.
//! The runtime fills `entry_lite_json` with this projection so queries can
//! skip full entry payloads. The console parses it when payloads were not
//! requested, so unlike the writer side this model also deserializes.

use bytestring::ByteString;

use crate::identifiers::{AwakeableId, CompletionId, InvocationId};
use crate::invocation::InvocationTarget;
use crate::journal_v2::{
    AttachInvocationTarget, CommandType, EntryType, NotificationId, NotificationType, SignalId,
};
use crate::time::MillisSinceEpoch;

#[derive(
    Debug, Clone, PartialEq, Eq, derive_more::From, serde::Serialize, serde::Deserialize,
)]
pub enum EntryLite {
    Command(CommandLite),
    Notification(NotificationLite),
}

impl EntryLite {
    pub fn ty(&self) -> EntryType {
        match self {
            EntryLite::Command(cmd) => EntryType::Command(cmd.ty()),
            EntryLite::Notification(notification) => EntryType::Notification(notification.ty),
        }
    }
}

// ---- Commands

#[derive(
    Debug, Clone, PartialEq, Eq, derive_more::From, serde::Serialize, serde::Deserialize,
)]
pub enum CommandLite {
    Input(InputCommandLite),
    Output(OutputCommandLite),
    GetLazyState(GetLazyStateCommandLite),
    SetState(SetStateCommandLite),
    ClearState(ClearStateCommandLite),
    ClearAllState(ClearAllStateCommandLite),
    GetLazyStateKeys(GetLazyStateKeysCommandLite),
    GetEagerState(GetEagerStateCommandLite),
    GetEagerStateKeys(GetEagerStateKeysCommandLite),
    GetPromise(GetPromiseCommandLite),
    PeekPromise(PeekPromiseCommandLite),
    CompletePromise(CompletePromiseCommandLite),
    Sleep(SleepCommandLite),
    Call(CallCommandLite),
    OneWayCall(OneWayCallCommandLite),
    SendSignal(SendSignalCommandLite),
    Run(RunCommandLite),
    AttachInvocation(AttachInvocationCommandLite),
    GetInvocationOutput(GetInvocationOutputCommandLite),
    CompleteAwakeable(CompleteAwakeableCommandLite),
}

impl CommandLite {
    pub fn ty(&self) -> CommandType {
        match self {
            CommandLite::Input(_) => CommandType::Input,
            CommandLite::Output(_) => CommandType::Output,
            CommandLite::GetLazyState(_) => CommandType::GetLazyState,
            CommandLite::SetState(_) => CommandType::SetState,
            CommandLite::ClearState(_) => CommandType::ClearState,
            CommandLite::ClearAllState(_) => CommandType::ClearAllState,
            CommandLite::GetLazyStateKeys(_) => CommandType::GetLazyStateKeys,
            CommandLite::GetEagerState(_) => CommandType::GetEagerState,
            CommandLite::GetEagerStateKeys(_) => CommandType::GetEagerStateKeys,
            CommandLite::GetPromise(_) => CommandType::GetPromise,
            CommandLite::PeekPromise(_) => CommandType::PeekPromise,
            CommandLite::CompletePromise(_) => CommandType::CompletePromise,
            CommandLite::Sleep(_) => CommandType::Sleep,
            CommandLite::Call(_) => CommandType::Call,
            CommandLite::OneWayCall(_) => CommandType::OneWayCall,
            CommandLite::SendSignal(_) => CommandType::SendSignal,
            CommandLite::Run(_) => CommandType::Run,
            CommandLite::AttachInvocation(_) => CommandType::AttachInvocation,
            CommandLite::GetInvocationOutput(_) => CommandType::GetInvocationOutput,
            CommandLite::CompleteAwakeable(_) => CommandType::CompleteAwakeable,
        }
    }

    pub fn result_completion_id(&self) -> Option<CompletionId> {
        match self {
            CommandLite::GetLazyState(cmd) => Some(cmd.completion_id),
            CommandLite::GetLazyStateKeys(cmd) => Some(cmd.completion_id),
            CommandLite::GetPromise(cmd) => Some(cmd.completion_id),
            CommandLite::PeekPromise(cmd) => Some(cmd.completion_id),
            CommandLite::CompletePromise(cmd) => Some(cmd.completion_id),
            CommandLite::Sleep(cmd) => Some(cmd.completion_id),
            CommandLite::Call(cmd) => Some(cmd.result_completion_id),
            CommandLite::Run(cmd) => Some(cmd.completion_id),
            CommandLite::AttachInvocation(cmd) => Some(cmd.completion_id),
            CommandLite::GetInvocationOutput(cmd) => Some(cmd.completion_id),
            CommandLite::Input(_)
            | CommandLite::Output(_)
            | CommandLite::SetState(_)
            | CommandLite::ClearState(_)
            | CommandLite::ClearAllState(_)
            | CommandLite::GetEagerState(_)
            | CommandLite::GetEagerStateKeys(_)
            | CommandLite::OneWayCall(_)
            | CommandLite::SendSignal(_)
            | CommandLite::CompleteAwakeable(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct InputCommandLite {}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OutputCommandLite {
    pub result: OutputResultLite,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum OutputResultLite {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GetLazyStateCommandLite {
    pub key: ByteString,
    pub completion_id: CompletionId,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SetStateCommandLite {
    pub key: ByteString,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ClearStateCommandLite {
    pub key: ByteString,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ClearAllStateCommandLite {}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GetLazyStateKeysCommandLite {
    pub completion_id: CompletionId,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GetEagerStateCommandLite {
    pub key: ByteString,
    pub result: GetStateResultLite,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum GetStateResultLite {
    Void,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GetEagerStateKeysCommandLite {}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GetPromiseCommandLite {
    pub key: ByteString,
    pub completion_id: CompletionId,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PeekPromiseCommandLite {
    pub key: ByteString,
    pub completion_id: CompletionId,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CompletePromiseCommandLite {
    pub key: ByteString,
    pub completion_id: CompletionId,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SleepCommandLite {
    pub wake_up_time: MillisSinceEpoch,
    pub completion_id: CompletionId,
    #[serde(default, skip_serializing_if = "str::is_empty")]
    pub name: ByteString,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CallCommandLite {
    pub invocation_id: InvocationId,
    pub invocation_target: InvocationTarget,
    pub invocation_id_completion_id: CompletionId,
    pub result_completion_id: CompletionId,
    #[serde(default, skip_serializing_if = "str::is_empty")]
    pub name: ByteString,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OneWayCallCommandLite {
    pub invocation_id: InvocationId,
    pub invocation_target: InvocationTarget,
    pub invoke_time: MillisSinceEpoch,
    pub invocation_id_completion_id: CompletionId,
    #[serde(default, skip_serializing_if = "str::is_empty")]
    pub name: ByteString,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SendSignalCommandLite {
    pub target_invocation_id: InvocationId,
    pub signal_id: SignalId,
    pub result: SignalResultLite,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SignalResultLite {
    Void,
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RunCommandLite {
    pub completion_id: CompletionId,
    #[serde(default, skip_serializing_if = "str::is_empty")]
    pub name: ByteString,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AttachInvocationCommandLite {
    pub target: AttachInvocationTarget,
    pub completion_id: CompletionId,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GetInvocationOutputCommandLite {
    pub target: AttachInvocationTarget,
    pub completion_id: CompletionId,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CompleteAwakeableCommandLite {
    pub id: AwakeableId,
    pub result: CompleteAwakeableResultLite,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CompleteAwakeableResultLite {
    Success,
    Failure,
}

// --- Notification lite

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NotificationLite {
    pub ty: NotificationType,
    pub id: NotificationId,
    pub result: NotificationResultLite,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum NotificationResultLite {
    Void,
    Success,
    Failure,
    StateKeys,
    InvocationId,
}

#[cfg(test)]
mod tests {
    use super::*;

    use googletest::prelude::*;

    #[test]
    fn call_lite_json_shape() {
        let json = r#"{
            "Command": {
                "Call": {
                    "invocation_id": "inv_1gdJBtdVEcM942bjcDmb1c1khoaJe11Hbz",
                    "invocation_target": {"Service": {"name": "Greeter", "handler": "greet"}},
                    "invocation_id_completion_id": 1,
                    "result_completion_id": 2
                }
            }
        }"#;
        let entry: EntryLite = serde_json::from_str(json).unwrap();
        let EntryLite::Command(cmd) = &entry else {
            panic!("expected a command, got {entry:?}");
        };
        assert_that!(cmd.ty(), eq(CommandType::Call));
        assert_that!(cmd.result_completion_id(), some(eq(2)));
        assert_that!(entry.ty().to_string(), eq("Command: Call"));
    }

    #[test]
    fn notification_lite_json_shape() {
        let json = r#"{
            "Notification": {
                "ty": {"Completion": "Call"},
                "id": {"CompletionId": 2},
                "result": "Success"
            }
        }"#;
        let entry: EntryLite = serde_json::from_str(json).unwrap();
        let EntryLite::Notification(notification) = &entry else {
            panic!("expected a notification, got {entry:?}");
        };
        assert_that!(
            notification.id,
            eq(&NotificationId::CompletionId(2))
        );
        assert_that!(notification.result, eq(&NotificationResultLite::Success));
    }
}
