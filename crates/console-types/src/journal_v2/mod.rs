// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Model of the current journal generation, mirroring the JSON the runtime
//! writes into the `entry_json` and `entry_lite_json` columns of
//! `sys_journal`. Entries are externally tagged:
//! `{"Command":{"Call":{…}}}`, `{"Notification":{"Signal":{…}}}`.

mod command;
mod event;
pub mod lite;
mod notification;

use std::fmt;
use std::str::FromStr;

pub use command::*;
pub use event::*;
pub use notification::*;

use crate::identifiers::{IdempotencyId, InvocationId, ServiceId};

/// A decoded journal entry of the current generation.
#[derive(
    Debug, Clone, PartialEq, Eq, derive_more::From, serde::Serialize, serde::Deserialize,
)]
pub enum Entry {
    Command(Command),
    Notification(Notification),
    Event(Event),
}

impl Entry {
    pub fn ty(&self) -> EntryType {
        match self {
            Entry::Command(cmd) => EntryType::Command(cmd.ty()),
            Entry::Notification(notification) => EntryType::Notification(notification.ty()),
            Entry::Event(_) => EntryType::Event,
        }
    }
}

/// Type tag of an entry. The `Display` output is what the `entry_type`
/// column of `sys_journal` carries for version 2 rows, e.g. `Command: Call`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryType {
    Command(CommandType),
    Notification(NotificationType),
    Event,
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryType::Command(cmd) => write!(f, "Command: {cmd}"),
            EntryType::Notification(notification) => write!(f, "Notification: {notification}"),
            EntryType::Event => write!(f, "Event"),
        }
    }
}

impl EntryType {
    /// Parses the `entry_type` column of a version 2 row. `None` for tags
    /// written by a newer runtime than this console knows about.
    pub fn from_row_tag(tag: &str) -> Option<EntryType> {
        if let Some(command) = tag.strip_prefix("Command: ") {
            return CommandType::from_str(command).ok().map(EntryType::Command);
        }
        if let Some(notification) = tag.strip_prefix("Notification: ") {
            if notification == "Signal" {
                return Some(EntryType::Notification(NotificationType::Signal));
            }
            return CompletionType::from_str(notification)
                .ok()
                .map(|completion| EntryType::Notification(NotificationType::Completion(completion)));
        }
        (tag == "Event").then_some(EntryType::Event)
    }
}

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
pub enum CommandType {
    Input,
    Output,
    GetLazyState,
    SetState,
    ClearState,
    ClearAllState,
    GetLazyStateKeys,
    GetEagerState,
    GetEagerStateKeys,
    GetPromise,
    PeekPromise,
    CompletePromise,
    Sleep,
    Call,
    OneWayCall,
    SendSignal,
    Run,
    AttachInvocation,
    GetInvocationOutput,
    CompleteAwakeable,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum NotificationType {
    Completion(CompletionType),
    Signal,
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationType::Completion(completion) => completion.fmt(f),
            NotificationType::Signal => f.write_str("Signal"),
        }
    }
}

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
pub enum CompletionType {
    GetLazyState,
    GetLazyStateKeys,
    GetPromise,
    PeekPromise,
    CompletePromise,
    Sleep,
    CallInvocationId,
    Call,
    Run,
    AttachInvocation,
    GetInvocationOutput,
}

/// Target of an `AttachInvocation`/`GetInvocationOutput` command.
#[derive(
    Debug, Clone, PartialEq, Eq, derive_more::From, serde::Serialize, serde::Deserialize,
)]
pub enum AttachInvocationTarget {
    InvocationId(InvocationId),
    IdempotentRequest(IdempotencyId),
    Workflow(ServiceId),
}

impl AttachInvocationTarget {
    /// The target invocation id, when the target is addressed by id.
    pub fn invocation_id(&self) -> Option<&InvocationId> {
        match self {
            AttachInvocationTarget::InvocationId(id) => Some(id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use googletest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("Command: Call", EntryType::Command(CommandType::Call))]
    #[case("Command: OneWayCall", EntryType::Command(CommandType::OneWayCall))]
    #[case(
        "Notification: Sleep",
        EntryType::Notification(NotificationType::Completion(CompletionType::Sleep))
    )]
    #[case(
        "Notification: Signal",
        EntryType::Notification(NotificationType::Signal)
    )]
    #[case("Event", EntryType::Event)]
    fn row_tags_roundtrip(#[case] tag: &str, #[case] expected: EntryType) {
        assert_that!(EntryType::from_row_tag(tag), some(eq(expected)));
        assert_that!(expected.to_string(), eq(tag));
    }

    #[test]
    fn unknown_row_tags_are_none() {
        assert_that!(EntryType::from_row_tag("Command: Teleport"), none());
        assert_that!(EntryType::from_row_tag("CompletionResult"), none());
    }
}
