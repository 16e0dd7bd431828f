// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Protobuf messages of the first journal generation, as found in the `raw`
//! column of `sys_journal`. The set of entries is frozen, so the messages are
//! defined by hand and prost-build stays out of the build.
//!
//! Tag convention shared by all entries: entry-specific fields start at 1,
//! `name` is 12, and the result oneof uses 13 (empty), 14 (value),
//! 15 (failure). The runtime completes an entry by appending the completion
//! bytes to the already-written message, relying on protobuf last-one-wins
//! field merging, so a completed entry decodes to its final result directly.

use bytes::Bytes;

#[derive(Clone, PartialEq, prost::Message)]
pub struct Header {
    #[prost(string, tag = "1")]
    pub key: String,
    #[prost(string, tag = "2")]
    pub value: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Failure {
    #[prost(uint32, tag = "1")]
    pub code: u32,
    #[prost(string, tag = "2")]
    pub message: String,
}

#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct Empty {}

#[derive(Clone, PartialEq, prost::Message)]
pub struct InputEntryMessage {
    #[prost(message, repeated, tag = "1")]
    pub headers: Vec<Header>,
    #[prost(bytes = "bytes", tag = "14")]
    pub value: Bytes,
    #[prost(string, tag = "12")]
    pub name: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct OutputEntryMessage {
    #[prost(oneof = "output_entry_message::Result", tags = "14, 15")]
    pub result: Option<output_entry_message::Result>,
    #[prost(string, tag = "12")]
    pub name: String,
}

pub mod output_entry_message {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Result {
        #[prost(bytes = "bytes", tag = "14")]
        Value(::bytes::Bytes),
        #[prost(message, tag = "15")]
        Failure(super::Failure),
    }
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetStateEntryMessage {
    #[prost(bytes = "bytes", tag = "1")]
    pub key: Bytes,
    #[prost(oneof = "get_state_entry_message::Result", tags = "13, 14, 15")]
    pub result: Option<get_state_entry_message::Result>,
    #[prost(string, tag = "12")]
    pub name: String,
}

pub mod get_state_entry_message {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Result {
        #[prost(message, tag = "13")]
        Empty(super::Empty),
        #[prost(bytes = "bytes", tag = "14")]
        Value(::bytes::Bytes),
        #[prost(message, tag = "15")]
        Failure(super::Failure),
    }
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct SetStateEntryMessage {
    #[prost(bytes = "bytes", tag = "1")]
    pub key: Bytes,
    #[prost(bytes = "bytes", tag = "3")]
    pub value: Bytes,
    #[prost(string, tag = "12")]
    pub name: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ClearStateEntryMessage {
    #[prost(bytes = "bytes", tag = "1")]
    pub key: Bytes,
    #[prost(string, tag = "12")]
    pub name: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ClearAllStateEntryMessage {
    #[prost(string, tag = "12")]
    pub name: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetStateKeysEntryMessage {
    #[prost(oneof = "get_state_keys_entry_message::Result", tags = "14, 15")]
    pub result: Option<get_state_keys_entry_message::Result>,
    #[prost(string, tag = "12")]
    pub name: String,
}

pub mod get_state_keys_entry_message {
    #[derive(Clone, PartialEq, prost::Message)]
    pub struct StateKeys {
        #[prost(bytes = "bytes", repeated, tag = "1")]
        pub keys: Vec<::bytes::Bytes>,
    }

    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Result {
        #[prost(message, tag = "14")]
        Value(StateKeys),
        #[prost(message, tag = "15")]
        Failure(super::Failure),
    }
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct SleepEntryMessage {
    #[prost(uint64, tag = "1")]
    pub wake_up_time: u64,
    #[prost(oneof = "sleep_entry_message::Result", tags = "13, 15")]
    pub result: Option<sleep_entry_message::Result>,
    #[prost(string, tag = "12")]
    pub name: String,
}

pub mod sleep_entry_message {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Result {
        #[prost(message, tag = "13")]
        Empty(super::Empty),
        #[prost(message, tag = "15")]
        Failure(super::Failure),
    }
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct CallEntryMessage {
    #[prost(string, tag = "1")]
    pub service_name: String,
    #[prost(string, tag = "2")]
    pub handler_name: String,
    #[prost(bytes = "bytes", tag = "3")]
    pub parameter: Bytes,
    #[prost(message, repeated, tag = "4")]
    pub headers: Vec<Header>,
    #[prost(string, tag = "5")]
    pub key: String,
    #[prost(string, tag = "6")]
    pub idempotency_key: String,
    #[prost(oneof = "call_entry_message::Result", tags = "14, 15")]
    pub result: Option<call_entry_message::Result>,
    #[prost(string, tag = "12")]
    pub name: String,
}

pub mod call_entry_message {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Result {
        #[prost(bytes = "bytes", tag = "14")]
        Value(::bytes::Bytes),
        #[prost(message, tag = "15")]
        Failure(super::Failure),
    }
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct OneWayCallEntryMessage {
    #[prost(string, tag = "1")]
    pub service_name: String,
    #[prost(string, tag = "2")]
    pub handler_name: String,
    #[prost(bytes = "bytes", tag = "3")]
    pub parameter: Bytes,
    #[prost(uint64, tag = "4")]
    pub invoke_time: u64,
    #[prost(message, repeated, tag = "5")]
    pub headers: Vec<Header>,
    #[prost(string, tag = "6")]
    pub key: String,
    #[prost(string, tag = "7")]
    pub idempotency_key: String,
    #[prost(string, tag = "12")]
    pub name: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct AwakeableEntryMessage {
    #[prost(oneof = "awakeable_entry_message::Result", tags = "14, 15")]
    pub result: Option<awakeable_entry_message::Result>,
    #[prost(string, tag = "12")]
    pub name: String,
}

pub mod awakeable_entry_message {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Result {
        #[prost(bytes = "bytes", tag = "14")]
        Value(::bytes::Bytes),
        #[prost(message, tag = "15")]
        Failure(super::Failure),
    }
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct CompleteAwakeableEntryMessage {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(oneof = "complete_awakeable_entry_message::Result", tags = "14, 15")]
    pub result: Option<complete_awakeable_entry_message::Result>,
    #[prost(string, tag = "12")]
    pub name: String,
}

pub mod complete_awakeable_entry_message {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Result {
        #[prost(bytes = "bytes", tag = "14")]
        Value(::bytes::Bytes),
        #[prost(message, tag = "15")]
        Failure(super::Failure),
    }
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct RunEntryMessage {
    #[prost(oneof = "run_entry_message::Result", tags = "14, 15")]
    pub result: Option<run_entry_message::Result>,
    #[prost(string, tag = "12")]
    pub name: String,
}

pub mod run_entry_message {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Result {
        #[prost(bytes = "bytes", tag = "14")]
        Value(::bytes::Bytes),
        #[prost(message, tag = "15")]
        Failure(super::Failure),
    }
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetPromiseEntryMessage {
    #[prost(string, tag = "1")]
    pub key: String,
    #[prost(oneof = "get_promise_entry_message::Result", tags = "14, 15")]
    pub result: Option<get_promise_entry_message::Result>,
    #[prost(string, tag = "12")]
    pub name: String,
}

pub mod get_promise_entry_message {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Result {
        #[prost(bytes = "bytes", tag = "14")]
        Value(::bytes::Bytes),
        #[prost(message, tag = "15")]
        Failure(super::Failure),
    }
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct PeekPromiseEntryMessage {
    #[prost(string, tag = "1")]
    pub key: String,
    #[prost(oneof = "peek_promise_entry_message::Result", tags = "13, 14, 15")]
    pub result: Option<peek_promise_entry_message::Result>,
    #[prost(string, tag = "12")]
    pub name: String,
}

pub mod peek_promise_entry_message {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Result {
        #[prost(message, tag = "13")]
        Empty(super::Empty),
        #[prost(bytes = "bytes", tag = "14")]
        Value(::bytes::Bytes),
        #[prost(message, tag = "15")]
        Failure(super::Failure),
    }
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct CompletePromiseEntryMessage {
    #[prost(string, tag = "1")]
    pub key: String,
    #[prost(oneof = "complete_promise_entry_message::Completion", tags = "2, 3")]
    pub completion: Option<complete_promise_entry_message::Completion>,
    #[prost(oneof = "complete_promise_entry_message::Result", tags = "13, 15")]
    pub result: Option<complete_promise_entry_message::Result>,
    #[prost(string, tag = "12")]
    pub name: String,
}

pub mod complete_promise_entry_message {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Completion {
        #[prost(bytes = "bytes", tag = "2")]
        CompletionValue(::bytes::Bytes),
        #[prost(message, tag = "3")]
        CompletionFailure(super::Failure),
    }

    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Result {
        #[prost(message, tag = "13")]
        Empty(super::Empty),
        #[prost(message, tag = "15")]
        Failure(super::Failure),
    }
}
