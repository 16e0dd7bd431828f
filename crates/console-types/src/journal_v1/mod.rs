// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Model of the first journal generation. Rows of this generation carry the
//! entry as a protobuf message in the hex-encoded `raw` column, with bare
//! type tags in `entry_type` (`Call`, `Sleep`, ...). Completions are merged
//! into the entry itself, so there are no separate notification rows, apart
//! from transient `CompletionResult` markers.

pub mod wire;

use bytes::Bytes;
use prost::Message;

/// Type tag of a first-generation row, parsed from the `entry_type` column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
pub enum EntryType {
    Input,
    Output,
    GetState,
    SetState,
    ClearState,
    ClearAllState,
    GetStateKeys,
    Sleep,
    Call,
    OneWayCall,
    Awakeable,
    CompleteAwakeable,
    Run,
    GetPromise,
    PeekPromise,
    CompletePromise,
    /// Marker row for a completion the runtime has not yet merged into its
    /// entry. Pure plumbing, filtered out before display.
    CompletionResult,
    #[strum(default)]
    Other(String),
}

/// A decoded first-generation entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Input(wire::InputEntryMessage),
    Output(wire::OutputEntryMessage),
    GetState(wire::GetStateEntryMessage),
    SetState(wire::SetStateEntryMessage),
    ClearState(wire::ClearStateEntryMessage),
    ClearAllState(wire::ClearAllStateEntryMessage),
    GetStateKeys(wire::GetStateKeysEntryMessage),
    Sleep(wire::SleepEntryMessage),
    Call(wire::CallEntryMessage),
    OneWayCall(wire::OneWayCallEntryMessage),
    Awakeable(wire::AwakeableEntryMessage),
    CompleteAwakeable(wire::CompleteAwakeableEntryMessage),
    Run(wire::RunEntryMessage),
    GetPromise(wire::GetPromiseEntryMessage),
    PeekPromise(wire::PeekPromiseEntryMessage),
    CompletePromise(wire::CompletePromiseEntryMessage),
    /// An entry type this console has no message definition for. Carries the
    /// tag so the row still renders by name.
    Unknown(EntryType),
}

impl Entry {
    pub fn ty(&self) -> EntryType {
        match self {
            Entry::Input(_) => EntryType::Input,
            Entry::Output(_) => EntryType::Output,
            Entry::GetState(_) => EntryType::GetState,
            Entry::SetState(_) => EntryType::SetState,
            Entry::ClearState(_) => EntryType::ClearState,
            Entry::ClearAllState(_) => EntryType::ClearAllState,
            Entry::GetStateKeys(_) => EntryType::GetStateKeys,
            Entry::Sleep(_) => EntryType::Sleep,
            Entry::Call(_) => EntryType::Call,
            Entry::OneWayCall(_) => EntryType::OneWayCall,
            Entry::Awakeable(_) => EntryType::Awakeable,
            Entry::CompleteAwakeable(_) => EntryType::CompleteAwakeable,
            Entry::Run(_) => EntryType::Run,
            Entry::GetPromise(_) => EntryType::GetPromise,
            Entry::PeekPromise(_) => EntryType::PeekPromise,
            Entry::CompletePromise(_) => EntryType::CompletePromise,
            Entry::Unknown(ty) => ty.clone(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("failed to decode {ty} entry: {source}")]
pub struct DecodeError {
    ty: EntryType,
    #[source]
    source: prost::DecodeError,
}

/// This macro generates the pattern matching with arms per entry.
/// For each tag it runs `Message::decode` against the matching wire message
/// and wraps the result in the corresponding [`Entry`] variant.
macro_rules! match_decode {
    ($ty:expr, $buf:expr, { $($variant:ident),* $(,)? }) => {
        match $ty {
            $(EntryType::$variant => paste::paste! {
                wire::[< $variant EntryMessage >]::decode($buf)
                    .map(Entry::$variant)
                    .map_err(|source| DecodeError { ty: EntryType::$variant, source })
            },)*
            other => Ok(Entry::Unknown(other.clone())),
        }
    };
}

/// Decodes the `raw` column of a first-generation row. The entry type tag
/// selects the message, since protobuf itself is not self-describing.
pub fn decode_entry(ty: &EntryType, buf: Bytes) -> Result<Entry, DecodeError> {
    match_decode!(ty, buf, {
        Input,
        Output,
        GetState,
        SetState,
        ClearState,
        ClearAllState,
        GetStateKeys,
        Sleep,
        Call,
        OneWayCall,
        Awakeable,
        CompleteAwakeable,
        Run,
        GetPromise,
        PeekPromise,
        CompletePromise,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use googletest::prelude::*;
    use std::str::FromStr;

    #[test]
    fn decode_call_entry() {
        let buf = wire::CallEntryMessage {
            service_name: "Greeter".to_owned(),
            handler_name: "greet".to_owned(),
            parameter: Bytes::from_static(b"{}"),
            ..Default::default()
        }
        .encode_to_vec();

        let entry = decode_entry(&EntryType::Call, buf.into()).unwrap();
        let Entry::Call(call) = entry else {
            panic!("expected a call entry, got {entry:?}");
        };
        assert_that!(call.service_name, eq("Greeter"));
        assert_that!(call.result, none());
    }

    #[test]
    fn appended_completion_wins() {
        // The runtime completes entries by concatenating the completion
        // message, so decoding the final buffer yields the merged result.
        let mut buf = wire::GetStateEntryMessage {
            key: Bytes::from_static(b"balance"),
            ..Default::default()
        }
        .encode_to_vec();
        buf.extend(
            wire::GetStateEntryMessage {
                result: Some(wire::get_state_entry_message::Result::Value(
                    Bytes::from_static(b"42"),
                )),
                ..Default::default()
            }
            .encode_to_vec(),
        );

        let entry = decode_entry(&EntryType::GetState, buf.into()).unwrap();
        let Entry::GetState(get_state) = entry else {
            panic!("expected a get-state entry, got {entry:?}");
        };
        assert_that!(get_state.key.as_ref(), eq(b"balance"));
        assert_that!(
            get_state.result,
            some(eq(&wire::get_state_entry_message::Result::Value(
                Bytes::from_static(b"42")
            )))
        );
    }

    #[test]
    fn unknown_tag_passes_through() {
        let ty = EntryType::from_str("CancelInvocation").unwrap();
        assert_that!(ty, eq(&EntryType::Other("CancelInvocation".to_owned())));

        let entry = decode_entry(&ty, Bytes::from_static(b"\x01\x02\x03")).unwrap();
        assert_that!(entry, eq(&Entry::Unknown(ty)));
    }

    #[test]
    fn truncated_buffer_is_an_error() {
        // 0x72 announces a length-delimited field 14 of length 200, with no
        // payload following.
        let result = decode_entry(&EntryType::Output, Bytes::from_static(b"\x72\xc8"));
        assert_that!(result, err(anything()));
    }
}
