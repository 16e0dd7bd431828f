// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Builder for first-generation rows. Completions are merged into the entry
//! message itself, so most of the correlation work reduces to reading the
//! result oneof; entries completed out of band fall back to a forward scan
//! for the transient `CompletionResult` marker rows.

use restate_console_types::errors::Failure;
use restate_console_types::journal_v1::{Entry, EntryType, wire};

use crate::correlate::v1_find_following;
use crate::decode::{DecodedPayload, bytes_to_base64};
use crate::entries::BuildContext;
use crate::outcome::Outcome;
use crate::resolved::{EntryFields, ResolvedEntryV1};

fn wire_failure(failure: &wire::Failure) -> Failure {
    Failure::new(failure.code, failure.message.clone())
}

/// Entry kinds that complete asynchronously and may be marked done by a
/// later `CompletionResult` row instead of an inline result.
fn is_async(ty: &EntryType) -> bool {
    matches!(
        ty,
        EntryType::GetState
            | EntryType::GetStateKeys
            | EntryType::Sleep
            | EntryType::Call
            | EntryType::Awakeable
            | EntryType::Run
            | EntryType::GetPromise
            | EntryType::PeekPromise
            | EntryType::CompletePromise
    )
}

pub(super) fn build(cx: &BuildContext<'_>, entry: &Entry) -> Option<ResolvedEntryV1> {
    let ty = entry.ty();
    if ty == EntryType::CompletionResult {
        return None;
    }

    let row = cx.row();
    let mut fields = EntryFields {
        invoked_id: row.convenience.invoked_id.clone(),
        invoked_target: row.convenience.invoked_target.clone(),
        wake_up_at: row.convenience.sleep_wakeup_at,
        promise_name: row.convenience.promise_name.clone(),
        ..EntryFields::default()
    };
    let mut outcome: Option<Outcome> = None;

    match entry {
        Entry::Input(msg) => {
            fields.parameters = Some(bytes_to_base64(&msg.value));
            if !msg.headers.is_empty() {
                fields.headers = Some(
                    msg.headers
                        .iter()
                        .map(|h| {
                            restate_console_types::invocation::Header::new(
                                h.key.clone(),
                                h.value.clone(),
                            )
                        })
                        .collect(),
                );
            }
        }
        Entry::Output(msg) => {
            outcome = msg.result.as_ref().map(|result| match result {
                wire::output_entry_message::Result::Value(bytes) => Outcome::success(bytes),
                wire::output_entry_message::Result::Failure(f) => {
                    Outcome::failure(wire_failure(f))
                }
            });
        }
        Entry::GetState(msg) => {
            fields.key = Some(String::from_utf8_lossy(&msg.key).into_owned());
            outcome = msg.result.as_ref().map(|result| match result {
                wire::get_state_entry_message::Result::Empty(_) => Outcome::void(),
                wire::get_state_entry_message::Result::Value(bytes) => Outcome::success(bytes),
                wire::get_state_entry_message::Result::Failure(f) => {
                    Outcome::failure(wire_failure(f))
                }
            });
        }
        Entry::SetState(msg) => {
            fields.key = Some(String::from_utf8_lossy(&msg.key).into_owned());
            fields.value = Some(bytes_to_base64(&msg.value));
        }
        Entry::ClearState(msg) => {
            fields.key = Some(String::from_utf8_lossy(&msg.key).into_owned());
        }
        Entry::ClearAllState(_) => {}
        Entry::GetStateKeys(msg) => {
            outcome = msg.result.as_ref().map(|result| match result {
                wire::get_state_keys_entry_message::Result::Value(keys) => {
                    fields.keys = Some(
                        keys.keys
                            .iter()
                            .map(|key| String::from_utf8_lossy(key).into_owned())
                            .collect(),
                    );
                    Outcome::void()
                }
                wire::get_state_keys_entry_message::Result::Failure(f) => {
                    Outcome::failure(wire_failure(f))
                }
            });
        }
        Entry::Sleep(msg) => {
            if fields.wake_up_at.is_none() {
                fields.wake_up_at =
                    restate_console_types::time::MillisSinceEpoch::new(msg.wake_up_time)
                        .to_datetime();
            }
            outcome = msg.result.as_ref().map(|result| match result {
                wire::sleep_entry_message::Result::Empty(_) => Outcome::void(),
                wire::sleep_entry_message::Result::Failure(f) => {
                    Outcome::failure(wire_failure(f))
                }
            });
        }
        Entry::Call(msg) => {
            fill_call_target(&mut fields, &msg.service_name, &msg.handler_name, &msg.key);
            fields.parameters = Some(bytes_to_base64(&msg.parameter));
            if !msg.idempotency_key.is_empty() {
                fields.idempotency_key = Some(msg.idempotency_key.clone());
            }
            outcome = msg.result.as_ref().map(|result| match result {
                wire::call_entry_message::Result::Value(bytes) => Outcome::success(bytes),
                wire::call_entry_message::Result::Failure(f) => {
                    Outcome::failure(wire_failure(f))
                }
            });
        }
        Entry::OneWayCall(msg) => {
            fill_call_target(&mut fields, &msg.service_name, &msg.handler_name, &msg.key);
            fields.parameters = Some(bytes_to_base64(&msg.parameter));
            if msg.invoke_time > 0 {
                fields.wake_up_at =
                    restate_console_types::time::MillisSinceEpoch::new(msg.invoke_time)
                        .to_datetime();
            }
        }
        Entry::Awakeable(msg) => {
            outcome = msg.result.as_ref().map(|result| match result {
                wire::awakeable_entry_message::Result::Value(bytes) => Outcome::success(bytes),
                wire::awakeable_entry_message::Result::Failure(f) => {
                    Outcome::failure(wire_failure(f))
                }
            });
        }
        Entry::CompleteAwakeable(msg) => {
            fields.awakeable_id = Some(msg.id.clone());
            outcome = msg.result.as_ref().map(|result| match result {
                wire::complete_awakeable_entry_message::Result::Value(bytes) => {
                    Outcome::success(bytes)
                }
                wire::complete_awakeable_entry_message::Result::Failure(f) => {
                    Outcome::failure(wire_failure(f))
                }
            });
        }
        Entry::Run(msg) => {
            outcome = msg.result.as_ref().map(|result| match result {
                wire::run_entry_message::Result::Value(bytes) => Outcome::success(bytes),
                wire::run_entry_message::Result::Failure(f) => {
                    Outcome::failure(wire_failure(f))
                }
            });
        }
        Entry::GetPromise(msg) => {
            fields.promise_name.get_or_insert_with(|| msg.key.clone());
            outcome = msg.result.as_ref().map(|result| match result {
                wire::get_promise_entry_message::Result::Value(bytes) => {
                    Outcome::success(bytes)
                }
                wire::get_promise_entry_message::Result::Failure(f) => {
                    Outcome::failure(wire_failure(f))
                }
            });
        }
        Entry::PeekPromise(msg) => {
            fields.promise_name.get_or_insert_with(|| msg.key.clone());
            outcome = msg.result.as_ref().map(|result| match result {
                wire::peek_promise_entry_message::Result::Empty(_) => Outcome::void(),
                wire::peek_promise_entry_message::Result::Value(bytes) => {
                    Outcome::success(bytes)
                }
                wire::peek_promise_entry_message::Result::Failure(f) => {
                    Outcome::failure(wire_failure(f))
                }
            });
        }
        Entry::CompletePromise(msg) => {
            fields.promise_name.get_or_insert_with(|| msg.key.clone());
            if let Some(wire::complete_promise_entry_message::Completion::CompletionValue(
                bytes,
            )) = &msg.completion
            {
                fields.parameters = Some(bytes_to_base64(bytes));
            }
            outcome = msg.result.as_ref().map(|result| match result {
                wire::complete_promise_entry_message::Result::Empty(_) => Outcome::void(),
                wire::complete_promise_entry_message::Result::Failure(f) => {
                    Outcome::failure(wire_failure(f))
                }
            });
        }
        Entry::Unknown(_) => {}
    }

    let mut completed = row.completed || outcome.is_some();
    if !completed && is_async(&ty) {
        // Completion not yet merged into the entry; a marker row bearing
        // this entry's index means it already arrived.
        completed = v1_find_following(cx.rows, cx.position, |candidate| {
            candidate.index == row.index
                && matches!(
                    &candidate.payload,
                    DecodedPayload::V1(Entry::Unknown(EntryType::CompletionResult))
                )
        })
        .is_some();
    }

    let (value, failure) = match outcome {
        Some(outcome) => (outcome.value, outcome.failure),
        None => (None, None),
    };
    fields.value = fields.value.or(value);

    Some(ResolvedEntryV1 {
        index: row.index,
        entry_type: ty,
        name: row.name.clone(),
        completed,
        start: row.appended_at,
        fields,
        failure,
    })
}

fn fill_call_target(fields: &mut EntryFields, service: &str, handler: &str, key: &str) {
    if fields.invoked_target.is_none() && !service.is_empty() {
        fields.invoked_target = Some(if key.is_empty() {
            format!("{service}/{handler}")
        } else {
            format!("{service}/{key}/{handler}")
        });
    }
}
