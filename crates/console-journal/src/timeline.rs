// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Merges the resolved journal with the events table and the lifecycle
//! markers synthesized from the invocation summary, into one deterministic
//! display order.
//!
//! Every item gets a [`SortKey`]: journal rows anchor at their own index,
//! events right after the row named by `after_journal_entry_index` (or, when
//! unanchored, after the last row appended before their timestamp), markers
//! before the first row appended at or after their timestamp. Items are
//! compared as `(anchor, lane, at)`; a stable sort keeps insertion order as
//! the final tiebreak, so the merge is a total order on every input.

use std::collections::HashMap;

use chrono::{DateTime, Local};

use restate_console_client::JournalEventRow;
use restate_console_types::identifiers::EntryIndex;
use restate_console_types::invocation::{InvocationStatusView, InvocationSummary};
use restate_console_types::journal_v2::EventType;
use restate_console_types::time::MillisSinceEpoch;

use crate::resolved::ResolvedJournalEntry;

/// One row of the events table, with its metadata JSON parsed.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct JournalEvent {
    pub after_journal_entry_index: Option<EntryIndex>,
    pub appended_at: Option<DateTime<Local>>,
    pub ty: EventType,
    pub metadata: Option<HashMap<String, String>>,
}

pub fn decode_event_row(row: &JournalEventRow) -> JournalEvent {
    JournalEvent {
        after_journal_entry_index: row.after_journal_entry_index,
        appended_at: row.appended_at,
        ty: row
            .event_type
            .parse()
            .unwrap_or_else(|_| EventType::Other(row.event_type.clone())),
        metadata: row.event_json.as_deref().and_then(parse_event_metadata),
    }
}

fn parse_event_metadata(json: &str) -> Option<HashMap<String, String>> {
    let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json).ok()?;
    Some(
        object
            .into_iter()
            .map(|(key, value)| {
                let value = match value {
                    serde_json::Value::String(text) => text,
                    other => other.to_string(),
                };
                (key, value)
            })
            .collect(),
    )
}

/// Lifecycle transitions shown inline in the timeline, synthesized from the
/// summary's timestamp columns rather than read from persisted rows.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, serde::Serialize, serde::Deserialize,
)]
pub enum LifecycleMarkerKind {
    Created,
    Pending,
    Scheduled,
    Running,
    Suspended,
    Paused,
    Retrying,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct LifecycleMarker {
    pub kind: LifecycleMarkerKind,
    pub at: DateTime<Local>,
}

/// Markers for one invocation. Absent timestamps synthesize nothing.
pub fn lifecycle_markers(
    summary: &InvocationSummary,
    view: Option<&InvocationStatusView>,
) -> Vec<LifecycleMarker> {
    let mut markers = Vec::new();
    let mut push = |kind, at: Option<DateTime<Local>>| {
        if let Some(at) = at {
            markers.push(LifecycleMarker { kind, at });
        }
    };

    push(LifecycleMarkerKind::Created, summary.created_at);
    push(LifecycleMarkerKind::Pending, summary.inboxed_at);
    push(LifecycleMarkerKind::Scheduled, summary.scheduled_at);
    push(LifecycleMarkerKind::Running, summary.running_at);
    match summary.status.as_str() {
        "suspended" => push(LifecycleMarkerKind::Suspended, summary.modified_at),
        "paused" => push(LifecycleMarkerKind::Paused, summary.modified_at),
        _ => {}
    }
    if view.is_some_and(|view| view.is_retrying) {
        push(LifecycleMarkerKind::Retrying, summary.next_retry_at);
    }
    push(LifecycleMarkerKind::Completed, summary.completed_at);
    markers
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "kind")]
pub enum TimelineItem {
    Marker(LifecycleMarker),
    Entry(ResolvedJournalEntry),
    Event(JournalEvent),
}

/// Display position of one timeline item. Derived `Ord` compares the fields
/// in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SortKey {
    pub anchor: EntryIndex,
    pub lane: u8,
    pub at: MillisSinceEpoch,
}

const MARKER_LANE: u8 = 0;
const JOURNAL_LANE: u8 = 1;
const EVENT_LANE: u8 = 2;

fn millis(at: Option<DateTime<Local>>) -> MillisSinceEpoch {
    at.map(MillisSinceEpoch::from)
        .unwrap_or(MillisSinceEpoch::UNIX_EPOCH)
}

/// Merges journal entries, event rows and lifecycle markers into one ordered
/// timeline.
pub fn merge_timeline(
    entries: Vec<ResolvedJournalEntry>,
    events: Vec<JournalEvent>,
    markers: Vec<LifecycleMarker>,
) -> Vec<TimelineItem> {
    let appended_times: Vec<Option<DateTime<Local>>> =
        entries.iter().map(|entry| entry.start()).collect();
    let anchor_of_marker = |at: DateTime<Local>| -> EntryIndex {
        appended_times
            .iter()
            .filter(|appended| appended.is_some_and(|appended| appended < at))
            .count() as EntryIndex
    };
    // An event without an anchor row falls back to its timestamp: it hangs
    // off the last row appended before it, not the top of the timeline.
    let anchor_of_unanchored_event = |at: Option<DateTime<Local>>| -> EntryIndex {
        at.map(|at| anchor_of_marker(at).saturating_sub(1))
            .unwrap_or(0)
    };

    let mut items: Vec<(SortKey, TimelineItem)> = Vec::with_capacity(
        entries.len() + events.len() + markers.len(),
    );
    for marker in markers {
        let key = SortKey {
            anchor: anchor_of_marker(marker.at),
            lane: MARKER_LANE,
            at: MillisSinceEpoch::from(marker.at),
        };
        items.push((key, TimelineItem::Marker(marker)));
    }
    for entry in entries {
        let key = SortKey {
            anchor: entry.index(),
            lane: JOURNAL_LANE,
            at: millis(entry.start()),
        };
        items.push((key, TimelineItem::Entry(entry)));
    }
    for event in events {
        let key = SortKey {
            anchor: event
                .after_journal_entry_index
                .unwrap_or_else(|| anchor_of_unanchored_event(event.appended_at)),
            lane: EVENT_LANE,
            at: millis(event.appended_at),
        };
        items.push((key, TimelineItem::Event(event)));
    }

    // Stable sort: equal keys keep their push order.
    items.sort_by_key(|(key, _)| *key);
    items.into_iter().map(|(_, item)| item).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use googletest::prelude::*;
    use restate_console_types::journal_v1;

    use crate::resolved::{EntryFields, ResolvedEntryV1};

    fn entry(index: EntryIndex, at_millis: u64) -> ResolvedJournalEntry {
        ResolvedJournalEntry::V1(ResolvedEntryV1 {
            index,
            entry_type: journal_v1::EntryType::Run,
            name: None,
            completed: true,
            start: MillisSinceEpoch::new(at_millis).to_datetime(),
            fields: EntryFields::default(),
            failure: None,
        })
    }

    fn kinds(items: &[TimelineItem]) -> Vec<String> {
        items
            .iter()
            .map(|item| match item {
                TimelineItem::Marker(marker) => format!("marker:{}", marker.kind),
                TimelineItem::Entry(entry) => format!("entry:{}", entry.index()),
                TimelineItem::Event(event) => {
                    format!("event:{}", event.after_journal_entry_index.unwrap_or(0))
                }
            })
            .collect()
    }

    #[test]
    fn events_sort_right_after_their_anchor_row() {
        let entries = vec![entry(0, 1_000), entry(1, 2_000), entry(2, 3_000)];
        let events = vec![JournalEvent {
            after_journal_entry_index: Some(1),
            appended_at: MillisSinceEpoch::new(2_500).to_datetime(),
            ty: EventType::TransientError,
            metadata: None,
        }];
        let items = merge_timeline(entries, events, Vec::new());
        assert_that!(
            kinds(&items),
            elements_are![
                eq("entry:0"),
                eq("entry:1"),
                eq("event:1"),
                eq("entry:2")
            ]
        );
    }

    #[test]
    fn unanchored_events_fall_back_to_their_timestamp() {
        let entries = vec![entry(0, 1_000), entry(1, 2_000), entry(2, 3_000)];
        let events = vec![JournalEvent {
            after_journal_entry_index: None,
            appended_at: MillisSinceEpoch::new(2_500).to_datetime(),
            ty: EventType::TransientError,
            metadata: None,
        }];
        let items = merge_timeline(entries, events, Vec::new());
        assert_that!(
            kinds(&items),
            elements_are![
                eq("entry:0"),
                eq("entry:1"),
                eq("event:0"),
                eq("entry:2")
            ]
        );
    }

    #[test]
    fn markers_anchor_before_the_first_later_row() {
        let entries = vec![entry(0, 1_000), entry(1, 5_000)];
        // Appended between row 0 and row 1, so it anchors at 1 and
        // sorts before the row holding that index.
        let markers = vec![LifecycleMarker {
            kind: LifecycleMarkerKind::Running,
            at: MillisSinceEpoch::new(2_000).to_datetime().unwrap(),
        }];
        let items = merge_timeline(entries, Vec::new(), markers);
        assert_that!(
            kinds(&items),
            elements_are![eq("entry:0"), eq("marker:Running"), eq("entry:1")]
        );
    }

    #[test]
    fn merge_is_deterministic_over_input_order() {
        let events = vec![
            JournalEvent {
                after_journal_entry_index: Some(0),
                appended_at: MillisSinceEpoch::new(1_500).to_datetime(),
                ty: EventType::TransientError,
                metadata: None,
            },
            JournalEvent {
                after_journal_entry_index: Some(0),
                appended_at: MillisSinceEpoch::new(1_200).to_datetime(),
                ty: EventType::Lifecycle,
                metadata: None,
            },
        ];
        let forward = merge_timeline(vec![entry(0, 1_000)], events.clone(), Vec::new());
        let mut reversed_events = events;
        reversed_events.reverse();
        let reversed = merge_timeline(vec![entry(0, 1_000)], reversed_events, Vec::new());
        assert_that!(forward, eq(&reversed));
    }

    #[test]
    fn event_row_metadata_is_parsed() {
        let event = decode_event_row(&JournalEventRow {
            after_journal_entry_index: Some(2),
            appended_at: None,
            event_type: "TransientError".to_owned(),
            event_json: Some(r#"{"error_code":500,"message":"boom"}"#.to_owned()),
        });
        assert_that!(event.ty, eq(&EventType::TransientError));
        let metadata = event.metadata.unwrap();
        assert_that!(metadata.get("message").map(String::as_str), some(eq("boom")));
        assert_that!(
            metadata.get("error_code").map(String::as_str),
            some(eq("500"))
        );
    }

    #[test]
    fn lifecycle_markers_skip_absent_timestamps() {
        let summary = InvocationSummary {
            id: "inv_1gdJBtdVEcM942bjcDmb1c1khoaJe11Hbz".parse().unwrap(),
            target: "Greeter/greet".to_owned(),
            status: "running".to_owned(),
            completion: None,
            retry_count: 0,
            last_failure: None,
            last_failure_related_command_index: None,
            last_failure_related_command_name: None,
            last_failure_related_command_type: None,
            next_retry_at: None,
            created_at: MillisSinceEpoch::new(1_000).to_datetime(),
            modified_at: None,
            inboxed_at: None,
            scheduled_at: None,
            running_at: MillisSinceEpoch::new(2_000).to_datetime(),
            completed_at: None,
            journal_size: None,
            journal_commands_size: None,
        };
        let markers = lifecycle_markers(&summary, None);
        let marker_kinds: Vec<_> = markers.iter().map(|m| m.kind).collect();
        assert_that!(
            marker_kinds,
            elements_are![
                eq(&LifecycleMarkerKind::Created),
                eq(&LifecycleMarkerKind::Running)
            ]
        );
    }
}
