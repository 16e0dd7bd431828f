// Copyright (c) 2023 - 2025 Restate Software, Inc., Restate GmbH.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Expands a journal's calls into the target invocations' own journals. The
//! walk only reads journals the caller pre-fetched, so it never does I/O; a
//! target that was not fetched becomes a placeholder node, and the depth
//! bound keeps call cycles from recursing forever.

use std::collections::HashMap;

use restate_console_types::identifiers::{EntryIndex, InvocationId};

use crate::resolved::{EntryCategory, ResolvedJournalEntry};

/// Entry types whose target invocation is worth expanding inline.
const EXPANDABLE_TYPES: [&str; 3] = ["Call", "OneWayCall", "AttachInvocation"];

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CallTreeNode {
    pub invocation_id: InvocationId,
    /// `None` marks a placeholder: the journal was not pre-fetched, or the
    /// depth bound cut the walk here.
    pub journal: Option<Vec<ResolvedJournalEntry>>,
    pub children: Vec<CallTreeChild>,
}

/// A child invocation, hung off the journal entry that called it.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CallTreeChild {
    pub entry_index: EntryIndex,
    pub node: CallTreeNode,
}

pub fn expand_call_tree(
    root: &InvocationId,
    journals: &HashMap<InvocationId, Vec<ResolvedJournalEntry>>,
    depth_limit: usize,
) -> CallTreeNode {
    let journal = journals.get(root);
    let (Some(journal), true) = (journal, depth_limit > 0) else {
        return CallTreeNode {
            invocation_id: root.clone(),
            journal: None,
            children: Vec::new(),
        };
    };

    let children = journal
        .iter()
        .filter(|entry| {
            entry.category() == EntryCategory::Command
                && EXPANDABLE_TYPES.contains(&entry.entry_type().as_str())
        })
        .filter_map(|entry| {
            let child_id: InvocationId =
                entry.fields().invoked_id.as_deref()?.parse().ok()?;
            Some(CallTreeChild {
                entry_index: entry.index(),
                node: expand_call_tree(&child_id, journals, depth_limit - 1),
            })
        })
        .collect();

    CallTreeNode {
        invocation_id: root.clone(),
        journal: Some(journal.clone()),
        children,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use googletest::prelude::*;

    use crate::resolved::{EntryFields, ResolvedEntryV2};

    const ID_A: &str = "inv_1gdJBtdVEcM942bjcDmb1c1khoaJe11Hbz";
    const ID_B: &str = "inv_1aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";

    fn call_entry(index: EntryIndex, target: &str) -> ResolvedJournalEntry {
        ResolvedJournalEntry::V2(ResolvedEntryV2 {
            index,
            category: EntryCategory::Command,
            entry_type: "Call".to_owned(),
            name: None,
            command_index: Some(0),
            completion_id: Some(1),
            completion_index: None,
            related_indexes: Vec::new(),
            start: None,
            end: None,
            is_pending: true,
            is_retrying: false,
            is_loaded: false,
            result_type: None,
            error: None,
            fields: EntryFields {
                invoked_id: Some(target.to_owned()),
                ..EntryFields::default()
            },
        })
    }

    #[test]
    fn missing_target_journal_becomes_a_placeholder() {
        let root: InvocationId = ID_A.parse().unwrap();
        let journals = HashMap::from([(root.clone(), vec![call_entry(0, ID_B)])]);

        let tree = expand_call_tree(&root, &journals, 4);
        assert_that!(tree.journal, some(anything()));
        assert_that!(tree.children.len(), eq(1));
        assert_that!(tree.children[0].entry_index, eq(0));
        assert_that!(tree.children[0].node.journal, none());
        assert_that!(tree.children[0].node.children, empty());
    }

    #[test]
    fn call_cycles_stop_at_the_depth_bound() {
        let a: InvocationId = ID_A.parse().unwrap();
        let b: InvocationId = ID_B.parse().unwrap();
        let journals = HashMap::from([
            (a.clone(), vec![call_entry(0, ID_B)]),
            (b.clone(), vec![call_entry(0, ID_A)]),
        ]);

        let tree = expand_call_tree(&a, &journals, 3);
        // a -> b -> a -> placeholder
        let level1 = &tree.children[0].node;
        let level2 = &level1.children[0].node;
        assert_that!(level2.invocation_id, eq(&a));
        assert_that!(level2.journal, some(anything()));
        let level3 = &level2.children[0].node;
        assert_that!(level3.journal, none());
        assert_that!(level3.children, empty());
    }

    #[test]
    fn non_call_entries_are_not_expanded() {
        let root: InvocationId = ID_A.parse().unwrap();
        let mut entry = call_entry(0, ID_B);
        if let ResolvedJournalEntry::V2(ref mut inner) = entry {
            inner.entry_type = "SendSignal".to_owned();
        }
        let journals = HashMap::from([(root.clone(), vec![entry])]);
        let tree = expand_call_tree(&root, &journals, 4);
        assert_that!(tree.children, empty());
    }
}
