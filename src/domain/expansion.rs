//! Expanded/collapsed state for tree rendering.

use std::collections::HashSet;

use serde::Serialize;

use crate::domain::entities::TreeNode;

/// Set of node ids currently expanded in the view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    expanded: HashSet<String>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the state of `id`. Returns the new state.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.expanded.remove(id) {
            false
        } else {
            self.expanded.insert(id.to_string());
            true
        }
    }

    pub fn expand_all<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expanded.extend(ids.into_iter().map(Into::into));
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.expanded.iter().map(String::as_str)
    }
}

/// One rendered line of the tree view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisibleRow {
    pub id: String,
    /// Root rows have depth 1
    pub depth: usize,
    pub has_children: bool,
    pub expanded: bool,
}

/// Rows the renderer shows: roots always, children only below expanded nodes.
pub fn visible_rows(forest: &[TreeNode], state: &ExpansionState) -> Vec<VisibleRow> {
    let mut rows = Vec::new();
    for root in forest {
        push_rows(root, 1, state, &mut rows);
    }
    rows
}

fn push_rows(node: &TreeNode, depth: usize, state: &ExpansionState, rows: &mut Vec<VisibleRow>) {
    let expanded = state.is_expanded(node.id());
    rows.push(VisibleRow {
        id: node.id().to_string(),
        depth,
        has_children: !node.children.is_empty(),
        expanded,
    });
    if expanded {
        for child in &node.children {
            push_rows(child, depth + 1, state, rows);
        }
    }
}
