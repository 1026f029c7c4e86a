//! Conversion of referral trees into `termtree` display trees.

use termtree::Tree;
use tracing::instrument;

use crate::domain::{RelationEntry, TreeNode};

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

/// Display label of a node: id, name and qualification marker.
pub fn node_label(entry: &RelationEntry) -> String {
    let mut label = entry.id.clone();
    if !entry.display_name.is_empty() {
        label.push_str(&format!(" {}", entry.display_name));
    }
    if !entry.email.is_empty() {
        label.push_str(&format!(" <{}>", entry.email));
    }
    if entry.qualifies {
        label.push_str(" [Q]");
    }
    label
}

impl TreeNodeConvert for TreeNode {
    #[instrument(level = "trace", skip(self), fields(id = %self.entry.id))]
    fn to_tree_string(&self) -> Tree<String> {
        let leaves: Vec<_> = self.children.iter().map(|c| c.to_tree_string()).collect();
        Tree::new(node_label(&self.entry)).with_leaves(leaves)
    }
}

// A forest renders under a synthetic owner node
impl TreeNodeConvert for [TreeNode] {
    fn to_tree_string(&self) -> Tree<String> {
        if self.is_empty() {
            return Tree::new("Empty tree".to_string());
        }
        let leaves: Vec<_> = self.iter().map(|root| root.to_tree_string()).collect();
        Tree::new("(owner)".to_string()).with_leaves(leaves)
    }
}
