//! Domain entities: core data structures

use serde::{Deserialize, Serialize};

/// One person in the referral network, relative to the viewer.
///
/// Parent/child relations are expressed only through `referrer_id == id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationEntry {
    /// Identifier of this referral record
    pub id: String,
    /// Id of the referring entry, None for direct referrals of the owner
    #[serde(default)]
    pub referrer_id: Option<String>,
    /// Depth reported by the data source (advisory)
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub email: String,
    /// Qualification status flag
    #[serde(default)]
    pub qualifies: bool,
}

impl RelationEntry {
    pub fn new(id: impl Into<String>, referrer_id: Option<&str>, level: u32) -> Self {
        Self {
            id: id.into(),
            referrer_id: referrer_id.map(str::to_string),
            level,
            display_name: String::new(),
            email: String::new(),
            qualifies: false,
        }
    }

    pub fn with_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn qualified(mut self, qualifies: bool) -> Self {
        self.qualifies = qualifies;
        self
    }

    /// True if this entry names `id` as its referrer.
    pub fn is_referred_by(&self, id: &str) -> bool {
        self.referrer_id.as_deref() == Some(id)
    }
}

/// Node of a reconstructed referral tree.
///
/// A tree exclusively owns its children; cloning yields an independent deep copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    pub entry: RelationEntry,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(entry: RelationEntry) -> Self {
        Self {
            entry,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.entry.id
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of levels in this subtree, the node itself counting as 1.
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|child| child.depth())
            .max()
            .unwrap_or(0)
    }

    /// Number of nodes in this subtree, including the node itself.
    pub fn node_count(&self) -> usize {
        1 + self.descendant_count()
    }

    /// Number of nodes below this one.
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| child.node_count())
            .sum()
    }

    /// Ids of all leaves, left to right.
    pub fn leaf_ids(&self) -> Vec<String> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves(&self, leaves: &mut Vec<String>) {
        if self.children.is_empty() {
            leaves.push(self.entry.id.clone());
        } else {
            for child in &self.children {
                child.collect_leaves(leaves);
            }
        }
    }

    /// Depth-first search by entry id.
    pub fn find(&self, id: &str) -> Option<&TreeNode> {
        if self.entry.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Pre-order iterator over the subtree.
    pub fn iter(&self) -> PreOrderIter<'_> {
        PreOrderIter { stack: vec![self] }
    }

    /// All root-to-leaf id paths.
    pub fn branches(&self) -> Vec<Vec<String>> {
        let mut branches = Vec::new();
        let mut path = Vec::new();
        self.collect_branches(&mut path, &mut branches);
        branches
    }

    fn collect_branches(&self, path: &mut Vec<String>, branches: &mut Vec<Vec<String>>) {
        path.push(self.entry.id.clone());
        if self.children.is_empty() {
            branches.push(path.clone());
        } else {
            for child in &self.children {
                child.collect_branches(path, branches);
            }
        }
        path.pop();
    }
}

pub struct PreOrderIter<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        for child in node.children.iter().rev() {
            self.stack.push(child);
        }
        Some(node)
    }
}

/// Depth-first search across a forest.
pub fn find_node<'a>(forest: &'a [TreeNode], id: &str) -> Option<&'a TreeNode> {
    forest.iter().find_map(|root| root.find(id))
}

/// Pre-order iterator over every node of a forest.
pub fn iter_forest(forest: &[TreeNode]) -> impl Iterator<Item = &TreeNode> {
    forest.iter().flat_map(|root| root.iter())
}

/// Summary figures for a forest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TreeStats {
    pub roots: usize,
    pub nodes: usize,
    pub leaves: usize,
    pub max_depth: usize,
}

pub fn forest_stats(forest: &[TreeNode]) -> TreeStats {
    TreeStats {
        roots: forest.len(),
        nodes: forest.iter().map(TreeNode::node_count).sum(),
        leaves: iter_forest(forest).filter(|n| n.is_leaf()).count(),
        max_depth: forest.iter().map(TreeNode::depth).max().unwrap_or(0),
    }
}
