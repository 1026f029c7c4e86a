//! Downline audit: cross-checks a built tree against the flat relation list.
//!
//! Counts are derived twice, once by scanning the relation list and once by
//! walking the tree. Any divergence is reported as data, never hidden.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::domain::entities::{find_node, RelationEntry, TreeNode};

/// Result of auditing one entry's downline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    pub target_id: String,
    pub found: bool,
    pub direct_by_relation: usize,
    pub direct_by_tree: usize,
    pub total_by_relation: usize,
    pub total_by_tree: usize,
    pub mismatch: bool,
    /// Direct referrals as listed in the relation data
    pub direct_list: Vec<RelationEntry>,
}

impl AuditReport {
    fn not_found(target_id: &str) -> Self {
        Self {
            target_id: target_id.to_string(),
            ..Self::default()
        }
    }

    pub fn direct_mismatch(&self) -> bool {
        self.direct_by_relation != self.direct_by_tree
    }

    pub fn total_mismatch(&self) -> bool {
        self.total_by_relation != self.total_by_tree
    }
}

/// Audits downline counts for entries of one snapshot.
///
/// `entries` and `tree` must come from the same snapshot.
pub struct DownlineAuditor<'a> {
    entries: &'a [RelationEntry],
    tree: &'a [TreeNode],
}

impl<'a> DownlineAuditor<'a> {
    pub fn new(entries: &'a [RelationEntry], tree: &'a [TreeNode]) -> Self {
        Self { entries, tree }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn audit(&self, target_id: &str) -> AuditReport {
        if !self.entries.iter().any(|e| e.id == target_id) {
            debug!("audit target not found: {}", target_id);
            return AuditReport::not_found(target_id);
        }

        let direct_list: Vec<RelationEntry> = self
            .direct_referrals(target_id)
            .cloned()
            .collect();
        let direct_by_relation = direct_list.len();
        let total_by_relation = self.total_by_relation(target_id);

        let (direct_by_tree, total_by_tree) = match find_node(self.tree, target_id) {
            Some(node) => (node.children.len(), node.descendant_count()),
            None => {
                debug!("audit target {} has no node in tree", target_id);
                (0, 0)
            }
        };

        let mismatch =
            direct_by_relation != direct_by_tree || total_by_relation != total_by_tree;
        if mismatch {
            warn!(
                "downline mismatch for {}: direct {}/{} total {}/{} (relation/tree)",
                target_id, direct_by_relation, direct_by_tree, total_by_relation, total_by_tree
            );
        }

        AuditReport {
            target_id: target_id.to_string(),
            found: true,
            direct_by_relation,
            direct_by_tree,
            total_by_relation,
            total_by_tree,
            mismatch,
            direct_list,
        }
    }

    fn direct_referrals<'s>(
        &'s self,
        id: &'s str,
    ) -> impl Iterator<Item = &'a RelationEntry> + 's {
        self.entries.iter().filter(move |e| e.is_referred_by(id))
    }

    /// Distinct entries reachable below `target_id`.
    ///
    /// The visited set is global across the whole walk, so an id reachable by
    /// several paths, or through a loop, is counted once. Uses an explicit work
    /// stack; referrer chains are not bounded by the tree depth.
    fn total_by_relation(&self, target_id: &str) -> usize {
        let mut referrals: HashMap<&str, Vec<&str>> = HashMap::new();
        for entry in self.entries {
            if let Some(referrer) = entry.referrer_id.as_deref() {
                referrals.entry(referrer).or_default().push(entry.id.as_str());
            }
        }

        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(target_id);
        let mut stack: Vec<&str> = vec![target_id];
        let mut total = 0;
        while let Some(id) = stack.pop() {
            for &child in referrals.get(id).map(Vec::as_slice).unwrap_or(&[]) {
                if visited.insert(child) {
                    total += 1;
                    stack.push(child);
                }
            }
        }
        total
    }
}

/// Audit `target_id` against `entries` and a tree built from them.
pub fn audit_downline(entries: &[RelationEntry], tree: &[TreeNode], target_id: &str) -> AuditReport {
    DownlineAuditor::new(entries, tree).audit(target_id)
}
