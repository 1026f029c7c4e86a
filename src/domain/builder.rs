//! Tree builder for reconstructing referral hierarchies from flat relation lists.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::domain::entities::{RelationEntry, TreeNode};
use crate::domain::error::DomainError;

/// Default bound on tree depth.
pub const DEFAULT_MAX_DEPTH: u32 = 5;

/// How the depth of an attached child is determined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DepthPolicy {
    /// Trust the child's reported `level` for the depth bound.
    #[default]
    Reported,
    /// Ignore `level`; a child sits one below its parent.
    PathDepth,
}

impl fmt::Display for DepthPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DepthPolicy::Reported => write!(f, "reported"),
            DepthPolicy::PathDepth => write!(f, "path-depth"),
        }
    }
}

impl FromStr for DepthPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reported" => Ok(DepthPolicy::Reported),
            "path-depth" | "path_depth" | "path" => Ok(DepthPolicy::PathDepth),
            other => Err(DomainError::InvalidDepthPolicy(other.to_string())),
        }
    }
}

/// Constructs referral trees from a flat list of relation entries.
///
/// Building never fails: dangling referrers, cycles and out-of-range levels
/// only cause the affected branch to be left out.
#[derive(Debug, Clone, Copy)]
pub struct TreeBuilder {
    max_depth: u32,
    policy: DepthPolicy,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

/// Children lookup keyed by referrer id, preserving input order.
struct RelationshipCache<'a> {
    children: HashMap<&'a str, Vec<&'a RelationEntry>>,
}

impl<'a> RelationshipCache<'a> {
    fn new(entries: &'a [RelationEntry]) -> Self {
        let mut children: HashMap<&'a str, Vec<&'a RelationEntry>> = HashMap::new();
        for entry in entries {
            if let Some(referrer) = entry.referrer_id.as_deref() {
                children.entry(referrer).or_default().push(entry);
            }
        }
        Self { children }
    }

    fn children_of(&self, id: &str) -> &[&'a RelationEntry] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl TreeBuilder {
    pub fn new(max_depth: u32) -> Self {
        if max_depth == 0 {
            warn!("max_depth 0 is not meaningful, using 1");
        }
        Self {
            max_depth: max_depth.max(1),
            policy: DepthPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: DepthPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    pub fn policy(&self) -> DepthPolicy {
        self.policy
    }

    /// Build one tree per root entry.
    #[instrument(level = "debug", skip(self, entries), fields(entries = entries.len(), max_depth = self.max_depth))]
    pub fn build(&self, entries: &[RelationEntry]) -> Vec<TreeNode> {
        let cache = RelationshipCache::new(entries);
        let roots = find_root_entries(entries);
        debug!("found {} root entries", roots.len());

        let mut trees = Vec::with_capacity(roots.len());
        for root in roots {
            // Reset per tree: the cycle guard tracks the current path only
            let mut path: HashSet<&str> = HashSet::new();
            trees.push(self.build_node(root, 1, 1, &cache, &mut path));
        }
        trees
    }

    fn build_node<'a>(
        &self,
        entry: &'a RelationEntry,
        depth: u32,
        path_len: u32,
        cache: &RelationshipCache<'a>,
        path: &mut HashSet<&'a str>,
    ) -> TreeNode {
        let mut node = TreeNode::new(entry.clone());
        path.insert(entry.id.as_str());

        for &child in cache.children_of(&entry.id) {
            if path.contains(child.id.as_str()) {
                warn!(
                    "cycle detected: {} already on path, not attaching under {}",
                    child.id, entry.id
                );
                continue;
            }
            let child_depth = self.child_depth(depth, child);
            if child_depth > self.max_depth || path_len + 1 > self.max_depth {
                debug!(
                    "depth bound: skipping {} (depth {}, path {}) under {}",
                    child.id,
                    child_depth,
                    path_len + 1,
                    entry.id
                );
                continue;
            }
            node.children
                .push(self.build_node(child, child_depth, path_len + 1, cache, path));
        }

        path.remove(entry.id.as_str());
        node
    }

    fn child_depth(&self, parent_depth: u32, child: &RelationEntry) -> u32 {
        match self.policy {
            DepthPolicy::Reported => child.level,
            DepthPolicy::PathDepth => parent_depth + 1,
        }
    }
}

/// Root candidates: entries reported at level 1.
///
/// Falls back to entries whose referrer is absent or not in the list when no
/// entry carries level 1.
pub fn find_root_entries(entries: &[RelationEntry]) -> Vec<&RelationEntry> {
    let by_level: Vec<&RelationEntry> = entries.iter().filter(|e| e.level == 1).collect();
    if !by_level.is_empty() {
        return by_level;
    }

    let ids: HashSet<&str> = entries.iter().map(|e| e.id.as_str()).collect();
    entries
        .iter()
        .filter(|e| match e.referrer_id.as_deref() {
            None => true,
            Some(referrer) => !ids.contains(referrer),
        })
        .collect()
}

/// Build trees with the default depth policy.
pub fn build_tree(entries: &[RelationEntry], max_depth: u32) -> Vec<TreeNode> {
    TreeBuilder::new(max_depth).build(entries)
}
