//! Referral network service
//!
//! Loads a relation snapshot from an entry source and runs the tree engine
//! over it with the configured options.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::domain::{
    audit_downline, check_integrity, forest_stats, AuditReport, EntryFilter, IntegrityReport,
    RelationEntry, TreeBuilder, TreeNode, TreeStats,
};
use crate::infrastructure::traits::EntrySource;

/// A relation snapshot together with the forest built from it.
///
/// Keeping both in one value ensures audits compare a tree with the entries
/// it was built from.
#[derive(Debug, Clone)]
pub struct NetworkSnapshot {
    pub entries: Vec<RelationEntry>,
    pub forest: Vec<TreeNode>,
}

impl NetworkSnapshot {
    pub fn stats(&self) -> TreeStats {
        forest_stats(&self.forest)
    }

    pub fn filtered(&self, filter: &EntryFilter) -> Vec<TreeNode> {
        filter.apply(&self.forest)
    }

    pub fn audit(&self, target_id: &str) -> AuditReport {
        audit_downline(&self.entries, &self.forest, target_id)
    }

    /// Audit every root entry; useful as a whole-network health check.
    pub fn audit_roots(&self) -> Vec<AuditReport> {
        self.forest.iter().map(|root| self.audit(root.id())).collect()
    }

    pub fn integrity(&self) -> IntegrityReport {
        check_integrity(&self.entries)
    }
}

/// Service for building and inspecting referral networks.
pub struct NetworkService {
    source: Arc<dyn EntrySource>,
    builder: TreeBuilder,
}

impl NetworkService {
    pub fn new(source: Arc<dyn EntrySource>, settings: &Settings) -> Self {
        Self {
            source,
            builder: TreeBuilder::new(settings.max_depth).with_policy(settings.depth_policy),
        }
    }

    pub fn builder(&self) -> &TreeBuilder {
        &self.builder
    }

    /// Load a fresh snapshot and build its forest.
    #[instrument(level = "debug", skip(self), fields(source = %self.source.describe()))]
    pub fn snapshot(&self) -> ApplicationResult<NetworkSnapshot> {
        let entries = self.source.load()?;
        let forest = self.builder.build(&entries);
        let stats = forest_stats(&forest);
        info!(
            "built {} trees with {} nodes from {} entries",
            stats.roots,
            stats.nodes,
            entries.len()
        );
        if stats.nodes < entries.len() {
            debug!(
                "{} entries not placed in any tree",
                entries.len() - stats.nodes
            );
        }
        Ok(NetworkSnapshot { entries, forest })
    }

    pub fn tree(&self) -> ApplicationResult<Vec<TreeNode>> {
        Ok(self.snapshot()?.forest)
    }

    pub fn filtered(&self, filter: &EntryFilter) -> ApplicationResult<Vec<TreeNode>> {
        Ok(self.snapshot()?.filtered(filter))
    }

    pub fn audit(&self, target_id: &str) -> ApplicationResult<AuditReport> {
        Ok(self.snapshot()?.audit(target_id))
    }

    pub fn integrity(&self) -> ApplicationResult<IntegrityReport> {
        Ok(self.snapshot()?.integrity())
    }
}
