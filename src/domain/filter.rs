//! Ancestor-preserving tree filter and the standard entry predicate.

use regex::{Regex, RegexBuilder};
use tracing::{debug, instrument};

use crate::domain::entities::{RelationEntry, TreeNode};
use crate::domain::error::DomainError;

/// Derive a pruned copy of `forest`.
///
/// A node survives if it matches `predicate` or has a matching descendant.
/// Surviving nodes keep only surviving children. The input is never mutated.
#[instrument(level = "debug", skip_all, fields(roots = forest.len()))]
pub fn filter_tree<P>(forest: &[TreeNode], predicate: P) -> Vec<TreeNode>
where
    P: Fn(&RelationEntry) -> bool,
{
    let kept: Vec<TreeNode> = forest
        .iter()
        .filter_map(|root| prune(root, &predicate))
        .collect();
    debug!("{} of {} roots kept", kept.len(), forest.len());
    kept
}

fn prune<P>(node: &TreeNode, predicate: &P) -> Option<TreeNode>
where
    P: Fn(&RelationEntry) -> bool,
{
    let children: Vec<TreeNode> = node
        .children
        .iter()
        .filter_map(|child| prune(child, predicate))
        .collect();

    if predicate(&node.entry) || !children.is_empty() {
        Some(TreeNode {
            entry: node.entry.clone(),
            children,
        })
    } else {
        None
    }
}

/// How the search text is matched against name and email.
#[derive(Debug, Clone)]
enum SearchMatcher {
    Substring { needle: String, case_sensitive: bool },
    Pattern(Regex),
}

impl SearchMatcher {
    fn is_match(&self, haystack: &str) -> bool {
        match self {
            SearchMatcher::Substring {
                needle,
                case_sensitive: true,
            } => haystack.contains(needle.as_str()),
            SearchMatcher::Substring { needle, .. } => {
                haystack.to_lowercase().contains(needle.as_str())
            }
            SearchMatcher::Pattern(re) => re.is_match(haystack),
        }
    }
}

/// Search and status predicate used by the dashboard.
///
/// An empty filter matches every entry.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    search: Option<SearchMatcher>,
    qualifies: Option<bool>,
}

impl EntryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive substring search on display name and email.
    ///
    /// Blank text clears the search.
    pub fn search(mut self, text: &str) -> Self {
        self.search = Self::substring(text, false);
        self
    }

    pub fn search_case_sensitive(mut self, text: &str) -> Self {
        self.search = Self::substring(text, true);
        self
    }

    /// Regex search on display name and email (case-insensitive).
    pub fn pattern(mut self, pattern: &str) -> Result<Self, DomainError> {
        let re = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| DomainError::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })?;
        self.search = Some(SearchMatcher::Pattern(re));
        Ok(self)
    }

    /// Require `qualifies` to equal the given value.
    pub fn qualifies(mut self, qualifies: Option<bool>) -> Self {
        self.qualifies = qualifies;
        self
    }

    fn substring(text: &str, case_sensitive: bool) -> Option<SearchMatcher> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let needle = if case_sensitive {
            text.to_string()
        } else {
            text.to_lowercase()
        };
        Some(SearchMatcher::Substring {
            needle,
            case_sensitive,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_none() && self.qualifies.is_none()
    }

    pub fn matches(&self, entry: &RelationEntry) -> bool {
        if let Some(wanted) = self.qualifies {
            if entry.qualifies != wanted {
                return false;
            }
        }
        match &self.search {
            Some(matcher) => matcher.is_match(&entry.display_name) || matcher.is_match(&entry.email),
            None => true,
        }
    }

    /// Apply this filter to a forest.
    pub fn apply(&self, forest: &[TreeNode]) -> Vec<TreeNode> {
        filter_tree(forest, |entry| self.matches(entry))
    }
}
