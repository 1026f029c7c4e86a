//! Data quality check over a relation snapshot.
//!
//! None of the findings stop a build; they explain why branches go missing.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::instrument;

use crate::domain::entities::RelationEntry;

/// Findings of [`check_integrity`], each list in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrityReport {
    pub entries: usize,
    /// Ids appearing on more than one row
    pub duplicate_ids: Vec<String>,
    /// Entries naming themselves as referrer
    pub self_referrals: Vec<String>,
    /// (entry id, referrer id) where the referrer is not in the list
    pub dangling_referrers: Vec<(String, String)>,
    /// Entries lying on a referrer loop
    pub cycle_members: Vec<String>,
    /// Entries without a usable level
    pub missing_levels: Vec<String>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.duplicate_ids.is_empty()
            && self.self_referrals.is_empty()
            && self.dangling_referrers.is_empty()
            && self.cycle_members.is_empty()
            && self.missing_levels.is_empty()
    }

    pub fn issue_count(&self) -> usize {
        self.duplicate_ids.len()
            + self.self_referrals.len()
            + self.dangling_referrers.len()
            + self.cycle_members.len()
            + self.missing_levels.len()
    }
}

#[instrument(level = "debug", skip_all, fields(entries = entries.len()))]
pub fn check_integrity(entries: &[RelationEntry]) -> IntegrityReport {
    let mut report = IntegrityReport {
        entries: entries.len(),
        ..IntegrityReport::default()
    };

    let mut seen: HashSet<&str> = HashSet::new();
    let mut reported: HashSet<&str> = HashSet::new();
    for entry in entries {
        if !seen.insert(entry.id.as_str()) && reported.insert(entry.id.as_str()) {
            report.duplicate_ids.push(entry.id.clone());
        }
    }

    for entry in entries {
        if entry.level == 0 {
            report.missing_levels.push(entry.id.clone());
        }
        match entry.referrer_id.as_deref() {
            Some(referrer) if referrer == entry.id => {
                report.self_referrals.push(entry.id.clone());
            }
            Some(referrer) if !seen.contains(referrer) => {
                report
                    .dangling_referrers
                    .push((entry.id.clone(), referrer.to_string()));
            }
            _ => {}
        }
    }

    report.cycle_members = find_cycle_members(entries);
    report
}

/// Ids whose referrer chain leads back to themselves.
///
/// Self-referrals are reported separately and not repeated here.
fn find_cycle_members(entries: &[RelationEntry]) -> Vec<String> {
    // First row wins for duplicated ids
    let mut referrer_of: HashMap<&str, &str> = HashMap::new();
    for entry in entries {
        if let Some(referrer) = entry.referrer_id.as_deref() {
            if referrer != entry.id {
                referrer_of.entry(entry.id.as_str()).or_insert(referrer);
            }
        }
    }

    let mut on_cycle: HashSet<&str> = HashSet::new();
    let mut settled: HashSet<&str> = HashSet::new();
    for entry in entries {
        let start = entry.id.as_str();
        if settled.contains(start) {
            continue;
        }
        let mut chain: Vec<&str> = Vec::new();
        let mut position: HashMap<&str, usize> = HashMap::new();
        let mut current = Some(start);
        while let Some(id) = current {
            if settled.contains(id) {
                break;
            }
            if let Some(&idx) = position.get(id) {
                on_cycle.extend(chain[idx..].iter().copied());
                break;
            }
            position.insert(id, chain.len());
            chain.push(id);
            current = referrer_of.get(id).copied();
        }
        settled.extend(chain);
    }

    let mut members = Vec::new();
    let mut emitted: HashSet<&str> = HashSet::new();
    for entry in entries {
        let id = entry.id.as_str();
        if on_cycle.contains(id) && emitted.insert(id) {
            members.push(entry.id.clone());
        }
    }
    members
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_forest() {
        let entries = vec![
            RelationEntry::new("a", None, 1),
            RelationEntry::new("b", Some("a"), 2),
        ];
        let report = check_integrity(&entries);
        assert!(report.is_clean(), "{:?}", report);
        assert_eq!(report.entries, 2);
    }

    #[test]
    fn test_detects_every_issue_kind() {
        let entries = vec![
            RelationEntry::new("a", None, 1),
            RelationEntry::new("a", Some("x"), 2),
            RelationEntry::new("s", Some("s"), 2),
            RelationEntry::new("c1", Some("c2"), 2),
            RelationEntry::new("c2", Some("c1"), 0),
        ];
        let report = check_integrity(&entries);
        assert_eq!(report.duplicate_ids, vec!["a"]);
        assert_eq!(report.self_referrals, vec!["s"]);
        assert_eq!(
            report.dangling_referrers,
            vec![("a".to_string(), "x".to_string())]
        );
        assert_eq!(report.cycle_members, vec!["c1", "c2"]);
        assert_eq!(report.missing_levels, vec!["c2"]);
        assert_eq!(report.issue_count(), 6);
    }

    #[test]
    fn test_chain_into_cycle_marks_only_loop() {
        let entries = vec![
            RelationEntry::new("tail", Some("x"), 3),
            RelationEntry::new("x", Some("y"), 2),
            RelationEntry::new("y", Some("x"), 2),
        ];
        let report = check_integrity(&entries);
        assert_eq!(report.cycle_members, vec!["x", "y"]);
    }
}
