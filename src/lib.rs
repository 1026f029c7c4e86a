//! refnet - referral network tree engine
//!
//! Rebuilds referral hierarchies from flat relation lists, derives
//! ancestor-preserving filtered views, and audits built trees against
//! counts derived straight from the relation data.
//!
//! # Layers
//!
//! - `domain`: entries, tree builder, filter, auditor, expansion state
//! - `application`: payload ingestion and the network service
//! - `infrastructure`: entry sources, filesystem access, wiring
//! - `cli`: argument parsing, command dispatch, terminal output
//!
//! # Example
//!
//! ```
//! use refnet::domain::{audit_downline, build_tree, EntryFilter, RelationEntry};
//!
//! let entries = vec![
//!     RelationEntry::new("u1", None, 1),
//!     RelationEntry::new("u2", Some("u1"), 2).with_name("Ann"),
//! ];
//! let forest = build_tree(&entries, 5);
//! assert_eq!(forest[0].children.len(), 1);
//!
//! let filtered = EntryFilter::new().search("ann").apply(&forest);
//! assert_eq!(filtered[0].children[0].entry.id, "u2");
//!
//! let report = audit_downline(&entries, &forest, "u1");
//! assert!(!report.mismatch);
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;
