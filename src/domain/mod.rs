//! Domain layer: entities and tree algorithms
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod audit;
pub mod builder;
pub mod entities;
pub mod error;
pub mod expansion;
pub mod filter;
pub mod integrity;

pub use audit::{audit_downline, AuditReport, DownlineAuditor};
pub use builder::{build_tree, find_root_entries, DepthPolicy, TreeBuilder, DEFAULT_MAX_DEPTH};
pub use entities::*;
pub use error::DomainError;
pub use expansion::{visible_rows, ExpansionState, VisibleRow};
pub use filter::{filter_tree, EntryFilter};
pub use integrity::{check_integrity, IntegrityReport};
