//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (EntrySource, FileSystem)
//! but are themselves concrete structs, not traits.

mod network;

pub use network::{NetworkService, NetworkSnapshot};
