//! # Formats
//!
//! Byte-level encodings of metamodel snapshots. File I/O stays in the app
//! layer.

pub mod snapshot;

pub use snapshot::{SnapshotHeader, snapshot_from_bytes, snapshot_to_bytes};
