//! Nullable infrastructure for deterministic testing.
//!
//! The warehouse behind [`RecordStore`](stakeview_store::RecordStore) is an
//! external system. This crate provides an in-memory implementation that:
//! - Returns exactly the rows it was given, all revisions included
//! - Can be controlled programmatically (including simulated outages)
//! - Can be loaded from a JSON snapshot of the warehouse tables
//!
//! Usage: swap the real warehouse client for [`MemoryRecordStore`] in tests,
//! or serve a static snapshot with the daemon.

pub mod snapshot;
pub mod store;

pub use snapshot::RecordSnapshot;
pub use store::MemoryRecordStore;
