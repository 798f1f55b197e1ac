//! Abstract record store for stakeview.
//!
//! The warehouse that holds the indexed ledger history is an external
//! collaborator. Every backend (SQL warehouse, in-memory snapshot for tests)
//! implements [`RecordStore`]; the rest of the codebase depends only on the
//! trait and on the raw row types defined here.
//!
//! Rows are append-only and revisioned by [`Height`](stakeview_types::Height):
//! a store returns *all* revisions it holds and leaves de-duplication to the
//! governance crate.

pub mod error;
pub mod record_store;
pub mod records;

pub use error::StoreError;
pub use record_store::RecordStore;
pub use records::{
    DelegationRecord, RawVoteOption, RawWeightedOption, ValidatorDescriptor, VoteRecord,
};
