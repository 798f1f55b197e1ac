//! Last-write-wins reduction of revisioned rows.
//!
//! The warehouse keeps every revision of every row. For each logical key
//! (delegator + validator, voter + proposal, operator) only the row with the
//! highest [`Height`] is current. When two rows share a key and a height, the
//! one pushed last wins.
//!
//! Rows whose current revision is a removal (e.g. a zero-stake undelegation)
//! are dropped from the result entirely: downstream code distinguishes an
//! absent key from a zero one.

use stakeview_store::{DelegationRecord, ValidatorDescriptor, VoteRecord};
use stakeview_types::{AccountAddress, Height, OperatorAddress, ProposalId};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;

/// A row that carries a logical key and a revision height.
pub trait Revisioned {
    type Key: Eq + Hash + Clone;

    fn key(&self) -> Self::Key;

    fn revision(&self) -> Height;

    /// Whether this revision retires the key.
    fn is_removal(&self) -> bool {
        false
    }
}

/// Folds a stream of revisions into the current row per key.
pub struct LatestStateReducer<R: Revisioned> {
    latest: HashMap<R::Key, R>,
}

impl<R: Revisioned> LatestStateReducer<R> {
    pub fn new() -> Self {
        Self {
            latest: HashMap::new(),
        }
    }

    /// Offer one revision. Replaces the held row when `record` is at least as new.
    pub fn push(&mut self, record: R) {
        match self.latest.entry(record.key()) {
            Entry::Occupied(mut held) => {
                if record.revision() >= held.get().revision() {
                    held.insert(record);
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(record);
            }
        }
    }

    /// Number of distinct keys seen so far, removals included.
    pub fn key_count(&self) -> usize {
        self.latest.len()
    }

    /// The current row per key, with removals dropped.
    pub fn finish(self) -> HashMap<R::Key, R> {
        self.latest
            .into_iter()
            .filter(|(_, record)| !record.is_removal())
            .collect()
    }

    /// Reduce a whole batch in one call. An empty input yields an empty map.
    pub fn reduce(records: impl IntoIterator<Item = R>) -> HashMap<R::Key, R> {
        let mut reducer = Self::new();
        reducer.extend(records);
        reducer.finish()
    }
}

impl<R: Revisioned> Default for LatestStateReducer<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Revisioned> Extend<R> for LatestStateReducer<R> {
    fn extend<I: IntoIterator<Item = R>>(&mut self, iter: I) {
        for record in iter {
            self.push(record);
        }
    }
}

impl Revisioned for DelegationRecord {
    type Key = (AccountAddress, OperatorAddress);

    fn key(&self) -> Self::Key {
        (self.delegator_address.clone(), self.operator_address.clone())
    }

    fn revision(&self) -> Height {
        self.height
    }

    /// Only strictly positive stakes are active delegations.
    fn is_removal(&self) -> bool {
        !self.stake_amount.is_positive()
    }
}

impl Revisioned for VoteRecord {
    type Key = (AccountAddress, ProposalId);

    fn key(&self) -> Self::Key {
        (self.voter.clone(), self.proposal_id)
    }

    fn revision(&self) -> Height {
        self.height
    }
}

impl Revisioned for ValidatorDescriptor {
    type Key = OperatorAddress;

    fn key(&self) -> Self::Key {
        self.operator_address.clone()
    }

    fn revision(&self) -> Height {
        self.height
    }
}
