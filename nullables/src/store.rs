//! In-memory record store, thread-safe, for tests and snapshot serving.

use stakeview_store::{DelegationRecord, RecordStore, StoreError, ValidatorDescriptor, VoteRecord};
use stakeview_types::{AccountAddress, OperatorAddress, ProposalId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::RecordSnapshot;

/// An in-memory [`RecordStore`].
/// Thread-safe for use with tokio's multi-threaded runtime.
pub struct MemoryRecordStore {
    tables: RwLock<RecordSnapshot>,
    unavailable: AtomicBool,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::from_snapshot(RecordSnapshot::default())
    }

    pub fn from_snapshot(snapshot: RecordSnapshot) -> Self {
        tracing::debug!(
            delegations = snapshot.delegations.len(),
            votes = snapshot.votes.len(),
            validators = snapshot.validators.len(),
            "memory record store loaded"
        );
        Self {
            tables: RwLock::new(snapshot),
            unavailable: AtomicBool::new(false),
        }
    }

    pub fn push_delegation(&self, record: DelegationRecord) -> Result<(), StoreError> {
        self.write()?.delegations.push(record);
        Ok(())
    }

    pub fn push_vote(&self, record: VoteRecord) -> Result<(), StoreError> {
        self.write()?.votes.push(record);
        Ok(())
    }

    pub fn push_validator(&self, descriptor: ValidatorDescriptor) -> Result<(), StoreError> {
        self.write()?.validators.push(descriptor);
        Ok(())
    }

    /// Simulate the warehouse going away: every query fails with
    /// [`StoreError::Unavailable`] until reset.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::Relaxed);
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, RecordSnapshot>, StoreError> {
        if self.unavailable.load(Ordering::Relaxed) {
            return Err(StoreError::Unavailable("memory store switched off".into()));
        }
        self.tables
            .read()
            .map_err(|e| StoreError::Backend(format!("poisoned lock: {e}")))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, RecordSnapshot>, StoreError> {
        self.tables
            .write()
            .map_err(|e| StoreError::Backend(format!("poisoned lock: {e}")))
    }
}

impl Default for MemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for MemoryRecordStore {
    fn delegation_records(
        &self,
        operator: Option<&OperatorAddress>,
    ) -> Result<Vec<DelegationRecord>, StoreError> {
        Ok(self
            .read()?
            .delegations
            .iter()
            .filter(|r| operator.map_or(true, |op| &r.operator_address == op))
            .cloned()
            .collect())
    }

    fn delegator_records(
        &self,
        delegator: &AccountAddress,
    ) -> Result<Vec<DelegationRecord>, StoreError> {
        Ok(self
            .read()?
            .delegations
            .iter()
            .filter(|r| &r.delegator_address == delegator)
            .cloned()
            .collect())
    }

    fn vote_records(&self, proposal_id: ProposalId) -> Result<Vec<VoteRecord>, StoreError> {
        Ok(self
            .read()?
            .votes
            .iter()
            .filter(|r| r.proposal_id == proposal_id)
            .cloned()
            .collect())
    }

    fn voter_records(&self, voter: &AccountAddress) -> Result<Vec<VoteRecord>, StoreError> {
        Ok(self
            .read()?
            .votes
            .iter()
            .filter(|r| &r.voter == voter)
            .cloned()
            .collect())
    }

    fn validator_descriptors(&self) -> Result<Vec<ValidatorDescriptor>, StoreError> {
        Ok(self.read()?.validators.clone())
    }
}
