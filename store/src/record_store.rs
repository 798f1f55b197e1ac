//! The query interface the reporting layer consumes.

use stakeview_types::{AccountAddress, OperatorAddress, ProposalId};

use crate::records::{DelegationRecord, ValidatorDescriptor, VoteRecord};
use crate::StoreError;

/// Read-only access to the revisioned ledger history.
///
/// Implementations return every revision they hold for the requested rows,
/// in any order. Callers must not assume uniqueness per logical key.
pub trait RecordStore: Send + Sync {
    /// All delegation revisions, optionally restricted to one validator.
    fn delegation_records(
        &self,
        operator: Option<&OperatorAddress>,
    ) -> Result<Vec<DelegationRecord>, StoreError>;

    /// All delegation revisions made by one account, across validators.
    fn delegator_records(
        &self,
        delegator: &AccountAddress,
    ) -> Result<Vec<DelegationRecord>, StoreError>;

    /// All vote revisions cast on a proposal.
    fn vote_records(&self, proposal_id: ProposalId) -> Result<Vec<VoteRecord>, StoreError>;

    /// All vote revisions cast by one account, across proposals.
    fn voter_records(&self, voter: &AccountAddress) -> Result<Vec<VoteRecord>, StoreError>;

    /// All validator descriptor revisions.
    fn validator_descriptors(&self) -> Result<Vec<ValidatorDescriptor>, StoreError>;
}
