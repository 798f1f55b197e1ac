//! Query → indices → attribution, off the async runtime.
//!
//! Every call fetches fresh rows from the [`RecordStore`], builds the
//! indices it needs and drops them when done. Nothing derived is cached.

use std::sync::Arc;

use stakeview_governance::{
    AttributedValidatorResult, CurrentVote, DelegationIndex, OptionFilter, ValidatorDirectory,
    ValidatorPowerTable, ValidatorStanding, ValidatorVoteAttributor, VoteIndex, VoteSummary,
};
use stakeview_store::{RecordStore, ValidatorDescriptor};
use stakeview_types::{AccountAddress, OperatorAddress, ProposalId, StakeAmount};

use crate::RpcError;

/// Proposal-wide attribution plus the descriptors it was driven by.
pub struct ProposalAttribution {
    pub results: Vec<AttributedValidatorResult>,
    pub directory: ValidatorDirectory,
    /// Voters whose latest vote could not be decoded.
    pub rejected_votes: usize,
}

pub struct SingleAttribution {
    pub result: AttributedValidatorResult,
    pub descriptor: Option<ValidatorDescriptor>,
}

pub struct ValidatorReport {
    pub standing: ValidatorStanding,
    pub descriptor: Option<ValidatorDescriptor>,
}

/// An account's current stakes, largest first.
pub struct AccountDelegations {
    pub delegations: Vec<(OperatorAddress, StakeAmount)>,
    pub total_staked: StakeAmount,
    pub directory: ValidatorDirectory,
}

pub struct AccountVote {
    pub proposal_id: ProposalId,
    pub vote: CurrentVote,
}

#[derive(Clone)]
pub struct GovernanceService {
    store: Arc<dyn RecordStore>,
    active_set_size: usize,
}

impl GovernanceService {
    pub fn new(store: Arc<dyn RecordStore>, active_set_size: usize) -> Self {
        Self {
            store,
            active_set_size,
        }
    }

    /// Run `work` against the store on the blocking pool.
    async fn blocking<T, F>(&self, work: F) -> Result<T, RpcError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn RecordStore, usize) -> Result<T, RpcError> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let active_set_size = self.active_set_size;
        tokio::task::spawn_blocking(move || work(store.as_ref(), active_set_size))
            .await
            .map_err(|e| RpcError::Server(format!("attribution task failed: {e}")))?
    }

    /// Every validator with a signal on `proposal_id`, in voting-power rank order.
    pub async fn proposal_validators(
        &self,
        proposal_id: ProposalId,
        filter: Option<OptionFilter>,
    ) -> Result<ProposalAttribution, RpcError> {
        self.blocking(move |store, active_set_size| {
            let delegations = DelegationIndex::build(store.delegation_records(None)?);
            let votes = VoteIndex::build(store.vote_records(proposal_id)?);
            let directory = ValidatorDirectory::build(store.validator_descriptors()?);

            let ordered = ValidatorPowerTable::from_index(&delegations, active_set_size)
                .ordered_descriptors(&directory);
            let results = ValidatorVoteAttributor::new(&delegations, &votes)
                .attribute_all(proposal_id, &ordered, filter);
            tracing::debug!(
                proposal_id = %proposal_id,
                validators = results.len(),
                rejected_votes = votes.rejected(),
                "proposal attributed"
            );
            Ok(ProposalAttribution {
                results,
                directory,
                rejected_votes: votes.rejected(),
            })
        })
        .await
    }

    pub async fn proposal_validator(
        &self,
        proposal_id: ProposalId,
        operator: OperatorAddress,
    ) -> Result<SingleAttribution, RpcError> {
        self.blocking(move |store, _| {
            let delegations = DelegationIndex::build(store.delegation_records(Some(&operator))?);
            let votes = VoteIndex::build(store.vote_records(proposal_id)?);
            let directory = ValidatorDirectory::build(store.validator_descriptors()?);

            let result = ValidatorVoteAttributor::new(&delegations, &votes)
                .attribute_one(proposal_id, &operator, &directory)?;
            Ok(SingleAttribution {
                result,
                descriptor: directory.get(&operator).cloned(),
            })
        })
        .await
    }

    pub async fn proposal_summary(&self, proposal_id: ProposalId) -> Result<VoteSummary, RpcError> {
        self.blocking(move |store, _| {
            let votes = VoteIndex::build(store.vote_records(proposal_id)?);
            Ok(VoteSummary::tally(proposal_id, &votes))
        })
        .await
    }

    pub async fn validator(&self, operator: OperatorAddress) -> Result<ValidatorReport, RpcError> {
        self.blocking(move |store, active_set_size| {
            let delegations = DelegationIndex::build(store.delegation_records(None)?);
            let directory = ValidatorDirectory::build(store.validator_descriptors()?);
            let descriptor = directory.get(&operator).cloned();

            let votes = match descriptor.as_ref().and_then(|d| d.self_delegate_address.as_ref()) {
                Some(account) => VoteIndex::build(store.voter_records(account)?),
                None => VoteIndex::default(),
            };
            let table = ValidatorPowerTable::from_index(&delegations, active_set_size);
            let standing = ValidatorStanding::compute(&operator, &table, &delegations, &votes, &directory)?;
            Ok(ValidatorReport {
                standing,
                descriptor,
            })
        })
        .await
    }

    /// The account's current votes, newest first.
    pub async fn account_votes(
        &self,
        address: AccountAddress,
        proposal_id: Option<ProposalId>,
    ) -> Result<Vec<AccountVote>, RpcError> {
        self.blocking(move |store, _| {
            let votes = VoteIndex::build(store.voter_records(&address)?);
            Ok(votes
                .votes_by(&address)
                .into_iter()
                .filter(|(id, _)| proposal_id.map_or(true, |wanted| *id == wanted))
                .map(|(proposal_id, vote)| AccountVote {
                    proposal_id,
                    vote: vote.clone(),
                })
                .collect())
        })
        .await
    }

    pub async fn account_delegations(&self, address: AccountAddress) -> Result<AccountDelegations, RpcError> {
        self.blocking(move |store, _| {
            let index = DelegationIndex::build(store.delegator_records(&address)?);
            let mut delegations: Vec<(OperatorAddress, StakeAmount)> = index
                .delegations_by(&address)
                .map(|(operator, stake)| (operator.clone(), stake))
                .collect();
            // Stable sort keeps address order among equal stakes.
            delegations.sort_by(|a, b| b.1.cmp(&a.1));
            let directory = ValidatorDirectory::build(store.validator_descriptors()?);
            Ok(AccountDelegations {
                total_staked: index.staked_by(&address),
                delegations,
                directory,
            })
        })
        .await
    }

    pub async fn total_bonded(&self) -> Result<StakeAmount, RpcError> {
        self.blocking(|store, _| Ok(DelegationIndex::build(store.delegation_records(None)?).total_bonded()))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stakeview_nullables::MemoryRecordStore;
    use stakeview_store::{DelegationRecord, RawVoteOption, VoteRecord};
    use stakeview_types::{Height, TxHash};

    fn store() -> Arc<MemoryRecordStore> {
        let store = Arc::new(MemoryRecordStore::new());
        store
            .push_validator(ValidatorDescriptor {
                self_delegate_address: Some(AccountAddress::new("cosmos1self")),
                ..ValidatorDescriptor::bare(OperatorAddress::new("cosmosvaloper1v"))
            })
            .unwrap();
        for (delegator, stake) in [("cosmos1self", 100u128), ("cosmos1a", 40), ("cosmos1b", 60)] {
            store
                .push_delegation(DelegationRecord {
                    delegator_address: AccountAddress::new(delegator),
                    operator_address: OperatorAddress::new("cosmosvaloper1v"),
                    stake_amount: StakeAmount::new(stake),
                    height: Height::new(1),
                })
                .unwrap();
        }
        store
    }

    fn vote(voter: &str, option: RawVoteOption) -> VoteRecord {
        VoteRecord {
            voter: AccountAddress::new(voter),
            proposal_id: ProposalId::new(3),
            option,
            height: Height::new(10),
            tx_hash: TxHash::ZERO,
        }
    }

    #[tokio::test]
    async fn proposal_attribution_counts_undecodable_votes() {
        let store = store();
        store.push_vote(vote("cosmos1a", RawVoteOption::single("VOTE_OPTION_YES"))).unwrap();
        store.push_vote(vote("cosmos1b", RawVoteOption::single("VOTE_OPTION_MAYBE"))).unwrap();
        let service = GovernanceService::new(store, 10);

        let attribution = service.proposal_validators(ProposalId::new(3), None).await.unwrap();
        assert_eq!(attribution.rejected_votes, 1);
        assert_eq!(attribution.results.len(), 1);
        assert_eq!(attribution.results[0].delegators.yes.voter_count, 1);
    }

    #[tokio::test]
    async fn account_delegations_largest_first() {
        let store = store();
        store
            .push_delegation(DelegationRecord {
                delegator_address: AccountAddress::new("cosmos1a"),
                operator_address: OperatorAddress::new("cosmosvaloper1w"),
                stake_amount: StakeAmount::new(90),
                height: Height::new(2),
            })
            .unwrap();
        let service = GovernanceService::new(store, 10);

        let held = service.account_delegations(AccountAddress::new("cosmos1a")).await.unwrap();
        let operators: Vec<&str> = held.delegations.iter().map(|(op, _)| op.as_str()).collect();
        assert_eq!(operators, vec!["cosmosvaloper1w", "cosmosvaloper1v"]);
        assert_eq!(held.total_staked, StakeAmount::new(130));

        let none = service.account_delegations(AccountAddress::new("cosmos1z")).await.unwrap();
        assert!(none.delegations.is_empty());
        assert_eq!(none.total_staked, StakeAmount::ZERO);
    }
}
