//! Per-validator attribution of delegator votes.
//!
//! For one proposal and one validator: every active delegator that has a
//! current vote contributes `stake * weight` to each option it weighted, and
//! one head count to its dominant option. The validator's self-delegate
//! account is one of those delegators, but its vote is already reported as
//! the validator's own vote, so its contribution is taken back out before
//! the tally is classified.

use crate::delegation::DelegationIndex;
use crate::directory::ValidatorDirectory;
use crate::error::GovernanceError;
use crate::outcome::{classify, MostVoted};
use crate::vote::{DecodedOption, VoteIndex};
use rust_decimal::Decimal;
use serde::Serialize;
use stakeview_store::ValidatorDescriptor;
use stakeview_types::{AccountAddress, OperatorAddress, ProposalId, TxHash, VoteOption};

/// Head count and stake share for one option.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct OptionAggregate {
    pub voter_count: u64,
    pub total_stake: Decimal,
}

/// How a validator's delegators voted, per option.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidatorVoteAggregate {
    pub yes: OptionAggregate,
    pub abstain: OptionAggregate,
    pub no: OptionAggregate,
    pub no_with_veto: OptionAggregate,
}

impl ValidatorVoteAggregate {
    pub fn get(&self, option: VoteOption) -> &OptionAggregate {
        match option {
            VoteOption::Yes => &self.yes,
            VoteOption::Abstain => &self.abstain,
            VoteOption::No => &self.no,
            VoteOption::NoWithVeto => &self.no_with_veto,
        }
    }

    pub fn get_mut(&mut self, option: VoteOption) -> &mut OptionAggregate {
        match option {
            VoteOption::Yes => &mut self.yes,
            VoteOption::Abstain => &mut self.abstain,
            VoteOption::No => &mut self.no,
            VoteOption::NoWithVeto => &mut self.no_with_veto,
        }
    }

    /// Add one voter holding `stake`.
    pub fn add_vote(&mut self, stake: Decimal, vote: &DecodedOption) {
        for (option, weight) in vote.options() {
            let entry = self.get_mut(option);
            entry.total_stake = entry.total_stake.saturating_add(share(stake, weight));
        }
        let counted = self.get_mut(vote.dominant());
        counted.voter_count = counted.voter_count.saturating_add(1);
    }

    /// Take back exactly what [`add_vote`](Self::add_vote) added for the same
    /// voter. Never goes below zero.
    pub fn remove_vote(&mut self, stake: Decimal, vote: &DecodedOption) {
        for (option, weight) in vote.options() {
            let entry = self.get_mut(option);
            entry.total_stake = entry
                .total_stake
                .saturating_sub(share(stake, weight))
                .max(Decimal::ZERO);
        }
        let counted = self.get_mut(vote.dominant());
        counted.voter_count = counted.voter_count.saturating_sub(1);
    }

    pub fn total_voters(&self) -> u64 {
        VoteOption::ALL
            .iter()
            .map(|o| self.get(*o).voter_count)
            .fold(0, u64::saturating_add)
    }

    pub fn total_stake(&self) -> Decimal {
        VoteOption::ALL
            .iter()
            .map(|o| self.get(*o).total_stake)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }
}

fn share(stake: Decimal, weight: Decimal) -> Decimal {
    stake.checked_mul(weight).unwrap_or(Decimal::MAX)
}

/// One validator's attributed result for one proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AttributedValidatorResult {
    pub operator_address: OperatorAddress,
    pub moniker: String,
    pub self_delegate_address: Option<AccountAddress>,
    /// Delegator tally with the self-delegate's contribution removed.
    pub delegators: ValidatorVoteAggregate,
    /// The self-delegate account's own current vote.
    pub validator_vote: Option<DecodedOption>,
    pub validator_vote_tx_hash: Option<TxHash>,
    pub most_voted: MostVoted,
}

impl AttributedValidatorResult {
    /// Whether the validator or any of its delegators voted.
    pub fn has_signal(&self) -> bool {
        self.validator_vote.is_some() || self.delegators.total_voters() > 0
    }
}

/// Attribution over a fixed pair of indices.
///
/// Holds only shared references, so one attributor can serve every
/// validator of a proposal from several threads at once.
#[derive(Clone, Copy)]
pub struct ValidatorVoteAttributor<'a> {
    delegations: &'a DelegationIndex,
    votes: &'a VoteIndex,
}

impl<'a> ValidatorVoteAttributor<'a> {
    pub fn new(delegations: &'a DelegationIndex, votes: &'a VoteIndex) -> Self {
        Self { delegations, votes }
    }

    pub fn delegations(&self) -> &'a DelegationIndex {
        self.delegations
    }

    pub fn votes(&self) -> &'a VoteIndex {
        self.votes
    }

    /// Attribute one validator. Always returns a result; a validator nobody
    /// voted for comes back zeroed with [`MostVoted::DidNotVote`].
    pub fn attribute(
        &self,
        proposal_id: ProposalId,
        validator: &ValidatorDescriptor,
    ) -> AttributedValidatorResult {
        let operator = &validator.operator_address;

        let mut delegators = ValidatorVoteAggregate::default();
        for (delegator, stake) in self.delegations.delegators_of(operator) {
            if let Some(vote) = self.votes.option(delegator, proposal_id) {
                delegators.add_vote(stake.to_decimal(), vote);
            }
        }

        let own_vote = validator
            .self_delegate_address
            .as_ref()
            .and_then(|account| self.votes.vote(account, proposal_id));

        if let (Some(account), Some(own)) = (validator.self_delegate_address.as_ref(), own_vote) {
            if let Some(self_stake) = self.delegations.stake(account, operator) {
                delegators.remove_vote(self_stake.to_decimal(), &own.option);
            }
        }

        AttributedValidatorResult {
            operator_address: operator.clone(),
            moniker: validator.moniker.clone(),
            self_delegate_address: validator.self_delegate_address.clone(),
            most_voted: classify(&delegators),
            delegators,
            validator_vote: own_vote.map(|v| v.option.clone()),
            validator_vote_tx_hash: own_vote.map(|v| v.tx_hash),
        }
    }

    /// Attribute a single validator looked up by operator address.
    ///
    /// A validator with delegations but no descriptor is attributed without
    /// self-correction. A validator with neither is unknown.
    pub fn attribute_one(
        &self,
        proposal_id: ProposalId,
        operator: &OperatorAddress,
        directory: &ValidatorDirectory,
    ) -> Result<AttributedValidatorResult, GovernanceError> {
        if let Some(descriptor) = directory.get(operator) {
            return Ok(self.attribute(proposal_id, descriptor));
        }
        if self.delegations.contains_validator(operator) {
            tracing::debug!(operator = %operator, "no descriptor, attributing without self-correction");
            return Ok(self.attribute(proposal_id, &ValidatorDescriptor::bare(operator.clone())));
        }
        Err(GovernanceError::UnknownValidator(operator.clone()))
    }
}

/// Free-function form of [`ValidatorVoteAttributor::attribute`].
pub fn attribute(
    proposal_id: ProposalId,
    validator: &ValidatorDescriptor,
    delegations: &DelegationIndex,
    votes: &VoteIndex,
) -> AttributedValidatorResult {
    ValidatorVoteAttributor::new(delegations, votes).attribute(proposal_id, validator)
}
