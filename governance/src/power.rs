//! Validator voting power, ranking and standing.

use crate::delegation::DelegationIndex;
use crate::directory::ValidatorDirectory;
use crate::error::GovernanceError;
use crate::vote::VoteIndex;
use rust_decimal::Decimal;
use serde::Serialize;
use stakeview_store::ValidatorDescriptor;
use stakeview_types::{OperatorAddress, StakeAmount};
use std::collections::{HashMap, HashSet};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidatorPower {
    pub operator_address: OperatorAddress,
    pub voting_power: StakeAmount,
    /// 1-based.
    pub rank: usize,
    pub is_active: bool,
}

/// Validators ranked by current voting power, highest first.
/// Equal power is ordered by operator address.
#[derive(Clone, Debug, Default)]
pub struct ValidatorPowerTable {
    ranked: Vec<ValidatorPower>,
    positions: HashMap<OperatorAddress, usize>,
}

impl ValidatorPowerTable {
    pub fn from_index(delegations: &DelegationIndex, active_set_size: usize) -> Self {
        let mut powers: Vec<(OperatorAddress, StakeAmount)> = delegations
            .validators()
            .map(|op| (op.clone(), delegations.voting_power(op)))
            .collect();
        powers.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let ranked: Vec<ValidatorPower> = powers
            .into_iter()
            .enumerate()
            .map(|(i, (operator_address, voting_power))| ValidatorPower {
                operator_address,
                voting_power,
                rank: i + 1,
                is_active: i < active_set_size,
            })
            .collect();
        let positions = ranked
            .iter()
            .enumerate()
            .map(|(i, p)| (p.operator_address.clone(), i))
            .collect();

        Self { ranked, positions }
    }

    pub fn get(&self, operator: &OperatorAddress) -> Option<&ValidatorPower> {
        self.positions.get(operator).map(|&i| &self.ranked[i])
    }

    pub fn ranked(&self) -> &[ValidatorPower] {
        &self.ranked
    }

    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    /// Descriptors in attribution order: ranked validators first (bare
    /// descriptors for those the directory lacks), then directory-only
    /// validators by operator address.
    pub fn ordered_descriptors(&self, directory: &ValidatorDirectory) -> Vec<ValidatorDescriptor> {
        let mut ordered = Vec::with_capacity(self.ranked.len().max(directory.len()));
        let mut seen = HashSet::with_capacity(self.ranked.len());
        for power in &self.ranked {
            let descriptor = directory
                .get(&power.operator_address)
                .cloned()
                .unwrap_or_else(|| ValidatorDescriptor::bare(power.operator_address.clone()));
            seen.insert(&power.operator_address);
            ordered.push(descriptor);
        }

        let mut unranked: Vec<&ValidatorDescriptor> = directory
            .iter()
            .filter(|d| !seen.contains(&d.operator_address))
            .collect();
        unranked.sort_by(|a, b| a.operator_address.cmp(&b.operator_address));
        ordered.extend(unranked.into_iter().cloned());
        ordered
    }
}

/// A validator's place in the set plus its self-bond figures.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidatorStanding {
    pub operator_address: OperatorAddress,
    pub voting_power: StakeAmount,
    pub rank: Option<usize>,
    pub is_active: bool,
    pub self_bonded: StakeAmount,
    pub delegator_count: usize,
    /// `self_bonded / voting_power`; `None` when the validator has no power.
    pub delegator_shares: Option<Decimal>,
    /// Distinct proposals the self-delegate account currently has a vote on.
    pub proposals_voted: usize,
}

impl ValidatorStanding {
    /// `votes` should hold the self-delegate's votes across all proposals.
    pub fn compute(
        operator: &OperatorAddress,
        table: &ValidatorPowerTable,
        delegations: &DelegationIndex,
        votes: &VoteIndex,
        directory: &ValidatorDirectory,
    ) -> Result<Self, GovernanceError> {
        let descriptor = directory.get(operator);
        if descriptor.is_none() && !delegations.contains_validator(operator) {
            return Err(GovernanceError::UnknownValidator(operator.clone()));
        }
        let self_delegate = descriptor.and_then(|d| d.self_delegate_address.as_ref());

        let voting_power = delegations.voting_power(operator);
        let self_bonded = self_delegate
            .and_then(|account| delegations.stake(account, operator))
            .unwrap_or(StakeAmount::ZERO);
        let delegator_shares = if voting_power.is_zero() {
            None
        } else {
            self_bonded.to_decimal().checked_div(voting_power.to_decimal())
        };
        let power = table.get(operator);

        Ok(Self {
            operator_address: operator.clone(),
            voting_power,
            rank: power.map(|p| p.rank),
            is_active: power.is_some_and(|p| p.is_active),
            self_bonded,
            delegator_count: delegations.delegator_count(operator),
            delegator_shares,
            proposals_voted: self_delegate.map_or(0, |account| votes.proposals_voted(account)),
        })
    }
}
