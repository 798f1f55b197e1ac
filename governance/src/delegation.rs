//! Current delegations: (delegator, validator) → stake.
//!
//! Built from every revision of every delegation row. Only strictly positive
//! current stakes survive; a pair whose latest revision undelegated
//! everything is absent, not zero.

use crate::reducer::LatestStateReducer;
use stakeview_store::DelegationRecord;
use stakeview_types::{AccountAddress, OperatorAddress, StakeAmount};
use std::collections::{BTreeMap, HashMap};

/// The reduced delegation state.
#[derive(Clone, Debug, Default)]
pub struct DelegationIndex {
    stakes: HashMap<(AccountAddress, OperatorAddress), StakeAmount>,
    /// validator → delegator → stake. Sorted per validator so iteration is stable.
    by_validator: HashMap<OperatorAddress, BTreeMap<AccountAddress, StakeAmount>>,
    by_delegator: HashMap<AccountAddress, BTreeMap<OperatorAddress, StakeAmount>>,
}

impl DelegationIndex {
    pub fn build(records: impl IntoIterator<Item = DelegationRecord>) -> Self {
        let current = LatestStateReducer::reduce(records);
        let mut index = Self::default();
        for ((delegator, operator), record) in current {
            index
                .by_validator
                .entry(operator.clone())
                .or_default()
                .insert(delegator.clone(), record.stake_amount);
            index
                .by_delegator
                .entry(delegator.clone())
                .or_default()
                .insert(operator.clone(), record.stake_amount);
            index.stakes.insert((delegator, operator), record.stake_amount);
        }
        tracing::debug!(
            pairs = index.stakes.len(),
            validators = index.by_validator.len(),
            "delegation index built"
        );
        index
    }

    /// Current stake of `delegator` with `operator`, if the pair is active.
    pub fn stake(&self, delegator: &AccountAddress, operator: &OperatorAddress) -> Option<StakeAmount> {
        self.stakes
            .get(&(delegator.clone(), operator.clone()))
            .copied()
    }

    /// Active delegators of `operator` in address order.
    pub fn delegators_of<'a>(
        &'a self,
        operator: &OperatorAddress,
    ) -> impl Iterator<Item = (&'a AccountAddress, StakeAmount)> + 'a {
        self.by_validator
            .get(operator)
            .into_iter()
            .flat_map(|delegators| delegators.iter().map(|(d, s)| (d, *s)))
    }

    /// Validators `delegator` currently stakes with, in address order.
    pub fn delegations_by<'a>(
        &'a self,
        delegator: &AccountAddress,
    ) -> impl Iterator<Item = (&'a OperatorAddress, StakeAmount)> + 'a {
        self.by_delegator
            .get(delegator)
            .into_iter()
            .flat_map(|validators| validators.iter().map(|(v, s)| (v, *s)))
    }

    /// Sum of `delegator`'s current stakes across validators.
    pub fn staked_by(&self, delegator: &AccountAddress) -> StakeAmount {
        self.by_delegator
            .get(delegator)
            .map(|validators| validators.values().sum())
            .unwrap_or(StakeAmount::ZERO)
    }

    pub fn delegator_count(&self, operator: &OperatorAddress) -> usize {
        self.by_validator.get(operator).map_or(0, BTreeMap::len)
    }

    /// Sum of every current stake delegated to `operator`, self-bond included.
    pub fn voting_power(&self, operator: &OperatorAddress) -> StakeAmount {
        self.by_validator
            .get(operator)
            .map(|delegators| delegators.values().sum())
            .unwrap_or(StakeAmount::ZERO)
    }

    /// Sum of every current stake in the index.
    pub fn total_bonded(&self) -> StakeAmount {
        self.stakes.values().sum()
    }

    /// Validators with at least one active delegation, unordered.
    pub fn validators(&self) -> impl Iterator<Item = &OperatorAddress> {
        self.by_validator.keys()
    }

    pub fn contains_validator(&self, operator: &OperatorAddress) -> bool {
        self.by_validator.contains_key(operator)
    }

    /// Number of active (delegator, validator) pairs.
    pub fn len(&self) -> usize {
        self.stakes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stakes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stakeview_types::Height;

    fn record(delegator: &str, operator: &str, stake: u128, height: u64) -> DelegationRecord {
        DelegationRecord {
            delegator_address: AccountAddress::new(delegator),
            operator_address: OperatorAddress::new(operator),
            stake_amount: StakeAmount::new(stake),
            height: Height::new(height),
        }
    }

    fn op(s: &str) -> OperatorAddress {
        OperatorAddress::new(s)
    }

    fn acct(s: &str) -> AccountAddress {
        AccountAddress::new(s)
    }

    #[test]
    fn empty_records_build_empty_index() {
        let index = DelegationIndex::build(Vec::new());
        assert!(index.is_empty());
        assert_eq!(index.total_bonded(), StakeAmount::ZERO);
        assert_eq!(index.voting_power(&op("v1")), StakeAmount::ZERO);
        assert_eq!(index.delegators_of(&op("v1")).count(), 0);
    }

    #[test]
    fn latest_revision_is_current_stake() {
        let index = DelegationIndex::build(vec![
            record("d1", "v1", 100, 1),
            record("d1", "v1", 250, 4),
            record("d1", "v1", 175, 2),
        ]);
        assert_eq!(index.stake(&acct("d1"), &op("v1")), Some(StakeAmount::new(250)));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn full_undelegation_removes_pair() {
        let index = DelegationIndex::build(vec![
            record("d1", "v1", 100, 1),
            record("d1", "v1", 0, 2),
            record("d2", "v1", 40, 1),
        ]);
        assert_eq!(index.stake(&acct("d1"), &op("v1")), None);
        assert_eq!(index.delegator_count(&op("v1")), 1);
        assert_eq!(index.voting_power(&op("v1")), StakeAmount::new(40));
    }

    #[test]
    fn validator_with_only_undelegations_is_absent() {
        let index = DelegationIndex::build(vec![record("d1", "v1", 10, 1), record("d1", "v1", 0, 3)]);
        assert!(!index.contains_validator(&op("v1")));
        assert_eq!(index.validators().count(), 0);
    }

    #[test]
    fn voting_power_and_total_bonded() {
        let index = DelegationIndex::build(vec![
            record("d1", "v1", 100, 1),
            record("d2", "v1", 50, 1),
            record("d1", "v2", 30, 1),
        ]);
        assert_eq!(index.voting_power(&op("v1")), StakeAmount::new(150));
        assert_eq!(index.voting_power(&op("v2")), StakeAmount::new(30));
        assert_eq!(index.total_bonded(), StakeAmount::new(180));
    }

    #[test]
    fn delegators_iterate_in_address_order() {
        let index = DelegationIndex::build(vec![
            record("d3", "v1", 1, 1),
            record("d1", "v1", 1, 1),
            record("d2", "v1", 1, 1),
        ]);
        let order: Vec<&str> = index
            .delegators_of(&op("v1"))
            .map(|(d, _)| d.as_str())
            .collect();
        assert_eq!(order, vec!["d1", "d2", "d3"]);
    }

    #[test]
    fn delegations_by_account() {
        let index = DelegationIndex::build(vec![
            record("d1", "v2", 30, 1),
            record("d1", "v1", 100, 1),
            record("d1", "v3", 70, 1),
            record("d1", "v3", 0, 5),
            record("d2", "v1", 50, 1),
        ]);
        let held: Vec<(&str, StakeAmount)> = index
            .delegations_by(&acct("d1"))
            .map(|(v, s)| (v.as_str(), s))
            .collect();
        assert_eq!(held, vec![("v1", StakeAmount::new(100)), ("v2", StakeAmount::new(30))]);
        assert_eq!(index.staked_by(&acct("d1")), StakeAmount::new(130));
        assert_eq!(index.staked_by(&acct("nobody")), StakeAmount::ZERO);
        assert_eq!(index.delegations_by(&acct("nobody")).count(), 0);
    }
}
