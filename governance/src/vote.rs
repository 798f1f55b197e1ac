//! Decoded votes and the current-vote index.

use crate::error::VoteDecodeError;
use crate::reducer::LatestStateReducer;
use rust_decimal::Decimal;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use stakeview_store::{RawVoteOption, VoteRecord};
use stakeview_types::{AccountAddress, Height, ProposalId, TxHash, VoteOption};
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

/// A vote normalized to `(option, weight)` pairs summing to exactly 1.
///
/// A plain vote is the degenerate case of one option at weight 1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedOption {
    weights: BTreeMap<VoteOption, Decimal>,
    dominant: VoteOption,
}

impl DecodedOption {
    pub fn plain(option: VoteOption) -> Self {
        Self {
            weights: BTreeMap::from([(option, Decimal::ONE)]),
            dominant: option,
        }
    }

    /// Build a weighted vote, validating every weight and the total.
    pub fn weighted(
        pairs: impl IntoIterator<Item = (VoteOption, Decimal)>,
    ) -> Result<Self, VoteDecodeError> {
        let mut weights = BTreeMap::new();
        for (option, weight) in pairs {
            if weight <= Decimal::ZERO || weight > Decimal::ONE {
                return Err(VoteDecodeError::WeightOutOfRange { option, weight });
            }
            if weights.insert(option, weight).is_some() {
                return Err(VoteDecodeError::DuplicateOption(option));
            }
        }
        if weights.is_empty() {
            return Err(VoteDecodeError::Empty);
        }

        let sum = weights
            .values()
            .try_fold(Decimal::ZERO, |acc, w| acc.checked_add(*w))
            .unwrap_or(Decimal::MAX);
        if sum != Decimal::ONE {
            return Err(VoteDecodeError::WeightSum(sum));
        }

        // Largest weight wins; BTreeMap order makes the earliest option win ties.
        let mut dominant = None;
        for (option, weight) in &weights {
            match dominant {
                Some((_, best)) if *weight <= best => {}
                _ => dominant = Some((*option, *weight)),
            }
        }
        let (dominant, _) = dominant.ok_or(VoteDecodeError::Empty)?;

        Ok(Self { weights, dominant })
    }

    /// Decode the raw `option` column of a vote row.
    pub fn decode(raw: &RawVoteOption) -> Result<Self, VoteDecodeError> {
        match raw {
            RawVoteOption::Single(option) => parse_option(option).map(Self::plain),
            RawVoteOption::Weighted(entries) => {
                let mut pairs = Vec::with_capacity(entries.len());
                for entry in entries {
                    let option = parse_option(&entry.option)?;
                    let weight = Decimal::from_str(entry.weight.trim()).map_err(|_| {
                        VoteDecodeError::InvalidWeight {
                            option,
                            weight: entry.weight.clone(),
                        }
                    })?;
                    pairs.push((option, weight));
                }
                Self::weighted(pairs)
            }
        }
    }

    /// Weight given to `option`; zero when the vote does not include it.
    pub fn weight(&self, option: VoteOption) -> Decimal {
        self.weights.get(&option).copied().unwrap_or(Decimal::ZERO)
    }

    /// Options with their weights, in canonical order.
    pub fn options(&self) -> impl Iterator<Item = (VoteOption, Decimal)> + '_ {
        self.weights.iter().map(|(o, w)| (*o, *w))
    }

    /// The option that receives this voter's head count.
    pub fn dominant(&self) -> VoteOption {
        self.dominant
    }

    pub fn is_weighted(&self) -> bool {
        self.weights.len() > 1
    }

    /// The single option of a non-weighted vote.
    pub fn as_plain(&self) -> Option<VoteOption> {
        (!self.is_weighted()).then_some(self.dominant)
    }
}

fn parse_option(raw: &str) -> Result<VoteOption, VoteDecodeError> {
    raw.parse()
        .map_err(|_| VoteDecodeError::UnknownOption(raw.to_string()))
}

/// Plain votes serialize as the wire name, weighted votes as a
/// `{"VOTE_OPTION_*": "weight"}` map.
impl Serialize for DecodedOption {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_plain() {
            Some(option) => option.serialize(serializer),
            None => {
                let mut map = serializer.serialize_map(Some(self.weights.len()))?;
                for (option, weight) in &self.weights {
                    map.serialize_entry(option.wire_name(), &weight.normalize().to_string())?;
                }
                map.end()
            }
        }
    }
}

/// A voter's current vote on one proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CurrentVote {
    pub option: DecodedOption,
    pub height: Height,
    pub tx_hash: TxHash,
}

/// The reduced vote state: proposal → voter → current vote.
#[derive(Clone, Debug, Default)]
pub struct VoteIndex {
    by_proposal: HashMap<ProposalId, HashMap<AccountAddress, CurrentVote>>,
    rejected: usize,
}

impl VoteIndex {
    /// Reduce `records` to the latest revision per (voter, proposal), then
    /// decode. A latest revision that fails to decode leaves the voter with no
    /// vote on that proposal; an older, valid revision is not resurrected.
    pub fn build(records: impl IntoIterator<Item = VoteRecord>) -> Self {
        let current = LatestStateReducer::reduce(records);
        let mut index = Self::default();
        for ((voter, proposal_id), record) in current {
            match DecodedOption::decode(&record.option) {
                Ok(option) => {
                    index.by_proposal.entry(proposal_id).or_default().insert(
                        voter,
                        CurrentVote {
                            option,
                            height: record.height,
                            tx_hash: record.tx_hash,
                        },
                    );
                }
                Err(error) => {
                    tracing::warn!(
                        voter = %voter,
                        proposal_id = %proposal_id,
                        tx_hash = %record.tx_hash,
                        error = %error,
                        "dropping malformed vote"
                    );
                    index.rejected += 1;
                }
            }
        }
        index
    }

    pub fn vote(&self, voter: &AccountAddress, proposal_id: ProposalId) -> Option<&CurrentVote> {
        self.by_proposal.get(&proposal_id)?.get(voter)
    }

    pub fn option(&self, voter: &AccountAddress, proposal_id: ProposalId) -> Option<&DecodedOption> {
        self.vote(voter, proposal_id).map(|v| &v.option)
    }

    /// Every current vote on `proposal_id`, unordered.
    pub fn votes_on(
        &self,
        proposal_id: ProposalId,
    ) -> impl Iterator<Item = (&AccountAddress, &CurrentVote)> {
        self.by_proposal
            .get(&proposal_id)
            .into_iter()
            .flat_map(|voters| voters.iter())
    }

    /// Every current vote cast by `voter`, newest height first.
    pub fn votes_by(&self, voter: &AccountAddress) -> Vec<(ProposalId, &CurrentVote)> {
        let mut votes: Vec<_> = self
            .by_proposal
            .iter()
            .filter_map(|(proposal_id, voters)| voters.get(voter).map(|v| (*proposal_id, v)))
            .collect();
        votes.sort_by(|a, b| b.1.height.cmp(&a.1.height).then(b.0.cmp(&a.0)));
        votes
    }

    /// Number of distinct proposals on which `voter` has a current vote.
    pub fn proposals_voted(&self, voter: &AccountAddress) -> usize {
        self.by_proposal
            .values()
            .filter(|voters| voters.contains_key(voter))
            .count()
    }

    /// Latest revisions that were dropped because they failed to decode.
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    pub fn is_empty(&self) -> bool {
        self.by_proposal.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn vote(voter: &str, proposal: u64, option: RawVoteOption, height: u64) -> VoteRecord {
        VoteRecord {
            voter: AccountAddress::new(voter),
            proposal_id: ProposalId::new(proposal),
            option,
            height: Height::new(height),
            tx_hash: TxHash::new([height as u8; 32]),
        }
    }

    fn acct(s: &str) -> AccountAddress {
        AccountAddress::new(s)
    }

    #[test]
    fn plain_vote_has_unit_weight() {
        let decoded = DecodedOption::decode(&RawVoteOption::single("VOTE_OPTION_NO")).unwrap();
        assert_eq!(decoded.weight(VoteOption::No), Decimal::ONE);
        assert_eq!(decoded.weight(VoteOption::Yes), Decimal::ZERO);
        assert!(!decoded.is_weighted());
        assert_eq!(decoded.as_plain(), Some(VoteOption::No));
    }

    #[test]
    fn weighted_vote_decodes() {
        let raw = RawVoteOption::weighted([
            ("VOTE_OPTION_YES", "0.600000000000000000"),
            ("VOTE_OPTION_NO", "0.400000000000000000"),
        ]);
        let decoded = DecodedOption::decode(&raw).unwrap();
        assert!(decoded.is_weighted());
        assert_eq!(decoded.weight(VoteOption::Yes), dec!(0.6));
        assert_eq!(decoded.weight(VoteOption::No), dec!(0.4));
        assert_eq!(decoded.dominant(), VoteOption::Yes);
        assert_eq!(decoded.as_plain(), None);
    }

    #[test]
    fn dominant_tie_goes_to_canonical_order() {
        let decoded = DecodedOption::weighted([
            (VoteOption::NoWithVeto, dec!(0.5)),
            (VoteOption::Abstain, dec!(0.5)),
        ])
        .unwrap();
        assert_eq!(decoded.dominant(), VoteOption::Abstain);
    }

    #[test]
    fn single_entry_weighted_vote_is_plain() {
        let raw = RawVoteOption::weighted([("VOTE_OPTION_ABSTAIN", "1.0")]);
        let decoded = DecodedOption::decode(&raw).unwrap();
        assert_eq!(decoded, DecodedOption::plain(VoteOption::Abstain));
    }

    #[test]
    fn weights_must_sum_to_one() {
        let raw = RawVoteOption::weighted([("VOTE_OPTION_YES", "0.5"), ("VOTE_OPTION_NO", "0.4")]);
        assert_eq!(
            DecodedOption::decode(&raw),
            Err(VoteDecodeError::WeightSum(dec!(0.9)))
        );
    }

    #[test]
    fn malformed_weighted_votes_rejected() {
        let unknown = RawVoteOption::weighted([("VOTE_OPTION_MAYBE", "1")]);
        assert!(matches!(
            DecodedOption::decode(&unknown),
            Err(VoteDecodeError::UnknownOption(_))
        ));

        let bad_weight = RawVoteOption::weighted([("VOTE_OPTION_YES", "lots")]);
        assert!(matches!(
            DecodedOption::decode(&bad_weight),
            Err(VoteDecodeError::InvalidWeight { .. })
        ));

        let negative = RawVoteOption::weighted([("VOTE_OPTION_YES", "1.5"), ("VOTE_OPTION_NO", "-0.5")]);
        assert!(matches!(
            DecodedOption::decode(&negative),
            Err(VoteDecodeError::WeightOutOfRange { .. })
        ));

        let duplicate = RawVoteOption::weighted([("VOTE_OPTION_YES", "0.5"), ("YES", "0.5")]);
        assert_eq!(
            DecodedOption::decode(&duplicate),
            Err(VoteDecodeError::DuplicateOption(VoteOption::Yes))
        );

        assert_eq!(
            DecodedOption::decode(&RawVoteOption::Weighted(Vec::new())),
            Err(VoteDecodeError::Empty)
        );
    }

    #[test]
    fn serializes_plain_and_weighted() {
        let plain = serde_json::to_value(DecodedOption::plain(VoteOption::Yes)).unwrap();
        assert_eq!(plain, serde_json::json!("VOTE_OPTION_YES"));

        let weighted = DecodedOption::weighted([
            (VoteOption::Yes, dec!(0.600000000000000000)),
            (VoteOption::No, dec!(0.4)),
        ])
        .unwrap();
        assert_eq!(
            serde_json::to_value(weighted).unwrap(),
            serde_json::json!({"VOTE_OPTION_YES": "0.6", "VOTE_OPTION_NO": "0.4"})
        );
    }

    #[test]
    fn later_vote_replaces_earlier() {
        let index = VoteIndex::build(vec![
            vote("a", 1, RawVoteOption::single("VOTE_OPTION_YES"), 10),
            vote("a", 1, RawVoteOption::single("VOTE_OPTION_NO"), 12),
        ]);
        let current = index.vote(&acct("a"), ProposalId::new(1)).unwrap();
        assert_eq!(current.option.as_plain(), Some(VoteOption::No));
        assert_eq!(current.height, Height::new(12));
    }

    #[test]
    fn malformed_latest_vote_leaves_no_vote() {
        let index = VoteIndex::build(vec![
            vote("a", 1, RawVoteOption::single("VOTE_OPTION_YES"), 10),
            vote("a", 1, RawVoteOption::weighted([("VOTE_OPTION_YES", "0.7")]), 11),
            vote("b", 1, RawVoteOption::single("VOTE_OPTION_NO"), 11),
        ]);
        assert!(index.vote(&acct("a"), ProposalId::new(1)).is_none());
        assert!(index.vote(&acct("b"), ProposalId::new(1)).is_some());
        assert_eq!(index.rejected(), 1);
        assert_eq!(index.votes_on(ProposalId::new(1)).count(), 1);
    }

    #[test]
    fn votes_by_newest_first() {
        let index = VoteIndex::build(vec![
            vote("a", 1, RawVoteOption::single("YES"), 10),
            vote("a", 2, RawVoteOption::single("NO"), 30),
            vote("a", 3, RawVoteOption::single("ABSTAIN"), 20),
            vote("b", 3, RawVoteOption::single("YES"), 40),
        ]);
        let proposals: Vec<u64> = index
            .votes_by(&acct("a"))
            .into_iter()
            .map(|(p, _)| p.as_u64())
            .collect();
        assert_eq!(proposals, vec![2, 3, 1]);
        assert_eq!(index.proposals_voted(&acct("a")), 3);
        assert_eq!(index.proposals_voted(&acct("c")), 0);
    }
}
