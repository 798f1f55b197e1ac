//! Proposal-wide attribution.

use crate::attribution::{AttributedValidatorResult, ValidatorVoteAttributor};
use crate::delegation::DelegationIndex;
use crate::vote::{DecodedOption, VoteIndex};
use rayon::prelude::*;
use stakeview_store::ValidatorDescriptor;
use stakeview_types::{ProposalId, StakeviewError, VoteOption};
use std::fmt;
use std::str::FromStr;

/// Selects validators by their own vote.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionFilter {
    /// Own vote is exactly this plain option.
    Option(VoteOption),
    /// Own vote is split across several options.
    WeightedOnly,
}

impl OptionFilter {
    /// A validator without an own vote never matches.
    pub fn matches(&self, own_vote: Option<&DecodedOption>) -> bool {
        match (self, own_vote) {
            (_, None) => false,
            (Self::Option(option), Some(vote)) => vote.as_plain() == Some(*option),
            (Self::WeightedOnly, Some(vote)) => vote.is_weighted(),
        }
    }
}

/// `weighted` (any case) or anything [`VoteOption`] parses.
impl FromStr for OptionFilter {
    type Err = StakeviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("weighted") || trimmed.eq_ignore_ascii_case("VOTE_OPTION_WEIGHTED") {
            return Ok(Self::WeightedOnly);
        }
        trimmed.parse().map(Self::Option)
    }
}

impl fmt::Display for OptionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Option(option) => write!(f, "{option}"),
            Self::WeightedOnly => f.write_str("weighted"),
        }
    }
}

impl ValidatorVoteAttributor<'_> {
    /// Attribute every validator in `validators`, keeping their order.
    ///
    /// Validators with no own vote and no remaining delegator voters are
    /// left out. When `filter` is set only validators whose own vote matches
    /// are kept.
    pub fn attribute_all(
        &self,
        proposal_id: ProposalId,
        validators: &[ValidatorDescriptor],
        filter: Option<OptionFilter>,
    ) -> Vec<AttributedValidatorResult> {
        let results: Vec<AttributedValidatorResult> = validators
            .par_iter()
            .map(|validator| self.attribute(proposal_id, validator))
            .filter(|result| result.has_signal())
            .filter(|result| filter.map_or(true, |f| f.matches(result.validator_vote.as_ref())))
            .collect();

        tracing::debug!(
            proposal_id = %proposal_id,
            validators = validators.len(),
            attributed = results.len(),
            filter = ?filter,
            "proposal attribution finished"
        );
        results
    }
}

/// Free-function form of [`ValidatorVoteAttributor::attribute_all`].
pub fn attribute_all(
    proposal_id: ProposalId,
    validators: &[ValidatorDescriptor],
    delegations: &DelegationIndex,
    votes: &VoteIndex,
    filter: Option<OptionFilter>,
) -> Vec<AttributedValidatorResult> {
    ValidatorVoteAttributor::new(delegations, votes).attribute_all(proposal_id, validators, filter)
}
