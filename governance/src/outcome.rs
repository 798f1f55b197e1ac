//! Classifying a validator's delegator tally into one outcome.

use crate::attribution::ValidatorVoteAggregate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stakeview_types::VoteOption;
use std::fmt;

/// The classified position of a validator's delegators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MostVoted {
    #[serde(rename = "VOTE_OPTION_YES")]
    Yes,
    #[serde(rename = "VOTE_OPTION_NO")]
    No,
    #[serde(rename = "VOTE_OPTION_NO_WITH_VETO")]
    NoWithVeto,
    #[serde(rename = "DID_NOT_VOTE")]
    DidNotVote,
}

impl MostVoted {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "VOTE_OPTION_YES",
            Self::No => "VOTE_OPTION_NO",
            Self::NoWithVeto => "VOTE_OPTION_NO_WITH_VETO",
            Self::DidNotVote => "DID_NOT_VOTE",
        }
    }
}

impl fmt::Display for MostVoted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify the corrected delegator stake shares.
///
/// Abstain is excluded from the denominator. Veto (strictly more than a third)
/// takes precedence over a strict yes majority; anything else is `No`.
pub fn classify(aggregate: &ValidatorVoteAggregate) -> MostVoted {
    let yes = aggregate.get(VoteOption::Yes).total_stake;
    let no = aggregate.get(VoteOption::No).total_stake;
    let veto = aggregate.get(VoteOption::NoWithVeto).total_stake;
    classify_shares(yes, no, veto)
}

pub(crate) fn classify_shares(yes: Decimal, no: Decimal, veto: Decimal) -> MostVoted {
    let total = yes.saturating_add(no).saturating_add(veto);
    if total <= Decimal::ZERO {
        return MostVoted::DidNotVote;
    }
    if exceeds_fraction(veto, 3, total) {
        MostVoted::NoWithVeto
    } else if exceeds_fraction(yes, 2, total) {
        MostVoted::Yes
    } else {
        MostVoted::No
    }
}

/// `part > total / denominator`, compared without division where possible.
fn exceeds_fraction(part: Decimal, denominator: u32, total: Decimal) -> bool {
    match part.checked_mul(Decimal::from(denominator)) {
        Some(scaled) => scaled > total,
        None => part > total / Decimal::from(denominator),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn nothing_voted() {
        assert_eq!(classify_shares(dec!(0), dec!(0), dec!(0)), MostVoted::DidNotVote);
    }

    #[test]
    fn veto_takes_precedence() {
        assert_eq!(classify_shares(dec!(40), dec!(10), dec!(51)), MostVoted::NoWithVeto);
    }

    #[test]
    fn exactly_one_third_is_not_a_veto() {
        assert_eq!(classify_shares(dec!(200), dec!(0), dec!(100)), MostVoted::Yes);
    }

    #[test]
    fn strict_majority_required() {
        assert_eq!(classify_shares(dec!(51), dec!(49), dec!(0)), MostVoted::Yes);
        assert_eq!(classify_shares(dec!(50), dec!(50), dec!(0)), MostVoted::No);
    }

    #[test]
    fn no_without_majority_is_still_no() {
        assert_eq!(classify_shares(dec!(45), dec!(30), dec!(25)), MostVoted::No);
    }

    #[test]
    fn huge_totals_fall_back_to_division() {
        let big = Decimal::MAX / dec!(2);
        assert_eq!(classify_shares(big, dec!(1), dec!(0)), MostVoted::Yes);
    }

    #[test]
    fn serializes_with_wire_names() {
        assert_eq!(
            serde_json::to_string(&MostVoted::DidNotVote).unwrap(),
            "\"DID_NOT_VOTE\""
        );
        assert_eq!(MostVoted::NoWithVeto.to_string(), "VOTE_OPTION_NO_WITH_VETO");
    }
}
