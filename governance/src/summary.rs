//! Head counts across every current voter of a proposal.

use crate::vote::VoteIndex;
use serde::Serialize;
use stakeview_types::{ProposalId, VoteOption};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VoteSummary {
    pub proposal_id: ProposalId,
    pub yes: u64,
    pub abstain: u64,
    pub no: u64,
    pub no_with_veto: u64,
    pub total_voters: u64,
    /// Voters whose vote is split across several options. Each is still
    /// counted once, under its dominant option.
    pub weighted_voters: u64,
}

impl VoteSummary {
    pub fn tally(proposal_id: ProposalId, votes: &VoteIndex) -> Self {
        let mut summary = Self {
            proposal_id,
            yes: 0,
            abstain: 0,
            no: 0,
            no_with_veto: 0,
            total_voters: 0,
            weighted_voters: 0,
        };
        for (_, vote) in votes.votes_on(proposal_id) {
            let count = match vote.option.dominant() {
                VoteOption::Yes => &mut summary.yes,
                VoteOption::Abstain => &mut summary.abstain,
                VoteOption::No => &mut summary.no,
                VoteOption::NoWithVeto => &mut summary.no_with_veto,
            };
            *count += 1;
            summary.total_voters += 1;
            if vote.option.is_weighted() {
                summary.weighted_voters += 1;
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stakeview_store::{RawVoteOption, VoteRecord};
    use stakeview_types::{AccountAddress, Height, TxHash};

    fn vote(voter: &str, proposal: u64, option: RawVoteOption) -> VoteRecord {
        VoteRecord {
            voter: AccountAddress::new(voter),
            proposal_id: ProposalId::new(proposal),
            option,
            height: Height::new(1),
            tx_hash: TxHash::ZERO,
        }
    }

    #[test]
    fn counts_each_voter_once() {
        let index = VoteIndex::build(vec![
            vote("a", 1, RawVoteOption::single("YES")),
            vote("b", 1, RawVoteOption::single("NO_WITH_VETO")),
            vote(
                "c",
                1,
                RawVoteOption::weighted([("VOTE_OPTION_NO", "0.3"), ("VOTE_OPTION_ABSTAIN", "0.7")]),
            ),
            vote("d", 2, RawVoteOption::single("NO")),
        ]);
        let summary = VoteSummary::tally(ProposalId::new(1), &index);
        assert_eq!(summary.yes, 1);
        assert_eq!(summary.no_with_veto, 1);
        assert_eq!(summary.abstain, 1);
        assert_eq!(summary.no, 0);
        assert_eq!(summary.total_voters, 3);
        assert_eq!(summary.weighted_voters, 1);
    }

    #[test]
    fn proposal_without_votes() {
        let summary = VoteSummary::tally(ProposalId::new(9), &VoteIndex::default());
        assert_eq!(summary.total_voters, 0);
        assert_eq!(summary.proposal_id, ProposalId::new(9));
    }
}
