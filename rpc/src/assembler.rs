//! Merges attribution output with descriptor metadata for the wire.

use stakeview_governance::AttributedValidatorResult;
use stakeview_store::ValidatorDescriptor;
use stakeview_types::{OperatorAddress, StakeAmount};

use crate::config::ApiConfig;
use crate::handlers::{AccountDelegationView, AccountVoteView, ValidatorInfoResponse, ValidatorVoteView};
use crate::service::{AccountVote, ValidatorReport};

#[derive(Clone, Debug)]
pub struct ResponseAssembler {
    avatar_base_url: String,
    chain_name: String,
}

impl ResponseAssembler {
    pub fn new(avatar_base_url: impl Into<String>, chain_name: impl Into<String>) -> Self {
        Self {
            avatar_base_url: avatar_base_url.into().trim_end_matches('/').to_string(),
            chain_name: chain_name.into(),
        }
    }

    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(config.avatar_base_url.clone(), config.chain_name.clone())
    }

    pub fn avatar_url(&self, operator: &OperatorAddress) -> String {
        format!(
            "{}/cosmostation/chainlist/main/chain/{}/moniker/{}.png",
            self.avatar_base_url, self.chain_name, operator
        )
    }

    pub fn validator_vote(
        &self,
        result: AttributedValidatorResult,
        descriptor: Option<&ValidatorDescriptor>,
    ) -> ValidatorVoteView {
        let delegators = result.delegators;
        ValidatorVoteView {
            avatar_url: self.avatar_url(&result.operator_address),
            operator_address: result.operator_address,
            moniker: result.moniker,
            identity: descriptor.and_then(|d| d.identity.clone()),
            website: descriptor.and_then(|d| d.website.clone()),
            self_delegate_address: result.self_delegate_address,
            validator_option: result.validator_vote,
            validator_vote_tx_hash: result.validator_vote_tx_hash,
            most_voted: result.most_voted,
            delegators_amount_option_yes: delegators.yes.voter_count,
            delegators_amount_option_abstain: delegators.abstain.voter_count,
            delegators_amount_option_no: delegators.no.voter_count,
            delegators_amount_option_nwv: delegators.no_with_veto.voter_count,
            delegators_shares_option_yes: delegators.yes.total_stake.normalize(),
            delegators_shares_option_abstain: delegators.abstain.total_stake.normalize(),
            delegators_shares_option_no: delegators.no.total_stake.normalize(),
            delegators_shares_option_nwv: delegators.no_with_veto.total_stake.normalize(),
        }
    }

    pub fn validator_info(&self, report: ValidatorReport) -> ValidatorInfoResponse {
        let ValidatorReport { standing, descriptor } = report;
        let descriptor = descriptor.unwrap_or_else(|| ValidatorDescriptor::bare(standing.operator_address.clone()));
        ValidatorInfoResponse {
            avatar_url: self.avatar_url(&standing.operator_address),
            operator_address: standing.operator_address,
            moniker: descriptor.moniker,
            identity: descriptor.identity,
            website: descriptor.website,
            details: descriptor.details,
            consensus_address: descriptor.consensus_address,
            self_delegate_address: descriptor.self_delegate_address,
            voting_power: standing.voting_power,
            rank: standing.rank,
            is_active: standing.is_active,
            self_bonded: standing.self_bonded,
            delegator_count: standing.delegator_count,
            delegator_shares: standing.delegator_shares.map(|s| s.normalize()),
            proposals_voted_amount: standing.proposals_voted,
        }
    }

    pub fn account_delegation(
        &self,
        operator: OperatorAddress,
        stake: StakeAmount,
        descriptor: Option<&ValidatorDescriptor>,
    ) -> AccountDelegationView {
        AccountDelegationView {
            avatar_url: self.avatar_url(&operator),
            moniker: descriptor.map(|d| d.moniker.clone()).unwrap_or_default(),
            identity: descriptor.and_then(|d| d.identity.clone()),
            website: descriptor.and_then(|d| d.website.clone()),
            operator_address: operator,
            stake_amount: stake,
        }
    }

    pub fn account_vote(&self, vote: AccountVote) -> AccountVoteView {
        AccountVoteView {
            proposal_id: vote.proposal_id,
            option: vote.vote.option,
            height: vote.vote.height,
            tx_hash: vote.vote.tx_hash,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use stakeview_governance::{MostVoted, OptionAggregate, ValidatorVoteAggregate};

    #[test]
    fn avatar_url_format() {
        let assembler = ResponseAssembler::new("https://raw.example.com/", "cosmos");
        assert_eq!(
            assembler.avatar_url(&OperatorAddress::new("cosmosvaloper1abc")),
            "https://raw.example.com/cosmostation/chainlist/main/chain/cosmos/moniker/cosmosvaloper1abc.png"
        );
    }

    #[test]
    fn merges_descriptor_fields() {
        let assembler = ResponseAssembler::new("https://raw.example.com", "cosmos");
        let operator = OperatorAddress::new("cosmosvaloper1abc");
        let descriptor = ValidatorDescriptor {
            moniker: "Alpha".to_string(),
            identity: Some("ABCD1234".to_string()),
            website: Some("https://alpha.example".to_string()),
            ..ValidatorDescriptor::bare(operator.clone())
        };
        let result = AttributedValidatorResult {
            operator_address: operator,
            moniker: "Alpha".to_string(),
            self_delegate_address: None,
            delegators: ValidatorVoteAggregate {
                yes: OptionAggregate {
                    voter_count: 2,
                    total_stake: Decimal::new(1500, 1),
                },
                ..ValidatorVoteAggregate::default()
            },
            validator_vote: None,
            validator_vote_tx_hash: None,
            most_voted: MostVoted::Yes,
        };

        let view = assembler.validator_vote(result, Some(&descriptor));
        assert_eq!(view.identity.as_deref(), Some("ABCD1234"));
        assert_eq!(view.delegators_amount_option_yes, 2);
        assert_eq!(view.delegators_shares_option_yes.to_string(), "150");
        assert!(view.avatar_url.ends_with("cosmosvaloper1abc.png"));
    }

    #[test]
    fn delegation_without_descriptor_has_empty_moniker() {
        let assembler = ResponseAssembler::new("https://raw.example.com", "cosmos");
        let view = assembler.account_delegation(OperatorAddress::new("cosmosvaloper1x"), StakeAmount::new(7), None);
        assert_eq!(view.moniker, "");
        assert!(view.identity.is_none());
        assert_eq!(view.stake_amount, StakeAmount::new(7));
    }
}
