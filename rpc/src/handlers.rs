//! HTTP request handlers and their response bodies.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stakeview_governance::{DecodedOption, MostVoted, OptionFilter, VoteSummary};
use stakeview_tokens::TokenSource;
use stakeview_types::{AccountAddress, Height, OperatorAddress, ProposalId, StakeAmount, TxHash};

use crate::assembler::ResponseAssembler;
use crate::pagination::{PaginationMeta, PaginationParams};
use crate::service::GovernanceService;
use crate::RpcError;

/// Shared state behind every route.
pub struct AppState {
    pub service: GovernanceService,
    pub assembler: ResponseAssembler,
    /// `None` when the price feed is disabled.
    pub tokens: Option<Arc<dyn TokenSource>>,
    pub bond_denom: String,
}

// ── Health ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// ── Proposal attribution ─────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ValidatorVotesQuery {
    pub validator_option: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl ValidatorVotesQuery {
    fn filter(&self) -> Result<Option<OptionFilter>, RpcError> {
        match self.validator_option.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse().map(Some).map_err(RpcError::from),
        }
    }

    fn pagination(&self) -> Result<PaginationParams, RpcError> {
        Ok(PaginationParams {
            limit: parse_number(self.limit.as_deref(), "limit")?,
            offset: parse_number(self.offset.as_deref(), "offset")?,
        })
    }
}

fn parse_number<T: std::str::FromStr>(raw: Option<&str>, name: &str) -> Result<Option<T>, RpcError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| RpcError::InvalidRequest(format!("{name} must be a non-negative integer, got {value:?}"))),
    }
}

fn parse_proposal_id(raw: &str) -> Result<ProposalId, RpcError> {
    raw.parse().map_err(RpcError::from)
}

#[derive(Debug, Serialize)]
pub struct ValidatorVoteView {
    pub operator_address: OperatorAddress,
    pub moniker: String,
    pub identity: Option<String>,
    pub website: Option<String>,
    pub self_delegate_address: Option<AccountAddress>,
    pub validator_option: Option<DecodedOption>,
    pub validator_vote_tx_hash: Option<TxHash>,
    pub most_voted: MostVoted,
    pub delegators_amount_option_yes: u64,
    pub delegators_amount_option_abstain: u64,
    pub delegators_amount_option_no: u64,
    pub delegators_amount_option_nwv: u64,
    pub delegators_shares_option_yes: Decimal,
    pub delegators_shares_option_abstain: Decimal,
    pub delegators_shares_option_no: Decimal,
    pub delegators_shares_option_nwv: Decimal,
    pub avatar_url: String,
}

#[derive(Serialize)]
pub struct ValidatorVotesResponse {
    pub proposal_id: ProposalId,
    pub validator_option: Option<String>,
    pub pagination: PaginationMeta,
    pub validators: Vec<ValidatorVoteView>,
}

pub async fn proposal_validators(
    State(state): State<Arc<AppState>>,
    Path(proposal_id): Path<String>,
    Query(query): Query<ValidatorVotesQuery>,
) -> Result<Json<ValidatorVotesResponse>, RpcError> {
    let proposal_id = parse_proposal_id(&proposal_id)?;
    let filter = query.filter()?;
    let pagination = query.pagination()?;
    tracing::debug!(proposal_id = %proposal_id, filter = ?filter, "proposal validators requested");

    let attribution = state.service.proposal_validators(proposal_id, filter).await?;
    let page = pagination.paginate(attribution.results);
    let validators = page
        .items
        .into_iter()
        .map(|result| {
            let descriptor = attribution.directory.get(&result.operator_address);
            state.assembler.validator_vote(result, descriptor)
        })
        .collect();

    Ok(Json(ValidatorVotesResponse {
        proposal_id,
        validator_option: filter.map(|f| f.to_string()),
        pagination: page.meta,
        validators,
    }))
}

pub async fn proposal_validator(
    State(state): State<Arc<AppState>>,
    Path((proposal_id, operator)): Path<(String, String)>,
) -> Result<Json<ValidatorVoteView>, RpcError> {
    let proposal_id = parse_proposal_id(&proposal_id)?;
    let operator: OperatorAddress = operator.parse()?;
    tracing::debug!(proposal_id = %proposal_id, operator = %operator, "validator vote requested");

    let single = state.service.proposal_validator(proposal_id, operator).await?;
    Ok(Json(
        state
            .assembler
            .validator_vote(single.result, single.descriptor.as_ref()),
    ))
}

pub async fn proposal_votes(
    State(state): State<Arc<AppState>>,
    Path(proposal_id): Path<String>,
) -> Result<Json<VoteSummary>, RpcError> {
    let proposal_id = parse_proposal_id(&proposal_id)?;
    Ok(Json(state.service.proposal_summary(proposal_id).await?))
}

// ── Validator ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ValidatorInfoResponse {
    pub operator_address: OperatorAddress,
    pub moniker: String,
    pub identity: Option<String>,
    pub website: Option<String>,
    pub details: Option<String>,
    pub consensus_address: Option<String>,
    pub self_delegate_address: Option<AccountAddress>,
    pub voting_power: StakeAmount,
    pub rank: Option<usize>,
    pub is_active: bool,
    pub self_bonded: StakeAmount,
    pub delegator_count: usize,
    pub delegator_shares: Option<Decimal>,
    pub proposals_voted_amount: usize,
    pub avatar_url: String,
}

pub async fn validator_info(
    State(state): State<Arc<AppState>>,
    Path(operator): Path<String>,
) -> Result<Json<ValidatorInfoResponse>, RpcError> {
    let operator: OperatorAddress = operator.parse()?;
    let report = state.service.validator(operator).await?;
    Ok(Json(state.assembler.validator_info(report)))
}

// ── Account ──────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct AccountVotesQuery {
    pub proposal_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AccountVoteView {
    pub proposal_id: ProposalId,
    pub option: DecodedOption,
    pub height: Height,
    pub tx_hash: TxHash,
}

#[derive(Serialize)]
pub struct AccountVotesResponse {
    pub address: AccountAddress,
    pub votes: Vec<AccountVoteView>,
}

pub async fn account_votes(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
    Query(query): Query<AccountVotesQuery>,
) -> Result<Json<AccountVotesResponse>, RpcError> {
    let address: AccountAddress = address.parse()?;
    let proposal_id = match query.proposal_id.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(parse_proposal_id(raw)?),
    };

    let votes = state
        .service
        .account_votes(address.clone(), proposal_id)
        .await?
        .into_iter()
        .map(|vote| state.assembler.account_vote(vote))
        .collect();
    Ok(Json(AccountVotesResponse { address, votes }))
}

#[derive(Debug, Serialize)]
pub struct AccountDelegationView {
    pub operator_address: OperatorAddress,
    pub moniker: String,
    pub identity: Option<String>,
    pub website: Option<String>,
    pub stake_amount: StakeAmount,
    pub avatar_url: String,
}

#[derive(Serialize)]
pub struct AccountDelegationsResponse {
    pub address: AccountAddress,
    pub total_staked: StakeAmount,
    pub delegations: Vec<AccountDelegationView>,
}

pub async fn account_delegations(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> Result<Json<AccountDelegationsResponse>, RpcError> {
    let address: AccountAddress = address.parse()?;
    tracing::debug!(address = %address, "account delegations requested");

    let held = state.service.account_delegations(address.clone()).await?;
    let delegations = held
        .delegations
        .into_iter()
        .map(|(operator, stake)| {
            let descriptor = held.directory.get(&operator);
            state.assembler.account_delegation(operator, stake, descriptor)
        })
        .collect();
    Ok(Json(AccountDelegationsResponse {
        address,
        total_staked: held.total_staked,
        delegations,
    }))
}

// ── Staking pool ─────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct StakingPoolResponse {
    pub bonded_tokens: StakeAmount,
    pub denom: String,
    pub symbol: Option<String>,
    pub price: Option<f64>,
    pub exponent: Option<u32>,
    pub logo: Option<String>,
}

pub async fn staking_pool(State(state): State<Arc<AppState>>) -> Result<Json<StakingPoolResponse>, RpcError> {
    let bonded_tokens = state.service.total_bonded().await?;

    let token = match &state.tokens {
        Some(tokens) => match tokens.token_info(&state.bond_denom).await {
            Ok(info) => Some(info),
            Err(e) => {
                tracing::warn!(denom = %state.bond_denom, error = %e, "token info unavailable");
                None
            }
        },
        None => None,
    };

    Ok(Json(StakingPoolResponse {
        bonded_tokens,
        denom: state.bond_denom.clone(),
        symbol: token.as_ref().and_then(|t| t.symbol.clone()),
        price: token.as_ref().and_then(|t| t.price),
        exponent: token.as_ref().and_then(|t| t.exponent),
        logo: token.and_then(|t| t.logo),
    }))
}
