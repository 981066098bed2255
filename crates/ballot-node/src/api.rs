use crate::{config::Candidate, ApiError, Args};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use ballot_auth::{mask_phone, normalize_phone, OtpStore, VerifiedVoters};
use ballot_core::{verify_chain, Block, IntegrityViolation, Ledger, Validation, VoteOutcome};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Everything the handlers share. Built once by `main` and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<Ledger>,
    pub otp: Arc<OtpStore>,
    pub verified: Arc<VerifiedVoters>,
    pub candidates: Arc<Vec<Candidate>>,
    pub dev_otp: bool,
}

impl AppState {
    pub fn new(ledger: Ledger, otp: OtpStore, candidates: Vec<Candidate>, dev_otp: bool) -> Self {
        Self {
            ledger: Arc::new(ledger),
            otp: Arc::new(otp),
            verified: Arc::new(VerifiedVoters::new()),
            candidates: Arc::new(candidates),
            dev_otp,
        }
    }

    pub fn from_args(args: &Args) -> Self {
        Self::new(
            Ledger::with_sealer(args.sealer()),
            OtpStore::new(args.otp_ttl()),
            args.roster(),
            args.dev_otp,
        )
    }

    fn is_candidate(&self, candidate_id: &str) -> bool {
        self.candidates.iter().any(|c| c.id == candidate_id)
    }
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
}

#[derive(Deserialize)]
pub struct OtpRequest {
    pub phone: String,
}

#[derive(Serialize, Deserialize)]
pub struct OtpSent {
    pub sent: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_code: Option<String>,
}

#[derive(Deserialize)]
pub struct VerifyRequest {
    pub phone: String,
    pub code: String,
}

#[derive(Serialize, Deserialize)]
pub struct Verified {
    pub voter_id: String,
}

#[derive(Deserialize)]
pub struct VoteRequest {
    pub voter_id: String,
    pub candidate_id: String,
}

#[derive(Serialize, Deserialize)]
pub struct VoteResponse {
    pub accepted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<Block>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct VoterStatus {
    pub has_voted: bool,
}

#[derive(Serialize, Deserialize)]
pub struct CandidateResult {
    pub candidate_id: String,
    pub name: String,
    pub party: String,
    pub votes: usize,
    pub percent: f64,
}

#[derive(Serialize, Deserialize)]
pub struct TallyResponse {
    pub total: usize,
    pub counts: BTreeMap<String, usize>,
    pub results: Vec<CandidateResult>,
}

#[derive(Serialize, Deserialize)]
pub struct Head {
    pub height: u64,
    pub hash: String,
}

#[derive(Serialize, Deserialize)]
pub struct Validity {
    pub valid: bool,
    pub linkage_valid: bool,
    pub difficulty: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub violation: Option<IntegrityViolation>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(Health { status: "ok" }) }))
        .route("/candidates", get(candidates))
        .route("/auth/otp", post(request_otp))
        .route("/auth/verify", post(verify_otp))
        .route("/votes", post(submit_vote))
        .route("/votes/{voter_id}", get(voter_status))
        .route("/tally", get(tally))
        .route("/chain", get(chain))
        .route("/chain/head", get(chain_head))
        .route("/chain/valid", get(chain_valid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn candidates(State(state): State<AppState>) -> Json<Vec<Candidate>> {
    Json(state.candidates.as_ref().clone())
}

async fn request_otp(
    State(state): State<AppState>,
    Json(req): Json<OtpRequest>,
) -> Result<Json<OtpSent>, ApiError> {
    let phone = normalize_phone(&req.phone)?;
    let code = state.otp.issue(&phone);
    // No SMS gateway here; the code only leaves the process in dev mode.
    info!(phone = %mask_phone(&phone), "passcode issued");
    Ok(Json(OtpSent {
        sent: true,
        dev_code: state.dev_otp.then_some(code),
    }))
}

async fn verify_otp(
    State(state): State<AppState>,
    Json(req): Json<VerifyRequest>,
) -> Result<Json<Verified>, ApiError> {
    let phone = normalize_phone(&req.phone)?;
    let voter_id = state.otp.verify(&phone, req.code.trim())?;
    state.verified.insert(voter_id.clone());
    info!(phone = %mask_phone(&phone), "voter verified");
    Ok(Json(Verified { voter_id }))
}

async fn submit_vote(
    State(state): State<AppState>,
    Json(req): Json<VoteRequest>,
) -> Result<(StatusCode, Json<VoteResponse>), ApiError> {
    if !state.verified.contains(&req.voter_id) {
        return Err(ApiError::Unauthenticated);
    }
    if !state.is_candidate(&req.candidate_id) {
        return Err(ApiError::UnknownCandidate(req.candidate_id));
    }

    // Sealing is CPU-bound; keep it off the async workers.
    let ledger = Arc::clone(&state.ledger);
    let outcome =
        tokio::task::spawn_blocking(move || ledger.submit_vote(&req.voter_id, &req.candidate_id))
            .await??;

    let response = match outcome {
        VoteOutcome::Accepted(block) => (
            StatusCode::OK,
            Json(VoteResponse {
                accepted: true,
                block: Some(block),
                reason: None,
            }),
        ),
        VoteOutcome::AlreadyVoted => (
            StatusCode::CONFLICT,
            Json(VoteResponse {
                accepted: false,
                block: None,
                reason: Some("voter has already voted".into()),
            }),
        ),
    };
    Ok(response)
}

async fn voter_status(
    State(state): State<AppState>,
    Path(voter_id): Path<String>,
) -> Json<VoterStatus> {
    Json(VoterStatus {
        has_voted: state.ledger.has_voted(&voter_id),
    })
}

async fn tally(State(state): State<AppState>) -> Json<TallyResponse> {
    let tally = state.ledger.tally();
    let results = state
        .candidates
        .iter()
        .map(|c| CandidateResult {
            candidate_id: c.id.clone(),
            name: c.name.clone(),
            party: c.party.clone(),
            votes: tally.votes_for(&c.id),
            percent: tally.percent(&c.id),
        })
        .collect();
    Json(TallyResponse {
        total: tally.total(),
        results,
        counts: tally.into_counts(),
    })
}

async fn chain(State(state): State<AppState>) -> Json<Vec<Block>> {
    Json(state.ledger.get_chain())
}

async fn chain_head(State(state): State<AppState>) -> Json<Head> {
    let head = state.ledger.head();
    Json(Head {
        height: head.index(),
        hash: head.hash().to_string(),
    })
}

async fn chain_valid(State(state): State<AppState>) -> Json<Validity> {
    // Both modes judge the same snapshot.
    let chain = state.ledger.get_chain();
    let difficulty = state.ledger.difficulty();
    let violation = verify_chain(&chain, difficulty, Validation::Full).err();
    Json(Validity {
        valid: violation.is_none(),
        linkage_valid: verify_chain(&chain, difficulty, Validation::LinkageOnly).is_ok(),
        difficulty,
        violation,
    })
}
