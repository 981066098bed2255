use ballot_core::{
    constants::{DEFAULT_DIFFICULTY, DEFAULT_MAX_NONCE},
    SealStrategy, Sealer,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(name = "ballot-node")]
#[command(about = "Single-process election ledger served over HTTP")]
pub struct Args {
    /// Address to listen on, e.g. 127.0.0.1:8080
    #[arg(long, default_value = "127.0.0.1:8080")]
    pub listen: String,

    /// Leading zero hex characters required of every sealed block
    #[arg(long, default_value_t = DEFAULT_DIFFICULTY)]
    pub difficulty: usize,

    /// Give up sealing after this many nonces
    #[arg(long, default_value_t = DEFAULT_MAX_NONCE)]
    pub max_nonce: u64,

    /// Search nonces on all cores
    #[arg(long)]
    pub parallel_seal: bool,

    /// Passcode lifetime in seconds
    #[arg(long, default_value_t = 300)]
    pub otp_ttl_secs: u64,

    /// Return issued passcodes in the HTTP response instead of sending an SMS
    #[arg(long)]
    pub dev_otp: bool,

    /// Candidate as `id=name=party`; repeat for each. Defaults to a sample roster.
    #[arg(long = "candidate", value_parser = parse_candidate)]
    pub candidates: Vec<Candidate>,
}

impl Args {
    pub fn sealer(&self) -> Sealer {
        let strategy = if self.parallel_seal {
            SealStrategy::Parallel
        } else {
            SealStrategy::Sequential
        };
        Sealer::new(self.difficulty)
            .with_max_nonce(self.max_nonce)
            .with_strategy(strategy)
    }

    pub fn otp_ttl(&self) -> Duration {
        Duration::from_secs(self.otp_ttl_secs)
    }

    pub fn roster(&self) -> Vec<Candidate> {
        if self.candidates.is_empty() {
            default_candidates()
        } else {
            self.candidates.clone()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub party: String,
}

impl Candidate {
    pub fn new(id: &str, name: &str, party: &str) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            party: party.into(),
        }
    }
}

pub fn parse_candidate(s: &str) -> Result<Candidate, String> {
    let mut parts = s.splitn(3, '=').map(str::trim);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(id), Some(name), Some(party)) if !id.is_empty() && !name.is_empty() => {
            Ok(Candidate::new(id, name, party))
        }
        _ => Err(format!("expected `id=name=party`, got `{s}`")),
    }
}

pub fn default_candidates() -> Vec<Candidate> {
    vec![
        Candidate::new("c1", "Alex Johnson", "Progressive Party"),
        Candidate::new("c2", "Maria Rodriguez", "Future Alliance"),
        Candidate::new("c3", "James Smith", "United Democratic"),
        Candidate::new("c4", "Sarah Williams", "Liberty Coalition"),
    ]
}
