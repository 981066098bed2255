use anyhow::{bail, Context, Result};
use ballot_core::{audit_chain, Block, Validation};
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "ballot-cli")]
#[command(about = "CLI client for the ballot node")]
struct Cli {
    /// Node base URL (e.g. http://127.0.0.1:8080)
    #[arg(long, global = true, default_value = "http://127.0.0.1:8080")]
    node: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ask the node to issue a passcode for a phone number
    RequestOtp {
        #[arg(long)]
        phone: String,
    },
    /// Exchange a passcode for a voter id
    Verify {
        #[arg(long)]
        phone: String,
        #[arg(long)]
        code: String,
    },
    /// Cast a vote with a verified voter id
    Vote {
        #[arg(long)]
        voter_id: String,
        #[arg(long)]
        candidate: String,
    },
    /// Show current results
    Tally,
    /// Dump the full chain as JSON
    Chain,
    /// Download the chain and verify it locally
    Audit {
        /// Difficulty the chain was sealed with; asked from the node when omitted
        #[arg(long)]
        difficulty: Option<usize>,
        #[arg(long, value_enum, default_value_t = Mode::Full)]
        mode: Mode,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    Linkage,
    Full,
}

impl From<Mode> for Validation {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Linkage => Validation::LinkageOnly,
            Mode::Full => Validation::Full,
        }
    }
}

#[derive(Serialize)]
struct PhoneIn<'a> {
    phone: &'a str,
}

#[derive(Serialize)]
struct VerifyIn<'a> {
    phone: &'a str,
    code: &'a str,
}

#[derive(Serialize)]
struct VoteIn<'a> {
    voter_id: &'a str,
    candidate_id: &'a str,
}

#[derive(Deserialize)]
struct NodeValidity {
    difficulty: usize,
}

async fn node_difficulty(client: &reqwest::Client, node: &str) -> Result<usize> {
    let validity: NodeValidity = client
        .get(format!("{node}/chain/valid"))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await
        .context("decoding chain validity")?;
    Ok(validity.difficulty)
}

/// Print the audit result. Any violation turns into an error so the process
/// exits non-zero.
fn report_audit(chain: &[Block], difficulty: usize, mode: Validation) -> Result<()> {
    let violations = audit_chain(chain, difficulty, mode);
    if violations.is_empty() {
        println!("ok: {} blocks, {} votes", chain.len(), chain.len().saturating_sub(1));
        return Ok(());
    }
    for violation in &violations {
        warn!(%violation, "integrity violation");
        println!("{violation}");
    }
    bail!("chain failed audit with {} violation(s)", violations.len());
}

async fn print_response(res: reqwest::Response) -> Result<()> {
    let status = res.status();
    let body = res.text().await?;
    println!("status: {}", status);
    println!("{body}");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .pretty()
        .init();

    let cli = Cli::parse();
    let node = cli.node.trim_end_matches('/');
    let client = reqwest::Client::new();
    match cli.cmd {
        Command::RequestOtp { phone } => {
            let res = client
                .post(format!("{node}/auth/otp"))
                .json(&PhoneIn { phone: &phone })
                .send()
                .await?;
            print_response(res).await?;
        }
        Command::Verify { phone, code } => {
            let res = client
                .post(format!("{node}/auth/verify"))
                .json(&VerifyIn {
                    phone: &phone,
                    code: &code,
                })
                .send()
                .await?;
            print_response(res).await?;
        }
        Command::Vote {
            voter_id,
            candidate,
        } => {
            let res = client
                .post(format!("{node}/votes"))
                .json(&VoteIn {
                    voter_id: &voter_id,
                    candidate_id: &candidate,
                })
                .send()
                .await?;
            print_response(res).await?;
        }
        Command::Tally => {
            let res = client.get(format!("{node}/tally")).send().await?;
            print_response(res).await?;
        }
        Command::Chain => {
            let res = client.get(format!("{node}/chain")).send().await?;
            print_response(res).await?;
        }
        Command::Audit { difficulty, mode } => {
            let chain: Vec<Block> = client
                .get(format!("{node}/chain"))
                .send()
                .await?
                .error_for_status()?
                .json()
                .await
                .context("decoding chain")?;
            debug!(blocks = chain.len(), "chain downloaded");

            let difficulty = match difficulty {
                Some(difficulty) => difficulty,
                None => node_difficulty(&client, node).await?,
            };
            report_audit(&chain, difficulty, mode.into())?;
        }
    }
    Ok(())
}
