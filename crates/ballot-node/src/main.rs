use ballot_node::{router, AppState, Args};
use clap::Parser;
use std::net::SocketAddr;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let state = AppState::from_args(&args);
    info!(
        difficulty = args.difficulty,
        candidates = state.candidates.len(),
        otp_ttl_secs = state.otp.ttl().as_secs(),
        dev_otp = args.dev_otp,
        "ledger ready"
    );

    let app = router(state);
    let addr: SocketAddr = args.listen.parse()?;
    info!("ballot-node listening on http://{addr}");
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await?;
    Ok(())
}
