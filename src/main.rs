use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use medchain_core::{GatewayConfig, SubmissionGateway};
use medchain_rpc::JsonRpcClient;

/// Main entry point for the MedChain gateway
///
/// Resolves configuration from the environment once, connects the JSON-RPC chain client and
/// serves the submission forms and endpoints over REST.
///
/// # Environment Variables
/// - `MEDCHAIN_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `MEDCHAIN_RPC_URL`: node JSON-RPC endpoint (default: "http://localhost:7545")
/// - `HOSPITAL_CONTRACT_ADDRESS`, `PATIENT_CONTRACT_ADDRESS`, `RECORDS_CONTRACT_ADDRESS`:
///   deployed contract addresses (required)
/// - `MEDCHAIN_CALL_TIMEOUT_SECS`: bound on each remote call (default: 60)
/// - `MEDCHAIN_POLL_INTERVAL_MS`: receipt poll interval (default: 500)
/// - `MEDCHAIN_FROM_ACCOUNT`: account to authorize submissions (default: the node's first)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the gateway configuration is missing or invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("medchain_run=info".parse()?)
                .add_directive("medchain_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("MEDCHAIN_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let cfg = Arc::new(GatewayConfig::from_lookup(|key| std::env::var(key).ok())?);

    tracing::info!("++ Starting MedChain REST on {}", rest_addr);
    tracing::info!("++ Using node at {}", cfg.rpc_url());

    let client = Arc::new(JsonRpcClient::from_config(&cfg));
    let gateway = Arc::new(SubmissionGateway::new(cfg, client));
    let app = api_rest::router(gateway);

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
