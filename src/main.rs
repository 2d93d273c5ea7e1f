use anyhow::{Context, Result};
use qoscraper::{
    config::Config,
    server::{cors, routes, AppContext},
};
use reqwest::Client;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};
use warp::Filter;

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) config ───────────────────────────────────────────────────
    let config = Config::from_env().context("loading configuration")?;

    // ─── 2) init logging ─────────────────────────────────────────────
    fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(config.log_level.parse().unwrap_or(Level::INFO.into())),
        )
        .init();

    info!("Starting qualifying offer service");

    // ─── 3) routes ───────────────────────────────────────────────────
    let client = Client::builder()
        .user_agent(concat!("qoscraper/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("building HTTP client")?;
    let ctx = AppContext::from_config(client, &config);
    let api = routes(ctx)
        .with(cors(&config))
        .with(warp::trace::request());

    // ─── 4) serve ────────────────────────────────────────────────────
    let port = config.port;
    info!(source = %config.source_url, "Salary source");
    info!("Server starting on port {}", port);
    info!("Health check: http://localhost:{}/health", port);
    info!("All rows: GET http://localhost:{}/get-all-rows", port);
    info!("Qualifying offer: GET http://localhost:{}/qualifying-offer", port);

    warp::serve(api).run(([0, 0, 0, 0], port)).await;

    Ok(())
}
