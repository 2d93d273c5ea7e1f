use anyhow::{Context, Result};
use qoscraper::{
    config::{Config, SOURCE_URL_VAR},
    pipeline,
};
use reqwest::Client;
use std::env;
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

/// Compute the qualifying offer once and print it.
///
/// Usage: offer [URL] [--yaml]
/// Without URL the page comes from SALARY_DATA_URL.
#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let yaml = args.iter().any(|a| a == "--yaml");
    let url_arg = args.iter().find(|a| !a.starts_with("--")).cloned();

    let config = Config::from_lookup(|key| match (&url_arg, key) {
        (Some(url), SOURCE_URL_VAR) => Some(url.clone()),
        _ => env::var(key).ok(),
    })
    .context("loading configuration")?;

    // logs go to stderr; stdout carries only the result
    fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(config.log_level.parse().unwrap_or(Level::INFO.into())),
        )
        .with_writer(std::io::stderr)
        .init();

    let client = Client::new();
    let offer =
        pipeline::get_qualifying_offer(&client, &config.source_url, &config.offer_params())
            .await
            .with_context(|| format!("computing qualifying offer from {}", config.source_url))?;

    let out = if yaml {
        serde_yaml::to_string(&offer)?
    } else {
        serde_json::to_string_pretty(&offer)?
    };
    println!("{}", out);
    Ok(())
}
