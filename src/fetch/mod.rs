// src/fetch/mod.rs

use reqwest::Client;
use tracing::{debug, info, instrument};
use url::Url;

use crate::error::{PipelineError, PipelineResult};
use crate::table::Table;

pub mod table;

pub use table::parse_first_table;

/// GET `url` and extract the first HTML table on the page.
///
/// One request per call; nothing is cached or retried.
#[instrument(level = "info", skip(client, url), fields(url = %url))]
pub async fn fetch(client: &Client, url: &Url) -> PipelineResult<Table> {
    let html = get_text(client, url).await?;
    let table = parse_first_table(&html)?;
    info!(
        rows = table.len(),
        columns = table.columns().len(),
        "extracted salary table"
    );
    Ok(table)
}

async fn get_text(client: &Client, url: &Url) -> PipelineResult<String> {
    debug!("Fetching text from {}", url);
    let fetch_err = |source: reqwest::Error| PipelineError::Fetch {
        url: url.to_string(),
        source,
    };
    client
        .get(url.clone())
        .send()
        .await
        .map_err(fetch_err)?
        .error_for_status()
        .map_err(fetch_err)?
        .text()
        .await
        .map_err(fetch_err)
}
