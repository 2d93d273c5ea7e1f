// src/pipeline.rs

use reqwest::Client;
use url::Url;

use crate::aggregate::{qualifying_offer_with, OfferParams, QualifyingOffer};
use crate::error::PipelineResult;
use crate::fetch::fetch;
use crate::process::clean;
use crate::table::Table;

/// Fetch the salary page and return every row with a usable salary, all seasons.
pub async fn get_all_rows(client: &Client, url: &Url) -> PipelineResult<Table> {
    let raw = fetch(client, url).await?;
    clean(raw)
}

/// Fetch, clean and compute the qualifying offer from scratch.
pub async fn get_qualifying_offer(
    client: &Client,
    url: &Url,
    params: &OfferParams,
) -> PipelineResult<QualifyingOffer> {
    let table = get_all_rows(client, url).await?;
    qualifying_offer_with(&table, params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::test_support::{init_test_logging, serve_html, SAMPLE_PAGE};

    #[tokio::test]
    async fn test_all_rows_drops_missing_salary() {
        init_test_logging();
        let url = serve_html(SAMPLE_PAGE);
        let table = get_all_rows(&Client::new(), &url).await.unwrap();
        assert_eq!(table.len(), 4);
        assert!(table.rows().iter().all(|r| r.salary().is_some()));
        assert_eq!(table.rows()[2].salary(), Some(31_799_030.0));
    }

    #[tokio::test]
    async fn test_offer_end_to_end() {
        init_test_logging();
        let url = serve_html(SAMPLE_PAGE);
        let offer = get_qualifying_offer(&Client::new(), &url, &OfferParams::default())
            .await
            .unwrap();
        let stats = &offer.top_125_stats;
        assert_eq!(stats.year, 2016);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.maximum, 32_571_000.0);
        assert_eq!(stats.minimum, 16_000_000.0);
        assert_eq!(stats.median, 31_799_030.0);
        assert_eq!(offer.value, (16_000_000.0 + 32_571_000.0 + 31_799_030.0) / 3.0);
        assert_eq!(offer.top_10_players.len(), 3);
    }

    #[tokio::test]
    async fn test_page_without_salary_column() {
        init_test_logging();
        let url = serve_html("<table><tr><th>Player</th></tr><tr><td>x</td></tr></table>");
        let err = get_all_rows(&Client::new(), &url).await.unwrap_err();
        assert!(matches!(err, PipelineError::Schema(_)));
    }
}
