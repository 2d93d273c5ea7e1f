// src/server.rs

use reqwest::Client;
use serde::Serialize;
use std::convert::Infallible;
use tracing::{info, warn};
use url::Url;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{reject::Rejection, reply::Reply, Filter};

use crate::aggregate::OfferParams;
use crate::config::Config;
use crate::error::PipelineError;
use crate::pipeline;

/// What every handler needs to run its own pipeline. Holds no salary data.
#[derive(Clone)]
pub struct AppContext {
    client: Client,
    source_url: Url,
    params: OfferParams,
}

impl AppContext {
    pub fn new(client: Client, source_url: Url, params: OfferParams) -> Self {
        Self {
            client,
            source_url,
            params,
        }
    }

    pub fn from_config(client: Client, config: &Config) -> Self {
        Self::new(client, config.source_url.clone(), config.offer_params())
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    details: Option<String>,
}

/// `/health`, `/get-all-rows` and `/qualifying-offer`.
pub fn routes(
    ctx: AppContext,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(health_check);

    let all_rows = warp::path("get-all-rows")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_context(ctx.clone()))
        .and_then(get_all_rows);

    let offer = warp::path("qualifying-offer")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_context(ctx))
        .and_then(get_qualifying_offer);

    health.or(all_rows).or(offer)
}

/// Browser access from the configured front-end origins.
pub fn cors(config: &Config) -> warp::cors::Builder {
    let builder = warp::cors()
        .allow_methods(vec!["GET", "OPTIONS"])
        .allow_headers(vec![
            "accept",
            "authorization",
            "content-type",
            "origin",
            "x-requested-with",
        ])
        .allow_credentials(true);
    if config.allows_any_origin() {
        builder.allow_any_origin()
    } else {
        builder.allow_origins(config.cors_origins.iter().map(String::as_str))
    }
}

fn with_context(ctx: AppContext) -> impl Filter<Extract = (AppContext,), Error = Infallible> + Clone {
    warp::any().map(move || ctx.clone())
}

async fn health_check() -> Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&serde_json::json!({ "status": "healthy" })))
}

async fn get_all_rows(ctx: AppContext) -> Result<Response, Rejection> {
    match pipeline::get_all_rows(&ctx.client, &ctx.source_url).await {
        Ok(table) => {
            info!(rows = table.len(), "serving all rows");
            Ok(warp::reply::json(&table.rows()).into_response())
        }
        Err(e) => Ok(error_reply(&e)),
    }
}

async fn get_qualifying_offer(ctx: AppContext) -> Result<Response, Rejection> {
    match pipeline::get_qualifying_offer(&ctx.client, &ctx.source_url, &ctx.params).await {
        Ok(offer) => {
            info!(value = offer.value, year = offer.top_125_stats.year, "serving qualifying offer");
            Ok(warp::reply::json(&offer).into_response())
        }
        Err(e) => Ok(error_reply(&e)),
    }
}

fn status_for(err: &PipelineError) -> StatusCode {
    match err {
        PipelineError::Fetch { .. } | PipelineError::Parse(_) | PipelineError::Schema(_) => {
            StatusCode::BAD_GATEWAY
        }
        PipelineError::EmptyData(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn error_reply(err: &PipelineError) -> Response {
    let status = status_for(err);
    warn!(kind = err.kind(), status = status.as_u16(), error = %err, "pipeline failed");
    warp::reply::with_status(
        warp::reply::json(&ErrorResponse {
            error: err.kind().to_string(),
            details: Some(err.to_string()),
        }),
        status,
    )
    .into_response()
}
