// src/config.rs

use anyhow::{anyhow, bail, Context, Result};
use std::env;
use url::Url;

use crate::aggregate::OfferParams;

pub const SOURCE_URL_VAR: &str = "SALARY_DATA_URL";
pub const PORT_VAR: &str = "PORT";
pub const LOG_LEVEL_VAR: &str = "LOG_LEVEL";
pub const CORS_ORIGINS_VAR: &str = "CORS_ORIGINS";
pub const MAX_YEAR_VAR: &str = "QO_MAX_YEAR";

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost",
    "http://localhost:8080",
    "http://localhost:5173",
];

/// Process configuration, read once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Page holding the salary table.
    pub source_url: Url,
    pub port: u16,
    pub log_level: String,
    /// Serialized origins, or `["*"]` for any origin.
    pub cors_origins: Vec<String>,
    pub max_year: Option<i64>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key → value source; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let raw_url = get(SOURCE_URL_VAR)
            .ok_or_else(|| anyhow!("{} must be set to the salary table page", SOURCE_URL_VAR))?;
        let source_url = Url::parse(raw_url.trim())
            .with_context(|| format!("parsing {}={}", SOURCE_URL_VAR, raw_url))?;

        let port = match get(PORT_VAR) {
            Some(p) => p
                .trim()
                .parse()
                .with_context(|| format!("parsing {}={}", PORT_VAR, p))?,
            None => DEFAULT_PORT,
        };

        let log_level = get(LOG_LEVEL_VAR).unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        let cors_origins = match get(CORS_ORIGINS_VAR) {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(normalize_origin)
                .collect::<Result<Vec<_>>>()?,
            None => DEFAULT_CORS_ORIGINS
                .iter()
                .map(|o| o.to_string())
                .collect(),
        };

        let max_year = get(MAX_YEAR_VAR)
            .map(|y| {
                y.trim()
                    .parse::<i64>()
                    .with_context(|| format!("parsing {}={}", MAX_YEAR_VAR, y))
            })
            .transpose()?;

        Ok(Self {
            source_url,
            port,
            log_level,
            cors_origins,
            max_year,
        })
    }

    pub fn offer_params(&self) -> OfferParams {
        OfferParams {
            max_year: self.max_year,
            ..OfferParams::default()
        }
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

/// `scheme://host[:port]` only; anything with a path or query is rejected.
fn normalize_origin(raw: &str) -> Result<String> {
    if raw == "*" {
        return Ok(raw.to_string());
    }
    let url = Url::parse(raw).with_context(|| format!("parsing CORS origin {}", raw))?;
    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        bail!("CORS origin {} must not carry a path, query or fragment", raw);
    }
    let origin = url.origin();
    if !origin.is_tuple() {
        bail!("CORS origin {} has no host", raw);
    }
    Ok(origin.ascii_serialization())
}
