// src/aggregate/mod.rs

use chrono::{Datelike, Utc};
use serde::Serialize;
use std::cmp::Ordering;
use tracing::{debug, info, warn};

use crate::error::{PipelineError, PipelineResult};
use crate::table::{SalaryRow, Table, SALARY, YEAR};

pub mod stats;

/// Number of top salaries averaged into the qualifying offer.
pub const QUALIFYING_POOL_SIZE: usize = 125;
/// Number of highest-paid rows echoed back with the offer.
pub const TOP_PLAYERS: usize = 10;

/// Knobs for [`qualifying_offer_with`]. The default is the league rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OfferParams {
    pub pool_size: usize,
    pub top_players: usize,
    /// Seasons after this are ignored when picking the latest one.
    pub max_year: Option<i64>,
}

impl Default for OfferParams {
    fn default() -> Self {
        Self {
            pool_size: QUALIFYING_POOL_SIZE,
            top_players: TOP_PLAYERS,
            max_year: None,
        }
    }
}

/// Summary of the salaries that make up the offer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoolStats {
    pub year: i64,
    pub count: usize,
    pub minimum: f64,
    pub maximum: f64,
    pub average: f64,
    pub median: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualifyingOffer {
    pub value: f64,
    pub top_125_stats: PoolStats,
    pub top_10_players: Vec<SalaryRow>,
}

/// Mean of the 125 highest salaries in the latest season of a cleaned table.
pub fn qualifying_offer(table: &Table) -> PipelineResult<QualifyingOffer> {
    qualifying_offer_with(table, &OfferParams::default())
}

/// [`qualifying_offer`] with an explicit pool size, player count and season ceiling.
pub fn qualifying_offer_with(
    table: &Table,
    params: &OfferParams,
) -> PipelineResult<QualifyingOffer> {
    if table.is_empty() {
        return Err(PipelineError::EmptyData(
            "salary table has no rows; cannot compute qualifying offer".to_string(),
        ));
    }
    if !table.has_column(YEAR) {
        return Err(PipelineError::Schema(format!(
            "column `{}` not found (columns: {:?})",
            YEAR,
            table.columns()
        )));
    }

    let year = latest_season(table, params.max_year)?;
    if params.max_year.is_none() {
        warn_if_future(year);
    }

    let ranked = rank_season(table, year)?;
    let pool = &ranked[..ranked.len().min(params.pool_size)];
    let salaries: Vec<f64> = pool.iter().map(|(salary, _)| *salary).collect();
    let stats = summarize(year, &salaries)?;

    let top_10_players = pool
        .iter()
        .take(params.top_players)
        .map(|(_, row)| (*row).clone())
        .collect();

    info!(
        year,
        season_rows = ranked.len(),
        count = stats.count,
        value = stats.average,
        "computed qualifying offer"
    );

    Ok(QualifyingOffer {
        value: stats.average,
        top_125_stats: stats,
        top_10_players,
    })
}

/// Highest readable `Year`, not above `max_year` when one is given.
fn latest_season(table: &Table, max_year: Option<i64>) -> PipelineResult<i64> {
    table
        .rows()
        .iter()
        .filter_map(SalaryRow::year)
        .filter(|y| max_year.map_or(true, |ceiling| *y <= ceiling))
        .max()
        .ok_or_else(|| match max_year {
            Some(ceiling) => PipelineError::EmptyData(format!("no season at or before {}", ceiling)),
            None => PipelineError::EmptyData("no row has a readable Year".to_string()),
        })
}

fn warn_if_future(year: i64) {
    let this_year = i64::from(Utc::now().year());
    if year > this_year {
        warn!(
            year,
            this_year, "latest season in the data is in the future; offer may be skewed"
        );
    }
}

/// Rows of `year`, highest salary first. Equal salaries keep document order.
fn rank_season(table: &Table, year: i64) -> PipelineResult<Vec<(f64, &SalaryRow)>> {
    let mut ranked = Vec::new();
    for row in table.rows().iter().filter(|r| r.year() == Some(year)) {
        let salary = row.salary().ok_or_else(|| {
            PipelineError::Schema(format!(
                "`{}` is not numeric ({:?}); clean the table first",
                SALARY,
                row.get(SALARY)
            ))
        })?;
        ranked.push((salary, row));
    }
    // stable: ties stay in source order; cleaned salaries are never NaN
    ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    debug!(year, rows = ranked.len(), "ranked season");
    Ok(ranked)
}

fn summarize(year: i64, salaries: &[f64]) -> PipelineResult<PoolStats> {
    let empty = || PipelineError::EmptyData(format!("no salaries in season {}", year));
    Ok(PoolStats {
        year,
        count: salaries.len(),
        minimum: stats::minimum(salaries).ok_or_else(empty)?,
        maximum: stats::maximum(salaries).ok_or_else(empty)?,
        average: stats::mean(salaries).ok_or_else(empty)?,
        median: stats::median(salaries).ok_or_else(empty)?,
    })
}
