use serde_json::Value;
use tracing::{debug, info};

use crate::error::{PipelineError, PipelineResult};
use crate::process::utils::{cell_to_string, parse_salary};
use crate::table::{Table, SALARY};

/// Normalize the `Salary` column to numbers, dropping rows that don't parse.
///
/// Other columns pass through untouched and row order is kept. Running the
/// cleaner over its own output changes nothing.
pub fn clean(table: Table) -> PipelineResult<Table> {
    if !table.has_column(SALARY) {
        return Err(PipelineError::Schema(format!(
            "column `{}` not found (columns: {:?})",
            SALARY,
            table.columns()
        )));
    }

    let (columns, rows) = table.into_parts();
    let total = rows.len();

    let kept: Vec<_> = rows
        .into_iter()
        .filter_map(|mut row| {
            let raw = row.get(SALARY).map(cell_to_string).unwrap_or_default();
            match parse_salary(&raw) {
                Some(salary) => {
                    row.set(SALARY, Value::from(salary));
                    Some(row)
                }
                None => {
                    debug!(salary = %raw, "dropping row without a usable salary");
                    None
                }
            }
        })
        .collect();

    info!(kept = kept.len(), dropped = total - kept.len(), "cleaned salary table");
    Ok(Table::new(columns, kept))
}
