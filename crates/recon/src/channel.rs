use crate::config::VerifyConfig;
use crate::error::VerifyError;
use crate::model::Outcome;
use crate::table::{RowRef, Table, Value};

/// Force every special-channel row to the bypass outcome.
///
/// Blanket rule, not a refinement of the decision table: whatever the
/// classifier produced, matching rows end with a null `corr_sku`, value `0_1`
/// and the bypass comment. Applying it again changes nothing.
pub fn apply_channel_override(table: &Table, config: &VerifyConfig) -> Result<Table, VerifyError> {
    let cols = &config.columns;
    let channels = config.channel_set();
    let response_idx = table.column_index(&cols.response)?;

    let bypass = Outcome::Bypassed;
    let in_channel = |row: &RowRef<'_>| channels.contains(row.at(response_idx));

    let corr_idx = table.column_index(&cols.corr_sku)?;
    let value_idx = table.column_index(&cols.value)?;
    let comment_idx = table.column_index(&cols.comment)?;

    let table = table.map_column(&cols.corr_sku, |row| {
        if in_channel(&row) {
            Value::Null
        } else {
            row.at(corr_idx).clone()
        }
    })?;
    let table = table.map_column(&cols.value, |row| {
        if in_channel(&row) {
            Value::text(bypass.code())
        } else {
            row.at(value_idx).clone()
        }
    })?;
    let table = table.map_column(&cols.comment, |row| {
        if in_channel(&row) {
            Value::text(bypass.comment())
        } else {
            row.at(comment_idx).clone()
        }
    })?;

    Ok(table)
}

/// Number of rows the override will move away from their classifier outcome.
pub fn count_overridden(table: &Table, config: &VerifyConfig) -> Result<usize, VerifyError> {
    let cols = &config.columns;
    let channels = config.channel_set();
    let response_idx = table.column_index(&cols.response)?;
    let value_idx = table.column_index(&cols.value)?;
    let bypass = Value::text(Outcome::Bypassed.code());

    Ok(table
        .rows()
        .filter(|r| channels.contains(r.at(response_idx)) && r.at(value_idx) != &bypass)
        .count())
}
