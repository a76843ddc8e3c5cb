use crate::error::VerifyError;
use crate::model::Partitions;
use crate::table::Table;

/// Split rows on nullity of `column`. Both halves keep input order.
pub fn partition(table: &Table, column: &str) -> Result<Partitions, VerifyError> {
    let idx = table.column_index(column).inspect_err(|e| {
        tracing::error!(table = table.name(), "cannot partition: {e}");
    })?;

    let not_null = table
        .filter(|r| !r.at(idx).is_null())
        .renamed(format!("{}[{column} not null]", table.name()));
    let null = table
        .filter(|r| r.at(idx).is_null())
        .renamed(format!("{}[{column} null]", table.name()));

    tracing::info!(
        table = table.name(),
        column,
        not_null = not_null.len(),
        null = null.len(),
        "partitioned input"
    );

    Ok(Partitions { not_null, null })
}

/// Recombine partitions into one verification table: non-null rows first.
pub fn reunify(partitions: &Partitions, name: &str) -> Result<Table, VerifyError> {
    Ok(partitions.not_null.concat(&partitions.null)?.renamed(name))
}
