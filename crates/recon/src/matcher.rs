use std::collections::HashMap;

use crate::config::{DuplicatePolicy, VerifyConfig};
use crate::error::VerifyError;
use crate::model::{JoinStats, Joined};
use crate::table::{Table, Value};

/// Left outer join of `table` against the reference catalogue.
///
/// Each row looks up `sku` among the reference `sku_code` keys and receives
/// that entry's `corr_sku`, or null when there is none. Duplicate reference
/// keys resolve to the first entry in reference order, unless the config asks
/// to reject them. Row count and row order are preserved.
pub fn join_reference(
    table: &Table,
    reference: &Table,
    config: &VerifyConfig,
) -> Result<Joined, VerifyError> {
    let cols = &config.columns;

    let code_idx = reference.column_index(&cols.sku_code).inspect_err(|e| {
        tracing::error!(reference = reference.name(), "reference structure: {e}");
    })?;
    let corr_idx = reference.column_index(&cols.corr_sku).inspect_err(|e| {
        tracing::error!(reference = reference.name(), "reference structure: {e}");
    })?;
    let sku_idx = table.column_index(&cols.sku).inspect_err(|e| {
        tracing::error!(table = table.name(), "verification table structure: {e}");
    })?;

    let mut lookup: HashMap<String, &Value> = HashMap::new();
    let mut repeated: Vec<String> = Vec::new();
    for row in reference.rows() {
        let Some(code) = row.at(code_idx).key() else {
            continue;
        };
        if lookup.contains_key(&*code) {
            if !repeated.iter().any(|k| k == &*code) {
                repeated.push(code.into_owned());
            }
            continue;
        }
        lookup.insert(code.into_owned(), row.at(corr_idx));
    }

    if !repeated.is_empty() {
        match config.duplicates {
            DuplicatePolicy::First => {
                tracing::warn!(
                    reference = reference.name(),
                    duplicate_keys = repeated.len(),
                    first = %repeated[0],
                    "reference repeats sku_code values; using first entry per key"
                );
            }
            DuplicatePolicy::Reject => {
                let err = VerifyError::malformed(
                    reference.name(),
                    None,
                    format!(
                        "{} duplicated {} value(s), first '{}'",
                        repeated.len(),
                        cols.sku_code,
                        repeated[0]
                    ),
                );
                tracing::error!("{err}");
                return Err(err);
            }
        }
    }

    let mut stats = JoinStats {
        duplicate_keys: repeated.len(),
        ..JoinStats::default()
    };

    let joined = table.map_column(&cols.corr_sku, |row| {
        let found = row
            .at(sku_idx)
            .key()
            .and_then(|sku| lookup.get(&*sku).copied());
        match found {
            Some(corr) => {
                stats.matched += 1;
                corr.clone()
            }
            None => {
                stats.unmatched += 1;
                Value::Null
            }
        }
    })?;

    tracing::info!(
        matched = stats.matched,
        unmatched = stats.unmatched,
        "corr_sku pulled from reference"
    );

    Ok(Joined {
        table: joined,
        stats,
    })
}
