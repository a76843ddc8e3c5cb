use crate::config::VerifyConfig;
use crate::error::VerifyError;
use crate::model::{Outcome, OutcomeCounts};
use crate::table::Table;

/// Count outcome codes in the `value` column of an annotated table.
///
/// # Panics
///
/// On a cell outside the four legal codes. Only tables produced by the
/// classifier reach this function.
pub fn count_outcomes(table: &Table, config: &VerifyConfig) -> Result<OutcomeCounts, VerifyError> {
    let mut counts = OutcomeCounts::default();
    for value in table.column_values(&config.columns.value)? {
        let outcome = value
            .key()
            .and_then(|code| Outcome::from_code(&code))
            .unwrap_or_else(|| panic!("illegal outcome value {value:?}"));
        counts.add(outcome);
    }
    Ok(counts)
}
