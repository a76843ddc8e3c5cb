use std::path::PathBuf;

use thiserror::Error;

/// Broad failure class, used by callers to pick an exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required column is missing.
    Schema,
    /// An input or reference source is missing, empty, or unreadable.
    SourceUnavailable,
    /// Rows that cannot be parsed.
    MalformedData,
    /// An export destination could not be written.
    Output,
    /// Invalid configuration.
    Config,
}

#[derive(Debug, Error)]
pub enum VerifyError {
    /// Required column absent from a table.
    #[error("table '{table}': missing column '{column}'")]
    MissingColumn { table: String, column: String },

    /// Two tables that must share a schema do not.
    #[error("cannot combine '{left}' and '{right}': column sets differ")]
    SchemaMismatch { left: String, right: String },

    /// Source file does not exist.
    #[error("source not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Source file exists but carries no header row.
    #[error("source is empty: {}", path.display())]
    EmptySource { path: PathBuf },

    /// Source file could not be opened or read.
    #[error("cannot read {}: {reason}", path.display())]
    Unreadable { path: PathBuf, reason: String },

    /// Row-level parse failure. No partial-row recovery.
    #[error("{source_name}{}: {detail}", line.map(|l| format!(", line {l}")).unwrap_or_default())]
    Malformed {
        source_name: String,
        line: Option<u64>,
        detail: String,
    },

    /// Export destination could not be written.
    #[error("cannot write {}: {reason}", path.display())]
    Write { path: PathBuf, reason: String },

    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// Config validation error.
    #[error("config validation error: {0}")]
    ConfigValidation(String),
}

impl VerifyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingColumn { .. } | Self::SchemaMismatch { .. } => ErrorKind::Schema,
            Self::NotFound { .. } | Self::EmptySource { .. } | Self::Unreadable { .. } => {
                ErrorKind::SourceUnavailable
            }
            Self::Malformed { .. } => ErrorKind::MalformedData,
            Self::Write { .. } => ErrorKind::Output,
            Self::ConfigParse(_) | Self::ConfigValidation(_) => ErrorKind::Config,
        }
    }

    pub fn missing_column(table: &str, column: &str) -> Self {
        Self::MissingColumn {
            table: table.into(),
            column: column.into(),
        }
    }

    pub fn malformed(source_name: &str, line: Option<u64>, detail: impl Into<String>) -> Self {
        Self::Malformed {
            source_name: source_name.into(),
            line,
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        assert_eq!(VerifyError::missing_column("t", "c").kind(), ErrorKind::Schema);
        assert_eq!(
            VerifyError::NotFound { path: "x.xlsx".into() }.kind(),
            ErrorKind::SourceUnavailable
        );
        assert_eq!(
            VerifyError::malformed("a.csv", Some(3), "bad").kind(),
            ErrorKind::MalformedData
        );
        assert_eq!(VerifyError::ConfigParse("x".into()).kind(), ErrorKind::Config);
    }

    #[test]
    fn messages_name_the_offender() {
        let err = VerifyError::missing_column("catalogue", "corr_sku");
        assert_eq!(err.to_string(), "table 'catalogue': missing column 'corr_sku'");

        let err = VerifyError::malformed("receipts.csv", Some(7), "found 3 fields, expected 4");
        assert_eq!(err.to_string(), "receipts.csv, line 7: found 3 fields, expected 4");

        let err = VerifyError::malformed("receipts.csv", None, "invalid UTF-8");
        assert_eq!(err.to_string(), "receipts.csv: invalid UTF-8");
    }
}
