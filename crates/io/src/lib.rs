// File I/O operations

pub mod csv;
pub mod xlsx;

use std::path::{Path, PathBuf};

use skucheck_recon::{Partitions, PipelineStages, Table, VerifyError};

/// Sheet name used for the final report.
pub const REPORT_SHEET: &str = "Sheet1";

/// Table name derived from a file path, so errors point at the file.
pub(crate) fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Read a whole source file, classifying failures.
pub(crate) fn read_source(path: &Path) -> Result<Vec<u8>, VerifyError> {
    std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => VerifyError::NotFound {
            path: path.to_path_buf(),
        },
        _ => VerifyError::Unreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        },
    })
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

pub struct Inputs {
    /// Recognition results to verify.
    pub receipts: Table,
    /// Partner receipts. Required to exist; not part of the verification table.
    pub partners: Table,
}

/// Load both delimited inputs. Either one missing, empty or unparseable is fatal.
pub fn load_inputs(receipts: &Path, partners: &Path) -> Result<Inputs, VerifyError> {
    let load = |path: &Path| {
        csv::read_table(path).inspect_err(|e| {
            tracing::error!(path = %path.display(), "cannot load input: {e}");
        })
    };
    let receipts = load(receipts)?;
    let partners = load(partners)?;

    tracing::info!(
        receipts = receipts.len(),
        partners = partners.len(),
        "receipts and partner receipts loaded"
    );
    Ok(Inputs { receipts, partners })
}

// ---------------------------------------------------------------------------
// File-backed pipeline stages
// ---------------------------------------------------------------------------

/// Pipeline collaborators backed by the file system.
#[derive(Debug, Clone)]
pub struct FileStages {
    pub not_null_out: PathBuf,
    pub null_out: PathBuf,
    pub reference: PathBuf,
    pub reference_sheet: Option<String>,
    pub report_out: PathBuf,
}

impl FileStages {
    fn saved(path: &Path, rows: usize) {
        tracing::info!(path = %path.display(), rows, "file saved");
    }
}

impl PipelineStages for FileStages {
    fn export_partitions(&mut self, partitions: &Partitions) -> Result<(), VerifyError> {
        for (table, path) in [
            (&partitions.not_null, &self.not_null_out),
            (&partitions.null, &self.null_out),
        ] {
            csv::write_table(table, path).inspect_err(|e| tracing::error!("{e}"))?;
            Self::saved(path, table.len());
        }
        Ok(())
    }

    fn load_reference(&mut self) -> Result<Table, VerifyError> {
        let table = xlsx::read_table(&self.reference, self.reference_sheet.as_deref())
            .inspect_err(|e| {
                tracing::error!(path = %self.reference.display(), "cannot load reference: {e}");
            })?;
        tracing::info!(path = %self.reference.display(), rows = table.len(), "reference loaded");
        Ok(table)
    }

    fn export_report(&mut self, table: &Table) -> Result<(), VerifyError> {
        xlsx::write_table(table, &self.report_out, REPORT_SHEET)
            .inspect_err(|e| tracing::error!("cannot save final report: {e}"))?;
        Self::saved(&self.report_out, table.len());
        Ok(())
    }
}
