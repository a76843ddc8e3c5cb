// Path resolution with catalogue fallback search

use std::path::{Path, PathBuf};

use serde::Serialize;
use skucheck_recon::VerifyError;

use crate::job::JobConfig;

/// Concrete file locations for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedPaths {
    pub base_dir: PathBuf,
    pub receipts: PathBuf,
    pub partners: PathBuf,
    /// First catalogue candidate that exists
    pub catalogue: PathBuf,
    pub catalogue_sheet: Option<String>,
    pub output_dir: PathBuf,
    pub not_null_out: PathBuf,
    pub null_out: PathBuf,
    pub report_out: PathBuf,
}

/// Expand `~` and environment variables, leaving the input untouched on failure.
pub fn expand(path: &str) -> PathBuf {
    match shellexpand::full(path) {
        Ok(expanded) => PathBuf::from(expanded.into_owned()),
        Err(_) => PathBuf::from(shellexpand::tilde(path).into_owned()),
    }
}

/// Join `path` onto `base` unless it is already absolute (after expansion).
pub fn under(base: &Path, path: &str) -> PathBuf {
    let expanded = expand(path);
    if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    }
}

/// Return the first candidate that exists on disk.
pub fn first_existing(candidates: &[PathBuf]) -> Result<PathBuf, VerifyError> {
    for candidate in candidates {
        if candidate.exists() {
            return Ok(candidate.clone());
        }
        tracing::debug!(path = %candidate.display(), "catalogue candidate not found");
    }

    let probed = candidates
        .iter()
        .map(|c| c.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    tracing::error!("catalogue not found at any of: {probed}");

    Err(VerifyError::NotFound {
        path: candidates.last().cloned().unwrap_or_default(),
    })
}

impl JobConfig {
    /// Resolve every path. `base_override` replaces `paths.base_dir`.
    ///
    /// Fails when no catalogue candidate exists; the other inputs are checked
    /// when they are opened.
    pub fn resolve(&self, base_override: Option<&Path>) -> Result<ResolvedPaths, VerifyError> {
        let base_dir = match base_override {
            Some(dir) => dir.to_path_buf(),
            None => expand(&self.paths.base_dir),
        };

        let candidates: Vec<PathBuf> = self
            .paths
            .catalogue
            .iter()
            .map(|c| under(&base_dir, c))
            .collect();
        let catalogue = first_existing(&candidates)?;

        let output_dir = under(&base_dir, &self.paths.output_dir);

        Ok(ResolvedPaths {
            receipts: under(&base_dir, &self.paths.receipts),
            partners: under(&base_dir, &self.paths.partners),
            catalogue,
            catalogue_sheet: self.paths.catalogue_sheet.clone(),
            not_null_out: output_dir.join(&self.outputs.not_null),
            null_out: output_dir.join(&self.outputs.null),
            report_out: output_dir.join(&self.outputs.report),
            output_dir,
            base_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skucheck_recon::ErrorKind;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn relative_paths_join_base() {
        let base = Path::new("/data/kr");
        assert_eq!(under(base, "in/a.csv"), PathBuf::from("/data/kr/in/a.csv"));
        assert_eq!(under(base, "/abs/a.csv"), PathBuf::from("/abs/a.csv"));
    }

    #[test]
    fn tilde_is_expanded() {
        let expanded = expand("~/work");
        assert!(!expanded.to_string_lossy().starts_with('~'));
    }

    #[test]
    fn primary_catalogue_wins() {
        let dir = tempdir().unwrap();
        let base = dir.path();
        let config = JobConfig::default();
        for c in &config.paths.catalogue {
            let p = base.join(c);
            fs::create_dir_all(p.parent().unwrap()).unwrap();
            fs::write(&p, b"").unwrap();
        }

        let resolved = config.resolve(Some(base)).unwrap();
        assert_eq!(resolved.catalogue, base.join(&config.paths.catalogue[0]));
    }

    #[test]
    fn falls_back_to_secondary_catalogue() {
        let dir = tempdir().unwrap();
        let base = dir.path();
        let config = JobConfig::default();
        let secondary = base.join(&config.paths.catalogue[1]);
        fs::create_dir_all(secondary.parent().unwrap()).unwrap();
        fs::write(&secondary, b"").unwrap();

        let resolved = config.resolve(Some(base)).unwrap();
        assert_eq!(resolved.catalogue, secondary);
        assert_eq!(
            resolved.report_out,
            base.join("Отчеты/Отчет по нейросети/Результаты/stats_result_final.xlsx")
        );
        assert_eq!(resolved.receipts, base.join("Скрипты/receipt_vish1.csv"));
    }

    #[test]
    fn no_catalogue_is_source_unavailable() {
        let dir = tempdir().unwrap();
        let err = JobConfig::default().resolve(Some(dir.path())).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SourceUnavailable);
        assert!(err.to_string().contains("Доп. материалы"));
    }
}
