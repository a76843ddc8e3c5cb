// Job configuration
// Loaded from ~/.config/skucheck/skucheck.toml, or a file given on the command line

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use skucheck_recon::{VerifyConfig, VerifyError};

const CATALOGUE_FILE: &str = "Каталог Очкарик (справочник).xlsx";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    pub paths: PathsConfig,
    pub outputs: OutputsConfig,
    pub verify: VerifyConfig,
}

/// Input locations. Relative paths resolve against `base_dir`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Project root; `~` is expanded
    pub base_dir: String,
    /// Recognition results (delimited)
    pub receipts: String,
    /// Partner receipts (delimited)
    pub partners: String,
    /// Reference catalogue candidates, probed in order
    pub catalogue: Vec<String>,
    /// Catalogue sheet; first sheet when unset
    pub catalogue_sheet: Option<String>,
    /// Where partitions and the report are written; created when missing
    pub output_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            base_dir: "~/work/studying_r/kr".into(),
            receipts: "Скрипты/receipt_vish1.csv".into(),
            partners: "Скрипты/receiptpartners.csv".into(),
            catalogue: vec![
                format!("Скрипты/{CATALOGUE_FILE}"),
                format!("Доп. материалы/{CATALOGUE_FILE}"),
            ],
            catalogue_sheet: None,
            output_dir: "Отчеты/Отчет по нейросети/Результаты".into(),
        }
    }
}

/// Output file names, inside `paths.output_dir`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputsConfig {
    pub not_null: String,
    pub null: String,
    pub report: String,
}

impl Default for OutputsConfig {
    fn default() -> Self {
        Self {
            not_null: "result_not_null.csv".into(),
            null: "result_null.csv".into(),
            report: "stats_result_final.xlsx".into(),
        }
    }
}

impl JobConfig {
    /// Default config file location
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skucheck")
            .join("skucheck.toml")
    }

    pub fn from_toml(input: &str) -> Result<Self, VerifyError> {
        let config: JobConfig =
            toml::from_str(input).map_err(|e| VerifyError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load an explicitly named config file. A missing file is an error.
    pub fn load(path: &Path) -> Result<Self, VerifyError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            VerifyError::ConfigParse(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml(&contents)
    }

    /// Load the config file at the default location, falling back to built-in
    /// defaults when it does not exist.
    pub fn load_default() -> Result<Self, VerifyError> {
        let path = Self::default_path();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    pub fn validate(&self) -> Result<(), VerifyError> {
        if self.paths.catalogue.is_empty() {
            return Err(VerifyError::ConfigValidation(
                "paths.catalogue must list at least one candidate".into(),
            ));
        }
        let outputs = [&self.outputs.not_null, &self.outputs.null, &self.outputs.report];
        if outputs.iter().any(|o| o.trim().is_empty()) {
            return Err(VerifyError::ConfigValidation(
                "output file names must not be empty".into(),
            ));
        }
        if outputs[0] == outputs[1] || outputs[0] == outputs[2] || outputs[1] == outputs[2] {
            return Err(VerifyError::ConfigValidation(
                "outputs.not_null, outputs.null and outputs.report must differ".into(),
            ));
        }
        self.verify.validate()
    }
}
