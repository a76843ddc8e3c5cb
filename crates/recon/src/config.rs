use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::VerifyError;
use crate::table::Value;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Business rules for one verification run.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct VerifyConfig {
    pub channels: ChannelConfig,
    pub columns: ColumnNames,
    pub duplicates: DuplicatePolicy,
}

// ---------------------------------------------------------------------------
// Channels
// ---------------------------------------------------------------------------

/// Sales channels that bypass the recognition model.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ChannelConfig {
    pub special: Vec<String>,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            special: DEFAULT_SPECIAL_CHANNELS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Upstream labels, verbatim: internet solutions, marketplace, Wildberries, Yandex.
pub const DEFAULT_SPECIAL_CHANNELS: [&str; 4] =
    ["ИНТЕРНЕТ РЕШЕНИЯ", "МАРКЕТПЛЕЙС", "ВАЙЛДБЕРРИЗ", "ЯНДЕКС"];

/// Membership test over special channel labels. Null is never a member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSet {
    labels: BTreeSet<String>,
}

impl ChannelSet {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, response: &Value) -> bool {
        response
            .key()
            .is_some_and(|k| self.labels.contains(&*k))
    }
}

impl From<&ChannelConfig> for ChannelSet {
    fn from(config: &ChannelConfig) -> Self {
        Self::new(config.special.iter().cloned())
    }
}

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ColumnNames {
    /// Recognized SKU in the verification table.
    pub sku: String,
    /// Upstream channel label.
    pub response: String,
    /// Column whose nullity splits the raw input.
    pub partition: String,
    /// Join key in the reference table.
    pub sku_code: String,
    /// Corrected SKU, pulled from the reference table.
    pub corr_sku: String,
    pub value: String,
    pub comment: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            sku: "sku".into(),
            response: "response".into(),
            partition: "response".into(),
            sku_code: "sku_code".into(),
            corr_sku: "corr_sku".into(),
            value: "value".into(),
            comment: "comment".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Duplicate reference keys
// ---------------------------------------------------------------------------

/// What to do when the reference table repeats a `sku_code`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Use the first matching reference row, in reference order.
    #[default]
    First,
    /// Fail the run.
    Reject,
}

impl std::fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::First => write!(f, "first"),
            Self::Reject => write!(f, "reject"),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl VerifyConfig {
    pub fn from_toml(input: &str) -> Result<Self, VerifyError> {
        let config: VerifyConfig =
            toml::from_str(input).map_err(|e| VerifyError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn channel_set(&self) -> ChannelSet {
        ChannelSet::from(&self.channels)
    }

    pub fn validate(&self) -> Result<(), VerifyError> {
        if self.channels.special.is_empty() {
            return Err(VerifyError::ConfigValidation(
                "channels.special must list at least one channel".into(),
            ));
        }
        if self.channels.special.iter().any(|c| c.trim().is_empty()) {
            return Err(VerifyError::ConfigValidation(
                "channels.special contains a blank label".into(),
            ));
        }

        let c = &self.columns;
        let named = [
            ("sku", &c.sku),
            ("response", &c.response),
            ("partition", &c.partition),
            ("sku_code", &c.sku_code),
            ("corr_sku", &c.corr_sku),
            ("value", &c.value),
            ("comment", &c.comment),
        ];
        for (field, name) in named {
            if name.trim().is_empty() {
                return Err(VerifyError::ConfigValidation(format!(
                    "columns.{field} must not be empty"
                )));
            }
        }

        // Derived columns must not collide with each other or with the inputs
        let derived = [&c.corr_sku, &c.value, &c.comment];
        let distinct: BTreeSet<&String> = derived.iter().copied().collect();
        if distinct.len() != derived.len() {
            return Err(VerifyError::ConfigValidation(
                "columns.corr_sku, columns.value and columns.comment must be distinct".into(),
            ));
        }
        for input in [&c.sku, &c.response] {
            if derived.contains(&input) {
                return Err(VerifyError::ConfigValidation(format!(
                    "input column '{input}' would be overwritten by a derived column"
                )));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = VerifyConfig::from_toml("").unwrap();
        assert_eq!(config, VerifyConfig::default());
        assert_eq!(config.channels.special.len(), 4);
        assert_eq!(config.columns.partition, "response");
        assert_eq!(config.duplicates, DuplicatePolicy::First);
    }

    #[test]
    fn parse_overrides() {
        let input = r#"
duplicates = "reject"

[channels]
special = ["MARKETPLACE", "YANDEX"]

[columns]
sku = "recognized_sku"
"#;
        let config = VerifyConfig::from_toml(input).unwrap();
        assert_eq!(config.duplicates, DuplicatePolicy::Reject);
        assert_eq!(config.channels.special, vec!["MARKETPLACE", "YANDEX"]);
        assert_eq!(config.columns.sku, "recognized_sku");
        // untouched fields keep defaults
        assert_eq!(config.columns.corr_sku, "corr_sku");
    }

    #[test]
    fn reject_empty_channel_list() {
        let err = VerifyConfig::from_toml("[channels]\nspecial = []\n").unwrap_err();
        assert!(err.to_string().contains("at least one channel"));
    }

    #[test]
    fn reject_colliding_derived_columns() {
        let err = VerifyConfig::from_toml("[columns]\nvalue = \"comment\"\n").unwrap_err();
        assert!(err.to_string().contains("distinct"));

        let err = VerifyConfig::from_toml("[columns]\ncomment = \"sku\"\n").unwrap_err();
        assert!(err.to_string().contains("'sku'"));
    }

    #[test]
    fn reject_unknown_duplicate_policy() {
        assert!(VerifyConfig::from_toml("duplicates = \"last\"\n").is_err());
    }

    #[test]
    fn channel_set_membership() {
        let set = VerifyConfig::default().channel_set();
        assert!(set.contains(&Value::text("МАРКЕТПЛЕЙС")));
        assert!(set.contains(&Value::text("ЯНДЕКС")));
        assert!(!set.contains(&Value::text("маркетплейс")));
        assert!(!set.contains(&Value::text("STORE_X")));
        assert!(!set.contains(&Value::Null));
    }
}
