use std::fmt;

use serde::Serialize;

use crate::table::Table;

// ---------------------------------------------------------------------------
// Outcome codes
// ---------------------------------------------------------------------------

pub const MISMATCH_COMMENT: &str = "incorrectly recognized SKU";
pub const NOT_RECOGNIZED_COMMENT: &str = "SKU not recognized";
pub const BYPASS_COMMENT: &str = "bypasses the recognition model (disabled)";

/// Verification outcome. The code encodes (match found, match correct) or
/// (no match, channel bypassed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Outcome {
    #[serde(rename = "1_1")]
    MatchCorrect,
    #[serde(rename = "1_0")]
    MatchIncorrect,
    #[serde(rename = "0_1")]
    Bypassed,
    #[serde(rename = "0_0")]
    NotRecognized,
}

impl Outcome {
    pub const ALL: [Outcome; 4] = [
        Self::MatchCorrect,
        Self::MatchIncorrect,
        Self::Bypassed,
        Self::NotRecognized,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Self::MatchCorrect => "1_1",
            Self::MatchIncorrect => "1_0",
            Self::Bypassed => "0_1",
            Self::NotRecognized => "0_0",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.code() == code)
    }

    /// Empty only for a correct match.
    pub fn comment(self) -> &'static str {
        match self {
            Self::MatchCorrect => "",
            Self::MatchIncorrect => MISMATCH_COMMENT,
            Self::Bypassed => BYPASS_COMMENT,
            Self::NotRecognized => NOT_RECOGNIZED_COMMENT,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ---------------------------------------------------------------------------
// Stage outputs
// ---------------------------------------------------------------------------

/// Raw input split on nullity of the partition column.
#[derive(Debug, Clone)]
pub struct Partitions {
    pub not_null: Table,
    pub null: Table,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JoinStats {
    /// Rows that found a reference entry.
    pub matched: usize,
    /// Rows left with a null `corr_sku`.
    pub unmatched: usize,
    /// Distinct `sku_code` values that occur more than once in the reference.
    pub duplicate_keys: usize,
}

#[derive(Debug, Clone)]
pub struct Joined {
    pub table: Table,
    pub stats: JoinStats,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    #[serde(rename = "1_1")]
    pub match_correct: usize,
    #[serde(rename = "1_0")]
    pub match_incorrect: usize,
    #[serde(rename = "0_1")]
    pub bypassed: usize,
    #[serde(rename = "0_0")]
    pub not_recognized: usize,
}

impl OutcomeCounts {
    pub fn add(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::MatchCorrect => self.match_correct += 1,
            Outcome::MatchIncorrect => self.match_incorrect += 1,
            Outcome::Bypassed => self.bypassed += 1,
            Outcome::NotRecognized => self.not_recognized += 1,
        }
    }

    pub fn get(&self, outcome: Outcome) -> usize {
        match outcome {
            Outcome::MatchCorrect => self.match_correct,
            Outcome::MatchIncorrect => self.match_incorrect,
            Outcome::Bypassed => self.bypassed,
            Outcome::NotRecognized => self.not_recognized,
        }
    }

    pub fn total(&self) -> usize {
        self.match_correct + self.match_incorrect + self.bypassed + self.not_recognized
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub input_rows: usize,
    pub not_null_rows: usize,
    pub null_rows: usize,
    pub outcomes: OutcomeCounts,
    /// Rows whose classifier outcome was replaced by the channel override.
    pub overridden: usize,
    pub join: JoinStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunMeta {
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub meta: RunMeta,
    pub summary: RunSummary,
    /// Final annotated verification table.
    #[serde(skip)]
    pub table: Table,
}
