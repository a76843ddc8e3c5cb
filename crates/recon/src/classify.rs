use crate::config::ChannelSet;
use crate::model::Outcome;
use crate::table::Value;

/// Decide the outcome for one row.
///
/// A present `corr_sku` always wins; channel membership is consulted only
/// when the reference join found nothing.
pub fn classify(sku: &Value, corr_sku: &Value, response: &Value, channels: &ChannelSet) -> Outcome {
    match corr_sku.key() {
        Some(corr) => {
            if sku.key().is_some_and(|s| s == corr) {
                Outcome::MatchCorrect
            } else {
                Outcome::MatchIncorrect
            }
        }
        None => {
            if channels.contains(response) {
                Outcome::Bypassed
            } else {
                Outcome::NotRecognized
            }
        }
    }
}

/// Diagnostic comment for an outcome.
pub fn annotate(outcome: Outcome) -> &'static str {
    outcome.comment()
}

/// Comment for an outcome code read back from a table.
///
/// # Panics
///
/// On a code outside the four legal outcomes; the classifier never produces one.
pub fn annotate_code(code: &str) -> &'static str {
    match Outcome::from_code(code) {
        Some(outcome) => annotate(outcome),
        None => panic!("illegal outcome code {code:?}"),
    }
}
