//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success                                              |
//! | 1    | General error (unspecified)                          |
//! | 2    | CLI usage error (bad args)                           |
//! | 3    | Schema error: a required column is missing           |
//! | 4    | Source unavailable: input or catalogue missing/empty |
//! | 5    | Malformed data: unparseable rows                     |
//! | 6    | Output could not be written                          |
//! | 7    | Invalid configuration                                |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into `error_kind_exit_code` or the relevant command

use skucheck_recon::ErrorKind;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// A required column is absent from an input or the catalogue.
pub const EXIT_SCHEMA: u8 = 3;

/// Input, partner or catalogue file missing, empty or unreadable.
pub const EXIT_SOURCE_UNAVAILABLE: u8 = 4;

/// Rows could not be parsed (ragged rows, invalid UTF-8, rejected duplicates).
pub const EXIT_MALFORMED: u8 = 5;

/// A partition or the report could not be written.
pub const EXIT_OUTPUT: u8 = 6;

/// Config file unreadable, unparseable or invalid.
pub const EXIT_CONFIG: u8 = 7;

pub fn error_kind_exit_code(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::Schema => EXIT_SCHEMA,
        ErrorKind::SourceUnavailable => EXIT_SOURCE_UNAVAILABLE,
        ErrorKind::MalformedData => EXIT_MALFORMED,
        ErrorKind::Output => EXIT_OUTPUT,
        ErrorKind::Config => EXIT_CONFIG,
    }
}
