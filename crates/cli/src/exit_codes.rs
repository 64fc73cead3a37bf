//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success                                              |
//! | 1    | General error (unspecified)                          |
//! | 2    | CLI usage error (bad args, unknown record id)        |
//! | 3    | Invalid match config                                 |
//! | 4    | Input could not be read or parsed                    |
//! | 5    | Unmatched records found (`--fail-on-unmatched`)      |

use docmatch_recon::ReconError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Config file failed to parse or validate.
pub const EXIT_INVALID_CONFIG: u8 = 3;

/// Events or documents could not be read, parsed, or contain duplicate ids.
pub const EXIT_INPUT: u8 = 4;

/// At least one record has no match and `--fail-on-unmatched` was given.
pub const EXIT_UNMATCHED: u8 = 5;

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_INVALID_CONFIG,
        ReconError::FixtureParse { .. }
        | ReconError::DuplicateId { .. }
        | ReconError::UnsupportedFormat(_)
        | ReconError::Io(_) => EXIT_INPUT,
    }
}
