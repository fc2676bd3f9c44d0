//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                                   |
//! |------|-----------------------------------------------------------|
//! | 0    | Success                                                   |
//! | 1    | A command failed (`run --fail-fast`, `search`, `config`)  |
//! | 2    | Usage error (bad args, unreadable script)                 |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// A grid command was rejected, or a config file could not be written.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing or unreadable input.
pub const EXIT_USAGE: u8 = 2;
