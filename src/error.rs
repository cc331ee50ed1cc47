//! Error handling (spec §2a, §7).
//!
//! The teacher repository does not pull in `thiserror`/`anyhow` anywhere in
//! its dependency tables, so this crate's own error surface stays a plain
//! enum with a hand-written `Display` impl, matching that posture rather than
//! adding a dependency the rest of the repository doesn't use.

use std::fmt;

/// The two failure kinds the spec distinguishes (§7): the working buffer
/// could not grow to the requested capacity, or a raw entry point was called
/// with a usage error (currently: a negative reference count at the
/// C-ABI-shaped boundary, §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    AllocationFailure,
    InvalidArgument,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::AllocationFailure => write!(f, "working buffer could not grow to the requested capacity"),
            Error::InvalidArgument => write!(f, "invalid argument (e.g. a negative reference count)"),
        }
    }
}

impl std::error::Error for Error {}

/// Folds `Result<(), Error>` to the `0`/`1` C-style return code the raw entry
/// points (§6) hand back across the FFI boundary.
#[inline]
pub fn to_return_code(result: Result<(), Error>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(_) => 1,
    }
}
