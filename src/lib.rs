//! Lane-multiplexed SIMD affine-gap global alignment of one query sequence
//! against a batch of reference sequences.
//!
//! The crate's only algorithmic job is the kernel described in
//! [`driver::align`]: pack up to `N = V/W` independent (query, reference)
//! alignments into the lanes of a `Simd<T, N>` register and advance the
//! Gotoh affine-gap recurrence for all of them in lock-step, swapping a new
//! reference into any lane that finishes early. It returns scores only — no
//! traceback, no CIGAR, no local/semi-global variants.
//!
//! The moving parts, leaves first:
//! - [`score`] — the [`score::ScoreOps`] facade over `Simd<T, N>` arithmetic
//!   that the rest of the crate is written against, so no module below here
//!   ever names a specific instruction set.
//! - [`sequence`] / [`submat`] — the borrowed, read-only inputs: a symbol
//!   sequence with the packed/reversed indexing convention, and a row-major
//!   substitution matrix.
//! - [`buffer`] — the caller-owned, grow-only scratch region reused across
//!   calls.
//! - [`scheduler`] — the slot bookkeeping that decides which lane holds
//!   which reference.
//! - [`profile`] — per-iteration substitution-score table for the currently
//!   active lanes.
//! - [`kernel`] — the DP inner loop itself.
//! - [`driver`] — stitches the above into the outer loop and exposes both
//!   the safe, generic entry point and the raw `score_*` C-ABI functions.
#![feature(portable_simd)]

pub mod buffer;
pub mod driver;
pub mod error;
pub mod kernel;
pub mod profile;
pub mod scheduler;
pub mod score;
pub mod sequence;
pub mod submat;

pub use buffer::WorkingBuffer;
pub use driver::{
    align, raw_entry_point, score_i16x16, score_i16x8, score_i32x4, score_i32x8, score_i8x16,
    score_i8x32, AlignmentResult, RawSequence, RawSubstitutionMatrix,
};
pub use error::Error;
pub use sequence::Sequence;
pub use submat::SubstitutionMatrix;
