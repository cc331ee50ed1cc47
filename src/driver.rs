//! Driver: stitches the scheduler, profile builder and DP kernel into the
//! outer iteration described in spec §4.6, plus the two layers of entry
//! point from spec §6 — a safe, generic `align::<T, N>` over Rust slices,
//! and a thin `unsafe fn` per (W, V) pair with the C-ABI-shaped raw pointer
//! signature `original_source/deps/simdalign.h` declares.
//!
//! Grounded on `original_source/deps/paralign.cpp`'s `paralign_score` (the
//! `while (true) { ...find finished...; fill_profile(...); ...inner
//! loop...; ...advance pos... }` shape, including its `n_refs == 0` /
//! `n_refs < 0` early returns) for the outer loop and the raw entry points'
//! names/signatures; `pa-bitpacking/src/main.rs`'s table-of-functions
//! dispatch style informed the `entry_point!` macro's one-instantiation-
//! per-(W,V) enumeration.

use std::simd::{LaneCount, Simd, SupportedLaneCount};

use log::{debug, trace};

use crate::buffer::WorkingBuffer;
use crate::error::Error;
use crate::kernel;
use crate::profile;
use crate::scheduler::{LaneUpdate, Scheduler, Slot};
use crate::score::{self, ScoreOps};
use crate::sequence::Sequence;
use crate::submat::SubstitutionMatrix;

/// Resets every lane of `col_h`/`col_e` to the "no reference column
/// consumed yet" boundary state (`H[i] = affine(i)`, `E[i] = H[i] -
/// (gap_open+gap_extend)`), matching `paralign_score`'s one-time
/// `colE`/`colH` initialisation before its outer loop. Unlike that
/// initialisation, this runs once per [`align`] call (never just once per
/// buffer lifetime), since the working buffer's contents are explicitly
/// "undefined across calls" (spec §4.2/§6) and are reused by the caller.
fn init_all_lanes<T: ScoreOps, const N: usize>(
    col_h: &mut [Simd<T, N>],
    col_e: &mut [Simd<T, N>],
    query_len: usize,
    gap_open: T,
    gap_extend: T,
) where
    LaneCount<N>: SupportedLaneCount,
{
    let penalty = T::saturating_from_i64(gap_open.to_i64() + gap_extend.to_i64());
    for i in 0..=query_len {
        let h = crate::scheduler::affine_gap_score(i, gap_open, gap_extend);
        col_h[i] = Simd::splat(h);
        col_e[i] = Simd::splat(T::saturating_from_i64(h.to_i64() - penalty.to_i64()));
    }
}

/// Safe, generic core (spec §6's "safe, generic `align::<T, N>` function
/// taking Rust slices"). `scores[i]` receives the alignment score of
/// `refs[i]`, written exactly once, when that reference's lane retires (or
/// immediately, for a length-0 reference, without ever touching a lane).
///
/// `N` is the lane count (`V / W`); the caller picks it by choosing which
/// monomorphisation (or raw entry point, see [`entry_point`]) to call.
pub fn align<T: ScoreOps, const N: usize>(
    buffer: &mut WorkingBuffer<T, N>,
    submat: &SubstitutionMatrix<T>,
    gap_open: T,
    gap_extend: T,
    query: Sequence,
    refs: &[Sequence],
    scores: &mut [T],
) -> Result<(), Error>
where
    LaneCount<N>: SupportedLaneCount,
{
    debug_assert_eq!(scores.len(), refs.len());
    if refs.is_empty() {
        return Ok(());
    }

    buffer.ensure_capacity(query.len(), submat.size())?;
    query.unpack_into(&mut buffer.query_bytes);
    debug!(
        "align: query_len={} n_refs={} alphabet={} lanes={N}",
        query.len(),
        refs.len(),
        submat.size()
    );

    init_all_lanes(&mut buffer.col_h, &mut buffer.col_e, query.len(), gap_open, gap_extend);

    let mut scheduler: Scheduler<N> = Scheduler::new(refs);
    let mut scored_up_to = 0usize;

    loop {
        let mut slots = [Slot::Empty; N];
        for k in 0..N {
            let update = scheduler.step(k);
            // The retiring reference's score is the column this lane just
            // finished writing last iteration; it must be read out before
            // any lane-restart reinitialisation overwrites it below.
            let retired = match update {
                LaneUpdate::Continuing => None,
                LaneUpdate::Installed { retired } => retired,
                LaneUpdate::Idle { retired } => retired,
            };
            if let Some(id) = retired {
                let s = score::get(buffer.col_h[query.len()], k);
                trace!("reference {id} retired from lane {k}: score={s:?}");
                scores[id] = s;
            }
            if matches!(update, LaneUpdate::Installed { .. }) {
                crate::scheduler::lane_init_h(
                    &mut buffer.col_h,
                    k,
                    query.len(),
                    gap_open,
                    gap_extend,
                );
                crate::scheduler::lane_init_e(
                    &mut buffer.col_e,
                    &buffer.col_h,
                    k,
                    query.len(),
                    gap_open,
                    gap_extend,
                );
            }
            slots[k] = scheduler.slot(k);
        }

        scheduler.take_empty_ref_scores(&mut scored_up_to, query.len(), gap_open, gap_extend, |id, s| {
            trace!("reference {id} scored without occupying a lane: score={s:?}");
            scores[id] = s;
        });

        if scheduler.all_empty() {
            break;
        }

        profile::build(&slots, refs, submat, &mut buffer.profile);
        kernel::step_column(
            &mut buffer.col_h,
            &mut buffer.col_e,
            &buffer.profile,
            &buffer.query_bytes,
            &slots,
            gap_open,
            gap_extend,
        );

        for k in 0..N {
            scheduler.advance(k);
        }
    }

    Ok(())
}

/// A borrowed view over symbol data in `[0, A)`, laid out exactly as spec §6
/// describes for the raw entry points: `(data, len, offset, reversed,
/// packed)`. Mirrors `original_source/deps/simdalign.h`'s `seq_t` at the
/// ABI boundary; [`Sequence`] is the safe equivalent the generic core is
/// written against.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct RawSequence {
    pub data: *const u8,
    pub len: usize,
    pub offset: usize,
    pub reversed: bool,
    pub packed: bool,
}

impl RawSequence {
    /// # Safety
    /// `data` must be valid for reads of at least `offset + len` bytes (or,
    /// if `packed`, `(offset + len).div_ceil(4)` bytes), per `Sequence`'s
    /// own unchecked-inner-primitive contract (spec §7).
    unsafe fn as_sequence<'a>(&self) -> Sequence<'a> {
        let byte_len = if self.packed {
            (self.offset + self.len).div_ceil(4)
        } else {
            self.offset + self.len
        };
        let data = std::slice::from_raw_parts(self.data, byte_len);
        Sequence::new(data, self.len, self.offset, self.reversed, self.packed)
    }
}

/// Row-major A×A substitution matrix at the ABI boundary. Mirrors
/// `original_source/deps/simdalign.h`'s `submat_t<T>`.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct RawSubstitutionMatrix<T> {
    pub data: *const T,
    pub size: i32,
}

/// One alignment result slot, score-only (this core produces no traceback,
/// per spec §1's non-goals) — a trimmed `alignment_t` from
/// `original_source/deps/simdalign.h`, which also carries unused
/// `trace`/`seqlen`/`reflen`/`endpos_*` fields this core never populates.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub struct AlignmentResult<T> {
    pub score: T,
}

/// Shared implementation behind every raw `score_*` entry point: validates
/// `n_refs`, converts the raw pointers into the safe types [`align`] takes,
/// and writes each result back through `alignments[i]`.
///
/// # Safety
/// `buffer` must point to a live, exclusively-owned `WorkingBuffer<T, N>`.
/// `submat.data` must be valid for `submat.size * submat.size` reads.
/// `seq` and each of `refs[0..n_refs)` must satisfy [`RawSequence::as_sequence`]'s
/// contract. `alignments[0..n_refs)` must each point to a writable
/// `AlignmentResult<T>` with no other live reference.
pub unsafe fn raw_entry_point<T: ScoreOps, const N: usize>(
    buffer: *mut WorkingBuffer<T, N>,
    submat: RawSubstitutionMatrix<T>,
    gap_open: T,
    gap_extend: T,
    seq: RawSequence,
    refs: *const RawSequence,
    n_refs: i32,
    alignments: *mut *mut AlignmentResult<T>,
) -> i32
where
    LaneCount<N>: SupportedLaneCount,
{
    if n_refs < 0 {
        return crate::error::to_return_code(Err(Error::InvalidArgument));
    }
    if n_refs == 0 {
        return 0;
    }
    let n_refs = n_refs as usize;

    let buffer = &mut *buffer;
    let submat_data = std::slice::from_raw_parts(submat.data, (submat.size as usize) * (submat.size as usize));
    let submat = SubstitutionMatrix::new(submat_data, submat.size as usize);
    let query = seq.as_sequence();
    let raw_refs = std::slice::from_raw_parts(refs, n_refs);
    let refs: Vec<Sequence> = raw_refs.iter().map(|r| r.as_sequence()).collect();
    let mut scores = vec![T::wrapping_from_i64(0); n_refs];

    let result = align(buffer, &submat, gap_open, gap_extend, query, &refs, &mut scores);
    if result.is_ok() {
        for (i, score) in scores.into_iter().enumerate() {
            let slot = &mut **alignments.add(i);
            slot.score = score;
        }
    }
    crate::error::to_return_code(result)
}

/// Generates one `unsafe fn score_<name>` per (W, V) pair, each delegating
/// to [`raw_entry_point`] monomorphised at that width/lane count — matching
/// how `original_source/deps/simdalign.h` enumerates
/// `paralign_score_i8x16`, `paralign_score_i16x8`, etc. by hand.
macro_rules! entry_point {
    ($name:ident, $t:ty, $n:expr) => {
        /// # Safety
        /// See [`raw_entry_point`].
        #[no_mangle]
        pub unsafe extern "C" fn $name(
            buffer: *mut WorkingBuffer<$t, $n>,
            submat: RawSubstitutionMatrix<$t>,
            gap_open: $t,
            gap_extend: $t,
            seq: RawSequence,
            refs: *const RawSequence,
            n_refs: i32,
            alignments: *mut *mut AlignmentResult<$t>,
        ) -> i32 {
            raw_entry_point(buffer, submat, gap_open, gap_extend, seq, refs, n_refs, alignments)
        }
    };
}

entry_point!(score_i8x16, i8, 16);
entry_point!(score_i16x8, i16, 8);
entry_point!(score_i32x4, i32, 4);
entry_point!(score_i8x32, i8, 32);
entry_point!(score_i16x16, i16, 16);
entry_point!(score_i32x8, i32, 8);
