//! Profile builder: per-outer-iteration table mapping each possible query
//! symbol to the lane-vector of substitution scores for the currently active
//! reference columns (spec §4.4).
//!
//! Grounded on `original_source/deps/paralign.cpp`'s `fill_profile`, which
//! loops `seq_char in 0..submat.size` and gathers one scalar per lane before
//! building the SIMD vector for that symbol. The teacher's own
//! `Profile` trait here (`ScatterProfile`/`BitProfile`, building a
//! per-iteration table once and reusing it across the inner loop) is the
//! same shape one level up, adapted from a 2-bit bitpacked table to a plain
//! per-symbol score table.

use std::simd::{LaneCount, Simd, SupportedLaneCount};

use crate::scheduler::Slot;
use crate::score::ScoreOps;
use crate::sequence::Sequence;
use crate::submat::SubstitutionMatrix;

/// Builds `prof[0..A)` into `out` (reusing its allocation across calls;
/// resized as needed), where `prof[c]`'s lane `k` holds
/// `submat[refs[slot_k.id][slot_k.pos], c]` for occupied lanes. Empty lanes
/// get an arbitrary fill value since their output is never read downstream
/// (spec §4.4).
///
/// Pre-reads the N reference symbols once (`lane_symbols`) so the A passes
/// below amortise the indirect `refs[id][pos]` load, per the spec's
/// implementation note.
pub fn build<T: ScoreOps, const N: usize>(
    slots: &[Slot; N],
    refs: &[Sequence],
    submat: &SubstitutionMatrix<T>,
    out: &mut Vec<Simd<T, N>>,
) where
    LaneCount<N>: SupportedLaneCount,
{
    let lane_symbols: [Option<u8>; N] = std::array::from_fn(|k| match slots[k] {
        Slot::Empty => None,
        Slot::Occupied { ref_id, pos } => Some(refs[ref_id].get(pos)),
    });

    let a = submat.size();
    out.clear();
    out.reserve(a);
    for c in 0..a as u8 {
        let lane_scores: [T; N] = std::array::from_fn(|k| match lane_symbols[k] {
            None => T::wrapping_from_i64(0),
            Some(r) => submat.get(r, c),
        });
        out.push(Simd::from_array(lane_scores));
    }
}
