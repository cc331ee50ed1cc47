//! Slot scheduler: tracks which lane holds which reference and swaps the
//! next pending reference into a lane as soon as it retires (spec §4.3).
//!
//! Grounded on `original_source/deps/paralign.cpp`'s `slot_t` / `empty_slot`
//! and the "find finished reference sequences" loop at the top of
//! `paralign_score`. That source leaves empty references unhandled (a TODO
//! comment there reads "handle empty reference sequences"); this module
//! closes that gap per spec §4.3's edge case, emitting their score directly
//! without ever occupying a lane.

use std::simd::{LaneCount, Simd, SupportedLaneCount};

use log::trace;

use crate::score::{self, ScoreOps};
use crate::sequence::Sequence;

/// A lane's assignment: either vacant, or pinned to a reference id and its
/// current column position within that reference.
///
/// Mirrors `paralign.cpp`'s `slot_t`, whose equality operator also ignores
/// `pos` and compares only `id`; `Slot::Empty` stands in for `empty_slot`
/// (`id == -1`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    Empty,
    Occupied { ref_id: usize, pos: usize },
}

impl Slot {
    #[inline(always)]
    fn ref_id(&self) -> Option<usize> {
        match self {
            Slot::Empty => None,
            Slot::Occupied { ref_id, .. } => Some(*ref_id),
        }
    }
}

/// `k > 0 => -(gap_open + gap_extend * k)`, `0` otherwise. Shared by the
/// scheduler's lane-restart protocol and the kernel's row-0 reinitialisation,
/// since both derive the same boundary value for the reference-side gap axis.
#[inline(always)]
pub fn affine_gap_score<T: ScoreOps>(k: usize, gap_open: T, gap_extend: T) -> T {
    if k == 0 {
        return T::wrapping_from_i64(0);
    }
    let cost = gap_open.to_i64() + gap_extend.to_i64() * k as i64;
    T::saturating_from_i64(-cost)
}

/// Fixed-capacity occupancy set of `N` lanes, plus the cursor into the
/// pending-reference queue and the result slice it writes into as lanes
/// retire.
pub struct Scheduler<'refs, const N: usize> {
    slots: [Slot; N],
    next_ref: usize,
    n_refs: usize,
    refs: &'refs [Sequence<'refs>],
}

/// Outcome of advancing one lane at the top of an outer iteration (spec
/// §4.3 step 1-3). The driver uses this to know whether the column vectors
/// for lane `k` need reinitialising before the next DP pass.
pub enum LaneUpdate {
    /// The lane keeps the reference it had; no column reinitialisation.
    Continuing,
    /// The lane just retired a reference (if `Some`) and was filled with a
    /// new one; its column vectors must be reset to the `pos == 0` state.
    Installed { retired: Option<usize> },
    /// No pending reference remained; the lane is now (or remains) empty.
    /// `retired` carries the id that just finished, if any, so its score can
    /// still be recorded.
    Idle { retired: Option<usize> },
}

impl<'refs, const N: usize> Scheduler<'refs, N> {
    /// All lanes start empty; the first call to [`Scheduler::step`] for each
    /// lane in the driver's first outer iteration fills it from the pending
    /// queue exactly as a retirement would, which is what
    /// `paralign_score`'s `slots[k] = k < n_refs ? slot_t(k, 0) : empty_slot`
    /// amounts to once empty references are allowed to be skipped (spec
    /// §4.3's edge case) — unifying "initial fill" and "steady-state
    /// retirement" into one code path.
    pub fn new(refs: &'refs [Sequence<'refs>]) -> Self {
        Scheduler {
            slots: [Slot::Empty; N],
            next_ref: 0,
            n_refs: refs.len(),
            refs,
        }
    }

    #[inline(always)]
    pub fn slot(&self, k: usize) -> Slot {
        self.slots[k]
    }

    #[inline(always)]
    pub fn all_empty(&self) -> bool {
        self.slots.iter().all(|s| *s == Slot::Empty)
    }

    /// Advance lane `pos` by one column at the end of an outer iteration, as
    /// documented in spec §4.3's "equivalent and behaviourally identical
    /// reformulation": bumping `pos` here lets `step` test `pos ==
    /// refs[id].len` directly at the top of the next iteration.
    #[inline(always)]
    pub fn advance(&mut self, k: usize) {
        if let Slot::Occupied { pos, .. } = &mut self.slots[k] {
            *pos += 1;
        }
    }

    /// Runs §4.3 for lane `k`. Returns the lane's update kind; when it is
    /// `Installed`, the caller must reinitialise `col_h[..]`/`col_e[..]` for
    /// lane `k` using [`lane_init_h`]/[`lane_init_e`] before the next DP pass.
    pub fn step(&mut self, k: usize) -> LaneUpdate {
        let finished = match self.slots[k] {
            Slot::Occupied { ref_id, pos } => pos >= self.refs[ref_id].len(),
            Slot::Empty => true,
        };
        if !finished {
            return LaneUpdate::Continuing;
        }

        let retired = self.slots[k].ref_id();
        if let Some(id) = retired {
            trace!("lane {k} retiring reference {id}");
        }

        // Search forward for the next pending reference, per the spec's
        // "pending references are consumed in input index order" tie-break.
        // Empty references are scored on the spot and never occupy a lane.
        loop {
            if self.next_ref >= self.n_refs {
                self.slots[k] = Slot::Empty;
                return LaneUpdate::Idle { retired };
            }
            let candidate = self.next_ref;
            if self.refs[candidate].is_empty() {
                self.next_ref += 1;
                // The caller scores this reference itself (its score needs
                // no lane/DP pass at all); we just skip over it here.
                continue;
            }
            self.slots[k] = Slot::Occupied {
                ref_id: candidate,
                pos: 0,
            };
            self.next_ref += 1;
            trace!("lane {k} installing reference {candidate}");
            return LaneUpdate::Installed { retired };
        }
    }

    /// References consumed by [`Scheduler::step`] without ever occupying a
    /// lane (length-0 references) still need their score recorded; the
    /// driver scans for these once per outer iteration via this accessor
    /// rather than threading them back out of `step` (several lanes can
    /// each skip a run of empty references in the same iteration).
    pub fn take_empty_ref_scores<T: ScoreOps>(
        &mut self,
        scored_up_to: &mut usize,
        query_len: usize,
        gap_open: T,
        gap_extend: T,
        mut emit: impl FnMut(usize, T),
    ) {
        while *scored_up_to < self.next_ref {
            let id = *scored_up_to;
            if self.refs[id].is_empty() {
                emit(id, affine_gap_score(query_len, gap_open, gap_extend));
            }
            *scored_up_to += 1;
        }
    }
}

/// Lane `k`'s restarted H column: `H[0] <- 0`, `H[i] <- affine(i)` for `i in
/// 1..=query_len`, per spec §4.3.
#[inline(always)]
pub fn lane_init_h<T: ScoreOps, const N: usize>(
    col_h: &mut [Simd<T, N>],
    k: usize,
    query_len: usize,
    gap_open: T,
    gap_extend: T,
) where
    LaneCount<N>: SupportedLaneCount,
{
    col_h[0] = score::set(col_h[0], k, T::wrapping_from_i64(0));
    for i in 1..=query_len {
        let h = affine_gap_score(i, gap_open, gap_extend);
        col_h[i] = score::set(col_h[i], k, h);
    }
}

/// Lane `k`'s restarted E column: `E[i] <- H[i] - (gap_open + gap_extend)`.
#[inline(always)]
pub fn lane_init_e<T: ScoreOps, const N: usize>(
    col_e: &mut [Simd<T, N>],
    col_h: &[Simd<T, N>],
    k: usize,
    query_len: usize,
    gap_open: T,
    gap_extend: T,
) where
    LaneCount<N>: SupportedLaneCount,
{
    let penalty = T::saturating_from_i64(gap_open.to_i64() + gap_extend.to_i64());
    for i in 0..=query_len {
        let h = score::get(col_h[i], k);
        let e = T::saturating_from_i64(h.to_i64() - penalty.to_i64());
        col_e[i] = score::set(col_e[i], k, e);
    }
}
