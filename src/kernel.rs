//! DP inner loop: one reference-column sweep down the query for every
//! occupied lane simultaneously (spec §4.5).
//!
//! Grounded directly on `original_source/deps/paralign.cpp`'s inner
//! `for (size_t i = 0; i < seq.len; i++)` loop inside `paralign_score` — the
//! `H_diag`/`H`/`E`/`F` register shuffle below is a line-by-line
//! generalisation of that loop from one hardwired `__m128i` of `int16_t` to
//! `Simd<T, N>` for any `ScoreOps` width. `pa-bitpacking/src/compute_block.rs`'s
//! `compute_block_simd` supplies the stylistic shape (a small `#[inline(always)]`
//! function threading register state through a single column sweep) this
//! function follows, adapted from bit-parallel edit distance to affine-gap
//! scores.

use std::simd::{LaneCount, Simd, SupportedLaneCount};

use crate::scheduler::{affine_gap_score, Slot};
use crate::score::{self, ScoreOps};

/// Per-lane boundary value `affine(slot.pos + offset)`, used both to read the
/// "old" H(0, ·) boundary (`offset = 0`, though in practice that value is
/// simply re-read from `col_h[0]`, see [`step_column`]) and to compute the
/// new column's row-0 boundary (`offset = 1`), per spec §4.5: "At row 0 of
/// the new column, `H[0][k] <- affine(slots[k].pos + 1)`".
#[inline(always)]
fn boundary_vector<T: ScoreOps, const N: usize>(
    slots: &[Slot; N],
    offset: usize,
    gap_open: T,
    gap_extend: T,
) -> Simd<T, N>
where
    LaneCount<N>: SupportedLaneCount,
{
    let lanes: [T; N] = std::array::from_fn(|k| match slots[k] {
        Slot::Empty => T::wrapping_from_i64(0),
        Slot::Occupied { pos, .. } => affine_gap_score(pos + offset, gap_open, gap_extend),
    });
    Simd::from_array(lanes)
}

/// Advances `col_h`/`col_e` by one reference column for every lane in
/// `slots` simultaneously, per the Gotoh affine-gap recurrence (spec §4.5):
///
/// ```text
/// H(i,j) = max(H(i-1,j-1) + s(r_j,q_i), E(i,j), F(i,j))
/// E(i,j) = max(H(i,j-1) - (gap_open+gap_extend), E(i,j-1) - gap_extend)
/// F(i,j) = max(H(i-1,j) - (gap_open+gap_extend), F(i-1,j) - gap_extend)
/// ```
///
/// `col_h`/`col_e` must have length `query.len() + 1`; `profile[c]` must hold
/// the per-lane substitution score for query symbol `c` (spec §4.4). `F` is
/// carried only as a register across the loop, never materialised as a
/// column, per the spec's explicit memory-traffic rationale.
///
/// Lanes not present in `slots` (i.e. [`Slot::Empty`]) still get arithmetic
/// applied to their column entries — the recurrence has no per-lane branch —
/// but since SIMD lane operations are elementwise, an empty lane's garbage
/// input can only ever produce garbage output in that same lane; it never
/// perturbs an occupied lane's result (spec's "lane independence").
#[inline(always)]
pub fn step_column<T: ScoreOps, const N: usize>(
    col_h: &mut [Simd<T, N>],
    col_e: &mut [Simd<T, N>],
    profile: &[Simd<T, N>],
    query: &[u8],
    slots: &[Slot; N],
    gap_open: T,
    gap_extend: T,
) where
    LaneCount<N>: SupportedLaneCount,
{
    debug_assert_eq!(col_h.len(), query.len() + 1);
    debug_assert_eq!(col_e.len(), query.len() + 1);

    let ginit = Simd::splat(T::saturating_from_i64(gap_open.to_i64() + gap_extend.to_i64()));
    let gextd = Simd::splat(gap_extend);

    // H(0, j-1): the boundary this lane carried in from the previous
    // iteration (or from the lane-restart protocol on the iteration a
    // reference was just installed).
    let h_diag_init = col_h[0];
    // H(0, j): this column's boundary, rederived fresh from `pos` rather
    // than threaded forward, since it is a pure function of the gap
    // penalties and the column index.
    let h0_new = boundary_vector(slots, 1, gap_open, gap_extend);
    col_h[0] = h0_new;

    let mut h_diag = h_diag_init;
    let mut h_reg = h0_new;
    let mut f_reg = T::simd_sub(h0_new, ginit);

    for (i, &c) in query.iter().enumerate() {
        let row = i + 1;
        let s = profile[c as usize];
        let h_old = col_h[row]; // H(row, j-1)
        let e_old = col_e[row]; // E(row, j-1)

        let e_new = score::max(T::simd_sub(h_old, ginit), T::simd_sub(e_old, gextd));
        let f_new = score::max(T::simd_sub(h_reg, ginit), T::simd_sub(f_reg, gextd));
        let h_new = score::max(score::max(T::simd_add(h_diag, s), e_new), f_new);

        col_h[row] = h_new;
        col_e[row] = e_new;

        h_diag = h_old;
        h_reg = h_new;
        f_reg = f_new;
    }
}
