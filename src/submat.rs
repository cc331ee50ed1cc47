//! Substitution matrix: a row-major A×A table of scores (spec §3, §6).
//!
//! Grounded on `original_source/deps/simdalign.h`'s `submat_t<T>`. The row is
//! the reference symbol, the column the query symbol (the convention this
//! spec's Open Question picks, §9): `submat[r, q] = data[r * size + q]`.

use crate::score::ScoreOps;

/// Caller-owned, read-only substitution matrix. `data.len()` must equal
/// `size * size`; the kernel never mutates or reallocates it.
#[derive(Clone, Debug)]
pub struct SubstitutionMatrix<'a, T: ScoreOps> {
    data: &'a [T],
    size: usize,
}

impl<'a, T: ScoreOps> SubstitutionMatrix<'a, T> {
    pub fn new(data: &'a [T], size: usize) -> Self {
        debug_assert_eq!(data.len(), size * size, "substitution matrix is not square");
        SubstitutionMatrix { data, size }
    }

    #[inline(always)]
    pub fn size(&self) -> usize {
        self.size
    }

    /// `submat[r, q]`, row = reference symbol, column = query symbol.
    #[inline(always)]
    pub fn get(&self, r: u8, q: u8) -> T {
        self.data[r as usize * self.size + q as usize]
    }
}
