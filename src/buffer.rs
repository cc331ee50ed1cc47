//! Working buffer: the caller-owned scratch region the kernel advances
//! through (spec §2, §4.2, §6).
//!
//! Grounded on `original_source/deps/simdalign.h`'s `buffer_t` /
//! `expand_buffer`/`make_buffer`/`free_buffer`. In Rust, construction and
//! `Drop` stand in for `make`/`free`; `ensure_capacity` is the one operation
//! that survives as a method, reshaped to return `Result` instead of a C
//! return code so the allocation-failure path composes with `?`.
//!
//! `Vec<Simd<T, N>>` is used for the column arrays rather than one raw byte
//! allocation sliced by pointer offset (the source's layout): the global
//! allocator aligns a `Vec<Simd<T, N>>`'s backing storage to
//! `align_of::<Simd<T, N>>()`, which is always >= V/8 bytes for these lane
//! counts, so the spec's alignment requirement is met without any manual
//! pointer arithmetic.

use std::simd::{LaneCount, Simd, SupportedLaneCount};

use crate::error::Error;
use crate::score::ScoreOps;

/// Scratch region reused across calls: two column vectors of length
/// `|query|+1`, a profile table of length `|alphabet|`, and an unpacked copy
/// of the query. Grows monotonically; never shrinks, matching the spec's
/// "caller calls once per session, reuses across alignments" contract.
pub struct WorkingBuffer<T: ScoreOps, const N: usize>
where
    LaneCount<N>: SupportedLaneCount,
{
    pub(crate) col_h: Vec<Simd<T, N>>,
    pub(crate) col_e: Vec<Simd<T, N>>,
    pub(crate) profile: Vec<Simd<T, N>>,
    pub(crate) query_bytes: Vec<u8>,
}

impl<T: ScoreOps, const N: usize> WorkingBuffer<T, N>
where
    LaneCount<N>: SupportedLaneCount,
{
    pub fn new() -> Self {
        WorkingBuffer {
            col_h: Vec::new(),
            col_e: Vec::new(),
            profile: Vec::new(),
            query_bytes: Vec::new(),
        }
    }

    /// Grows the column arrays to hold `query_len + 1` entries and the
    /// profile table to `alphabet_size` entries. Contents are undefined
    /// (stale from a previous call) across resizes that don't grow a given
    /// array; the driver re-initialises every lane it uses before reading it.
    pub fn ensure_capacity(&mut self, query_len: usize, alphabet_size: usize) -> Result<(), Error> {
        let columns_needed = query_len + 1;
        grow(&mut self.col_h, columns_needed, Simd::splat(T::MIN))?;
        grow(&mut self.col_e, columns_needed, Simd::splat(T::MIN))?;
        grow(&mut self.profile, alphabet_size, Simd::splat(T::MIN))?;
        if self.query_bytes.capacity() < query_len {
            self.query_bytes
                .try_reserve(query_len - self.query_bytes.capacity())
                .map_err(|_| Error::AllocationFailure)?;
        }
        Ok(())
    }
}

impl<T: ScoreOps, const N: usize> Default for WorkingBuffer<T, N>
where
    LaneCount<N>: SupportedLaneCount,
{
    fn default() -> Self {
        Self::new()
    }
}

fn grow<V: Clone>(v: &mut Vec<V>, needed: usize, fill: V) -> Result<(), Error> {
    if v.len() >= needed {
        return Ok(());
    }
    let additional = needed - v.len();
    v.try_reserve(additional).map_err(|_| Error::AllocationFailure)?;
    v.resize(needed, fill);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_capacity_grows_monotonically() {
        let mut buf: WorkingBuffer<i16, 8> = WorkingBuffer::new();
        buf.ensure_capacity(10, 4).unwrap();
        assert_eq!(buf.col_h.len(), 11);
        assert_eq!(buf.col_e.len(), 11);
        assert_eq!(buf.profile.len(), 4);

        // A smaller request does not shrink the buffer.
        buf.ensure_capacity(2, 1).unwrap();
        assert_eq!(buf.col_h.len(), 11);
        assert_eq!(buf.profile.len(), 4);

        // A larger request grows again.
        buf.ensure_capacity(20, 4).unwrap();
        assert_eq!(buf.col_h.len(), 21);
    }

    #[test]
    fn alignment_meets_vector_width() {
        let mut buf: WorkingBuffer<i8, 32> = WorkingBuffer::new();
        buf.ensure_capacity(4, 4).unwrap();
        let ptr = buf.col_h.as_ptr();
        assert_eq!(ptr.align_offset(std::mem::align_of::<Simd<i8, 32>>()), 0);
        assert!(std::mem::align_of::<Simd<i8, 32>>() >= 32 / 8);
    }
}
