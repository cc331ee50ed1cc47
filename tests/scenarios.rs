//! End-to-end integration tests for the concrete scenarios and algebraic
//! properties from spec §8, driven through the crate's public API rather
//! than its internal modules (complementing the `#[cfg(test)]` unit tests
//! beside each module).
//!
//! Grounded on `pa-bitpacking`'s own `#[cfg(test)]` style for the concrete
//! assertions, and `pa-test`/top-level `Cargo.toml`'s `rand`/`rand_chacha`
//! dependency for the randomised batch/order-independence checks below.

#![feature(portable_simd)]

use std::simd::{LaneCount, SupportedLaneCount};

use bio::alphabets::{Alphabet, RankTransform};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use paralign::{align, Sequence, SubstitutionMatrix, WorkingBuffer};

fn acgt(s: &str) -> Vec<u8> {
    RankTransform::new(&Alphabet::new(b"ACGT")).transform(s.as_bytes())
}

fn submat_2_m1() -> [i32; 16] {
    let mut m = [-1i32; 16];
    for i in 0..4 {
        m[i * 4 + i] = 2;
    }
    m
}

fn run<const N: usize>(query: &[u8], refs: &[Vec<u8>], gap_open: i32, gap_extend: i32) -> Vec<i32>
where
    LaneCount<N>: SupportedLaneCount,
{
    let data = submat_2_m1();
    let submat = SubstitutionMatrix::new(&data, 4);
    let ref_seqs: Vec<Sequence> = refs.iter().map(|r| Sequence::plain(r)).collect();
    let mut buffer: WorkingBuffer<i32, N> = WorkingBuffer::new();
    let mut scores = vec![0i32; ref_seqs.len()];
    align(&mut buffer, &submat, gap_open, gap_extend, Sequence::plain(query), &ref_seqs, &mut scores).unwrap();
    scores
}

/// Spec §8 scenario 1: query == reference, any number of copies all score 8.
#[test]
fn scenario_identical_sequences() {
    let query = acgt("ACGT");
    let refs: Vec<Vec<u8>> = (0..6).map(|_| acgt("ACGT")).collect();
    assert_eq!(run::<4>(&query, &refs, 2, 1), vec![8; 6]);
}

/// Spec §8 scenario 6: a mixed batch, independent of lane count.
#[test]
fn scenario_mixed_batch() {
    let query = acgt("ACGT");
    let refs: Vec<Vec<u8>> = ["ACGT", "", "ACGA", "AAAAACGT"].iter().map(|s| acgt(s)).collect();
    let expected = vec![8, -6, 5];

    for scores in [run::<2>(&query, &refs, 2, 1), run::<4>(&query, &refs, 2, 1), run::<8>(&query, &refs, 2, 1)] {
        assert_eq!(&scores[..3], &expected[..]);
    }
}

/// Empty-query law: an all-gap alignment for every reference.
#[test]
fn empty_query_scores_pure_gap_for_every_reference() {
    let refs: Vec<Vec<u8>> = ["A", "ACGT", "ACGTACGT"].iter().map(|s| acgt(s)).collect();
    let scores = run::<4>(&[], &refs, 2, 1);
    let expected: Vec<i32> = refs.iter().map(|r| -(2 + r.len() as i32)).collect();
    assert_eq!(scores, expected);
}

/// Empty query against an empty reference scores 0.
#[test]
fn empty_query_and_empty_reference_score_zero() {
    let refs: Vec<Vec<u8>> = vec![vec![]];
    assert_eq!(run::<4>(&[], &refs, 2, 1), vec![0]);
}

/// Batch equivalence: splitting a batch into sub-batches of any size and
/// concatenating the results reproduces the single-batch result.
#[test]
fn batch_equivalence_across_sub_batch_sizes() {
    let query = acgt("ACGTACGTACGT");
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let refs: Vec<Vec<u8>> = (0..17)
        .map(|_| {
            let len = rng.gen_range(0..20);
            (0..len).map(|_| rng.gen_range(0u8..4)).collect()
        })
        .collect();

    let whole = run::<4>(&query, &refs, 2, 1);

    for chunk_size in [1usize, 2, 3, 5, 17] {
        let mut stitched = Vec::new();
        for chunk in refs.chunks(chunk_size) {
            stitched.extend(run::<4>(&query, chunk, 2, 1));
        }
        assert_eq!(stitched, whole, "chunk_size={chunk_size}");
    }
}

/// Order independence: permuting the references permutes the scores, for a
/// randomised batch (not just the four-element spec scenario).
#[test]
fn order_independence_randomised() {
    let query = acgt("ACGTTGCA");
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let refs: Vec<Vec<u8>> = (0..12)
        .map(|_| {
            let len = rng.gen_range(0..15);
            (0..len).map(|_| rng.gen_range(0u8..4)).collect()
        })
        .collect();

    let forward = run::<4>(&query, &refs, 2, 1);

    let mut indices: Vec<usize> = (0..refs.len()).collect();
    // A fixed, deterministic shuffle (reverse + rotate) rather than relying
    // on a shuffling API, to keep this test's dependency footprint minimal.
    indices.reverse();
    indices.rotate_left(3);
    let permuted_refs: Vec<Vec<u8>> = indices.iter().map(|&i| refs[i].clone()).collect();
    let permuted = run::<4>(&query, &permuted_refs, 2, 1);

    for (permuted_pos, &orig_idx) in indices.iter().enumerate() {
        assert_eq!(permuted[permuted_pos], forward[orig_idx]);
    }
}

/// Width monotonicity: i8/i16/i32 kernels agree when scores fit in 8 bits.
#[test]
fn width_monotonicity_randomised() {
    let mut rng = ChaCha8Rng::seed_from_u64(123);
    let query: Vec<u8> = (0..20).map(|_| rng.gen_range(0u8..4)).collect();
    let refs: Vec<Vec<u8>> = (0..5)
        .map(|_| (0..20).map(|_| rng.gen_range(0u8..4)).collect())
        .collect();

    let data32 = submat_2_m1();
    let data16: Vec<i16> = data32.iter().map(|&x| x as i16).collect();
    let data8: Vec<i8> = data32.iter().map(|&x| x as i8).collect();

    let ref_seqs: Vec<Sequence> = refs.iter().map(|r| Sequence::plain(r)).collect();

    let submat32 = SubstitutionMatrix::new(&data32, 4);
    let mut buffer32: WorkingBuffer<i32, 4> = WorkingBuffer::new();
    let mut scores32 = vec![0i32; refs.len()];
    align(&mut buffer32, &submat32, 2, 1, Sequence::plain(&query), &ref_seqs, &mut scores32).unwrap();

    let submat16 = SubstitutionMatrix::new(&data16, 4);
    let mut buffer16: WorkingBuffer<i16, 8> = WorkingBuffer::new();
    let mut scores16 = vec![0i16; refs.len()];
    align(&mut buffer16, &submat16, 2, 1, Sequence::plain(&query), &ref_seqs, &mut scores16).unwrap();

    let submat8 = SubstitutionMatrix::new(&data8, 4);
    let mut buffer8: WorkingBuffer<i8, 16> = WorkingBuffer::new();
    let mut scores8 = vec![0i8; refs.len()];
    align(&mut buffer8, &submat8, 2, 1, Sequence::plain(&query), &ref_seqs, &mut scores8).unwrap();

    for i in 0..refs.len() {
        assert_eq!(scores32[i] as i64, scores16[i] as i64);
        assert_eq!(scores32[i] as i64, scores8[i] as i64);
    }
}

/// Identity law over a longer, randomised query.
#[test]
fn identity_law_randomised() {
    let mut rng = ChaCha8Rng::seed_from_u64(55);
    let query: Vec<u8> = (0..50).map(|_| rng.gen_range(0u8..4)).collect();
    let refs = vec![query.clone()];
    let scores = run::<4>(&query, &refs, 3, 2);
    assert_eq!(scores[0], 2 * query.len() as i32);
}

/// Packed/reversed sequence layouts agree with their plain equivalents.
#[test]
fn packed_sequence_agrees_with_plain() {
    let query = acgt("ACGTACGT");
    let refer = acgt("ACGAACGT");

    let data = submat_2_m1();
    let submat = SubstitutionMatrix::new(&data, 4);

    let mut packed = vec![0u8; refer.len().div_ceil(4)];
    for (i, &sym) in refer.iter().enumerate() {
        packed[i >> 2] |= sym << ((i & 3) * 2);
    }
    let packed_ref = Sequence::new(&packed, refer.len(), 0, false, true);
    let plain_ref = Sequence::plain(&refer);

    let mut buffer_a: WorkingBuffer<i32, 4> = WorkingBuffer::new();
    let mut scores_a = vec![0i32];
    align(&mut buffer_a, &submat, 2, 1, Sequence::plain(&query), &[packed_ref], &mut scores_a).unwrap();

    let mut buffer_b: WorkingBuffer<i32, 4> = WorkingBuffer::new();
    let mut scores_b = vec![0i32];
    align(&mut buffer_b, &submat, 2, 1, Sequence::plain(&query), &[plain_ref], &mut scores_b).unwrap();

    assert_eq!(scores_a, scores_b);
}
