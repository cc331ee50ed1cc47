//! CLI / benchmark front end (SPEC_FULL §2a): generates or loads ACGT
//! sequences, runs the batch kernel over them and reports timing.
//!
//! Grounded on `pa-bitpacking/src/main.rs`'s `Cli` / `test` shape (a
//! `clap::Parser` struct, an `Instant`-timed loop around the function under
//! test) and `astar-map/src/main.rs`'s `log`/`env_logger` startup, adapted
//! from edit-distance kernels to this crate's `score_i*` batch entry points.

#![feature(portable_simd)]

use std::simd::{LaneCount, SupportedLaneCount};
use std::time::Instant;

use clap::Parser;
use log::info;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use paralign::{align, Sequence, SubstitutionMatrix, WorkingBuffer};

/// Times `paralign`'s lane-multiplexed kernel against a batch of randomly
/// generated or repeated reference sequences.
#[derive(Parser)]
struct Cli {
    /// Length of the query sequence.
    #[arg(short, long, default_value_t = 512)]
    query_len: usize,

    /// Number of reference sequences in the batch.
    #[arg(short, long, default_value_t = 64)]
    refs: usize,

    /// Length of each reference sequence.
    #[arg(short = 'l', long, default_value_t = 512)]
    ref_len: usize,

    /// Lane count to use (4, 8, 16 or 32); picks the matching score width.
    #[arg(short, long, default_value_t = 8)]
    lanes: usize,

    /// RNG seed for reproducible batches.
    #[arg(long, default_value_t = 31415)]
    seed: u64,

    /// Gap-open penalty.
    #[arg(long, default_value_t = 2)]
    gap_open: i32,

    /// Gap-extend penalty.
    #[arg(long, default_value_t = 1)]
    gap_extend: i32,
}

/// Generates `len` symbols already in the crate's native `[0, 4)` alphabet
/// (A=0, C=1, G=2, T=3) — no `RankTransform` needed, since these values are
/// never ASCII in the first place.
fn random_acgt(rng: &mut ChaCha8Rng, len: usize) -> Vec<u8> {
    (0..len).map(|_| rng.gen_range(0u8..4)).collect()
}

fn submat_match_mismatch(m: i32, mm: i32) -> [i32; 16] {
    let mut data = [mm; 16];
    for i in 0..4 {
        data[i * 4 + i] = m;
    }
    data
}

fn run<const N: usize>(cli: &Cli, query: &[u8], refs_bytes: &[Vec<u8>], submat_data: &[i32; 16])
where
    LaneCount<N>: SupportedLaneCount,
{
    let submat = SubstitutionMatrix::new(submat_data, 4);
    let refs: Vec<Sequence> = refs_bytes.iter().map(|r| Sequence::plain(r)).collect();
    let mut buffer: WorkingBuffer<i32, N> = WorkingBuffer::new();
    let mut scores = vec![0i32; refs.len()];

    let start = Instant::now();
    align(
        &mut buffer,
        &submat,
        cli.gap_open,
        cli.gap_extend,
        Sequence::plain(query),
        &refs,
        &mut scores,
    )
    .expect("kernel call failed");
    let elapsed = start.elapsed();

    info!(
        "lanes={N} query_len={} n_refs={} ref_len={} elapsed={:.3?} best_score={}",
        query.len(),
        refs.len(),
        cli.ref_len,
        elapsed,
        scores.iter().copied().max().unwrap_or(0),
    );
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let mut rng = ChaCha8Rng::seed_from_u64(cli.seed);
    let query = random_acgt(&mut rng, cli.query_len);
    let refs_bytes: Vec<Vec<u8>> = (0..cli.refs).map(|_| random_acgt(&mut rng, cli.ref_len)).collect();
    let submat_data = submat_match_mismatch(2, -1);

    match cli.lanes {
        4 => run::<4>(&cli, &query, &refs_bytes, &submat_data),
        8 => run::<8>(&cli, &query, &refs_bytes, &submat_data),
        16 => run::<16>(&cli, &query, &refs_bytes, &submat_data),
        32 => run::<32>(&cli, &query, &refs_bytes, &submat_data),
        other => {
            eprintln!("unsupported lane count {other}; expected one of 4, 8, 16, 32");
            std::process::exit(1);
        }
    }
}
