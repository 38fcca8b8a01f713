use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use i0_consensus::{
    block_proof, decode_compact, encode_compact, next_work_required, BlockId, Hash256,
    HeaderChain, MAIN_PARAMS,
};

fn modern_window() -> (HeaderChain, BlockId) {
    let mut chain = HeaderChain::new();
    let bits = 0x1c00_ffff;
    let mut last = chain
        .insert_root(Hash256([0xee; 32]), 149_879, 1_400_000_000, bits, block_proof(bits), 1)
        .expect("root");
    for i in 1..=120u32 {
        let mut hash = [0u8; 32];
        hash[..4].copy_from_slice(&i.to_le_bytes());
        last = chain
            .connect(last, Hash256(hash), 1_400_000_000 + i * 75, bits, 1)
            .expect("connect");
    }
    (chain, last)
}

fn bench_compact(c: &mut Criterion) {
    let mut g = c.benchmark_group("compact");
    g.bench_function("decode", |b| b.iter(|| decode_compact(black_box(0x1b04_864c))));
    let value = decode_compact(0x1b04_864c).value;
    g.bench_function("encode", |b| b.iter(|| encode_compact(black_box(&value))));
    g.bench_function("block_proof", |b| b.iter(|| block_proof(black_box(0x1b04_864c))));
    g.finish();
}

fn bench_retarget(c: &mut Criterion) {
    let (chain, last) = modern_window();
    let time = chain.get(last).map_or(0, |r| r.time) + 90;
    assert!(next_work_required(&chain, Some(last), time, &MAIN_PARAMS).is_ok());
    c.bench_function("next_work_required/150000", |b| {
        b.iter(|| next_work_required(black_box(&chain), Some(last), time, &MAIN_PARAMS))
    });
}

criterion_group!(benches, bench_compact, bench_retarget);
criterion_main!(benches);
