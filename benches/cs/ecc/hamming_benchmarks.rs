use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fec_channel_sim::channel::{BinarySymmetricChannel, Channel, GilbertElliottChannel};
use fec_channel_sim::ecc::HammingCode;
use fec_channel_sim::BitVector;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn random_message(len: usize, seed: u64) -> BitVector {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen::<bool>()).collect()
}

fn bench_hamming(c: &mut Criterion) {
    let codec = HammingCode::new();
    let mut group = c.benchmark_group("hamming");

    for &len in &[4usize, 11, 57, 247, 1013] {
        let message = random_message(len, len as u64);
        let codeword = codec.encode(&message).unwrap();

        group.bench_with_input(BenchmarkId::new("encode", len), &message, |b, m| {
            b.iter(|| codec.encode(black_box(m)).unwrap())
        });

        let mut damaged = codeword.clone();
        damaged.flip(len / 2);
        group.bench_with_input(BenchmarkId::new("decode", len), &damaged, |b, w| {
            b.iter(|| codec.decode(black_box(w)).unwrap())
        });
    }

    group.finish();
}

fn bench_channels(c: &mut Criterion) {
    let bits = random_message(8192, 1);
    let bsc = BinarySymmetricChannel::new(0.01).unwrap();
    let ge = GilbertElliottChannel::new(0.01, 0.1, 0.001, 0.3).unwrap();
    let mut group = c.benchmark_group("channel");

    group.bench_function("bsc_8192", |b| {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        b.iter(|| bsc.transmit(black_box(&bits), &mut rng))
    });
    group.bench_function("gilbert_elliott_8192", |b| {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        b.iter(|| ge.transmit(black_box(&bits), &mut rng))
    });

    group.finish();
}

criterion_group!(benches, bench_hamming, bench_channels);
criterion_main!(benches);
