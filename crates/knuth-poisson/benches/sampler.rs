//! Latency of a single Poisson sample at different rates

use divan::{Bencher, black_box};
use knuth_poisson::prelude::*;
use rand::{SeedableRng, rngs::SmallRng};

fn main() {
    divan::main();
}

const LAMBDAS: &[f64] = &[0.2, 1.0, 10.0, 100.0];

#[divan::bench(args = LAMBDAS)]
fn sample(bencher: Bencher, lambda: f64) {
    let poisson = PoissonKnuth::new(lambda).unwrap();
    let mut rng = SmallRng::seed_from_u64(42);
    bencher.bench_local(|| poisson.sample(black_box(&mut rng)));
}

#[divan::bench(args = LAMBDAS)]
fn new_and_sample(bencher: Bencher, lambda: f64) {
    let mut rng = SmallRng::seed_from_u64(42);
    bencher.bench_local(|| knuth_poisson::sample(black_box(lambda), &mut rng).unwrap());
}

#[divan::bench(sample_count = 100, sample_size = 10)]
fn sample_many(bencher: Bencher) {
    const CALLS: usize = 100_000;

    let poisson = PoissonKnuth::new(10.0).unwrap();
    let mut rng = SmallRng::seed_from_u64(42);
    bencher.bench_local(|| {
        (0..CALLS)
            .map(|_| poisson.sample_from(&mut rng))
            .sum::<u64>()
    });
}
