use case_core::{Container, ContainerId, Currency, RawValue, RewardDefinition, RewardId, RewardMeta};
use case_econ::CurrencyBook;
use case_sim::{modes, CumulativeTable};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn bench_case() -> Container {
    let values = ["1K", "5K", "250K-300K", "2M", "O/C[1B-2B]", "5T"];
    let weights = [40.0, 30.0, 15.0, 10.0, 4.0, 1.0];
    Container {
        id: ContainerId("bench".into()),
        name: "Bench Case".into(),
        price: 2_000.0,
        currency: Currency::Time,
        rewards: values
            .iter()
            .zip(weights)
            .enumerate()
            .map(|(i, (v, w))| RewardDefinition {
                id: RewardId(format!("r{i}")),
                name: String::new(),
                value: RawValue::from(*v),
                weight: w,
                category: String::new(),
                meta: RewardMeta::default(),
            })
            .collect(),
    }
}

fn bench_draws(c: &mut Criterion) {
    let case = bench_case();
    let table = CumulativeTable::prepare(&case).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    c.bench_function("weighted_draw", |b| {
        b.iter(|| black_box(table.draw(&mut rng).value))
    });
}

fn bench_realistic(c: &mut Criterion) {
    let case = bench_case();
    let book = CurrencyBook::default();
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    c.bench_function("realistic_10k", |b| {
        b.iter(|| {
            let _ = modes::realistic(&case, black_box(10_000), &book, &mut rng);
        })
    });
}

criterion_group!(benches, bench_draws, bench_realistic);
criterion_main!(benches);
