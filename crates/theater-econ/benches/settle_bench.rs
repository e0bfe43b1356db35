use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use theater_core::{Actor, ActorId, CastMember, Plot, PlotId, Rank};
use theater_econ::compute_settlement;

fn build_cast(n: usize) -> Vec<CastMember> {
    (0..n)
        .map(|i| CastMember {
            actor: Actor {
                id: ActorId(i as i64 + 1),
                first_name: format!("First{i}"),
                last_name: format!("Last{i}"),
                rank: Rank::ALL[i % Rank::ALL.len()],
                awards_count: (i % 5) as u32,
                experience: (i % 12) as u32,
            },
            role: format!("Role {i}"),
            contract_cost: 60_000 + 10_000 * i as i64,
        })
        .collect()
}

fn bench_quick(c: &mut Criterion) {
    let plot = Plot {
        id: PlotId(1),
        title: "Masquerade".to_string(),
        minimum_budget: 650_000,
        production_cost: 400_000,
        roles_count: 8,
        demand: 8,
        required_ranks: vec![Rank::Master, Rank::Lead],
    };
    let cast = build_cast(8);
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    c.bench_function("settle 8 member cast", |b| {
        b.iter(|| black_box(compute_settlement(&plot, 850_000, &cast, &mut rng)))
    });
}

criterion_group!(benches, bench_quick);
criterion_main!(benches);
