use std::hint::black_box;
use std::ops::ControlFlow;
use criterion::criterion_group;
use criterion::criterion_main;
use criterion::Criterion;
use rand::SeedableRng;
use rand::rngs::StdRng;
use sm_population::Population;
use sm_kinetics::ChainsAndRings;
use sm_kinetics::Coagulation;
use sm_kinetics::Cyclization;
use sm_kinetics::CyclizationRate;
use sm_kinetics::CyclizationSSA;
use sm_kinetics::DetailedBalance;
use sm_kinetics::Fragmentation;
use sm_kinetics::FragmentationSSA;
use sm_kinetics::GaussianChain;
use sm_kinetics::InverseMass;
use sm_kinetics::SystemParameters;

fn simulate_fragmentation(n_total: usize, t_max: f64) {
    let params = SystemParameters::new(n_total, 0.1, 0.5).unwrap();
    let rate = DetailedBalance::new(InverseMass, 1e-3).unwrap();
    let mut simulator = FragmentationSSA::from((
        Population::monomers(n_total),
        Coagulation::new(InverseMass, params),
        Fragmentation::new(rate, params),
    ));
    let mut rng = StdRng::seed_from_u64(42);
    simulator.simulate(&mut rng, black_box(t_max), |_, _| ControlFlow::Continue(()));
}

fn simulate_cyclization(n_total: usize) {
    let params = SystemParameters::new(n_total, 0.1, 0.5).unwrap();
    let rate = CyclizationRate::new(0.1).unwrap();
    let mut simulator = CyclizationSSA::from((
        ChainsAndRings::from(Population::monomers(n_total)),
        Coagulation::new(GaussianChain, params),
        Cyclization::new(rate, params),
    ));
    let mut rng = StdRng::seed_from_u64(42);
    simulator.simulate(&mut rng, f64::INFINITY, |_, _| ControlFlow::Continue(()));
}

fn simulate_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulate_many");
    group.measurement_time(std::time::Duration::from_secs(20));
    group.bench_function("fragmentation_n1000", |b| {
        b.iter(|| simulate_fragmentation(1000, 100.0))
    });
    group.bench_function("fragmentation_n10000", |b| {
        b.iter(|| simulate_fragmentation(10000, 100.0))
    });
    group.bench_function("cyclization_n1000", |b| {
        b.iter(|| simulate_cyclization(1000))
    });
    group.finish();
}

criterion_group!(benches, simulate_benchmark);
criterion_main!(benches);
