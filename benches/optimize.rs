use codon_optimizer::{
    cai,
    codon_usage::{CodonUsageCatalog, DEFAULT_ORGANISM},
    engine::CodonOptimizationEngine,
    enzymes::RestrictionData,
    parameters::TerminatorParameters,
    restriction_sites::find_sites,
    terminators::detect_terminators,
};
use codon_protocol::OptimizationRequest;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

const AMINO_ACIDS: &[u8] = b"ACDEFGHIKLMNPQRSTVWY";

fn random_protein(len: usize) -> String {
    let mut protein = String::with_capacity(len + 2);
    protein.push('M');
    let mut state: u64 = 42;
    for _ in 0..len {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
        protein.push(AMINO_ACIDS[((state >> 33) % AMINO_ACIDS.len() as u64) as usize] as char);
    }
    protein.push('*');
    protein
}

fn bench_pipeline(c: &mut Criterion) {
    let catalog = CodonUsageCatalog::default();
    let registry = RestrictionData::default();
    let table = catalog.get(DEFAULT_ORGANISM).unwrap();
    let engine = CodonOptimizationEngine::new(table, &registry);

    let mut group = c.benchmark_group("optimize");
    for len in [100, 300, 1000] {
        let request = OptimizationRequest {
            remove_restriction_sites: true,
            remove_terminators: true,
            optimize_ends: true,
            ..OptimizationRequest::new(&random_protein(len))
        };
        group.bench_with_input(BenchmarkId::new("full", len), &request, |b, request| {
            b.iter(|| engine.run(black_box(request)))
        });
    }
    group.finish();
}

fn bench_analysis(c: &mut Criterion) {
    let catalog = CodonUsageCatalog::default();
    let registry = RestrictionData::default();
    let table = catalog.get(DEFAULT_ORGANISM).unwrap();
    let engine = CodonOptimizationEngine::new(table, &registry);
    let dna = match engine.run(&OptimizationRequest::new(&random_protein(1000))) {
        Ok(result) => result.final_sequence,
        Err(e) => panic!("{e}"),
    };
    let params = TerminatorParameters::default();

    c.bench_function("cai_3kb", |b| {
        b.iter(|| cai::score(black_box(&dna), engine.weights()))
    });
    c.bench_function("find_sites_3kb", |b| {
        b.iter(|| find_sites(black_box(&dna), &registry, None))
    });
    c.bench_function("detect_terminators_3kb", |b| {
        b.iter(|| detect_terminators(black_box(&dna), &params))
    });
}

criterion_group!(benches, bench_pipeline, bench_analysis);
criterion_main!(benches);
