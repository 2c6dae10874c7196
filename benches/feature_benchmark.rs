use criterion::{black_box, criterion_group, criterion_main, Criterion};
use attrition::{
    align, assemble, AttritionModel, Classifier, EmployeeProfile, ExpectedSchema, JobRole,
    RuntimeConfig,
};
use ort::session::builder::GraphOptimizationLevel;

fn sample_profile() -> EmployeeProfile {
    EmployeeProfile {
        age: 42,
        monthly_income: 12000,
        job_role: JobRole::ResearchDirector,
        ..Default::default()
    }
}

fn bench_features(c: &mut Criterion) {
    let mut group = c.benchmark_group("Features");
    group.sample_size(100);
    group.warm_up_time(std::time::Duration::from_secs(1));

    let profile = sample_profile();
    let schema = ExpectedSchema::attrition();
    let row = assemble(&profile);

    group.bench_function("assemble", |b| b.iter(|| assemble(black_box(&profile))));
    group.bench_function("align", |b| b.iter(|| align(black_box(&row), black_box(&schema))));
    group.bench_function("assemble_and_align", |b| b.iter(|| {
        align(&assemble(black_box(&profile)), &schema)
    }));

    group.finish();
}

// Needs a real model: ATTRITION_BENCH_MODEL=path/to/model.onnx
fn bench_prediction(c: &mut Criterion) {
    let Ok(model_path) = std::env::var("ATTRITION_BENCH_MODEL") else {
        return;
    };

    let mut group = c.benchmark_group("Prediction");
    group.sample_size(50);
    group.warm_up_time(std::time::Duration::from_secs(1));

    let configs = vec![
        ("single_thread", RuntimeConfig {
            inter_threads: 1,
            intra_threads: 1,
            optimization_level: GraphOptimizationLevel::Level1,
        }),
        ("optimized", RuntimeConfig::default()),
    ];

    let features = align(&assemble(&sample_profile()), &ExpectedSchema::attrition());
    for (name, config) in configs {
        let classifier = Classifier::builder()
            .with_runtime_config(config)
            .with_model_file(&model_path)
            .unwrap()
            .build()
            .unwrap();

        group.bench_function(format!("classify_{}", name), |b| b.iter(|| {
            classifier.classify(black_box(&features)).unwrap()
        }));
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_features,
    bench_prediction
);
criterion_main!(benches);
