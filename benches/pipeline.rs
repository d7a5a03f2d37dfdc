//! Performance benchmarks for field pipelines
//!
//! Measures a full model validation pass and the cost of the first,
//! constructing run against memoized runs.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use formwork::prelude::*;
use indexmap::IndexMap;

fn signup_model() -> Model {
    let mut model = Model::new("signup");
    model
        .add("title", FieldKind::character())
        .set_required(true)
        .set_min_length(Some(3))
        .unwrap()
        .set_max_length(Some(50))
        .unwrap();
    model
        .add("age", FieldKind::integer())
        .set_min_value(Some(18))
        .unwrap()
        .set_max_value(Some(120))
        .unwrap();
    model.add("active", FieldKind::flag());
    model
        .add("code", FieldKind::Generic)
        .validators_mut()
        .set("Alnum", Params::new())
        .unwrap();
    model
}

fn signup_data() -> IndexMap<String, Value> {
    let mut data = IndexMap::new();
    data.insert("title".to_string(), Value::from("  A reasonable title  "));
    data.insert("age".to_string(), Value::from("42"));
    data.insert("active".to_string(), Value::from("1"));
    data.insert("code".to_string(), Value::from("abc123"));
    data
}

/// Benchmark validation with plugin construction included
fn bench_cold_validation(c: &mut Criterion) {
    let data = signup_data();
    c.bench_function("validate_cold", |b| {
        b.iter(|| {
            let mut model = signup_model();
            model.populate(&data);
            black_box(model.validate().unwrap())
        })
    });
}

/// Benchmark validation against already constructed plugins
fn bench_warm_validation(c: &mut Criterion) {
    let data = signup_data();
    let mut model = signup_model();
    model.populate(&data);
    model.validate().unwrap();

    c.bench_function("validate_warm", |b| {
        b.iter(|| {
            model.populate(&data);
            black_box(model.validate().unwrap())
        })
    });
}

/// Benchmark rendering every field
fn bench_render(c: &mut Criterion) {
    let mut model = signup_model();
    model.populate(&signup_data());

    c.bench_function("render_all", |b| b.iter(|| black_box(model.render_all().unwrap())));
}

criterion_group!(benches, bench_cold_validation, bench_warm_validation, bench_render);
criterion_main!(benches);
