use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use bison::{to_document, to_vec, Document, ObjectId, Value};
use serde::Serialize;

#[derive(Serialize, Clone)]
struct User {
    id: u32,
    name: String,
    email: String,
    active: bool,
}

#[derive(Serialize, Clone)]
struct Metadata {
    created: String,
    updated: String,
    version: u32,
}

#[derive(Serialize, Clone)]
struct NestedData {
    id: u32,
    metadata: Metadata,
    tags: Vec<String>,
}

fn sample_user() -> User {
    User {
        id: 123,
        name: "Alice".to_string(),
        email: "alice@example.com".to_string(),
        active: true,
    }
}

fn benchmark_encode_flat(c: &mut Criterion) {
    let doc = to_document(&sample_user()).unwrap();

    c.bench_function("encode_flat_document", |b| b.iter(|| to_vec(black_box(&doc))));
}

fn benchmark_encode_nested(c: &mut Criterion) {
    let data = NestedData {
        id: 1,
        metadata: Metadata {
            created: "2024-01-01".to_string(),
            updated: "2024-01-02".to_string(),
            version: 3,
        },
        tags: vec!["rust".to_string(), "bson".to_string(), "encoding".to_string()],
    };
    let doc = to_document(&data).unwrap();

    c.bench_function("encode_nested_document", |b| {
        b.iter(|| to_vec(black_box(&doc)))
    });
}

fn benchmark_encode_arrays(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_array");

    for size in [10, 100, 1000].iter() {
        let mut doc = Document::new();
        let values: Vec<Value> = (0..*size).map(|i| Value::Int64(i as i64)).collect();
        doc.insert("values", values).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), &doc, |b, doc| {
            b.iter(|| to_vec(black_box(doc)))
        });
    }
    group.finish();
}

fn benchmark_copy_on_write(c: &mut Criterion) {
    let mut doc = Document::new();
    for i in 0..100 {
        doc.insert(format!("field{}", i), i as i32).unwrap();
    }

    c.bench_function("clone_shared", |b| b.iter(|| black_box(&doc).clone()));
    c.bench_function("clone_then_write", |b| {
        b.iter(|| {
            let mut copy = black_box(&doc).clone();
            copy.insert("field0", -1i32).unwrap();
            copy
        })
    });
}

fn benchmark_serialize_struct(c: &mut Criterion) {
    let user = sample_user();

    c.bench_function("to_document_struct", |b| {
        b.iter(|| to_document(black_box(&user)))
    });
}

fn benchmark_object_id(c: &mut Criterion) {
    c.bench_function("object_id_new", |b| b.iter(ObjectId::new));
}

criterion_group!(
    benches,
    benchmark_encode_flat,
    benchmark_encode_nested,
    benchmark_encode_arrays,
    benchmark_copy_on_write,
    benchmark_serialize_struct,
    benchmark_object_id
);
criterion_main!(benches);
