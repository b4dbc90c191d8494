use std::iter::repeat_with;

use chcolumn::{create_column, Column, ColumnRef, Type, Value};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

const ROWS: usize = 65_536;

fn populated(ty: &Type) -> ColumnRef {
    let mut rng = fastrand::Rng::with_seed(42);
    let mut column = create_column(ty).unwrap();
    column.reserve(ROWS);
    for _ in 0..ROWS {
        let value = match ty {
            Type::UInt64 => Value::UInt64(rng.u64(..)),
            Type::String => {
                let len = rng.usize(..32);
                Value::from(repeat_with(|| rng.alphanumeric()).take(len).collect::<String>())
            }
            Type::LowCardinality(_) => Value::from(format!("key-{}", rng.u8(..64))),
            Type::Nullable(_) if rng.bool() => Value::Null,
            Type::Nullable(_) => Value::Float64(rng.f64()),
            _ => unreachable!("no generator for {ty}"),
        };
        column.append_value(value).unwrap();
    }
    column
}

fn save_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("column");
    group.throughput(Throughput::Elements(ROWS as u64));

    for name in [
        "UInt64",
        "String",
        "Nullable(Float64)",
        "LowCardinality(String)",
    ] {
        let ty: Type = name.parse().unwrap();
        let column = populated(&ty);
        let mut block = Vec::new();
        column.save(&mut block).unwrap();

        group.bench_with_input(BenchmarkId::new("save", name), &column, |b, column| {
            let mut buf = Vec::with_capacity(block.len());
            b.iter(|| {
                buf.clear();
                column.save(&mut buf).unwrap();
            });
        });

        group.bench_with_input(BenchmarkId::new("load", name), &block, |b, block| {
            let mut target = column.clone_empty();
            b.iter(|| {
                target.clear();
                target.load(&mut block.as_slice(), ROWS).unwrap();
            });
        });
    }
    group.finish();
}

criterion_group!(benches, save_load);
criterion_main!(benches);
