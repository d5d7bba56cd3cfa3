use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use pg_replayer::parse_statements;

fn rec(tag: u8, payload: &[u8]) -> Vec<u8> {
    let mut out = vec![tag];
    out.extend_from_slice(&(payload.len() as u32 + 4).to_be_bytes());
    out.extend_from_slice(payload);
    out.push(0x19);
    out
}

fn build_capture(units: usize) -> Vec<u8> {
    let mut data = Vec::new();
    for i in 0..units {
        data.extend(rec(b'P', b"SELECT * FROM users WHERE id = $1 AND name = $2"));
        data.extend(rec(b'B', i.to_string().as_bytes()));
        data.extend(rec(b'B', b"alice"));
        data.extend(rec(b'E', b""));
        data.extend(rec(b'Q', b"SELECT now()"));
    }
    data
}

fn bench_parse_statements(c: &mut Criterion) {
    let data = build_capture(10_000);

    let mut group = c.benchmark_group("parser");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("parse_statements_10k", |b| {
        b.iter(|| parse_statements(black_box(&data), 0x19).len())
    });
    group.finish();
}

criterion_group!(benches, bench_parse_statements);
criterion_main!(benches);
