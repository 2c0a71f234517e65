use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use trackvec::TrackVec;

fn bench_push_back(c: &mut Criterion) {
    let mut group = c.benchmark_group("push_back");

    for size in [100, 1000, 10000].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(
            BenchmarkId::new("no_cursors", size),
            size,
            |b, &size| {
                b.iter(|| {
                    let mut v = TrackVec::new();
                    for i in 0..size {
                        v.push_back(black_box(i)).unwrap();
                    }
                    black_box(v.len())
                });
            },
        );
        group.bench_with_input(
            BenchmarkId::new("four_live_cursors", size),
            size,
            |b, &size| {
                b.iter(|| {
                    let mut v = TrackVec::from_vec(vec![0usize]);
                    let _cursors: Vec<_> = (0..4).map(|_| v.begin()).collect();
                    for i in 0..size {
                        v.push_back(black_box(i)).unwrap();
                    }
                    black_box(v.len())
                });
            },
        );
        group.bench_with_input(
            BenchmarkId::new("spilled_registry", size),
            size,
            |b, &size| {
                b.iter(|| {
                    let mut v = TrackVec::from_vec(vec![0usize]);
                    let _cursors: Vec<_> = (0..16).map(|_| v.begin()).collect();
                    for i in 0..size {
                        v.push_back(black_box(i)).unwrap();
                    }
                    black_box(v.len())
                });
            },
        );
    }
    group.finish();
}

fn bench_front_erase(c: &mut Criterion) {
    let mut group = c.benchmark_group("front_erase");

    for size in [100, 1000].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(
            BenchmarkId::new("with_tracking_cursor", size),
            size,
            |b, &size| {
                b.iter(|| {
                    let mut v: TrackVec<usize> = (0..size).collect();
                    let tail = v.cursor_at(size - 1).unwrap();
                    while v.len() > 1 {
                        v.remove(0).unwrap();
                    }
                    black_box(tail.index())
                });
            },
        );
    }
    group.finish();
}

fn bench_indexed_access(c: &mut Criterion) {
    let mut group = c.benchmark_group("indexed_access");

    for size in [100, 1000].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("checked_get", size), size, |b, &size| {
            let v: TrackVec<usize> = (0..size).collect();
            b.iter(|| {
                for i in 0..size {
                    black_box(v.get(i).unwrap());
                }
            });
        });
        group.bench_with_input(
            BenchmarkId::new("locked_slice", size),
            size,
            |b, &size| {
                let v: TrackVec<usize> = (0..size).collect();
                b.iter(|| {
                    let guard = v.lock_structure();
                    guard.with_slice(|items| {
                        let mut sum = 0usize;
                        for item in items {
                            sum += *item;
                        }
                        black_box(sum)
                    })
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_push_back, bench_front_erase, bench_indexed_access);
criterion_main!(benches);
