use zap::{black_box, zap_group, zap_main, BenchmarkId, Throughput, Zap};

fn fibonacci_slow(n: u64) -> u64 {
    match n {
        0 | 1 => 1,
        n => fibonacci_slow(n - 1) + fibonacci_slow(n - 2),
    }
}

fn fibonacci_fast(n: u64) -> u64 {
    let mut a = 0u64;
    let mut b = 1u64;
    let mut c: u64;

    if n == 0 {
        return 0;
    }

    for _ in 0..(n + 1) {
        c = a + b;
        a = b;
        b = c;
    }
    b
}

fn compare_fibonaccis(zap: &mut Zap) {
    let mut group = zap.benchmark_group("fibonacci");
    group.tag("cpu");
    group.bench_function("fib_recursive/20", |b| {
        b.iter(|| fibonacci_slow(black_box(20)))
    });
    group.bench_function("fib_iterative/20", |b| {
        b.iter(|| fibonacci_fast(black_box(20)))
    });
    group.finish();
}

fn bench_sorting(zap: &mut Zap) {
    let mut group = zap.benchmark_group("sorting");
    group.tag("cpu");
    group.sample_count(50);

    for &size in &[100usize, 1_000, 10_000] {
        let data: Vec<u32> = (0..size).map(|i| (i * 2_654_435_761) as u32).collect();
        group.bench_with_input(BenchmarkId::new("sort_unstable", size), &data, |b, data| {
            b.iter(|| {
                let mut copy = data.clone();
                copy.sort_unstable();
                copy
            })
        });
    }
    group.finish();
}

fn bench_memory(zap: &mut Zap) {
    const SIZE: usize = 64 * 1024;

    let src = vec![0xa5u8; SIZE];
    let mut group = zap.benchmark_group("memory");
    group.tag("memory");
    group.throughput(Throughput::Bytes(SIZE as u64));
    group.bench_function("copy/64kb", |b| b.iter(|| src.clone()));
    group.bench_function("sum/64kb", |b| {
        b.iter(|| src.iter().map(|&byte| byte as u64).sum::<u64>())
    });
    group.finish();
}

fn bench_string_building(zap: &mut Zap) {
    let mut group = zap.benchmark_group("strings");
    group.tag("memory");
    group.throughput(Throughput::Elements(1_000));
    group.bench_function("push_str/1000", |b| {
        b.iter(|| {
            let mut s = String::new();
            for _ in 0..1_000 {
                s.push_str("ab");
            }
            s
        })
    });
    group.finish();
}

zap_group!(
    benches,
    compare_fibonaccis,
    bench_sorting,
    bench_memory,
    bench_string_building
);
zap_main!(benches);
