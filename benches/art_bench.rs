use std::collections::HashSet;
use std::net::Ipv4Addr;

use criterion::{
    criterion_group, criterion_main, BenchmarkId, Criterion, Throughput,
};
use inetnum::addr::Prefix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use art_store::{ArtTable, IPv4, PrefixAs};

const ROUTES_NUM: usize = 10_000;

fn generate_routes(num: usize) -> Vec<(Prefix, PrefixAs)> {
    let mut rng = StdRng::seed_from_u64(1);
    let mut seen = HashSet::new();
    let mut routes = Vec::with_capacity(num);
    while routes.len() < num {
        // Weighted towards the prefix lengths seen in real tables.
        let len = [8u8, 16, 16, 20, 22, 24, 24, 24, 28, 32]
            [rng.gen_range(0..10)];
        let net = rng.gen::<u32>() & (!0u32 << (32 - len));
        if seen.insert((net, len)) {
            let prefix = Prefix::new(Ipv4Addr::from(net).into(), len)
                .expect("generated prefix is valid");
            routes.push((prefix, PrefixAs(rng.gen_range(1..65536))));
        }
    }
    routes
}

fn create_table(
    strides: &[u8],
    routes: &[(Prefix, PrefixAs)],
) -> ArtTable<IPv4, PrefixAs> {
    let mut table = ArtTable::<IPv4, PrefixAs>::new(strides.to_vec())
        .expect("valid stride schedule");
    for (prefix, asn) in routes {
        table.insert(prefix, *asn);
    }
    table
}

fn bench(c: &mut Criterion) {
    let stride_sets =
        [vec![8, 8, 8, 8], vec![16, 8, 8], vec![16, 16], vec![8, 8, 16]];
    let routes = generate_routes(ROUTES_NUM);

    let mut group = c.benchmark_group("table insertion");
    for strides in &stride_sets {
        group.throughput(Throughput::Elements(ROUTES_NUM as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{:?}", strides)),
            strides,
            |b, strides| b.iter(|| create_table(strides, &routes)),
        );
    }
    group.finish();

    let mut group = c.benchmark_group("table search");
    for strides in &stride_sets {
        let table = create_table(strides, &routes);
        group.throughput(Throughput::Elements(ROUTES_NUM as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{:?}", strides)),
            &table,
            |b, table| {
                b.iter(|| {
                    let mut found = 0_usize;
                    for (prefix, _) in &routes {
                        if table.lookup(prefix.addr()).is_some() {
                            found += 1;
                        }
                    }
                    found
                })
            },
        );
    }
    group.finish();

    let mut group = c.benchmark_group("insert-delete cycle");
    for strides in &stride_sets {
        let mut table = create_table(strides, &routes);
        let extra = Prefix::new(Ipv4Addr::new(100, 64, 12, 0).into(), 22)
            .expect("valid prefix");
        // In case the generator happened to produce this prefix.
        let _ = table.delete(&extra);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{:?}", strides)),
            strides,
            |b, _| {
                b.iter(|| {
                    assert!(table.insert(&extra, PrefixAs(64512)));
                    assert!(table.delete(&extra).is_some());
                })
            },
        );
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(20);
    targets = bench
}
criterion_main!(benches);
