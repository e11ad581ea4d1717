use criterion::{black_box, criterion_group, criterion_main, Criterion};

use dn_core::{BundledDefinition, DomainName, RuleList};

const HOSTS: &[&str] = &[
    "www.google.com",
    "foo.bar.example.co.uk",
    "a.b.c.kawasaki.jp",
    "www.city.kobe.jp",
    "cdn.static.example.com.au",
    "localhost",
];

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_bundled", |b| {
        b.iter(|| RuleList::parse(black_box(BundledDefinition::TEXT)))
    });
}

fn bench_find(c: &mut Criterion) {
    let list = match RuleList::parse(BundledDefinition::TEXT) {
        Ok(list) => list,
        Err(e) => panic!("bundled list failed to parse: {e}"),
    };
    let names: Vec<Vec<&str>> = HOSTS.iter().map(|host| host.split('.').collect()).collect();

    c.bench_function("find", |b| {
        b.iter(|| {
            for name in &names {
                black_box(list.find(black_box(name)));
            }
        })
    });

    let domains: Vec<DomainName> = HOSTS.iter().filter_map(|host| DomainName::parse(host).ok()).collect();
    c.bench_function("split", |b| {
        b.iter(|| {
            for domain in &domains {
                let _ = black_box(domain.split(&list));
            }
        })
    });
}

criterion_group!(benches, bench_parse, bench_find);
criterion_main!(benches);
