use bbweave_engine::{BbcodeParser, TagRegistry};
use criterion::{Criterion, criterion_group, criterion_main};
mod common;

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    group.sample_size(20);

    let registry = TagRegistry::with_defaults();
    let parser = BbcodeParser::new(&registry);

    let post = common::generate_post(100);
    group.bench_function("well_formed", |b| {
        b.iter(|| {
            let tree = parser.parse(std::hint::black_box(&post), false).unwrap();
            std::hint::black_box(tree);
        });
    });

    let misnested = common::generate_misnested(100);
    group.bench_function("misnested", |b| {
        b.iter(|| {
            let tree = parser.parse(std::hint::black_box(&misnested), false).unwrap();
            std::hint::black_box(tree);
        });
    });

    let deep = common::generate_deep(200);
    group.bench_function("deep", |b| {
        b.iter(|| {
            let tree = parser.parse(std::hint::black_box(&deep), false).unwrap();
            std::hint::black_box(tree);
        });
    });

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    group.sample_size(20);

    let registry = TagRegistry::with_defaults();
    let parser = BbcodeParser::new(&registry);
    let tree = parser.parse(&common::generate_post(100), false).unwrap();

    group.bench_function("html", |b| {
        b.iter(|| std::hint::black_box(parser.render_html(std::hint::black_box(&tree))));
    });
    group.bench_function("bbcode", |b| {
        b.iter(|| std::hint::black_box(parser.render_bbcode(std::hint::black_box(&tree))));
    });

    group.finish();
}

criterion_group!(benches, bench_parse, bench_render);
criterion_main!(benches);
