use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tclish::list::{self, format, List};
use tclish::options::{OptionDef, OptionSet};

fn make_elements(repeats: usize) -> Vec<String> {
    let chunk = ["plain", "two words", "", "{nested {braces}}", "tail\\", "$var;[cmd]", "#hash"];
    chunk.iter().cycle().take(repeats).map(|s| (*s).to_owned()).collect()
}

fn bench_list(c: &mut Criterion) {
    let small = make_elements(100);
    let large = make_elements(10_000);
    let small_text = format::join(&small, " ", None);
    let large_text = format::join(&large, " ", None);

    let mut g = c.benchmark_group("list_codec");

    g.bench_function("split_small", |b| b.iter(|| list::split(black_box(&small_text))));
    g.bench_function("split_large", |b| b.iter(|| list::split(black_box(&large_text))));
    g.bench_function("join_small", |b| b.iter(|| format::join(black_box(&small), " ", None)));
    g.bench_function("join_large", |b| b.iter(|| format::join(black_box(&large), " ", None)));

    // Cached canonical form: only the first call formats.
    let list = List::from_elements(large.iter().map(String::as_str));
    g.bench_function("canonical_cached", |b| b.iter(|| black_box(&list).to_canonical().len()));

    g.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let mut set = OptionSet::new();
    for name in ["-force", "-format", "-nocase", "-regexp", "-reverse", "-separator", "-verbose", "-verboseLevel"] {
        set.register(OptionDef::new(name)).ok();
    }

    let mut g = c.benchmark_group("option_resolve");
    g.bench_function("exact", |b| b.iter(|| set.resolve(black_box("-verbose"), true, false).is_ok()));
    g.bench_function("prefix", |b| b.iter(|| set.resolve(black_box("-sep"), true, false).is_ok()));
    g.bench_function("prefix_nocase", |b| b.iter(|| set.resolve(black_box("-SEP"), true, true).is_ok()));
    g.finish();
}

criterion_group!(benches, bench_list, bench_resolve);
criterion_main!(benches);
