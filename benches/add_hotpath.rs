use criterion::{black_box, criterion_group, criterion_main, Criterion};
use toposync::Timeline;

/// A wide, shallow synthetic DAG: one genesis event, then `width` chains of
/// `depth` events each, all hanging off the genesis.
fn build_forest(width: usize, depth: usize) -> Timeline {
	let mut t = Timeline::new();
	t.add("genesis", Vec::<String>::new()).unwrap();
	for branch in 0..width {
		let mut prev = "genesis".to_string();
		for level in 0..depth {
			let name = format!("b{branch}l{level}");
			t.add(name.clone(), vec![prev]).unwrap();
			prev = name;
		}
	}
	t
}

fn benchmark_add_genesis(c: &mut Criterion) {
	c.bench_function("Timeline add (genesis only)", |b| {
		b.iter(|| {
			let mut t = Timeline::new();
			t.add(black_box("X"), Vec::<String>::new()).unwrap();
		});
	});
}

fn benchmark_add_wide_forest(c: &mut Criterion) {
	c.bench_function("Timeline add (100x10 forest, appending a leaf)", |b| {
		b.iter_batched(
			|| build_forest(100, 10),
			|mut t| {
				t.add(black_box("extra"), vec!["genesis"]).unwrap();
			},
			criterion::BatchSize::SmallInput,
		);
	});
}

fn benchmark_build_wide_forest(c: &mut Criterion) {
	c.bench_function("Timeline build (100x10 forest from scratch)", |b| {
		b.iter(|| {
			black_box(build_forest(100, 10));
		});
	});
}

criterion_group!(benches, benchmark_add_genesis, benchmark_add_wide_forest, benchmark_build_wide_forest);
criterion_main!(benches);
