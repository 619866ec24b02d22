use criterion::{Criterion, criterion_group, criterion_main};
use phylograph::layout::{Projection, layout};
use phylograph::newick::{NewickOptions, parse_str, to_newick};
use phylograph::session::{TreeProps, TreeSession};
use phylograph::{indexer, parse_newick_str};
use std::hint::black_box;

const TREE_SIZES: &[(&str, usize)] = &[("caterpillar-1k", 1_000), ("caterpillar-10k", 10_000)];

/// Newick string of a caterpillar with `num_leaves` leaves, the deepest
/// possible tree of that size.
fn caterpillar(num_leaves: usize) -> String {
    let mut newick = String::with_capacity(num_leaves * 16);
    for _ in 1..num_leaves {
        newick.push('(');
    }
    newick.push_str("L0:1");
    for leaf in 1..num_leaves {
        newick.push_str(&format!(",L{leaf}:1):0.5"));
    }
    newick.push(';');
    newick
}

fn parsing(c: &mut Criterion) {
    for &(name, size) in TREE_SIZES {
        let newick = caterpillar(size);
        c.bench_function(&format!("parse/{name}"), |b| {
            b.iter(|| parse_str(black_box(&newick)).unwrap());
        });
        c.bench_function(&format!("index/{name}"), |b| {
            b.iter_batched(
                || parse_str(&newick).unwrap(),
                indexer::index,
                criterion::BatchSize::SmallInput,
            );
        });
        let tree = parse_newick_str(&newick).unwrap();
        c.bench_function(&format!("write/{name}"), |b| {
            b.iter(|| to_newick(black_box(&tree), &NewickOptions::default()));
        });
    }
}

fn layouts(c: &mut Criterion) {
    let tree = parse_newick_str(caterpillar(10_000)).unwrap();
    for projection in Projection::ALL {
        c.bench_function(&format!("layout/{projection}"), |b| {
            b.iter_batched(
                || tree.clone(),
                |mut tree| layout(&mut tree, projection, false),
                criterion::BatchSize::LargeInput,
            );
        });
    }
}

fn session(c: &mut Criterion) {
    let newick = caterpillar(10_000);
    c.bench_function("session/rezoom", |b| {
        let mut session = TreeSession::new(newick.as_str(), TreeProps::default());
        let mut zoom = 0.0;
        b.iter(|| {
            zoom += 0.1;
            session.update_props(|props| props.with_branch_zoom(zoom));
            session.graph_with_styles().unwrap()
        });
    });
}

criterion_group!(regression, parsing, layouts);
criterion_group! {
    name = reporting;
    config = Criterion::default().sample_size(10);
    targets = session
}
criterion_main!(regression, reporting);
