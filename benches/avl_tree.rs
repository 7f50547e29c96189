use avl_collections::avl_tree::AvlSet;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::Rng;
use std::collections::BTreeSet;

const NUM_OF_OPERATIONS: usize = 1000;

fn keys() -> Vec<u32> {
    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
    (0..NUM_OF_OPERATIONS).map(|_| rng.next_u32()).collect()
}

fn bench_btreeset_insert(c: &mut Criterion) {
    let keys = keys();
    c.bench_function("bench btreeset insert", move |b| {
        b.iter(|| {
            let mut set = BTreeSet::new();
            for key in &keys {
                set.insert(*key);
            }
            set
        })
    });
}

fn bench_btreeset_get(c: &mut Criterion) {
    let keys = keys();
    let set = keys.iter().cloned().collect::<BTreeSet<u32>>();
    c.bench_function("bench btreeset get", move |b| {
        b.iter(|| {
            for key in &keys {
                black_box(set.contains(key));
            }
        })
    });
}

fn bench_avl_set_insert(c: &mut Criterion) {
    let keys = keys();
    c.bench_function("bench avl_set insert", move |b| {
        b.iter(|| {
            let mut set = AvlSet::new();
            for key in &keys {
                set.insert(*key);
            }
            set
        })
    });
}

fn bench_avl_set_insert_sorted(c: &mut Criterion) {
    c.bench_function("bench avl_set insert sorted", |b| {
        b.iter(|| (0..NUM_OF_OPERATIONS as u32).collect::<AvlSet<u32>>())
    });
}

fn bench_avl_set_search(c: &mut Criterion) {
    let keys = keys();
    let set = keys.iter().cloned().collect::<AvlSet<u32>>();
    c.bench_function("bench avl_set search", move |b| {
        b.iter(|| {
            for key in &keys {
                black_box(set.search(key).map(|node| node.balance()));
            }
        })
    });
}

fn bench_avl_set_remove(c: &mut Criterion) {
    let keys = keys();
    let set = keys.iter().cloned().collect::<AvlSet<u32>>();
    c.bench_function("bench avl_set remove", move |b| {
        b.iter(|| {
            let mut set = set.clone();
            for key in &keys {
                black_box(set.remove(key));
            }
        })
    });
}

criterion_group!(
    benches,
    bench_btreeset_get,
    bench_btreeset_insert,
    bench_avl_set_insert,
    bench_avl_set_insert_sorted,
    bench_avl_set_search,
    bench_avl_set_remove,
);
criterion_main!(benches);
