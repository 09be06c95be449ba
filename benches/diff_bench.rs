//! Tree comparison benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fstree_core::{collect_different, diff_trees, tree_copy, Rank};
use rand::{Rng, SeedableRng};
use std::convert::Infallible;
use std::fs;
use tempfile::TempDir;

/// Generate a tree of `dirs` directories holding `files_per_dir` random files
fn generate_tree(dir: &TempDir, dirs: usize, files_per_dir: usize, file_size: usize) {
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);

    for d in 0..dirs {
        let sub = dir.path().join(format!("dir_{:03}", d));
        fs::create_dir(&sub).unwrap();

        for f in 0..files_per_dir {
            let mut data = vec![0u8; rng.gen_range(file_size / 2..=file_size)];
            rng.fill(&mut data[..]);
            fs::write(sub.join(format!("file_{:03}.dat", f)), data).unwrap();
        }
    }
}

/// Benchmark the in-memory merge on sorted name lists
fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");
    let mut rng = rand::rngs::StdRng::seed_from_u64(7);

    for size in [1_000usize, 10_000, 100_000] {
        let mut left: Vec<u64> = (0..size).map(|_| rng.gen_range(0..size as u64 * 2)).collect();
        let mut right: Vec<u64> = (0..size).map(|_| rng.gen_range(0..size as u64 * 2)).collect();
        left.sort_unstable();
        left.dedup();
        right.sort_unstable();
        right.dedup();

        group.bench_with_input(BenchmarkId::new("collect_different", size), &size, |b, _| {
            b.iter(|| {
                let result = collect_different(&left, &right, |x, y| Ok::<_, Infallible>(x < y));
                black_box(result)
            })
        });
    }

    group.finish();
}

/// Benchmark walking and comparing a tree with its copy
fn bench_diff_trees(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff_trees");
    group.sample_size(10);

    let source = TempDir::new().unwrap();
    generate_tree(&source, 20, 50, 4096);
    let copy = TempDir::new().unwrap();
    tree_copy(source.path(), copy.path()).unwrap();

    let chains: [(&str, &[Rank]); 3] = [
        ("metadata", &[Rank::Name, Rank::Dir, Rank::Size]),
        ("with_time", &[Rank::Name, Rank::Dir, Rank::Size, Rank::Perm, Rank::Time]),
        ("full", &Rank::ALL),
    ];

    for (name, ranks) in chains {
        group.bench_function(name, |b| {
            b.iter(|| black_box(diff_trees(source.path(), copy.path(), ranks).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark copying a tree with attribute restoration
fn bench_tree_copy(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_copy");
    group.sample_size(10);

    let source = TempDir::new().unwrap();
    generate_tree(&source, 10, 100, 1024);

    group.bench_function("copy_1000_small_files", |b| {
        b.iter_with_setup(
            || TempDir::new().unwrap(),
            |target| {
                tree_copy(source.path(), target.path()).unwrap();
                black_box(target)
            },
        )
    });

    group.finish();
}

criterion_group!(benches, bench_merge, bench_diff_trees, bench_tree_copy);
criterion_main!(benches);
