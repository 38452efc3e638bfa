use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dupewalk::duplicates::scan;
use dupewalk::scanner::{hash_file, ScanConfig};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

// Helper to create a test directory with a specific structure
fn setup_test_dir(depth: usize, files_per_dir: usize) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    create_dir_recursive(temp_dir.path().to_path_buf(), depth, files_per_dir);
    temp_dir
}

fn create_dir_recursive(path: PathBuf, depth: usize, files_per_dir: usize) {
    if depth == 0 {
        return;
    }

    if !path.exists() {
        fs::create_dir_all(&path).expect("Failed to create dir");
    }

    for i in 0..files_per_dir {
        let file_path = path.join(format!("file_{}.txt", i));
        fs::write(file_path, format!("content at depth {depth} index {i}"))
            .expect("Failed to write file");
    }

    if depth > 1 {
        for i in 0..2 {
            // 2 subdirectories per level
            let sub_dir = path.join(format!("dir_{}", i));
            create_dir_recursive(sub_dir, depth - 1, files_per_dir);
        }
    }
}

fn bench_scan(c: &mut Criterion) {
    let temp_dir = setup_test_dir(4, 10); // depth 4, 10 files per dir -> ~150 files

    let mut group = c.benchmark_group("scan_150_files");
    for budget in [1, 4, 16] {
        group.bench_function(format!("budget_{budget}"), |b| {
            let config = ScanConfig::default().with_concurrency(budget);
            b.iter(|| {
                let report = scan(temp_dir.path(), &config).unwrap();
                black_box(report);
            })
        });
    }
    group.finish();
}

fn bench_hasher(c: &mut Criterion) {
    let mut group = c.benchmark_group("hasher");

    for size_kb in [1usize, 1024] {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("blob.bin");
        fs::write(&path, vec![0x5A; size_kb * 1024]).unwrap();

        group.bench_function(format!("hash_{size_kb}kb"), |b| {
            b.iter(|| {
                let pair = hash_file(&path).unwrap();
                black_box(pair);
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_scan, bench_hasher);
criterion_main!(benches);
