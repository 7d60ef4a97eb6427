use criterion::{Criterion, black_box, criterion_group, criterion_main};
use lockstep_fs::{FileSystem, LocalFileSystem, NormalizedPath};
use std::fs;
use tempfile::tempdir;

fn resolve_reference_benchmark(c: &mut Criterion) {
    let manifest = NormalizedPath::new("/repo/src/App/App.csproj");
    c.bench_function("path::resolve_reference", |b| {
        b.iter(|| manifest.resolve_reference(black_box("..\\..\\lib\\Core\\Core.csproj")))
    });
}

fn list_files_benchmark(c: &mut Criterion) {
    c.bench_function("filesystem::list_files_recursively", |b| {
        let dir = tempdir().unwrap();
        for i in 0..50 {
            let project = dir.path().join(format!("src/P{i}"));
            fs::create_dir_all(&project).unwrap();
            fs::write(project.join(format!("P{i}.csproj")), "<Project />").unwrap();
            fs::write(project.join("Program.cs"), "class P {}").unwrap();
        }
        let root = NormalizedPath::new(dir.path());
        let extensions = vec!["csproj".to_string()];

        b.iter(|| {
            LocalFileSystem
                .list_files_recursively(black_box(&root), &extensions)
                .unwrap()
        })
    });
}

criterion_group!(benches, resolve_reference_benchmark, list_files_benchmark);
criterion_main!(benches);
