//! Graph discovery over real directory trees.

use lockstep_fs::{LocalFileSystem, NormalizedPath};
use lockstep_graph::{Error, GraphBuilder, ImpactResolver};
use lockstep_test_utils::{TestTree, manifest_xml};
use pretty_assertions::assert_eq;

fn extensions() -> Vec<String> {
    vec!["csproj".into(), "vbproj".into(), "fsproj".into()]
}

#[test]
fn test_build_discovers_all_manifests() {
    let tree = TestTree::new();
    tree.manifest("src/App/App.csproj", &["..\\Lib\\Lib.csproj"]);
    tree.manifest("src/Lib/Lib.fsproj", &[]);
    tree.manifest("tools/Gen/Gen.vbproj", &["../../src/Lib/Lib.fsproj"]);
    tree.write("src/App/Program.cs", "class Program {}");

    let exts = extensions();
    let graph = GraphBuilder::new(&LocalFileSystem, &exts)
        .build(&tree.root_path())
        .unwrap();

    assert_eq!(graph.node_count(), 3);
    assert_eq!(
        graph.references_of(&tree.path("src/App/App.csproj")),
        &[tree.path("src/Lib/Lib.csproj")]
    );
    assert_eq!(
        graph.references_of(&tree.path("tools/Gen/Gen.vbproj")),
        &[tree.path("src/Lib/Lib.fsproj")]
    );
}

#[test]
fn test_zero_reference_manifest_is_a_node_with_no_edges() {
    let tree = TestTree::new();
    tree.manifest("Solo/Solo.csproj", &[]);

    let exts = extensions();
    let graph = GraphBuilder::new(&LocalFileSystem, &exts)
        .build(&tree.root_path())
        .unwrap();

    let solo = tree.path("Solo/Solo.csproj");
    assert!(graph.contains(&solo));
    assert!(graph.references_of(&solo).is_empty());

    let impact = ImpactResolver::new(&graph).resolve(&solo);
    assert_eq!(impact.manifests(), &[solo]);
}

#[test]
fn test_reference_outside_root_is_kept_as_leaf() {
    let tree = TestTree::new();
    tree.manifest("repo/App/App.csproj", &["../../shared/Common.csproj"]);
    tree.manifest("shared/Common.csproj", &[]);

    let exts = extensions();
    let root = tree.path("repo");
    let graph = GraphBuilder::new(&LocalFileSystem, &exts).build(&root).unwrap();

    let common = tree.path("shared/Common.csproj");
    assert_eq!(graph.node_count(), 1);
    assert!(!graph.contains(&common));
    assert_eq!(graph.references_of(&tree.path("repo/App/App.csproj")), &[common.clone()]);

    let impact = ImpactResolver::new(&graph).resolve(&common);
    assert_eq!(impact.len(), 2);
}

#[test]
fn test_malformed_manifest_aborts_build() {
    let tree = TestTree::new();
    tree.manifest("Good/Good.csproj", &[]);
    tree.write("Bad/Bad.csproj", "<Project><ItemGroup></Project>");

    let exts = extensions();
    let err = GraphBuilder::new(&LocalFileSystem, &exts)
        .build(&tree.root_path())
        .unwrap_err();

    match err {
        Error::Parse { path, .. } => assert!(path.ends_with("Bad/Bad.csproj")),
        other => panic!("expected Parse error, got {other:?}"),
    }
}

#[test]
fn test_overlay_replaces_disk_content() {
    let tree = TestTree::new();
    tree.manifest("App/App.csproj", &[]);
    tree.manifest("Lib/Lib.csproj", &[]);

    let exts = extensions();
    let app = tree.path("App/App.csproj");
    let graph = GraphBuilder::new(&LocalFileSystem, &exts)
        .with_overlay(app.clone(), manifest_xml(&["../Lib/Lib.csproj"]))
        .build(&tree.root_path())
        .unwrap();

    assert_eq!(graph.references_of(&app), &[tree.path("Lib/Lib.csproj")]);
    // Disk is untouched
    tree.assert_file_content("App/App.csproj", &manifest_xml(&[]));
}

#[test]
fn test_overlay_for_new_manifest_is_discovered() {
    let tree = TestTree::new();
    tree.manifest("Lib/Lib.csproj", &[]);

    let exts = extensions();
    let added = tree.path("New/New.csproj");
    let graph = GraphBuilder::new(&LocalFileSystem, &exts)
        .with_overlay(added.clone(), manifest_xml(&["../Lib/Lib.csproj"]))
        .build(&tree.root_path())
        .unwrap();

    assert!(graph.contains(&added));
    tree.assert_file_not_exists("New/New.csproj");
}

#[test]
fn test_overlay_outside_root_is_ignored() {
    let tree = TestTree::new();
    tree.manifest("repo/Lib/Lib.csproj", &[]);

    let exts = extensions();
    let graph = GraphBuilder::new(&LocalFileSystem, &exts)
        .with_overlay(tree.path("other/X.csproj"), manifest_xml(&[]))
        .build(&tree.path("repo"))
        .unwrap();

    assert_eq!(graph.node_count(), 1);
}

#[test]
fn test_root_with_trailing_slash() {
    let tree = TestTree::new();
    tree.manifest("A/A.csproj", &["../B/B.csproj"]);
    tree.manifest("B/B.csproj", &[]);

    let exts = extensions();
    let root = NormalizedPath::new(format!("{}/", tree.root_path()));
    let graph = GraphBuilder::new(&LocalFileSystem, &exts).build(&root).unwrap();

    assert!(graph.contains(&tree.path("A/A.csproj")));
    assert_eq!(graph.edge_count(), 1);
}
