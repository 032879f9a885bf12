//! Directory aggregation: propagation, sibling isolation, determinism.

use crate::common::{load_environment, project, write_manifest};
use ipub::store::ContentStore;
use std::path::Path;

const MANIFEST: &str = r#"{
    "sources": {
        "value": { "type": "static", "product_id": "@@VALUE@@" },
        "site/articles/deep/page.html": {
            "type": "replace",
            "replace": { "<<V>>": "value" }
        }
    },
    "targets": ["site"]
}"#;

fn site_files() -> Vec<(&'static str, &'static [u8])> {
    vec![
        ("site/articles/deep/page.html", b"value is <<V>>"),
        ("site/articles/other.txt", b"static sibling"),
        ("site/assets/logo.svg", b"<svg/>"),
    ]
}

async fn build_site(product_id: &str) -> (Vec<ipub::store::ProductId>, usize) {
    let dir = project(&site_files());
    write_manifest(dir.path(), &MANIFEST.replace("@@VALUE@@", product_id));
    let mut env = load_environment(dir.path());
    env.build().await.unwrap();

    let ids = vec![
        env.resolve(Path::new("site")).await.unwrap(),
        env.resolve(Path::new("site/articles")).await.unwrap(),
        env.resolve(Path::new("site/articles/deep")).await.unwrap(),
        env.resolve(Path::new("site/assets")).await.unwrap(),
    ];
    let get_calls = env.store().get_calls();
    (ids, get_calls)
}

#[tokio::test]
async fn nested_change_propagates_to_every_ancestor() {
    let (first, _) = build_site("QmFirst").await;
    let (second, _) = build_site("QmSecond").await;

    // Every ancestor of the templated file changes
    assert_ne!(first[0], second[0], "site root must change");
    assert_ne!(first[1], second[1], "articles must change");
    assert_ne!(first[2], second[2], "deep must change");

    // The sibling subtree is untouched
    assert_eq!(first[3], second[3], "assets must not change");
}

#[tokio::test]
async fn identical_trees_produce_identical_aggregates() {
    let (first, _) = build_site("QmSame").await;
    let (second, _) = build_site("QmSame").await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn aggregation_retrieves_each_child_exactly_once() {
    let (_, get_calls) = build_site("QmX").await;
    // site(2 children) + articles(2) + deep(1) + assets(1) staged entries
    assert_eq!(get_calls, 6);
}

#[tokio::test]
async fn empty_directory_aggregates() {
    let dir = project(&[]);
    std::fs::create_dir(dir.path().join("empty")).unwrap();
    write_manifest(dir.path(), r#"{ "sources": {}, "targets": ["empty"] }"#);

    let mut env = load_environment(dir.path());
    let result = env.build().await.unwrap();
    assert!(env.store().contains(&result["empty"]));
    // Only the staged (empty) tree is submitted
    assert_eq!(env.store().add_path_calls(), 1);
    assert_eq!(env.store().get_calls(), 0);
}

#[tokio::test]
async fn directory_children_keep_their_names_in_the_aggregate() {
    let dir = project(&[("d/a.txt", b"A"), ("d/b.txt", b"B")]);
    write_manifest(dir.path(), r#"{ "sources": {}, "targets": ["d"] }"#);

    let mut env = load_environment(dir.path());
    let result = env.build().await.unwrap();

    // Materialize the aggregate and check the layout survived
    let out = tempfile::tempdir().unwrap();
    let dest = out.path().join("restored");
    env.store().get(&result["d"], &dest).await.unwrap();
    assert_eq!(std::fs::read(dest.join("a.txt")).unwrap(), b"A");
    assert_eq!(std::fs::read(dest.join("b.txt")).unwrap(), b"B");
}
