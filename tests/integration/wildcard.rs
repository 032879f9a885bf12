//! Wildcard expansion of source and target declarations.

use crate::common::{load_environment, project, write_manifest};

#[tokio::test]
async fn pattern_sources_and_targets_expand_to_concrete_files() {
    let dir = project(&[
        ("foo_index", b"my entry / your entry"),
        ("bar_index", b"just my entry"),
        ("untouched", b"not an index"),
    ]);
    write_manifest(
        dir.path(),
        r#"{
            "sources": {
                "entry": { "type": "static", "product_id": "QmEntry" },
                "*_index": {
                    "type": "replace",
                    "replace": { "my entry": "entry", "your entry": "entry" }
                }
            },
            "targets": ["*_index"]
        }"#,
    );

    let mut env = load_environment(dir.path());
    let result = env.build().await.unwrap();

    // Both concrete files reported under their relative-path keys, never
    // under the pattern string itself.
    let keys: Vec<&String> = result.keys().collect();
    assert_eq!(keys, ["bar_index", "foo_index"]);
    assert!(!result.contains_key("*_index"));

    assert_eq!(env.store().blob(&result["foo_index"]).unwrap(), b"QmEntry / QmEntry");
    assert_eq!(env.store().blob(&result["bar_index"]).unwrap(), b"just QmEntry");
}

#[tokio::test]
async fn nested_pattern_expansion() {
    let dir = project(&[
        ("pages/news/a.html", b"val: @V@"),
        ("pages/news/sub/b.html", b"val: @V@"),
        ("pages/news/notes.txt", b"val: @V@"),
    ]);
    write_manifest(
        dir.path(),
        r#"{
            "sources": {
                "v": { "type": "static", "product_id": "QmV" },
                "pages/**/*.html": { "type": "replace", "replace": { "@V@": "v" } }
            },
            "targets": ["pages/**/*.html"]
        }"#,
    );

    let mut env = load_environment(dir.path());
    let result = env.build().await.unwrap();

    let keys: Vec<&String> = result.keys().collect();
    assert_eq!(keys, ["pages/news/a.html", "pages/news/sub/b.html"]);
    assert_eq!(env.store().blob(&result["pages/news/a.html"]).unwrap(), b"val: QmV");
}

#[tokio::test]
async fn target_pattern_reaches_declared_logical_names() {
    let dir = project(&[]);
    write_manifest(
        dir.path(),
        r#"{
            "sources": {
                "prefix_a_sufix": { "type": "static", "product_id": "1" },
                "prefix_b_sufix": { "type": "static", "product_id": "2" },
                "other": { "type": "static", "product_id": "3" }
            },
            "targets": ["prefix_*"]
        }"#,
    );

    let mut env = load_environment(dir.path());
    let result = env.build().await.unwrap();
    let keys: Vec<&String> = result.keys().collect();
    assert_eq!(keys, ["prefix_a_sufix", "prefix_b_sufix"]);
}

#[tokio::test]
async fn shared_dependency_across_expanded_sources_is_resolved_once() {
    let dir = project(&[
        ("one_index", b"@E@"),
        ("two_index", b"@E@"),
        ("entry.txt", b"the entry"),
    ]);
    write_manifest(
        dir.path(),
        r#"{
            "sources": {
                "*_index": { "type": "replace", "replace": { "@E@": "entry.txt" } }
            },
            "targets": ["*_index"]
        }"#,
    );

    let mut env = load_environment(dir.path());
    env.build().await.unwrap();
    // entry.txt submitted once despite two referrers
    assert_eq!(env.store().add_path_calls(), 1);
    assert_eq!(env.store().add_data_calls(), 2);
}
