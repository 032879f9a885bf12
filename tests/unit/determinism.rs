//! Resolver determinism: identical graphs produce identical identifiers and
//! identical store traffic, independent of environment instance.

use crate::common::{load_environment, project, write_manifest};
use std::path::Path;

const MANIFEST: &str = r#"{
    "sources": {
        "value": { "type": "static", "product_id": "Qm42" },
        "index": { "type": "replace", "replace": { "@V@": "value", "@D@": "assets" } }
    },
    "targets": ["index"]
}"#;

fn files() -> Vec<(&'static str, &'static [u8])> {
    vec![
        ("index", b"v=@V@ d=@D@"),
        ("assets/one.txt", b"one"),
        ("assets/two.txt", b"two"),
    ]
}

#[tokio::test]
async fn fresh_environments_agree_on_identifiers() {
    let dir_a = project(&files());
    write_manifest(dir_a.path(), MANIFEST);
    let dir_b = project(&files());
    write_manifest(dir_b.path(), MANIFEST);

    let mut env_a = load_environment(dir_a.path());
    let mut env_b = load_environment(dir_b.path());

    let result_a = env_a.build().await.unwrap();
    let result_b = env_b.build().await.unwrap();

    assert_eq!(result_a, result_b);
    assert_eq!(env_a.store().add_data_calls(), env_b.store().add_data_calls());
    assert_eq!(env_a.store().add_path_calls(), env_b.store().add_path_calls());
}

#[tokio::test]
async fn rebuilding_with_shared_cache_adds_no_store_calls() {
    let dir = project(&files());
    write_manifest(dir.path(), MANIFEST);
    let mut env = load_environment(dir.path());

    let first = env.build().await.unwrap();
    let data_calls = env.store().add_data_calls();
    let path_calls = env.store().add_path_calls();

    // Same environment, same targets: everything is already memoized.
    let second = env.build().await.unwrap();
    assert_eq!(first, second);
    assert_eq!(env.store().add_data_calls(), data_calls);
    assert_eq!(env.store().add_path_calls(), path_calls);
}

#[tokio::test]
async fn distinct_nodes_reach_the_store_once_each() {
    let dir = project(&files());
    write_manifest(dir.path(), MANIFEST);
    let mut env = load_environment(dir.path());
    env.build().await.unwrap();

    // index rendered once via add_data; the aggregate directory submits its
    // two children plus the staged tree via add_path.
    assert_eq!(env.store().add_data_calls(), 1);
    assert_eq!(env.store().add_path_calls(), 3);

    // Resolving a node already reached during the build is a cache hit.
    let before = env.store().add_path_calls();
    env.resolve(Path::new("assets/one.txt")).await.unwrap();
    assert_eq!(env.store().add_path_calls(), before);
}
