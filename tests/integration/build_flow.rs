//! End-to-end build flows: manifest in, identifier mapping out.

use crate::common::{load_environment, project, write_manifest};
use std::path::Path;

#[tokio::test]
async fn replace_source_publishes_rendered_bytes() {
    let dir = project(&[("index", b"I like cookies"), ("strawberries", b"strawberries")]);
    write_manifest(
        dir.path(),
        r#"{
            "sources": {
                "index": { "type": "replace", "replace": { "cookies": "strawberries" } }
            },
            "targets": ["index"]
        }"#,
    );

    let mut env = load_environment(dir.path());
    let result = env.build().await.unwrap();

    let berries_id = env.resolve(Path::new("strawberries")).await.unwrap();
    let rendered = env.store().blob(&result["index"]).unwrap();
    assert_eq!(rendered, [b"I like ".as_slice(), berries_id.as_bytes()].concat());
}

#[tokio::test]
async fn shared_template_renders_each_node_against_its_own_bytes() {
    // One regexp template re-exported by several nodes, with references
    // crossing into a subdirectory (the original motivating layout).
    let dir = project(&[
        ("two_values", b"a=//a value//, b=//a value//"),
        ("index", b"dir: //dir/in_dir_file//"),
        ("dir/in_dir_file", b"values at //two_values//"),
    ]);
    write_manifest(
        dir.path(),
        r#"{
            "sources": {
                "slash_slash": { "type": "regexp", "pattern": "//(([^/]|/[^/])*)//" },
                "a value": { "type": "static", "product_id": "42" },
                "two_values": { "type": "slash_slash" },
                "index": { "type": "slash_slash" },
                "dir/in_dir_file": { "type": "slash_slash" }
            },
            "targets": ["index"]
        }"#,
    );

    let mut env = load_environment(dir.path());
    let result = env.build().await.unwrap();

    // two_values rendered with the static id, twice
    let two_values_id = env.resolve(Path::new("two_values")).await.unwrap();
    assert_eq!(env.store().blob(&two_values_id).unwrap(), b"a=42, b=42");

    // in_dir_file embeds two_values' identifier
    let in_dir_id = env.resolve(Path::new("dir/in_dir_file")).await.unwrap();
    let expected = [b"values at ".as_slice(), two_values_id.as_bytes()].concat();
    assert_eq!(env.store().blob(&in_dir_id).unwrap(), expected);

    // index embeds in_dir_file's identifier
    let rendered_index = env.store().blob(&result["index"]).unwrap();
    let expected_index = [b"dir: ".as_slice(), in_dir_id.as_bytes()].concat();
    assert_eq!(rendered_index, expected_index);
}

#[tokio::test]
async fn replace_with_zero_rules_resubmits_unmodified_data() {
    let dir = project(&[("plain", b"no placeholders here")]);
    write_manifest(
        dir.path(),
        r#"{
            "sources": { "plain": { "type": "replace" } },
            "targets": ["plain"]
        }"#,
    );

    let mut env = load_environment(dir.path());
    let result = env.build().await.unwrap();
    assert_eq!(env.store().blob(&result["plain"]).unwrap(), b"no placeholders here");
    assert_eq!(env.store().add_data_calls(), 1);
}

#[tokio::test]
async fn undeclared_file_passes_through() {
    let dir = project(&[("raw.bin", b"\x00\x01\x02")]);
    write_manifest(
        dir.path(),
        r#"{ "sources": {}, "targets": ["raw.bin"] }"#,
    );

    let mut env = load_environment(dir.path());
    let result = env.build().await.unwrap();
    assert!(env.store().contains(&result["raw.bin"]));
    assert_eq!(env.store().add_path_calls(), 1);
    assert_eq!(env.store().add_data_calls(), 0);
}

#[tokio::test]
async fn report_keys_are_declared_names() {
    let dir = project(&[("page.html", b"x")]);
    write_manifest(
        dir.path(),
        r#"{
            "sources": {
                "pinned": { "type": "static", "product_id": "QmPin" }
            },
            "targets": ["pinned", "page.html"]
        }"#,
    );

    let mut env = load_environment(dir.path());
    let result = env.build().await.unwrap();
    let keys: Vec<&String> = result.keys().collect();
    assert_eq!(keys, ["page.html", "pinned"]);
    assert_eq!(result["pinned"].as_str(), "QmPin");
}
