//! Substitution engine properties.
//!
//! The engine must perform simultaneous, non-overlapping replacement in one
//! left-to-right scan; these tests pin down the deterministic behavior for
//! adversarial placeholder sets.

use ipub::templating::substitute_literals;

fn rules(pairs: &[(&[u8], &[u8])]) -> Vec<(Vec<u8>, Vec<u8>)> {
    pairs.iter().map(|(p, v)| (p.to_vec(), v.to_vec())).collect()
}

#[test]
fn overlapping_prefix_patterns_resolve_longest_first() {
    // "ab" and "abc" both present in the rule set; "xabcx" must consume
    // "abc" as one unit, never substituting the inner "ab" separately.
    let out = substitute_literals(b"xabcx", &rules(&[(b"ab", b"1"), (b"abc", b"2")])).unwrap();
    assert_eq!(out, b"x2x");
}

#[test]
fn rule_order_does_not_matter() {
    let forward = substitute_literals(b"xabcx", &rules(&[(b"ab", b"1"), (b"abc", b"2")])).unwrap();
    let backward = substitute_literals(b"xabcx", &rules(&[(b"abc", b"2"), (b"ab", b"1")])).unwrap();
    assert_eq!(forward, backward);
}

#[test]
fn adjacent_matches_are_each_replaced_once() {
    let out = substitute_literals(b"aaaa", &rules(&[(b"aa", b"b")])).unwrap();
    assert_eq!(out, b"bb");
}

#[test]
fn replacement_output_is_never_rescanned() {
    // A value equal to another placeholder must survive untouched: the scan
    // is single-pass over the input, not iterated to a fixpoint.
    let out = substitute_literals(b"ping pong", &rules(&[(b"ping", b"pong"), (b"pong", b"ping")]))
        .unwrap();
    assert_eq!(out, b"pong ping");
}

#[test]
fn value_longer_and_shorter_than_pattern() {
    let out = substitute_literals(
        b"<a> and <bb>",
        &rules(&[(b"<a>", b"longer-value"), (b"<bb>", b"v")]),
    )
    .unwrap();
    assert_eq!(out, b"longer-value and v");
}

#[test]
fn binary_data_round_trips_around_matches() {
    let data = b"\x00\x01<ID>\xff\xfe<ID>\x7f";
    let out = substitute_literals(data, &rules(&[(b"<ID>", b"Qm")])).unwrap();
    assert_eq!(out, b"\x00\x01Qm\xff\xfeQm\x7f");
}

#[test]
fn identical_placeholders_share_one_rule() {
    // Many occurrences, one rule, one pass.
    let input = b"[x][x][x][x][x][x]".to_vec();
    let out = substitute_literals(&input, &rules(&[(b"[x]", b".")])).unwrap();
    assert_eq!(out, b"......");
}

#[test]
fn empty_input_stays_empty() {
    let out = substitute_literals(b"", &rules(&[(b"p", b"v")])).unwrap();
    assert_eq!(out, b"");
}
