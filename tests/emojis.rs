#[path = "common/mod.rs"]
mod common;

use common::*;
use postpulse::PostPulse;

/// Codepoint granularity: "😀😀" contributes two observations of 😀, not one
/// run token.
#[test]
fn emoji_counts_are_per_codepoint() {
    let corpus = make_corpus_basic();
    let ranked = PostPulse::new()
        .corpus(&corpus)
        .progress(false)
        .top_emojis()
        .unwrap();

    assert_eq!(
        ranked.rows,
        vec![("😀".to_string(), 2), ("🎉".to_string(), 1)]
    );
}

/// Tokens from several Unicode blocks all land in the same table: transport
/// (🚀), dingbats (✈), supplemental symbols (🤖) and emoticons (😀).
#[test]
fn emoji_blocks_beyond_emoticons_are_matched() {
    let base = temp_base();
    let corpus = base.join("blocks.jsonl");
    write_jsonl(
        &corpus,
        &[
            post("2024-05-01T00:00:00+00:00", "a", "🚀🚀🚀 lift off"),
            post("2024-05-01T01:00:00+00:00", "b", "✈ boarding 🤖"),
            post("2024-05-01T02:00:00+00:00", "c", "😀 🚀"),
        ],
    );

    let ranked = PostPulse::new()
        .corpus(&corpus)
        .progress(false)
        .top_emojis()
        .unwrap();
    assert_eq!(ranked.rows[0], ("🚀".to_string(), 4));
    // The three singletons tie and rank by codepoint: U+2708 < U+1F600 < U+1F916.
    let rest: Vec<&str> = ranked.rows[1..].iter().map(|(e, _)| e.as_str()).collect();
    assert_eq!(rest, vec!["✈", "😀", "🤖"]);
}

/// Posts without a content field contribute nothing and are not schema
/// failures for the emoji query.
#[test]
fn missing_content_is_just_empty_text() {
    let base = temp_base();
    let corpus = base.join("nocontent.jsonl");
    write_jsonl(
        &corpus,
        &[
            r#"{"date":"2024-05-01T00:00:00+00:00","user":{"username":"a"}}"#.to_string(),
            post("2024-05-01T01:00:00+00:00", "b", "🎉"),
        ],
    );

    let ranked = PostPulse::new()
        .corpus(&corpus)
        .progress(false)
        .top_emojis()
        .unwrap();
    assert_eq!(ranked.rows, vec![("🎉".to_string(), 1)]);
    assert_eq!(ranked.stats.records, 2);
    assert_eq!(ranked.stats.schema_failures, 0);
}

/// Ties rank lexicographically smaller codepoints first.
#[test]
fn equal_counts_break_ties_by_codepoint_order() {
    let base = temp_base();
    let corpus = base.join("ties.jsonl");
    write_jsonl(
        &corpus,
        &[post("2024-05-01T00:00:00+00:00", "a", "🎉 😀 🎉 😀")],
    );

    let ranked = PostPulse::new()
        .corpus(&corpus)
        .progress(false)
        .top_emojis()
        .unwrap();
    // 😀 is U+1F600, 🎉 is U+1F389: the tie goes to the smaller codepoint.
    assert_eq!(
        ranked.rows,
        vec![("🎉".to_string(), 2), ("😀".to_string(), 2)]
    );
}
