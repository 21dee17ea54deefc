//! Cross-profile agreement: every profile returns the same rows for the same
//! corpus, plain or zstd-compressed, run after run.

#[path = "common/mod.rs"]
mod common;

use common::*;
use postpulse::{PostPulse, Profile};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// A corpus wide enough that parallel batching, candidate displacement and
/// the two-pass author resolution all do real work: 6 days, uneven volumes,
/// recurring mentions and emoji.
fn varied_lines() -> Vec<String> {
    let authors = ["ana", "bo", "cy", "dee", "ed"];
    let bodies = [
        "shipping 🚀 cc @ana",
        "no emoji today",
        "review ping @bo @bo",
        "😀 thanks @cy!",
        "🎉🎉 congrats @dee",
        "lunch?",
        "@ed have you seen 🚀🚀",
        "retro notes @ana @bo",
    ];
    let mut lines = Vec::new();
    for day in 1..=6u8 {
        // Day d carries d * 3 posts.
        for i in 0..day * 3 {
            let author = authors[(i as usize + day as usize) % authors.len()];
            let body = bodies[(i as usize * 7 + day as usize) % bodies.len()];
            lines.push(post(
                &format!("2024-09-{day:02}T{:02}:00:00+00:00", i % 24),
                author,
                body,
            ));
        }
    }
    // A couple of stragglers the extractors must skip or tolerate.
    lines.push("{broken".to_string());
    lines.push(r#"{"content":"dateless @ana","user":{"username":"ana"}}"#.to_string());
    lines
}

fn builder(corpus: &Path, profile: Profile) -> PostPulse {
    PostPulse::new()
        .corpus(corpus)
        .profile(profile)
        .chunk_records(8) // force several parallel batches in LowLatency
        .progress(false)
}

#[test]
fn all_profiles_agree_on_all_queries() {
    let base = temp_base();
    let corpus = base.join("varied.jsonl");
    write_jsonl(&corpus, &varied_lines());

    let baseline_dates = builder(&corpus, Profile::Baseline).top_dates().unwrap();
    let baseline_emojis = builder(&corpus, Profile::Baseline).top_emojis().unwrap();
    let baseline_mentions = builder(&corpus, Profile::Baseline).top_mentions().unwrap();

    assert!(!baseline_dates.rows.is_empty());
    assert!(!baseline_emojis.rows.is_empty());
    assert!(!baseline_mentions.rows.is_empty());

    for profile in [Profile::LowMemory, Profile::LowLatency] {
        let dates = builder(&corpus, profile).top_dates().unwrap();
        let emojis = builder(&corpus, profile).top_emojis().unwrap();
        let mentions = builder(&corpus, profile).top_mentions().unwrap();
        assert_eq!(baseline_dates.rows, dates.rows, "{profile:?}");
        assert_eq!(baseline_emojis.rows, emojis.rows, "{profile:?}");
        assert_eq!(baseline_mentions.rows, mentions.rows, "{profile:?}");
    }
}

#[test]
fn rankings_are_idempotent_across_runs() {
    let base = temp_base();
    let corpus = base.join("varied.jsonl");
    write_jsonl(&corpus, &varied_lines());

    let first = builder(&corpus, Profile::LowLatency).top_mentions().unwrap();
    let second = builder(&corpus, Profile::LowLatency).top_mentions().unwrap();
    assert_eq!(first.rows, second.rows);
    assert_eq!(first.stats, second.stats);
}

#[test]
fn zst_corpus_matches_plain_corpus() {
    let base = temp_base();
    let plain = base.join("varied.jsonl");
    let packed = base.join("varied.jsonl.zst");
    let lines = varied_lines();
    write_jsonl(&plain, &lines);
    write_zst_lines(&packed, &lines);

    for profile in [Profile::Baseline, Profile::LowMemory, Profile::LowLatency] {
        let from_plain = builder(&plain, profile).top_dates().unwrap();
        let from_packed = builder(&packed, profile).top_dates().unwrap();
        assert_eq!(from_plain.rows, from_packed.rows, "{profile:?}");
    }
}

/// A `.zst` path that is not a zstd stream is a resource failure, not an
/// empty result.
#[test]
fn corrupt_zst_input_is_an_error() {
    let base = temp_base();
    let corrupt = base.join("corrupt.jsonl.zst");
    let mut f = File::create(&corrupt).unwrap();
    writeln!(&mut f, "{}", post("2024-09-01T00:00:00+00:00", "a", "x")).unwrap();
    drop(f);

    assert!(builder(&corrupt, Profile::Baseline).top_mentions().is_err());
}
