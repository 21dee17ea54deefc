use serde_json::json;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// One post line in the corpus schema.
pub fn post(date: &str, username: &str, content: &str) -> String {
    json!({
        "date": date,
        "content": content,
        "user": { "username": username }
    })
    .to_string()
}

/// Write a plain JSONL file with the provided lines.
pub fn write_jsonl(path: &Path, lines: &[String]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut f = File::create(path).unwrap();
    for l in lines {
        writeln!(&mut f, "{}", l).unwrap();
    }
}

/// Write a zstd-compressed JSONL file. Mirrors compressed corpus archives
/// but with tiny content.
pub fn write_zst_lines(path: &Path, lines: &[String]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let f = File::create(path).unwrap();
    let mut enc = zstd::stream::write::Encoder::new(f, 3).unwrap();
    for l in lines {
        writeln!(&mut enc, "{}", l).unwrap();
    }
    enc.finish().unwrap();
}

/// Leaked temp dir for a test corpus.
pub fn temp_base() -> PathBuf {
    tempfile::tempdir().unwrap().into_path()
}

/// Tiny valid corpus exercising all three queries:
/// - three posts on 2024-01-01 by alice, alice, bob;
/// - one post on 2024-01-02 by carol.
/// Bodies carry the mention counts {alice: 2, bob: 3} and the emoji counts
/// {😀: 2, 🎉: 1}.
pub fn basic_lines() -> Vec<String> {
    vec![
        post("2024-01-01T08:00:00+00:00", "alice", "hello @alice great 😀😀"),
        post("2024-01-01T09:30:00+00:00", "alice", "hi @alice @bob ok 🎉"),
        post("2024-01-01T23:59:59+00:00", "bob", "@bob @bob"),
        post("2024-01-02T00:00:00+00:00", "carol", "quiet day"),
    ]
}

/// Write `basic_lines` to `<base>/corpus.jsonl` and return the file path.
pub fn make_corpus_basic() -> PathBuf {
    let base = temp_base();
    let corpus = base.join("corpus.jsonl");
    write_jsonl(&corpus, &basic_lines());
    corpus
}
