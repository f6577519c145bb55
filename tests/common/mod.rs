#![allow(dead_code)]

use serde_json::{json, Value};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A JSONL file inside a temp dir that lives as long as this value.
pub struct Corpus {
    _dir: TempDir,
    pub path: PathBuf,
}

impl Corpus {
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap()
    }
}

/// Write raw lines (no validation) to `tweets.json`.
pub fn write_raw_lines(lines: &[String]) -> Corpus {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tweets.json");
    let mut f = File::create(&path).unwrap();
    for l in lines {
        writeln!(&mut f, "{}", l).unwrap();
    }
    f.flush().unwrap();
    Corpus { _dir: dir, path }
}

/// Write JSON values one per line.
pub fn write_jsonl(records: &[Value]) -> Corpus {
    let lines: Vec<String> = records.iter().map(|v| v.to_string()).collect();
    write_raw_lines(&lines)
}

pub fn empty_corpus() -> Corpus {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tweets.json");
    fs::write(&path, b"").unwrap();
    Corpus { _dir: dir, path }
}

/// A post shaped like the Twitter dump: extra fields around the ones analysed.
pub fn tweet(content: Option<&str>, date: &str, username: Option<&str>) -> Value {
    json!({
        "url": "https://twitter.com/x/status/1",
        "date": date,
        "content": content,
        "renderedContent": content,
        "id": 1,
        "user": username.map(|u| json!({ "username": u, "id": 42, "verified": false })),
        "replyCount": 0,
        "retweetCount": 0,
        "lang": "en",
    })
}

/// Post with only `content` set.
pub fn post(content: Option<&str>) -> Value {
    tweet(content, "2021-02-24T09:23:35+00:00", Some("someone"))
}

/// A mid-sized corpus with overlapping emojis, mentions, days and users,
/// built so every ranking has a clear winner and some ties.
///
/// 120 posts over 4 days holding 12, 24, 36 and 48 posts; user `u{i % 7}`.
pub fn make_corpus_mixed() -> Corpus {
    let emojis = ["😀", "🙏", "❤", "🇮", "🔥"];
    let handles = ["narendramodi", "Kisanektamorcha", "RakeshTikaitBKU", "PMOIndia"];
    let mut rows = Vec::new();
    for i in 0..120usize {
        let mut text = format!("post {i}");
        for k in 0..(i % 3) {
            text.push(' ');
            text.push_str(emojis[(i + k) % emojis.len()]);
        }
        if i % 2 == 0 {
            text.push_str(&format!(" @{}", handles[i % handles.len()]));
        }
        if i % 5 == 0 {
            text.push_str(&format!(" cc @{} @{}", handles[(i / 5) % handles.len()], handles[0]));
        }
        let content = if i % 11 == 0 { None } else { Some(text) };
        let day = match i % 10 {
            0 => 12,
            1..=2 => 13,
            3..=5 => 14,
            _ => 15,
        };
        let date = format!("2021-02-{day:02}T{:02}:15:00+00:00", i % 24);
        let user = if i % 13 == 0 { None } else { Some(format!("u{}", i % 7)) };
        rows.push(tweet(content.as_deref(), &date, user.as_deref()));
    }
    write_jsonl(&rows)
}

/// Sort a ranking by count desc, then key, so tie order doesn't matter.
pub fn canonical<K: Ord + Clone>(rows: &[(K, u64)]) -> Vec<(K, u64)> {
    let mut v = rows.to_vec();
    v.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    v
}
