#[path = "common/mod.rs"]
mod common;

use common::*;
use time::macros::date;
use tweetstats::{AnalysisError, Mode, TweetStats};

const MODES: [Mode; 2] = [Mode::Memory, Mode::Time];

fn stats() -> TweetStats {
    TweetStats::new().workers(3).low_memory_threshold(0.0)
}

/// "hi 😀", "😀😀 bye", "no emoji" → [("😀", 3)] in both modes.
#[test]
fn emoji_scenario() {
    let corpus = write_jsonl(&[post(Some("hi 😀")), post(Some("😀😀 bye")), post(Some("no emoji"))]);
    for mode in MODES {
        let top = stats().top_emojis(&corpus.path, mode).unwrap();
        assert_eq!(top, vec![("😀".to_string(), 3)], "mode {mode}");
    }
}

/// "hello @bob", "@bob and @alice", null → [("bob", 2), ("alice", 1)].
#[test]
fn mention_scenario() {
    let corpus = write_jsonl(&[post(Some("hello @bob")), post(Some("@bob and @alice")), post(None)]);
    for mode in MODES {
        let top = stats().top_mentions(&corpus.path, mode).unwrap();
        assert_eq!(top, vec![("bob".to_string(), 2), ("alice".to_string(), 1)], "mode {mode}");
    }
}

/// Two posts by A and one by B on 2024-01-01, one by C on 2024-01-02.
#[test]
fn date_user_scenario() {
    let corpus = write_jsonl(&[
        tweet(Some("a1"), "2024-01-01T08:00:00+00:00", Some("A")),
        tweet(Some("c1"), "2024-01-02T09:30:00+00:00", Some("C")),
        tweet(Some("b1"), "2024-01-01T10:00:00+00:00", Some("B")),
        tweet(Some("a2"), "2024-01-01T23:59:59+00:00", Some("A")),
    ]);
    for mode in MODES {
        let report = stats().chunk_size(2).date_report(&corpus.path, mode).unwrap();
        assert_eq!(report.top_dates, vec![(date!(2024 - 01 - 01), 3), (date!(2024 - 01 - 02), 1)], "mode {mode}");
        assert_eq!(
            report.top_users,
            vec![(date!(2024 - 01 - 01), "A".to_string()), (date!(2024 - 01 - 02), "C".to_string())],
            "mode {mode}"
        );
    }
}

/// A post without `user` still counts toward its day; a day with no
/// attributable user is dropped from the user list only.
#[test]
fn missing_user_counts_for_date_only() {
    let corpus = write_jsonl(&[
        tweet(Some("x"), "2024-03-05T01:00:00+00:00", None),
        tweet(Some("y"), "2024-03-05T02:00:00+00:00", None),
        tweet(Some("z"), "2024-03-06T02:00:00+00:00", Some("solo")),
        serde_json::json!({ "content": "no date", "user": { "username": "ghost" } }),
    ]);
    for mode in MODES {
        let report = stats().date_report(&corpus.path, mode).unwrap();
        assert_eq!(report.top_dates, vec![(date!(2024 - 03 - 05), 2), (date!(2024 - 03 - 06), 1)]);
        assert_eq!(report.top_users, vec![(date!(2024 - 03 - 06), "solo".to_string())]);
    }
}

/// Dates are truncated as written, whatever the offset or precision.
#[test]
fn dates_truncate_to_calendar_day() {
    let corpus = write_jsonl(&[
        tweet(None, "2021-02-24T23:59:59-05:00", Some("late")),
        tweet(None, "2021-02-24T00:00:00.123Z", Some("early")),
        tweet(None, "2021-02-24", Some("late")),
        tweet(None, "2021-02-25T10:00:00", Some("next")),
    ]);
    let report = stats().date_report(&corpus.path, Mode::Memory).unwrap();
    assert_eq!(report.top_dates, vec![(date!(2021 - 02 - 24), 3), (date!(2021 - 02 - 25), 1)]);
    assert_eq!(report.top_users[0], (date!(2021 - 02 - 24), "late".to_string()));
}

/// Empty input gives empty rankings, no error, in every analysis and mode.
#[test]
fn empty_file_gives_empty_results() {
    let corpus = empty_corpus();
    for mode in MODES {
        assert!(stats().top_emojis(&corpus.path, mode).unwrap().is_empty());
        assert!(stats().top_mentions(&corpus.path, mode).unwrap().is_empty());
        assert!(stats().top_dates(&corpus.path, mode).unwrap().is_empty());
    }
}

/// Top lists hold at most 10 entries, sorted by descending count.
#[test]
fn top_lists_cap_at_ten() {
    let rows: Vec<_> = (0..15)
        .map(|i| {
            let text = (0..=i).map(|_| format!("@user{i}")).collect::<Vec<_>>().join(" ");
            post(Some(&text))
        })
        .collect();
    let corpus = write_jsonl(&rows);
    let top = stats().top_mentions(&corpus.path, Mode::Time).unwrap();
    assert_eq!(top.len(), 10);
    assert_eq!(top[0], ("user14".to_string(), 15));
    assert!(top.windows(2).all(|w| w[0].1 >= w[1].1));
}

/// Missing file aborts with a file access error in both modes.
#[test]
fn missing_file_fails() {
    let corpus = empty_corpus();
    let missing = corpus.dir().join("absent.json");
    for mode in MODES {
        let err = stats().top_emojis(&missing, mode).unwrap_err();
        assert!(matches!(err, AnalysisError::FileAccess { .. }), "mode {mode}: {err}");
    }
}

/// A malformed line anywhere aborts the whole run; no partial ranking.
#[test]
fn malformed_line_aborts_run() {
    let mut lines: Vec<String> = (0..50).map(|i| post(Some(&format!("@ok{i}"))).to_string()).collect();
    lines.insert(37, "{\"content\": \"truncated".to_string());
    let corpus = write_raw_lines(&lines);
    for mode in MODES {
        let err = stats().chunk_size(4).top_mentions(&corpus.path, mode).unwrap_err();
        match err {
            AnalysisError::RecordParse { line, .. } => assert_eq!(line, 38, "mode {mode}"),
            other => panic!("mode {mode}: unexpected {other}"),
        }
    }
}

/// An unparseable date fails inside the processor; in time mode that is a
/// worker failure that still aborts the run.
#[test]
fn bad_date_fails_in_worker() {
    let mut rows: Vec<_> = (0..20).map(|i| tweet(None, &format!("2024-01-{:02}T00:00:00Z", i % 28 + 1), Some("u"))).collect();
    rows.push(tweet(None, "yesterday", Some("u")));
    let corpus = write_jsonl(&rows);
    for mode in MODES {
        let err = stats().chunk_size(3).date_report(&corpus.path, mode).unwrap_err();
        match err {
            AnalysisError::RecordParse { line, message, .. } => {
                assert_eq!(line, 21, "mode {mode}");
                assert!(message.contains("yesterday"));
            }
            other => panic!("mode {mode}: unexpected {other}"),
        }
    }
}

/// Zero workers is a configuration error for time mode only.
#[test]
fn zero_workers_rejected_in_time_mode() {
    let corpus = write_jsonl(&[post(Some("😀"))]);
    let s = stats().workers(0);
    assert!(matches!(s.top_emojis(&corpus.path, Mode::Time), Err(AnalysisError::InvalidConfig(_))));
    assert_eq!(s.top_emojis(&corpus.path, Mode::Memory).unwrap().len(), 1);
}

/// A non-string `content` extracts nothing; the other posts still count.
#[test]
fn non_string_content_extracts_nothing() {
    let lines = vec![
        r#"{"content": "hi 😀 @bob", "date": "2024-01-01T00:00:00+00:00"}"#.to_string(),
        r#"{"content": 12345, "date": "2024-01-01T01:00:00+00:00"}"#.to_string(),
        r#"{"content": ["😀", "@eve"], "date": "2024-01-01T02:00:00+00:00"}"#.to_string(),
    ];
    let corpus = write_raw_lines(&lines);
    for mode in MODES {
        let emojis = stats().top_emojis(&corpus.path, mode).unwrap();
        assert_eq!(emojis, vec![("😀".to_string(), 1)], "mode {mode}");
        let mentions = stats().top_mentions(&corpus.path, mode).unwrap();
        assert_eq!(mentions, vec![("bob".to_string(), 1)], "mode {mode}");
    }
}

/// A non-string `username` or non-object `user` still counts toward its
/// day but never toward a user.
#[test]
fn non_string_username_counts_for_date_only() {
    let lines = vec![
        r#"{"content": "a", "date": "2024-01-01T08:00:00+00:00", "user": {"username": "ann"}}"#.to_string(),
        r#"{"content": "b", "date": "2024-01-01T09:00:00+00:00", "user": {"username": 7}}"#.to_string(),
        r#"{"content": "c", "date": "2024-01-02T09:00:00+00:00", "user": "zed"}"#.to_string(),
    ];
    let corpus = write_raw_lines(&lines);
    for mode in MODES {
        let report = stats().date_report(&corpus.path, mode).unwrap();
        assert_eq!(report.top_dates, vec![(date!(2024 - 01 - 01), 2), (date!(2024 - 01 - 02), 1)], "mode {mode}");
        assert_eq!(report.top_users, vec![(date!(2024 - 01 - 01), "ann".to_string())], "mode {mode}");
    }
}
