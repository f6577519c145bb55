use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Line-level schema for one post. Only the fields the analyses read are
/// modelled; serde ignores the rest of the (large) tweet object.
///
/// `content` and `user` are lenient: a value of the wrong JSON type reads as
/// `None`, so the post is skipped for that analysis instead of failing the run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Record {
    #[serde(default, deserialize_with = "string_or_none")]
    pub content: Option<String>,
    /// ISO-8601 timestamp, e.g. `2021-02-24T09:23:35+00:00`.
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "object_or_none")]
    pub user: Option<User>,

    /// 1-based line in the source file; filled in by the chunk source.
    #[serde(skip)]
    pub line: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct User {
    #[serde(default, deserialize_with = "string_or_none")]
    pub username: Option<String>,
}

fn string_or_none<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(de)? {
        Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

fn object_or_none<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(de)? {
        v @ Value::Object(_) => Ok(serde_json::from_value(v).ok()),
        _ => Ok(None),
    }
}

impl Record {
    #[inline]
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    #[inline]
    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.username.as_deref())
    }
}

/// Parse a JSON line into a `Record`.
#[inline]
pub fn parse_record(line: &str) -> serde_json::Result<Record> {
    serde_json::from_str(line)
}
