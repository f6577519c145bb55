//! Chunk processors: one chunk in, one partial count out. Processors hold no
//! state between calls, so the same instance is shared by every worker.

use crate::chunks::Chunk;
use crate::date::day_from_timestamp;
use crate::error::{AnalysisError, Result};
use crate::extract::{extract_emojis, extract_mentions};
use crate::frequency::FrequencyTable;
use ahash::AHashMap;
use time::Date;

pub trait ChunkProcessor: Sync {
    type Partial: Send;

    /// Consume `chunk` and count its features. The chunk is dropped on return.
    fn process(&self, chunk: Chunk) -> Result<Self::Partial>;
}

/// Emoji occurrences in `content`.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmojiProcessor;

impl ChunkProcessor for EmojiProcessor {
    type Partial = FrequencyTable<String>;

    fn process(&self, chunk: Chunk) -> Result<Self::Partial> {
        let mut local = FrequencyTable::new();
        let mut glyph = [0u8; 4];
        for rec in &chunk.records {
            for e in extract_emojis(rec.content()) {
                local.add_ref(&*e.encode_utf8(&mut glyph));
            }
        }
        Ok(local)
    }
}

/// `@mentions` in `content`.
#[derive(Clone, Copy, Debug, Default)]
pub struct MentionProcessor;

impl ChunkProcessor for MentionProcessor {
    type Partial = FrequencyTable<String>;

    fn process(&self, chunk: Chunk) -> Result<Self::Partial> {
        let mut local = FrequencyTable::new();
        for rec in &chunk.records {
            for m in extract_mentions(rec.content()) {
                local.add_ref(m);
            }
        }
        Ok(local)
    }
}

/// Per-chunk posts per day, and per-day posts per username.
#[derive(Debug, Default)]
pub struct DatePartial {
    pub dates: FrequencyTable<Date>,
    pub users: AHashMap<Date, FrequencyTable<String>>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DateUserProcessor;

impl ChunkProcessor for DateUserProcessor {
    type Partial = DatePartial;

    fn process(&self, chunk: Chunk) -> Result<Self::Partial> {
        let mut part = DatePartial::default();
        for rec in &chunk.records {
            let Some(raw) = rec.date.as_deref() else { continue };
            let day = day_from_timestamp(raw)
                .map_err(|msg| AnalysisError::record_parse(&*chunk.source, rec.line, msg))?;
            part.dates.add(day);
            if let Some(name) = rec.username() {
                part.users.entry(day).or_default().add_ref(name);
            }
        }
        tracing::trace!(chunk = chunk.index, days = part.dates.len(), "date chunk processed");
        Ok(part)
    }
}
