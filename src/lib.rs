mod config;
mod date;
mod error;
mod util;
mod mem;
mod progress;

mod ndjson;
mod record;
mod chunks;

mod extract;
mod frequency;
mod processor;
mod aggregate;

mod concurrency;
mod pipeline;
mod metrics;

pub use crate::config::{AnalysisOptions, ChunkPreset, Mode, DEFAULT_READ_BUFFER};
pub use crate::error::{AnalysisError, Result};
pub use crate::pipeline::{Analysis, DateReport, TweetStats};

// Entry points, one per analysis and objective.
pub use crate::pipeline::{
    top_dates_memory, top_dates_time, top_emojis_memory, top_emojis_time, top_mentions_memory,
    top_mentions_time,
};

// Streaming building blocks.
pub use crate::chunks::{read_chunks, Chunk, ChunkSource, Chunks};
pub use crate::ndjson::NdjsonReader;
pub use crate::record::{parse_record, Record, User};
pub use crate::date::{day_from_timestamp, format_day};

// Extraction, counting and merging.
pub use crate::extract::{extract_emojis, extract_mentions, is_emoji};
pub use crate::frequency::FrequencyTable;
pub use crate::processor::{ChunkProcessor, DatePartial, DateUserProcessor, EmojiProcessor, MentionProcessor};
pub use crate::aggregate::{Aggregator, CountAggregator, DateUserAggregator};

// Orchestrators, for custom processor/aggregator pairs.
pub use crate::concurrency::{run_concurrent, run_sequential, PoolConfig, RunContext, RunStats};

// Ambient helpers for the binary and embedders.
pub use crate::progress::ProgressScope;
pub use crate::metrics::{profile, RunReport};
pub use crate::mem::{available_memory_fraction, is_low_memory, process_resident_bytes};
pub use crate::util::{host_parallelism, init_tracing_once};
