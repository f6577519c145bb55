use crate::aggregate::{Aggregator, CountAggregator, DateUserAggregator};
use crate::chunks::ChunkSource;
use crate::concurrency::{run_concurrent, run_sequential, PoolConfig, RunContext, RunStats};
use crate::config::{AnalysisOptions, ChunkPreset, Mode};
use crate::error::Result;
use crate::processor::{ChunkProcessor, DateUserProcessor, EmojiProcessor, MentionProcessor};
use crate::progress::ProgressScope;
use std::path::Path;
use std::time::Instant;
use time::Date;

/// Which ranking to compute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Analysis {
    /// Busiest days and the most active user on each.
    Dates,
    Emojis,
    Mentions,
}

impl Analysis {
    pub const ALL: [Analysis; 3] = [Analysis::Dates, Analysis::Emojis, Analysis::Mentions];

    pub fn name(self) -> &'static str {
        match self {
            Analysis::Dates => "dates",
            Analysis::Emojis => "emojis",
            Analysis::Mentions => "mentions",
        }
    }
}

/// Full outcome of a date analysis.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DateReport {
    /// Busiest days, descending by post count.
    pub top_dates: Vec<(Date, u64)>,
    /// Top user for each of `top_dates`, skipping days without one.
    pub top_users: Vec<(Date, String)>,
}

#[derive(Clone, Default)]
pub struct TweetStats {
    pub(crate) opts: AnalysisOptions,
}

impl TweetStats {
    pub fn new() -> Self {
        Self { opts: AnalysisOptions::default() }
    }

    pub fn with_options(opts: AnalysisOptions) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.opts
    }

    // -------- Builder methods --------
    pub fn chunk_size(mut self, records: usize) -> Self { self.opts = self.opts.with_chunk_size(records); self }
    pub fn preset(mut self, preset: ChunkPreset) -> Self { self.opts = self.opts.with_preset(preset); self }
    pub fn workers(mut self, n: usize) -> Self { self.opts = self.opts.with_workers(n); self }
    pub fn max_in_flight(mut self, n: usize) -> Self { self.opts = self.opts.with_max_in_flight(n); self }
    pub fn top_n(mut self, n: usize) -> Self { self.opts = self.opts.with_top_n(n); self }
    pub fn progress(mut self, yes: bool) -> Self { self.opts = self.opts.with_progress(yes); self }
    pub fn progress_label(mut self, label: impl Into<String>) -> Self { self.opts = self.opts.with_progress_label(label); self }
    pub fn low_memory_threshold(mut self, frac: f64) -> Self { self.opts = self.opts.with_low_memory_threshold(frac); self }
    pub fn io_read_buffer(mut self, bytes: usize) -> Self { self.opts = self.opts.with_io_read_buffer(bytes); self }

    // -------- Analyses --------

    pub fn top_emojis(&self, path: impl AsRef<Path>, mode: Mode) -> Result<Vec<(String, u64)>> {
        let agg: CountAggregator = self.aggregate(path.as_ref(), mode, Analysis::Emojis, &EmojiProcessor)?;
        Ok(agg.top_n(self.opts.top_n))
    }

    pub fn top_mentions(&self, path: impl AsRef<Path>, mode: Mode) -> Result<Vec<(String, u64)>> {
        let agg: CountAggregator = self.aggregate(path.as_ref(), mode, Analysis::Mentions, &MentionProcessor)?;
        Ok(agg.top_n(self.opts.top_n))
    }

    /// Busiest days paired with their most active user.
    pub fn top_dates(&self, path: impl AsRef<Path>, mode: Mode) -> Result<Vec<(Date, String)>> {
        Ok(self.date_report(path, mode)?.top_users)
    }

    pub fn date_report(&self, path: impl AsRef<Path>, mode: Mode) -> Result<DateReport> {
        let agg: DateUserAggregator = self.aggregate(path.as_ref(), mode, Analysis::Dates, &DateUserProcessor)?;
        let top_dates = agg.top_dates(self.opts.top_n);
        let top_users = top_dates
            .iter()
            .filter_map(|&(day, _)| agg.top_user_for(day).map(|u| (day, u.to_string())))
            .collect();
        Ok(DateReport { top_dates, top_users })
    }

    /// Run `processor` over the whole file and return the filled aggregator.
    /// Exposed so callers can query more than the top-N.
    pub fn aggregate<P, A>(&self, path: &Path, mode: Mode, analysis: Analysis, processor: &P) -> Result<A>
    where
        P: ChunkProcessor,
        A: Aggregator<Partial = P::Partial>,
    {
        let chunk_size = self.opts.chunk_size_for(mode);
        let source = ChunkSource::new(path, chunk_size)?.with_read_buffer(self.opts.read_buffer_bytes);

        let pb = if self.opts.progress {
            let label = self.opts.progress_label.clone().unwrap_or_else(|| format!("{} ({mode})", analysis.name()));
            Some(ProgressScope::for_file(label, path))
        } else {
            None
        };
        let ctx = RunContext { progress: pb.as_ref(), low_memory_threshold: self.opts.low_memory_threshold };

        let workers = if mode == Mode::Time { self.opts.workers } else { 1 };
        tracing::info!(
            file = %path.display(), analysis = analysis.name(), %mode, chunk_size, workers,
            "analysis started"
        );
        let started = Instant::now();
        let mut agg = A::default();
        let run: Result<RunStats> = match mode {
            Mode::Memory => run_sequential(&source, processor, &mut agg, ctx),
            Mode::Time => {
                let pool = PoolConfig { workers: self.opts.workers, max_in_flight: self.opts.in_flight_limit() };
                run_concurrent(&source, processor, &mut agg, pool, ctx)
            }
        };

        match run {
            Ok(stats) => {
                if let Some(pb) = &pb {
                    pb.finish("done");
                }
                tracing::info!(
                    analysis = analysis.name(), %mode, chunks = stats.chunks, records = stats.records,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "analysis finished"
                );
                Ok(agg)
            }
            Err(e) => {
                if let Some(pb) = &pb {
                    pb.abandon();
                }
                Err(e)
            }
        }
    }
}

// -------- Entry points: one per analysis and objective, path in, ranking out --------

/// Top user of each of the 10 busiest days, one chunk in memory at a time.
pub fn top_dates_memory(path: impl AsRef<Path>) -> Result<Vec<(Date, String)>> {
    TweetStats::new().top_dates(path, Mode::Memory)
}

/// Top user of each of the 10 busiest days, chunks spread over all cores.
pub fn top_dates_time(path: impl AsRef<Path>) -> Result<Vec<(Date, String)>> {
    TweetStats::new().top_dates(path, Mode::Time)
}

pub fn top_emojis_memory(path: impl AsRef<Path>) -> Result<Vec<(String, u64)>> {
    TweetStats::new().top_emojis(path, Mode::Memory)
}

pub fn top_emojis_time(path: impl AsRef<Path>) -> Result<Vec<(String, u64)>> {
    TweetStats::new().top_emojis(path, Mode::Time)
}

pub fn top_mentions_memory(path: impl AsRef<Path>) -> Result<Vec<(String, u64)>> {
    TweetStats::new().top_mentions(path, Mode::Memory)
}

pub fn top_mentions_time(path: impl AsRef<Path>) -> Result<Vec<(String, u64)>> {
    TweetStats::new().top_mentions(path, Mode::Time)
}
