//! Orchestrators: drive a `ChunkSource` through a `ChunkProcessor` into an
//! `Aggregator`, either one chunk at a time or over a bounded worker pool.

use crate::aggregate::Aggregator;
use crate::chunks::{Chunk, ChunkSource};
use crate::error::{AnalysisError, Result};
use crate::mem::maybe_throttle_low_memory;
use crate::processor::ChunkProcessor;
use crate::progress::ProgressScope;
use crossbeam_channel::{bounded, unbounded};
use std::sync::atomic::{AtomicBool, Ordering};

/// Side channels of a run: progress and memory backoff.
#[derive(Clone, Copy, Default)]
pub struct RunContext<'a> {
    pub progress: Option<&'a ProgressScope>,
    /// 0.0 disables the low-memory backoff.
    pub low_memory_threshold: f64,
}

impl RunContext<'_> {
    fn backoff(&self) {
        if maybe_throttle_low_memory(self.low_memory_threshold) {
            tracing::warn!(threshold = self.low_memory_threshold, "low available memory, producer backing off");
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct PoolConfig {
    pub workers: usize,
    /// Chunks read but not yet picked up by a worker.
    pub max_in_flight: usize,
}

/// What a run consumed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    pub chunks: usize,
    pub records: u64,
    pub bytes: u64,
}

#[derive(Clone, Copy, Debug)]
struct ChunkMeta {
    index: usize,
    records: usize,
    bytes: u64,
}

impl ChunkMeta {
    fn of(chunk: &Chunk) -> Self {
        Self { index: chunk.index, records: chunk.len(), bytes: chunk.bytes }
    }
}

fn absorb<A: Aggregator>(
    meta: ChunkMeta,
    part: A::Partial,
    agg: &mut A,
    stats: &mut RunStats,
    ctx: &RunContext<'_>,
) {
    agg.merge(part);
    stats.chunks += 1;
    stats.records += meta.records as u64;
    stats.bytes += meta.bytes;
    if let Some(pb) = ctx.progress {
        pb.inc_bytes(meta.bytes);
    }
    tracing::debug!(chunk = meta.index, records = meta.records, "chunk merged");
}

/// Memory-focused: read, process and merge one chunk before reading the next.
/// Merges happen in file order.
pub fn run_sequential<P, A>(
    source: &ChunkSource,
    processor: &P,
    agg: &mut A,
    ctx: RunContext<'_>,
) -> Result<RunStats>
where
    P: ChunkProcessor,
    A: Aggregator<Partial = P::Partial>,
{
    let mut stats = RunStats::default();
    for next in source.chunks()? {
        let chunk = next?;
        let meta = ChunkMeta::of(&chunk);
        let part = processor.process(chunk)?;
        absorb(meta, part, agg, &mut stats, &ctx);
        ctx.backoff();
    }
    Ok(stats)
}

/// Time-focused: the calling thread reads chunks into a bounded queue served
/// by `pool.workers` rayon threads, and folds partials into `agg` in
/// completion order. Only the calling thread touches `agg`.
///
/// The first read, parse or processing error aborts the run; queued chunks
/// are drained without being processed.
pub fn run_concurrent<P, A>(
    source: &ChunkSource,
    processor: &P,
    agg: &mut A,
    pool: PoolConfig,
    ctx: RunContext<'_>,
) -> Result<RunStats>
where
    P: ChunkProcessor,
    A: Aggregator<Partial = P::Partial>,
{
    if pool.workers == 0 {
        return Err(AnalysisError::InvalidConfig("worker pool size must be positive".into()));
    }
    let thread_pool = rayon::ThreadPoolBuilder::new()
        .num_threads(pool.workers)
        .thread_name(|i| format!("tweetstats-worker-{i}"))
        .build()
        .map_err(|e| AnalysisError::InvalidConfig(format!("cannot build worker pool: {e}")))?;

    let chunks = source.chunks()?;
    let (task_tx, task_rx) = bounded::<Chunk>(pool.max_in_flight.max(1));
    let (result_tx, result_rx) = unbounded::<(ChunkMeta, Result<P::Partial>)>();
    let aborted = AtomicBool::new(false);
    let aborted = &aborted;

    let mut stats = RunStats::default();
    let mut failure: Option<AnalysisError> = None;

    thread_pool.in_place_scope(|scope| {
        for _ in 0..pool.workers {
            let task_rx = task_rx.clone();
            let result_tx = result_tx.clone();
            scope.spawn(move |_| {
                for chunk in task_rx.iter() {
                    if aborted.load(Ordering::Relaxed) {
                        continue;
                    }
                    let meta = ChunkMeta::of(&chunk);
                    let out = processor.process(chunk);
                    if result_tx.send((meta, out)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(task_rx);
        drop(result_tx);

        let mut fold = |meta: ChunkMeta, out: Result<P::Partial>, failure: &mut Option<AnalysisError>| {
            if failure.is_some() {
                return;
            }
            match out {
                Ok(part) => absorb(meta, part, agg, &mut stats, &ctx),
                Err(e) => {
                    tracing::debug!(chunk = meta.index, error = %e, "worker failed");
                    aborted.store(true, Ordering::Relaxed);
                    *failure = Some(e);
                }
            }
        };

        for next in chunks {
            while let Ok((meta, out)) = result_rx.try_recv() {
                fold(meta, out, &mut failure);
            }
            if failure.is_some() {
                break;
            }
            match next {
                Ok(chunk) => {
                    if task_tx.send(chunk).is_err() {
                        failure = Some(AnalysisError::WorkerFailed("task queue closed".into()));
                        break;
                    }
                }
                Err(e) => {
                    aborted.store(true, Ordering::Relaxed);
                    failure = Some(e);
                    break;
                }
            }
            ctx.backoff();
        }
        drop(task_tx);

        // Workers exit once the queue is closed and drained.
        for (meta, out) in result_rx.iter() {
            fold(meta, out, &mut failure);
        }
    });

    match failure {
        Some(e) => Err(e),
        None => Ok(stats),
    }
}
