use crate::util::host_parallelism;
use std::fmt;
use std::str::FromStr;

/// Default `BufReader` capacity for the input file.
pub const DEFAULT_READ_BUFFER: usize = 256 * 1024;

/// Named chunk sizes: `Small` keeps one chunk cheap to hold, `Medium` gives
/// each worker enough records to amortize dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChunkPreset {
    Small,
    Medium,
}

impl ChunkPreset {
    pub const fn records(self) -> usize {
        match self {
            ChunkPreset::Small => 1_000,
            ChunkPreset::Medium => 10_000,
        }
    }
}

/// Optimization objective; picks the orchestrator and the default preset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    /// One chunk in memory at a time, single-threaded.
    Memory,
    /// Chunks fanned out over a worker pool.
    Time,
}

impl Mode {
    pub const fn preset(self) -> ChunkPreset {
        match self {
            Mode::Memory => ChunkPreset::Small,
            Mode::Time => ChunkPreset::Medium,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Memory => "memory",
            Mode::Time => "time",
        })
    }
}

impl FromStr for Mode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "mem" => Ok(Mode::Memory),
            "time" => Ok(Mode::Time),
            other => Err(format!("unknown mode {other:?} (expected memory|time)")),
        }
    }
}

/// User-facing options with sensible defaults and builder chaining.
#[derive(Clone, Debug)]
pub struct AnalysisOptions {
    pub chunk_size: Option<usize>,      // None → preset for the mode
    pub workers: usize,                 // worker pool size for Mode::Time
    pub max_in_flight: Option<usize>,   // None → 2 × workers
    pub top_n: usize,
    pub progress: bool,
    pub progress_label: Option<String>,
    pub low_memory_threshold: f64,      // available/total RAM below which the producer backs off

    // IO tuning
    pub read_buffer_bytes: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            chunk_size: None,
            workers: host_parallelism(),
            max_in_flight: None,
            top_n: 10,
            progress: false,
            progress_label: None,
            low_memory_threshold: 0.10,
            read_buffer_bytes: DEFAULT_READ_BUFFER,
        }
    }
}

impl AnalysisOptions {
    pub fn with_chunk_size(mut self, records: usize) -> Self {
        self.chunk_size = Some(records);
        self
    }
    pub fn with_preset(mut self, preset: ChunkPreset) -> Self {
        self.chunk_size = Some(preset.records());
        self
    }
    pub fn with_workers(mut self, n: usize) -> Self {
        self.workers = n;
        self
    }
    pub fn with_max_in_flight(mut self, n: usize) -> Self {
        self.max_in_flight = Some(n);
        self
    }
    pub fn with_top_n(mut self, n: usize) -> Self {
        self.top_n = n;
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }
    pub fn with_progress_label(mut self, label: impl Into<String>) -> Self {
        self.progress_label = Some(label.into());
        self
    }
    pub fn with_low_memory_threshold(mut self, frac: f64) -> Self {
        self.low_memory_threshold = frac.clamp(0.0, 1.0);
        self
    }
    pub fn with_io_read_buffer(mut self, bytes: usize) -> Self {
        self.read_buffer_bytes = bytes.max(8 * 1024);
        self
    }

    /// Records per chunk for a run in `mode`.
    pub fn chunk_size_for(&self, mode: Mode) -> usize {
        self.chunk_size.unwrap_or_else(|| mode.preset().records())
    }

    pub fn in_flight_limit(&self) -> usize {
        self.max_in_flight.unwrap_or(self.workers.saturating_mul(2)).max(1)
    }
}
