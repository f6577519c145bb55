//! Run reporter: wraps an entry point and measures wall-clock time and
//! resident memory around it.

use crate::mem::process_resident_bytes;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

const SAMPLE_EVERY: Duration = Duration::from_millis(50);

/// Timing and memory observed around one call.
#[derive(Clone, Debug)]
pub struct RunReport {
    pub label: String,
    pub elapsed: Duration,
    pub rss_before: Option<u64>,
    pub rss_after: Option<u64>,
    /// Highest sampled resident size while the call ran.
    pub rss_peak: Option<u64>,
}

impl RunReport {
    /// Peak growth over the starting resident size.
    pub fn peak_increment(&self) -> Option<u64> {
        Some(self.rss_peak?.saturating_sub(self.rss_before?))
    }
}

fn mib(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}]", self.label)?;
        write!(f, "Total execution time: {:.6} seconds", self.elapsed.as_secs_f64())?;
        if let (Some(before), Some(peak)) = (self.rss_before, self.rss_peak) {
            write!(
                f,
                "\nMemory: {:.1} MiB at start, {:.1} MiB peak (+{:.1} MiB)",
                mib(before),
                mib(peak),
                mib(peak.saturating_sub(before))
            )?;
        }
        if let Some(after) = self.rss_after {
            write!(f, "\nMemory at end: {:.1} MiB", mib(after))?;
        }
        Ok(())
    }
}

/// Run `f`, sampling resident memory on a side thread until it returns.
pub fn profile<T>(label: impl Into<String>, f: impl FnOnce() -> T) -> (T, RunReport) {
    let label = label.into();
    let rss_before = process_resident_bytes();

    let peak = Arc::new(AtomicU64::new(rss_before.unwrap_or(0)));
    let done = Arc::new(AtomicBool::new(false));
    let sampler = {
        let peak = Arc::clone(&peak);
        let done = Arc::clone(&done);
        thread::Builder::new()
            .name("tweetstats-rss-sampler".into())
            .spawn(move || {
                while !done.load(Ordering::Relaxed) {
                    if let Some(rss) = process_resident_bytes() {
                        peak.fetch_max(rss, Ordering::Relaxed);
                    }
                    thread::sleep(SAMPLE_EVERY);
                }
            })
            .ok()
    };

    let started = Instant::now();
    let out = f();
    let elapsed = started.elapsed();

    done.store(true, Ordering::Relaxed);
    if let Some(handle) = sampler {
        if handle.join().is_err() {
            tracing::debug!(label = %label, "rss sampler panicked; peak taken from end sample");
        }
    }
    let rss_after = process_resident_bytes();
    if let Some(rss) = rss_after {
        peak.fetch_max(rss, Ordering::Relaxed);
    }
    let rss_peak = rss_before.map(|_| peak.load(Ordering::Relaxed));

    let report = RunReport { label, elapsed, rss_before, rss_after, rss_peak };
    tracing::debug!(label = %report.label, elapsed_ms = elapsed.as_millis() as u64, "run measured");
    (out, report)
}
