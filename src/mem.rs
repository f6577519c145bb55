//! One shared sysinfo handle for the chunk producer (host headroom) and the
//! run reporter (our own RSS).

use std::sync::{Mutex, OnceLock};
use std::time::{Duration, Instant};
use sysinfo::{Pid, ProcessExt, System, SystemExt};

struct MemState {
    sys: System,
    pid: Option<Pid>,
    last_check: Instant,
    last_frac: f64,
}

static STATE: OnceLock<Mutex<MemState>> = OnceLock::new();
const REFRESH_EVERY: Duration = Duration::from_millis(500);

fn with_state<T>(f: impl FnOnce(&mut MemState) -> T) -> T {
    let m = STATE.get_or_init(|| {
        let mut s = System::new();
        s.refresh_memory();
        Mutex::new(MemState {
            sys: s,
            pid: sysinfo::get_current_pid().ok(),
            last_check: Instant::now() - REFRESH_EVERY * 2,
            last_frac: 1.0,
        })
    });
    let mut guard = m.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    f(&mut guard)
}

/// Available / total host memory, refreshed at most every `REFRESH_EVERY`.
pub fn available_memory_fraction() -> f64 {
    with_state(|st| {
        let now = Instant::now();
        if now.duration_since(st.last_check) >= REFRESH_EVERY {
            st.sys.refresh_memory();
            let total = st.sys.total_memory() as f64;
            let avail = st.sys.available_memory() as f64;
            st.last_frac = if total > 0.0 { (avail / total).clamp(0.0, 1.0) } else { 1.0 };
            st.last_check = now;
        }
        st.last_frac
    })
}

pub fn is_low_memory(threshold: f64) -> bool {
    available_memory_fraction() < threshold
}

/// Sleep briefly when host memory is under `threshold`. The producer calls
/// this before each chunk; returns whether it slept.
pub fn maybe_throttle_low_memory(threshold: f64) -> bool {
    if threshold > 0.0 && is_low_memory(threshold) {
        std::thread::sleep(Duration::from_millis(25));
        return true;
    }
    false
}

/// Resident set size of this process in bytes, if the platform reports it.
pub fn process_resident_bytes() -> Option<u64> {
    with_state(|st| {
        let pid = st.pid?;
        if !st.sys.refresh_process(pid) {
            return None;
        }
        st.sys.process(pid).map(|p| p.memory())
    })
}
