//! Search statistics tracking.

use std::time::Instant;

use crate::memo::MemoTable;

/// Peak resident set size of this process in bytes, if the platform reports it.
#[cfg(unix)]
pub fn peak_rss_bytes() -> Option<u64> {
    let mut usage = std::mem::MaybeUninit::<libc::rusage>::zeroed();
    // SAFETY: getrusage only writes into the struct we hand it
    if unsafe { libc::getrusage(libc::RUSAGE_SELF, usage.as_mut_ptr()) } != 0 {
        return None;
    }
    // SAFETY: zero-initialised and filled in on success
    let max_rss = unsafe { usage.assume_init() }.ru_maxrss;

    // macOS reports bytes, everything else KiB
    let scale = if cfg!(target_os = "macos") { 1 } else { 1024 };
    u64::try_from(max_rss).ok().map(|rss| rss * scale)
}

#[cfg(not(unix))]
pub fn peak_rss_bytes() -> Option<u64> {
    None
}

/// Byte count in binary units, one decimal above 1 KiB.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

/// Statistics collected during a memoized search.
#[derive(Debug, Default)]
pub struct SearchStats {
    /// Every board the search touched, root included
    pub nodes: u64,

    /// Boards whose children were expanded (and then stored)
    pub positions_evaluated: u64,

    /// Boards scored directly (ply budget spent or board full)
    pub leaves: u64,

    /// Memo lookups answered from the table
    pub cache_hits: u64,

    /// Memo lookups that missed
    pub cache_misses: u64,

    /// Stores that overwrote a valid entry for another key
    pub evictions: u64,

    /// Deepest ply expanded
    pub max_ply: u16,

    /// For rate calculation
    start_time: Option<Instant>,
    last_log_time: Option<Instant>,
    last_log_nodes: u64,
}

impl SearchStats {
    pub fn new() -> Self {
        Self {
            start_time: Some(Instant::now()),
            last_log_time: Some(Instant::now()),
            ..Default::default()
        }
    }

    /// Fraction of memo lookups that hit, in percent.
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.cache_hits + self.cache_misses;
        if lookups == 0 {
            0.0
        } else {
            100.0 * self.cache_hits as f64 / lookups as f64
        }
    }

    /// Get current nodes per second
    pub fn nodes_per_sec(&self) -> f64 {
        if let Some(start) = self.start_time {
            let elapsed = start.elapsed().as_secs_f64();
            if elapsed > 0.0 {
                return self.nodes as f64 / elapsed;
            }
        }
        0.0
    }

    /// Check if we should log progress
    pub fn should_log(&self, interval_secs: u64) -> bool {
        if let Some(last) = self.last_log_time {
            last.elapsed().as_secs() >= interval_secs
        } else {
            true
        }
    }

    /// Log progress and reset log timer
    pub fn log_progress(&mut self, table: &MemoTable) {
        let now = Instant::now();
        let elapsed_total = self.start_time.map(|s| s.elapsed().as_secs()).unwrap_or(0);

        // Calculate rate since last log
        let rate = if let Some(last) = self.last_log_time {
            let elapsed = last.elapsed().as_secs_f64();
            let nodes = self.nodes - self.last_log_nodes;
            if elapsed > 0.0 {
                nodes as f64 / elapsed
            } else {
                0.0
            }
        } else {
            self.nodes_per_sec()
        };

        let mem_str = peak_rss_bytes()
            .map(|m| format!(" peak_rss={}", format_bytes(m)))
            .unwrap_or_default();

        log::info!(
            "[{:02}:{:02}:{:02}] nodes={} expanded={} leaves={} hits={:.1}% evictions={} rate={:.0}/s ply={} table={}/{}{}",
            elapsed_total / 3600,
            (elapsed_total % 3600) / 60,
            elapsed_total % 60,
            self.nodes,
            self.positions_evaluated,
            self.leaves,
            self.hit_rate(),
            self.evictions,
            rate,
            self.max_ply,
            table.occupied(),
            table.capacity(),
            mem_str,
        );

        self.last_log_time = Some(now);
        self.last_log_nodes = self.nodes;
    }

    /// Log final summary
    pub fn log_summary(&self, table: &MemoTable) {
        log::info!("Nodes visited: {}", self.nodes);
        log::info!("Positions evaluated: {}", self.positions_evaluated);
        log::info!("Leaves scored: {}", self.leaves);
        log::info!(
            "Cache hits: {} / misses: {} ({:.1}% hit rate)",
            self.cache_hits,
            self.cache_misses,
            self.hit_rate()
        );
        log::info!("Evictions: {}", self.evictions);
        log::info!("Max ply: {}", self.max_ply);
        log::info!(
            "Memo table: {} of {} slots in use, {}",
            table.occupied(),
            table.capacity(),
            format_bytes(table.memory_bytes() as u64)
        );
        if let Some(mem) = peak_rss_bytes() {
            log::info!("Peak resident memory: {}", format_bytes(mem));
        }

        if let Some(start) = self.start_time {
            let elapsed = start.elapsed().as_secs_f64();
            log::info!(
                "Time: {:.3}s, average rate: {:.0} nodes/sec",
                elapsed,
                self.nodes as f64 / elapsed.max(f64::EPSILON)
            );
        }
    }
}
