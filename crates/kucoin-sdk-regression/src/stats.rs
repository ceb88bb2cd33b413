/*
[INPUT]:  Counter updates from REST polls, WS callbacks and WS cycles
[OUTPUT]: Snapshot-friendly run statistics for periodic log lines
[POS]:    Shared runtime counters between regression loops
[UPDATE]: When adding/removing long-run signals
*/

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStatsSnapshot {
    pub rest_calls: u64,
    pub rest_errors: u64,
    pub last_symbol_count: u64,
    pub ws_messages: u64,
    pub ws_cycles: u64,
    pub ws_errors: u64,
    pub uptime_secs: u64,
}

impl std::fmt::Display for RunStatsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "uptime={}s rest={} rest_err={} symbols={} ws_msg={} ws_cycles={} ws_err={}",
            self.uptime_secs,
            self.rest_calls,
            self.rest_errors,
            self.last_symbol_count,
            self.ws_messages,
            self.ws_cycles,
            self.ws_errors
        )
    }
}

/// Lock-free counters shared by every loop of a long run
#[derive(Debug)]
pub struct RunStats {
    started: Instant,
    rest_calls: AtomicU64,
    rest_errors: AtomicU64,
    last_symbol_count: AtomicU64,
    ws_messages: AtomicU64,
    ws_cycles: AtomicU64,
    ws_errors: AtomicU64,
}

impl Default for RunStats {
    fn default() -> Self {
        Self {
            started: Instant::now(),
            rest_calls: AtomicU64::new(0),
            rest_errors: AtomicU64::new(0),
            last_symbol_count: AtomicU64::new(0),
            ws_messages: AtomicU64::new(0),
            ws_cycles: AtomicU64::new(0),
            ws_errors: AtomicU64::new(0),
        }
    }
}

impl RunStats {
    pub fn snapshot(&self) -> RunStatsSnapshot {
        RunStatsSnapshot {
            rest_calls: self.rest_calls.load(Ordering::Relaxed),
            rest_errors: self.rest_errors.load(Ordering::Relaxed),
            last_symbol_count: self.last_symbol_count.load(Ordering::Relaxed),
            ws_messages: self.ws_messages.load(Ordering::Relaxed),
            ws_cycles: self.ws_cycles.load(Ordering::Relaxed),
            ws_errors: self.ws_errors.load(Ordering::Relaxed),
            uptime_secs: self.started.elapsed().as_secs(),
        }
    }

    pub fn record_symbols(&self, count: usize) {
        self.rest_calls.fetch_add(1, Ordering::Relaxed);
        self.last_symbol_count.store(count as u64, Ordering::Relaxed);
    }

    pub fn record_rest_error(&self) {
        self.rest_calls.fetch_add(1, Ordering::Relaxed);
        self.rest_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_ws_message(&self) {
        self.ws_messages.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_ws_cycle(&self) {
        self.ws_cycles.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_ws_error(&self) {
        self.ws_errors.fetch_add(1, Ordering::Relaxed);
    }
}
