#[cfg(feature = "cli")]
use std::sync::atomic::{AtomicU64, Ordering};
#[cfg(feature = "cli")]
use std::sync::Mutex;
#[cfg(feature = "cli")]
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, RefreshKind, System};

#[cfg(feature = "cli")]
#[derive(Debug, Clone)]
pub struct ReplayStats {
    pub ops_applied: u64,
    pub memory_usage_mb: u64,
    pub peak_memory_mb: u64,
    pub elapsed_time: Duration,
}

/// Per-run stats for long replay sessions: operations applied, elapsed
/// time and process memory.
#[cfg(feature = "cli")]
pub struct ReplayMonitor {
    system: Mutex<System>,
    pid: Pid,
    start_time: Instant,
    ops_applied: AtomicU64,
    peak_memory: Mutex<u64>,
    enabled: bool,
}

#[cfg(feature = "cli")]
impl ReplayMonitor {
    pub fn new(enabled: bool) -> Self {
        let mut system = System::new_with_specifics(RefreshKind::everything());
        let pid = sysinfo::get_current_pid().expect("Failed to get current PID");

        // 初始刷新
        system.refresh_all();

        Self {
            system: Mutex::new(system),
            pid,
            start_time: Instant::now(),
            ops_applied: AtomicU64::new(0),
            peak_memory: Mutex::new(0),
            enabled,
        }
    }

    pub fn record_op(&self) {
        self.ops_applied.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_stats(&self) -> Option<ReplayStats> {
        if !self.enabled {
            return None;
        }

        let mut system = self.system.lock().ok()?;
        system.refresh_all();

        let process = system.process(self.pid)?;
        let memory_mb = process.memory() / 1024 / 1024;

        // 更新峰值記憶體
        let mut peak = self.peak_memory.lock().ok()?;
        if memory_mb > *peak {
            *peak = memory_mb;
        }
        let peak_memory = *peak;

        Some(ReplayStats {
            ops_applied: self.ops_applied.load(Ordering::Relaxed),
            memory_usage_mb: memory_mb,
            peak_memory_mb: peak_memory,
            elapsed_time: self.start_time.elapsed(),
        })
    }

    pub fn log_stats(&self, phase: &str) {
        if let Some(stats) = self.get_stats() {
            tracing::info!(
                "📊 {} - Ops: {}, Memory: {}MB, Peak: {}MB, Time: {:?}",
                phase,
                stats.ops_applied,
                stats.memory_usage_mb,
                stats.peak_memory_mb,
                stats.elapsed_time
            );
        }
    }

    pub fn log_final_stats(&self) {
        if let Some(stats) = self.get_stats() {
            tracing::info!(
                "📊 Final Stats - Ops: {}, Total Time: {:?}, Peak Memory: {}MB",
                stats.ops_applied,
                stats.elapsed_time,
                stats.peak_memory_mb
            );
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

// 為非CLI環境提供空實現
#[cfg(not(feature = "cli"))]
pub struct ReplayMonitor;

#[cfg(not(feature = "cli"))]
impl ReplayMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn record_op(&self) {}

    pub fn log_stats(&self, _phase: &str) {}

    pub fn log_final_stats(&self) {}

    pub fn is_enabled(&self) -> bool {
        false
    }
}
