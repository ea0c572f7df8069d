#[cfg(feature = "cli")]
use std::sync::Mutex;
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, RefreshKind, System};

/// Timing of one compile phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseStats {
    pub phase: &'static str,
    pub elapsed: Duration,
    pub memory_mb: Option<u64>,
}

/// Logs how long each compile phase took; with monitoring enabled (and the `cli`
/// feature) it also samples the process' resident memory.
pub struct CompileMonitor {
    enabled: bool,
    start_time: Instant,
    phase_start: Instant,
    #[cfg(feature = "cli")]
    system: Option<(Mutex<System>, Pid)>,
}

impl CompileMonitor {
    pub fn new(enabled: bool) -> Self {
        let now = Instant::now();
        Self {
            enabled,
            start_time: now,
            phase_start: now,
            #[cfg(feature = "cli")]
            system: if enabled {
                sysinfo::get_current_pid().ok().map(|pid| {
                    let mut system = System::new_with_specifics(RefreshKind::everything());
                    system.refresh_all();
                    (Mutex::new(system), pid)
                })
            } else {
                None
            },
        }
    }

    #[cfg(feature = "cli")]
    fn memory_mb(&self) -> Option<u64> {
        let (system, pid) = self.system.as_ref()?;
        let mut system = system.lock().ok()?;
        system.refresh_all();
        system.process(*pid).map(|process| process.memory() / 1024 / 1024)
    }

    #[cfg(not(feature = "cli"))]
    fn memory_mb(&self) -> Option<u64> {
        None
    }

    /// Closes the current phase and starts timing the next one.
    pub fn finish_phase(&mut self, phase: &'static str) -> PhaseStats {
        let stats = PhaseStats {
            phase,
            elapsed: self.phase_start.elapsed(),
            memory_mb: if self.enabled { self.memory_mb() } else { None },
        };
        self.phase_start = Instant::now();

        match stats.memory_mb {
            Some(memory) => tracing::info!(
                "📊 {} - Time: {:?}, Memory: {}MB",
                stats.phase,
                stats.elapsed,
                memory
            ),
            None if self.enabled => tracing::info!("📊 {} - Time: {:?}", stats.phase, stats.elapsed),
            None => tracing::debug!("{} finished in {:?}", stats.phase, stats.elapsed),
        }

        stats
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for CompileMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}
