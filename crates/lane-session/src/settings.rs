//! # Session Settings
//!
//! Externally-configured values the session reads at use time. There is one
//! today: the scan cooldown. The settings UI writes it, the debouncer reads
//! it on every evaluation, so a change applies to the next scan rather than
//! retroactively.

use std::sync::atomic::{AtomicU64, Ordering};

/// Default minimum interval between two accepted scans.
pub const DEFAULT_SCAN_COOLDOWN_MS: u64 = 1000;

/// Mutable session settings, shareable across the UI thread and the scan
/// worker without locking.
#[derive(Debug)]
pub struct Settings {
    scan_cooldown_ms: AtomicU64,
}

impl Settings {
    pub fn new() -> Self {
        Settings {
            scan_cooldown_ms: AtomicU64::new(DEFAULT_SCAN_COOLDOWN_MS),
        }
    }

    pub fn with_scan_cooldown_ms(ms: u64) -> Self {
        Settings {
            scan_cooldown_ms: AtomicU64::new(ms),
        }
    }

    /// Current cooldown in milliseconds.
    pub fn scan_cooldown_ms(&self) -> u64 {
        self.scan_cooldown_ms.load(Ordering::Relaxed)
    }

    /// Updates the cooldown. Takes effect on the next scan evaluation.
    pub fn set_scan_cooldown_ms(&self, ms: u64) {
        self.scan_cooldown_ms.store(ms, Ordering::Relaxed);
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings::new()
    }
}
