//! Keep-active hint
//!
//! Stands in for a platform wake lock: while held, the host should keep the
//! display awake. The controller holds it exactly while playing.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Capability to keep the display or device from sleeping
pub trait KeepActive: Send {
    fn acquire(&mut self);
    fn release(&mut self);
    fn is_held(&self) -> bool;
}

/// Shared in-process hint; clones observe the same flag
#[derive(Debug, Clone)]
pub struct HintFlag {
    name: &'static str,
    held: Arc<AtomicBool>,
    acquisitions: Arc<AtomicU64>,
}

impl HintFlag {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            held: Arc::new(AtomicBool::new(false)),
            acquisitions: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Number of times the hint went from released to held
    pub fn acquisitions(&self) -> u64 {
        self.acquisitions.load(Ordering::SeqCst)
    }
}

impl Default for HintFlag {
    fn default() -> Self {
        Self::new("vidstream")
    }
}

impl KeepActive for HintFlag {
    fn acquire(&mut self) {
        if !self.held.swap(true, Ordering::SeqCst) {
            self.acquisitions.fetch_add(1, Ordering::SeqCst);
            debug!(hint = self.name, "Keep-active hint acquired");
        }
    }

    fn release(&mut self) {
        if self.held.swap(false, Ordering::SeqCst) {
            debug!(hint = self.name, "Keep-active hint released");
        }
    }

    fn is_held(&self) -> bool {
        self.held.load(Ordering::SeqCst)
    }
}
