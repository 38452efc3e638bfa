//! Signal handling for graceful shutdown.
//!
//! Centralized Ctrl+C handling built on an `AtomicBool` flag shared across
//! the scan tasks. When the flag is raised, the walker stops spawning new
//! work, in-flight tasks drain, and the partial report is still delivered.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shutdown handler wrapping the shared cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandler {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandler {
    /// Create a handler with the flag initially cleared.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if shutdown has been requested.
    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Raise the shutdown flag.
    pub fn request_shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Get the flag to share with scan tasks.
    #[must_use]
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }
}

/// Install a Ctrl+C handler that raises the shutdown flag.
///
/// Returns the handler whose flag the scan configuration should carry.
pub fn install_handler() -> anyhow::Result<ShutdownHandler> {
    let handler = ShutdownHandler::new();
    let flag = handler.flag();

    ctrlc::set_handler(move || {
        eprintln!("Interrupted, draining in-flight tasks...");
        flag.store(true, Ordering::SeqCst);
    })?;

    Ok(handler)
}
