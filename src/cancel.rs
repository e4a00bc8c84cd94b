//! Cooperative cancellation
//!
//! A run is halted by setting a shared flag that every stage polls at its
//! checkpoints. The first Ctrl-C sets the flag so the run can stop between
//! steps; a second Ctrl-C exits the process immediately.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::warn;

/// Exit code reported when a run is interrupted (128 + SIGINT)
pub const INTERRUPTED_EXIT_CODE: u8 = 130;

/// Shared, externally settable cancellation flag
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a token that is not cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Check whether cancellation was requested, without blocking
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Cancel the token on the first Ctrl-C and exit on the second.
///
/// The returned handle may be aborted once the run is over.
pub fn install_interrupt_handler(token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        warn!("interrupted, stopping after the current step (Ctrl-C again to abort)");
        token.cancel();

        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nInterrupted");
            std::process::exit(i32::from(INTERRUPTED_EXIT_CODE));
        }
    })
}
