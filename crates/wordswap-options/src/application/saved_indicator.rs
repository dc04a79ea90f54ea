//! SavedIndicator: the transient "saved" confirmation shown after a save.
//!
//! Each call to [`SavedIndicator::show`] turns the indicator on and starts an
//! auto-hide timer.  If a previous timer is still pending it is aborted first,
//! so a burst of saves keeps the indicator continuously visible and it hides
//! once, `delay` after the last save.
//!
//! ```text
//! show()          show()                      hidden
//!   │──── 500ms ────│──────── 800ms ────────────│
//!   visible ───────────────────────────────────►│
//! ```
//!
//! The indicator owns its timer task: dropping the indicator aborts it.
//! Observers follow the state through a `tokio::sync::watch` channel.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::trace;

/// How long the confirmation stays visible after the last save.
pub const SAVED_INDICATOR_DELAY: Duration = Duration::from_millis(800);

/// Cancellable auto-hide flag.
pub struct SavedIndicator {
    delay: Duration,
    visible: Arc<watch::Sender<bool>>,
    pending: Option<JoinHandle<()>>,
}

impl SavedIndicator {
    /// Creates a hidden indicator using [`SAVED_INDICATOR_DELAY`].
    pub fn new() -> Self {
        Self::with_delay(SAVED_INDICATOR_DELAY)
    }

    /// Creates a hidden indicator that auto-hides after `delay`.
    pub fn with_delay(delay: Duration) -> Self {
        let (tx, _rx) = watch::channel(false);
        Self {
            delay,
            visible: Arc::new(tx),
            pending: None,
        }
    }

    /// Shows the indicator and (re)starts the auto-hide timer.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn show(&mut self) {
        if let Some(previous) = self.pending.take() {
            trace!("restarting saved indicator timer");
            previous.abort();
        }
        self.visible.send_replace(true);

        let visible = Arc::clone(&self.visible);
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            visible.send_replace(false);
        }));
    }

    /// Hides the indicator immediately and cancels any pending timer.
    pub fn hide(&mut self) {
        if let Some(previous) = self.pending.take() {
            previous.abort();
        }
        self.visible.send_replace(false);
    }

    pub fn is_visible(&self) -> bool {
        *self.visible.borrow()
    }

    /// Returns a receiver that observes every visibility change.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.visible.subscribe()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for SavedIndicator {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SavedIndicator {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}
