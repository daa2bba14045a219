//! Page visibility signal.
//!
//! Hosts publish visibility changes through a [`VisibilitySignal`]; a
//! controller in an automatic trigger mode subscribes and starts or stops
//! itself as the page goes hidden or visible. The signal is a level, not a
//! queue: subscribers observe the latest state and a change notification.

use std::sync::Arc;

use tokio::sync::watch;

// ============================================================================
// Visibility
// ============================================================================

/// Foreground visibility of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// The page is in the foreground.
    Visible,
    /// The page is backgrounded.
    Hidden,
}

impl Visibility {
    /// Returns true for [`Visibility::Hidden`].
    pub fn is_hidden(self) -> bool {
        matches!(self, Visibility::Hidden)
    }

    /// Maps a boolean hidden flag to a visibility value.
    pub fn from_hidden(hidden: bool) -> Self {
        if hidden {
            Visibility::Hidden
        } else {
            Visibility::Visible
        }
    }
}

// ============================================================================
// VisibilitySignal
// ============================================================================

/// Cloneable handle to a visibility-change channel.
///
/// Pages start visible. Publishing the same state twice is harmless; the
/// controller's start/stop idempotence absorbs duplicate events.
#[derive(Debug, Clone)]
pub struct VisibilitySignal {
    tx: Arc<watch::Sender<Visibility>>,
}

impl VisibilitySignal {
    /// Creates a signal in the [`Visibility::Visible`] state.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Visibility::Visible);
        Self { tx: Arc::new(tx) }
    }

    /// Publishes a visibility change.
    pub fn publish(&self, visibility: Visibility) {
        self.tx.send_replace(visibility);
    }

    /// Publishes a visibility change from a boolean hidden flag.
    pub fn set_hidden(&self, hidden: bool) {
        self.publish(Visibility::from_hidden(hidden));
    }

    /// Returns true if the page is currently hidden.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.tx.borrow().is_hidden()
    }

    /// Subscribes to subsequent visibility changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Visibility> {
        self.tx.subscribe()
    }
}

impl Default for VisibilitySignal {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
