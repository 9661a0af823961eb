//! Start-slot pacing for concurrent TMDB requests.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Default spacing between request starts (~40 req/s).
const DEFAULT_SPACING: Duration = Duration::from_millis(25);

/// Hands out request start slots spaced at least `spacing` apart.
///
/// A section batch fires every listing at once. Each request reserves the
/// next free slot under a short lock and sleeps outside it, so waiters
/// queue up in reservation order without holding the lock.
#[derive(Debug)]
pub struct RequestPacer {
    spacing: Duration,
    next_slot: Option<Instant>,
}

impl RequestPacer {
    pub(crate) const fn new(spacing: Duration) -> Self {
        Self {
            spacing,
            next_slot: None,
        }
    }

    pub(crate) const fn with_default_spacing() -> Self {
        Self::new(DEFAULT_SPACING)
    }

    /// Reserves the next start slot. `None` means the caller may start now.
    pub(crate) fn reserve(&mut self) -> Option<Instant> {
        if self.spacing.is_zero() {
            return None;
        }

        let now = Instant::now();
        let slot = self.next_slot.map_or(now, |next| next.max(now));
        self.next_slot = slot.checked_add(self.spacing);
        (slot > now).then_some(slot)
    }
}

/// Waits for a start slot from a pacer shared between requests.
pub(crate) async fn pace(pacer: &Mutex<RequestPacer>) {
    let slot = pacer.lock().await.reserve();
    if let Some(slot) = slot {
        tokio::time::sleep_until(slot).await;
    }
}
