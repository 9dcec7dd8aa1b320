//! scheduler - Per-frame callback abstraction
//!
//! The engine never owns a timer. It asks a [`TickSource`] for the next
//! frame and withdraws that request on stop, which lets hosts drive it from
//! a display refresh callback and lets tests drive it with synthetic time.

use heapless::Vec;

/// Handle for one pending frame request.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TickId(pub u64);

pub trait TickSource {
    /// Schedule one call to the engine's `tick` on the next frame.
    fn request_tick(&mut self) -> TickId;

    /// Withdraw a request made by [`TickSource::request_tick`]. Cancelling a
    /// request that already fired is harmless.
    fn cancel_tick(&mut self, id: TickId);
}

impl<T: TickSource + ?Sized> TickSource for &mut T {
    fn request_tick(&mut self) -> TickId {
        (**self).request_tick()
    }

    fn cancel_tick(&mut self, id: TickId) {
        (**self).cancel_tick(id)
    }
}

/// Maximum outstanding requests a [`ManualTicks`] tracks.
pub const MANUAL_PENDING_CAPACITY: usize = 8;

/// Tick source for hosts that poll, and for tests.
///
/// Requests are queued until [`ManualTicks::take_due`] pops them.
#[derive(Debug, Default)]
pub struct ManualTicks {
    next_id: u64,
    pending: Vec<TickId, MANUAL_PENDING_CAPACITY>,
    requested: u64,
    cancelled: u64,
}

impl ManualTicks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests not yet fired or cancelled.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn requested(&self) -> u64 {
        self.requested
    }

    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }

    /// Pop the oldest pending request, if any. The caller should then run
    /// the engine's tick.
    pub fn take_due(&mut self) -> Option<TickId> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.pending.remove(0))
        }
    }
}

impl TickSource for ManualTicks {
    fn request_tick(&mut self) -> TickId {
        let id = TickId(self.next_id);
        self.next_id += 1;
        self.requested += 1;
        if self.pending.push(id).is_err() {
            // Drop the oldest; only the newest requests can still fire.
            self.pending.remove(0);
            let _ = self.pending.push(id);
        }
        id
    }

    fn cancel_tick(&mut self, id: TickId) {
        if let Some(pos) = self.pending.iter().position(|p| *p == id) {
            self.pending.remove(pos);
            self.cancelled += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_fire_in_order() {
        let mut ticks = ManualTicks::new();
        let a = ticks.request_tick();
        let b = ticks.request_tick();
        assert_ne!(a, b);
        assert_eq!(ticks.pending(), 2);
        assert_eq!(ticks.take_due(), Some(a));
        assert_eq!(ticks.take_due(), Some(b));
        assert_eq!(ticks.take_due(), None);
    }

    #[test]
    fn cancel_withdraws_pending_request() {
        let mut ticks = ManualTicks::new();
        let id = ticks.request_tick();
        ticks.cancel_tick(id);
        assert_eq!(ticks.pending(), 0);
        assert_eq!(ticks.cancelled(), 1);

        // Already gone, nothing to count.
        ticks.cancel_tick(id);
        assert_eq!(ticks.cancelled(), 1);
    }

    #[test]
    fn overflow_keeps_newest_requests() {
        let mut ticks = ManualTicks::new();
        let ids: std::vec::Vec<TickId> = (0..MANUAL_PENDING_CAPACITY + 2)
            .map(|_| ticks.request_tick())
            .collect();
        assert_eq!(ticks.pending(), MANUAL_PENDING_CAPACITY);
        assert_eq!(ticks.take_due(), Some(ids[2]));
    }
}
