use std::sync::atomic::{AtomicBool, Ordering};

/// Lets at most one search run at a time.
///
/// Acquisition never waits: a second caller is turned away while a permit is
/// outstanding. Share one instance (behind an `Arc`) between every command
/// that must be mutually exclusive.
#[derive(Debug, Default)]
pub struct SingleFlight {
    busy: AtomicBool,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }
    /// Takes the flag if it is free. The returned permit clears it on drop.
    pub fn try_acquire(&self) -> Option<FlightPermit<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FlightPermit { flight: self })
    }
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Proof of holding a [`SingleFlight`].
#[derive(Debug)]
pub struct FlightPermit<'f> {
    flight: &'f SingleFlight,
}

impl Drop for FlightPermit<'_> {
    fn drop(&mut self) {
        self.flight.busy.store(false, Ordering::Release);
    }
}
