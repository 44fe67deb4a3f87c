// src/metrics.rs
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Default)]
pub struct Metrics {
    pub datagrams_total: AtomicU64,
    pub dropped_malformed: AtomicU64,
    pub bad_request_total: AtomicU64,
    pub reservations_created: AtomicU64,
    pub reservations_expired: AtomicU64,
    pub redemptions_total: AtomicU64,
    pub send_errors: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn inc_datagrams(&self) {
        self.datagrams_total.fetch_add(1, Ordering::Relaxed);
    }
    #[inline]
    pub fn inc_malformed(&self) {
        self.dropped_malformed.fetch_add(1, Ordering::Relaxed);
    }
    #[inline]
    pub fn inc_bad_request(&self) {
        self.bad_request_total.fetch_add(1, Ordering::Relaxed);
    }
    #[inline]
    pub fn inc_reservations(&self) {
        self.reservations_created.fetch_add(1, Ordering::Relaxed);
    }
    #[inline]
    pub fn add_expired(&self, n: u64) {
        self.reservations_expired.fetch_add(n, Ordering::Relaxed);
    }
    #[inline]
    pub fn inc_redemptions(&self) {
        self.redemptions_total.fetch_add(1, Ordering::Relaxed);
    }
    #[inline]
    pub fn inc_send_errors(&self) {
        self.send_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// One-line counter dump for the periodic log summary.
    pub fn summary(&self) -> String {
        format!(
            "datagrams={} malformed={} bad_request={} reservations={} expired={} redemptions={} send_errors={}",
            self.datagrams_total.load(Ordering::Relaxed),
            self.dropped_malformed.load(Ordering::Relaxed),
            self.bad_request_total.load(Ordering::Relaxed),
            self.reservations_created.load(Ordering::Relaxed),
            self.reservations_expired.load(Ordering::Relaxed),
            self.redemptions_total.load(Ordering::Relaxed),
            self.send_errors.load(Ordering::Relaxed),
        )
    }
}
