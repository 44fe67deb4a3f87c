// src/server.rs
//! Request dispatcher, handlers, expiration sweep and the UDP run loop.
//!
//! The server is logically single-threaded: one task owns the socket, one
//! reusable receive buffer and all state. Each loop iteration blocks on
//! exactly one receive, reads the wall clock once, sweeps expired
//! reservations, runs one handler to completion and sends at most one
//! reply. Malformed datagrams are dropped without a reply; only semantic
//! failures produce BAD_REQUEST.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use bytes::Bytes;
use tokio::net::UdpSocket;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::ids::Cookie;
use crate::metrics::Metrics;
use crate::parser::{self, Request};
use crate::store::ReservationStore;
use crate::wire::{self, MAX_TICKETS_PER_RESERVATION};

const SUMMARY_EVERY: u64 = 10_000;

pub fn unix_now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

pub struct TicketServer {
    catalog: Catalog,
    store: ReservationStore,
    timeout: u64,
    metrics: Arc<Metrics>,
}

impl TicketServer {
    pub fn new(catalog: Catalog, timeout: u64, metrics: Arc<Metrics>) -> Self {
        Self {
            catalog,
            store: ReservationStore::new(),
            timeout,
            metrics,
        }
    }

    #[inline]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[inline]
    pub fn store(&self) -> &ReservationStore {
        &self.store
    }

    #[inline]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Process one inbound payload at wall-clock second `now`. Returns the
    /// reply frame, or `None` when the datagram is dropped silently.
    pub fn handle_datagram(&mut self, payload: &[u8], now: u64) -> Option<Bytes> {
        self.metrics.inc_datagrams();

        if payload.is_empty() {
            self.metrics.inc_malformed();
            debug!("dropping empty datagram");
            return None;
        }

        let reclaimed = self.store.sweep_expired(now, &mut self.catalog);
        if reclaimed > 0 {
            self.metrics.add_expired(reclaimed as u64);
            debug!("expired {reclaimed} reservations");
        }

        match parser::decode(payload) {
            Ok(Request::GetEvents) => Some(wire::encode_events(&self.catalog)),
            Ok(Request::GetReservation { event_id, ticket_count }) => {
                Some(self.reserve(event_id, ticket_count, now))
            }
            Ok(Request::GetTickets { reservation_id, cookie }) => {
                Some(self.redeem(reservation_id, &cookie))
            }
            Err(e) => {
                self.metrics.inc_malformed();
                debug!("dropping malformed datagram: {e}");
                None
            }
        }
    }

    fn reserve(&mut self, event_id: u32, ticket_count: u16, now: u64) -> Bytes {
        let Some(ev) = self.catalog.get(event_id) else {
            return self.bad_request(event_id, "unknown event");
        };
        if ticket_count == 0 || ticket_count > MAX_TICKETS_PER_RESERVATION {
            return self.bad_request(event_id, "ticket count out of range");
        }
        if ticket_count > ev.available {
            return self.bad_request(event_id, "not enough tickets available");
        }

        self.catalog.debit(event_id, ticket_count);
        let expiration = now + self.timeout;
        let r = self.store.create(event_id, ticket_count, expiration);
        self.metrics.inc_reservations();
        debug!(
            "reservation {} created: event={event_id} tickets={ticket_count} expires={expiration}",
            r.id
        );
        wire::encode_reservation(r)
    }

    fn redeem(&mut self, reservation_id: u32, cookie: &Cookie) -> Bytes {
        let valid = self
            .store
            .get(reservation_id)
            .is_some_and(|r| r.cookie == *cookie);
        if !valid {
            return self.bad_request(reservation_id, "unknown reservation or cookie mismatch");
        }

        self.metrics.inc_redemptions();
        match self.store.redeem(reservation_id) {
            Some(codes) => wire::encode_tickets(reservation_id, codes),
            // unreachable given the check above; kept total
            None => wire::encode_bad_request(reservation_id),
        }
    }

    fn bad_request(&self, offending_id: u32, why: &str) -> Bytes {
        self.metrics.inc_bad_request();
        debug!("bad request (id={offending_id}): {why}");
        wire::encode_bad_request(offending_id)
    }

    pub fn assert_invariants(&self) {
        self.store.assert_invariants(&self.catalog);
    }
}

/// Drive the server over a bound socket until a receive error. Send errors
/// and partial sends lose the reply datagram and the loop continues; a
/// receive error indicates socket corruption and tears the server down.
pub async fn run(socket: UdpSocket, mut server: TicketServer) -> Result<()> {
    let mut buf = vec![0u8; wire::MAX_DATAGRAM];
    let mut received: u64 = 0;

    loop {
        let (len, peer) = socket
            .recv_from(&mut buf)
            .await
            .context("receive on udp socket")?;
        received += 1;

        let now = unix_now_secs();
        if let Some(reply) = server.handle_datagram(&buf[..len], now) {
            match socket.send_to(&reply, peer).await {
                Ok(sent) if sent != reply.len() => {
                    server.metrics().inc_send_errors();
                    warn!("partial send to {peer}: {sent} of {} bytes", reply.len());
                }
                Ok(_) => {}
                Err(e) => {
                    server.metrics().inc_send_errors();
                    warn!("send to {peer} failed: {e}");
                }
            }
        }

        if received % SUMMARY_EVERY == 0 {
            info!("{}", server.metrics().summary());
        }
    }
}
