// src/store.rs
//! Reservation store: the stateful core of the server.
//!
//! A single owned record per reservation, reachable through two indexes: an
//! ordered map keyed by reservation id (redemption path) and an ordered map
//! keyed by expiration timestamp holding the id set due at that instant
//! (sweep path). Redemption detaches a reservation from the expiration index
//! only, so redeemed records persist and repeat redemption stays idempotent;
//! expiration removes a record from both indexes and returns its tickets to
//! the catalog.

use std::collections::{BTreeMap, BTreeSet};

use hashbrown::HashSet;

use crate::catalog::Catalog;
use crate::ids::{self, Cookie, TicketCode, TicketSeq};

/// Reservation ids live in `[1_000_000, u32::MAX]`; the space below is kept
/// clear of ids so clients cannot confuse them with event ids.
pub const MIN_RESERVATION_ID: u32 = 1_000_000;

#[derive(Clone, Debug)]
pub struct Reservation {
    pub id: u32,
    pub event_id: u32,
    pub ticket_count: u16,
    pub cookie: Cookie,
    /// Absolute wall-clock deadline, seconds since epoch. Inert once the
    /// reservation is redeemed.
    pub expiration: u64,
    /// `None` until first redemption, then exactly `ticket_count` codes in
    /// issue order.
    pub tickets: Option<Vec<TicketCode>>,
}

impl Reservation {
    #[inline]
    pub fn redeemed(&self) -> bool {
        self.tickets.is_some()
    }
}

#[derive(Debug, Default)]
pub struct ReservationStore {
    by_id: BTreeMap<u32, Reservation>,
    by_expiration: BTreeMap<u64, BTreeSet<u32>>,
    live_cookies: HashSet<Cookie>,
    ticket_seq: TicketSeq,
}

impl ReservationStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, id: u32) -> Option<&Reservation> {
        self.by_id.get(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Insert a new unredeemed reservation and index it by id and by
    /// expiration. The caller has already debited the event's availability.
    pub fn create(&mut self, event_id: u32, ticket_count: u16, expiration: u64) -> &Reservation {
        let id = self.allocate_id();
        let cookie = self.issue_cookie();
        self.by_expiration.entry(expiration).or_default().insert(id);
        self.by_id.entry(id).or_insert(Reservation {
            id,
            event_id,
            ticket_count,
            cookie,
            expiration,
            tickets: None,
        })
    }

    /// Redeem a reservation, synthesizing its ticket codes on first call and
    /// detaching it from the expiration index so it is retained indefinitely.
    /// Returns the stored codes in issue order; `None` for an unknown id.
    /// Cookie validation happens before this call.
    pub fn redeem(&mut self, id: u32) -> Option<&[TicketCode]> {
        let r = self.by_id.get_mut(&id)?;
        if r.tickets.is_none() {
            let mut codes = Vec::with_capacity(r.ticket_count as usize);
            for _ in 0..r.ticket_count {
                codes.push(self.ticket_seq.next_code());
            }
            r.tickets = Some(codes);

            if let Some(due) = self.by_expiration.get_mut(&r.expiration) {
                due.remove(&id);
                if due.is_empty() {
                    self.by_expiration.remove(&r.expiration);
                }
            }
        }
        r.tickets.as_deref()
    }

    /// Remove every unredeemed reservation whose deadline has passed
    /// (`expiration <= now`), crediting its tickets back to its event and
    /// releasing its cookie. Returns the number of reservations reclaimed.
    ///
    /// Redeemed reservations were detached from the expiration index at
    /// redemption time and are never reclaimed here.
    pub fn sweep_expired(&mut self, now: u64, catalog: &mut Catalog) -> usize {
        let due: Vec<u64> = self
            .by_expiration
            .range(..=now)
            .map(|(&ts, _)| ts)
            .collect();

        let mut reclaimed = 0;
        for ts in due {
            let Some(ids) = self.by_expiration.remove(&ts) else { continue };
            for id in ids {
                if let Some(r) = self.by_id.remove(&id) {
                    catalog.credit(r.event_id, r.ticket_count);
                    self.live_cookies.remove(&r.cookie);
                    reclaimed += 1;
                }
            }
        }
        reclaimed
    }

    /// Lowest free id: 1_000_000 when empty, max+1 while it fits in u32,
    /// otherwise the first gap in ascending id order. The gap scan keeps the
    /// allocator total; it cannot trigger before 2^32 - 10^6 live
    /// reservations.
    fn allocate_id(&self) -> u32 {
        match self.by_id.keys().next_back() {
            None => MIN_RESERVATION_ID,
            Some(&max) if max < u32::MAX => max + 1,
            Some(_) => {
                let mut candidate = MIN_RESERVATION_ID;
                for &id in self.by_id.keys() {
                    if id > candidate {
                        break;
                    }
                    if id == candidate {
                        candidate += 1;
                    }
                }
                candidate
            }
        }
    }

    /// Rejection-sample a cookie absent from the live set. A collision over
    /// 94^48 values is negligible; the loop keeps the generator total.
    fn issue_cookie(&mut self) -> Cookie {
        loop {
            let cookie = ids::random_cookie();
            if self.live_cookies.insert(cookie) {
                return cookie;
            }
        }
    }
}

impl ReservationStore {
    pub fn assert_invariants(&self, catalog: &Catalog) {
        // 1) id floor and index agreement
        for (&id, r) in self.by_id.iter() {
            assert!(id >= MIN_RESERVATION_ID, "reservation id {id} below floor");
            assert_eq!(id, r.id, "id key/record mismatch");
            assert!(r.ticket_count >= 1, "zero-ticket reservation {id}");
        }

        // 2) expiration index holds exactly the unredeemed reservations
        let mut indexed = BTreeSet::new();
        for (&ts, ids) in self.by_expiration.iter() {
            assert!(!ids.is_empty(), "empty expiration bucket at {ts}");
            for &id in ids {
                let r = self.by_id.get(&id).unwrap_or_else(|| panic!("dangling expiration entry {id}"));
                assert_eq!(r.expiration, ts, "expiration bucket mismatch for {id}");
                assert!(!r.redeemed(), "redeemed reservation {id} still indexed for expiration");
                indexed.insert(id);
            }
        }
        for (&id, r) in self.by_id.iter() {
            if !r.redeemed() {
                assert!(indexed.contains(&id), "unredeemed reservation {id} missing from expiration index");
            }
        }

        // 3) cookie set matches records exactly; equal sizes imply pairwise
        //    distinct cookies
        assert_eq!(self.live_cookies.len(), self.by_id.len(), "cookie set size mismatch");
        for r in self.by_id.values() {
            assert!(self.live_cookies.contains(&r.cookie), "cookie of {} not live", r.id);
        }

        // 4) redeemed records carry exactly ticket_count well-formed codes
        for r in self.by_id.values() {
            if let Some(codes) = &r.tickets {
                assert_eq!(codes.len(), r.ticket_count as usize, "code count mismatch for {}", r.id);
                for code in codes {
                    assert!(
                        code.iter().all(|b| b.is_ascii_digit() || b.is_ascii_uppercase()),
                        "ticket code outside [0-9A-Z] for {}",
                        r.id
                    );
                }
            }
        }

        // 5) conservation: available + held-by-unredeemed = initial, per event
        for ev in catalog.iter() {
            let held: u64 = self
                .by_id
                .values()
                .filter(|r| r.event_id == ev.id && !r.redeemed())
                .map(|r| r.ticket_count as u64)
                .sum();
            assert_eq!(
                ev.available as u64 + held,
                ev.initial as u64,
                "inventory conservation broken for event {}",
                ev.id
            );
        }
    }
}
