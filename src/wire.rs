// src/wire.rs
//! Reply encode: each encoder builds one contiguous datagram frame. All
//! multi-byte integers are big-endian (the `BufMut` put_* default).

use bytes::{BufMut, Bytes, BytesMut};

use crate::catalog::Catalog;
use crate::ids::{TicketCode, COOKIE_LEN, TICKET_LEN};
use crate::store::Reservation;

pub const EVENTS: u8 = 2;
pub const RESERVATION: u8 = 4;
pub const TICKETS: u8 = 6;
pub const BAD_REQUEST: u8 = 255;

/// IPv4/UDP payload ceiling.
pub const MAX_DATAGRAM: usize = 65_507;

const TICKETS_HEADER_LEN: usize = 1 + 4 + 2;
const RESERVATION_LEN: usize = 1 + 4 + 4 + 2 + COOKIE_LEN + 8;

/// Most tickets a single reservation may hold: a TICKETS reply must still
/// fit one datagram after its header.
pub const MAX_TICKETS_PER_RESERVATION: u16 =
    ((MAX_DATAGRAM - TICKETS_HEADER_LEN) / TICKET_LEN) as u16;

/// Packed event records `id:u32 | available:u16 | desc_len:u8 | desc`,
/// appended greedily in catalog order. Packing stops at the first record
/// that would overflow the datagram; the datagram length terminates the
/// list on the wire.
pub fn encode_events(catalog: &Catalog) -> Bytes {
    let mut out = BytesMut::with_capacity(1 + catalog.len() * 16);
    out.put_u8(EVENTS);

    for ev in catalog.iter() {
        let record_len = 4 + 2 + 1 + ev.description.len();
        if out.len() + record_len > MAX_DATAGRAM {
            break;
        }
        out.put_u32(ev.id);
        out.put_u16(ev.available);
        out.put_u8(ev.description.len() as u8);
        out.put_slice(ev.description.as_bytes());
    }

    out.freeze()
}

pub fn encode_reservation(r: &Reservation) -> Bytes {
    let mut out = BytesMut::with_capacity(RESERVATION_LEN);
    out.put_u8(RESERVATION);
    out.put_u32(r.id);
    out.put_u32(r.event_id);
    out.put_u16(r.ticket_count);
    out.put_slice(&r.cookie);
    out.put_u64(r.expiration);
    out.freeze()
}

pub fn encode_tickets(reservation_id: u32, codes: &[TicketCode]) -> Bytes {
    let mut out = BytesMut::with_capacity(TICKETS_HEADER_LEN + codes.len() * TICKET_LEN);
    out.put_u8(TICKETS);
    out.put_u32(reservation_id);
    out.put_u16(codes.len() as u16);
    for code in codes {
        out.put_slice(code);
    }
    out.freeze()
}

/// The single negative reply. The offending id is whatever 32-bit scalar the
/// rejected request named (event id or reservation id); the encoder does not
/// care which.
pub fn encode_bad_request(offending_id: u32) -> Bytes {
    let mut out = BytesMut::with_capacity(5);
    out.put_u8(BAD_REQUEST);
    out.put_u32(offending_id);
    out.freeze()
}
