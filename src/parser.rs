// src/parser.rs
//! Inbound datagram decode: classify by first byte, validate the exact
//! length for the type, extract big-endian fields.
//!
//! Anything malformed (empty payload, unknown type byte, wrong length for a
//! known type) decodes to a [`DecodeError`]; the dispatcher logs those and
//! drops the datagram without a reply. Only well-formed requests ever reach
//! a handler.

use std::fmt;

use crate::ids::{Cookie, COOKIE_LEN};

pub const GET_EVENTS: u8 = 1;
pub const GET_RESERVATION: u8 = 3;
pub const GET_TICKETS: u8 = 5;

const GET_EVENTS_LEN: usize = 1;
const GET_RESERVATION_LEN: usize = 1 + 4 + 2;
const GET_TICKETS_LEN: usize = 1 + 4 + COOKIE_LEN;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Request {
    GetEvents,
    GetReservation { event_id: u32, ticket_count: u16 },
    GetTickets { reservation_id: u32, cookie: Cookie },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeError {
    Empty,
    UnknownType(u8),
    BadLength { msg_type: u8, len: usize, want: usize },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Empty => write!(f, "empty payload"),
            DecodeError::UnknownType(t) => write!(f, "unknown message type {t}"),
            DecodeError::BadLength { msg_type, len, want } => {
                write!(f, "type {msg_type} payload is {len} bytes, want {want}")
            }
        }
    }
}

fn expect_len(msg_type: u8, payload: &[u8], want: usize) -> Result<(), DecodeError> {
    if payload.len() != want {
        return Err(DecodeError::BadLength { msg_type, len: payload.len(), want });
    }
    Ok(())
}

#[inline]
fn be_u32(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

pub fn decode(payload: &[u8]) -> Result<Request, DecodeError> {
    let Some(&msg_type) = payload.first() else {
        return Err(DecodeError::Empty);
    };

    match msg_type {
        GET_EVENTS => {
            expect_len(msg_type, payload, GET_EVENTS_LEN)?;
            Ok(Request::GetEvents)
        }
        GET_RESERVATION => {
            expect_len(msg_type, payload, GET_RESERVATION_LEN)?;
            let event_id = be_u32(&payload[1..5]);
            let ticket_count = u16::from_be_bytes([payload[5], payload[6]]);
            Ok(Request::GetReservation { event_id, ticket_count })
        }
        GET_TICKETS => {
            expect_len(msg_type, payload, GET_TICKETS_LEN)?;
            let reservation_id = be_u32(&payload[1..5]);
            let mut cookie = [0u8; COOKIE_LEN];
            cookie.copy_from_slice(&payload[5..GET_TICKETS_LEN]);
            Ok(Request::GetTickets { reservation_id, cookie })
        }
        other => Err(DecodeError::UnknownType(other)),
    }
}
