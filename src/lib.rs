//! # ticketd — connectionless UDP ticket reservation server
//!
//! A single-threaded request-reply engine over one UDP socket. Clients walk
//! a three-step workflow: discover events (GET_EVENTS), reserve a quantity
//! of tickets for one event (GET_RESERVATION), then redeem the reservation
//! for unique ticket codes (GET_TICKETS) before it expires. Unredeemed
//! reservations past their deadline return their tickets to inventory.
//!
//! ## Architecture
//!
//! - **parser / wire**: the binary codec — exact-length big-endian decode of
//!   the three request types, single-frame encode of the four reply types
//! - **catalog**: the immutable event set with mutable availability
//! - **store**: reservations indexed by id and by expiration, with the
//!   sweep, the id allocator and the live-cookie set
//! - **ids**: cookie and ticket-code generators
//! - **server**: dispatcher, handlers and the UDP run loop
//! - **metrics**: counters surfaced through the periodic log summary
//!
//! Malformed datagrams (wrong length, unknown type, empty payload) are
//! dropped silently; semantic failures get a BAD_REQUEST carrying the
//! offending id. GET_TICKETS is idempotent: a redeemed reservation is kept
//! forever and repeats the same reply bytes.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use ticketd::catalog::Catalog;
//! use ticketd::metrics::Metrics;
//! use ticketd::server::TicketServer;
//!
//! let catalog = Catalog::from_entries([("Concert".to_string(), 10)]).unwrap();
//! let mut server = TicketServer::new(catalog, 5, Arc::new(Metrics::new()));
//!
//! // GET_EVENTS is the single byte 0x01; the reply enumerates the catalog.
//! let reply = server.handle_datagram(&[1], 0).expect("EVENTS reply");
//! assert_eq!(reply[0], 2);
//! ```
pub mod catalog;
pub mod ids;
pub mod metrics;
pub mod parser;
pub mod server;
pub mod store;
pub mod wire;
