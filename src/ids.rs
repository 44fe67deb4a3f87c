// src/ids.rs
//! Identifier generators: random redemption cookies and the deterministic
//! ticket-code sequence.

use rand::Rng;

pub const COOKIE_LEN: usize = 48;
pub const COOKIE_BYTE_MIN: u8 = 33;
pub const COOKIE_BYTE_MAX: u8 = 126;

/// 48 printable-ASCII bytes proving the right to redeem a reservation.
pub type Cookie = [u8; COOKIE_LEN];

pub const TICKET_LEN: usize = 7;

/// 7 bytes from the alphabet `[0-9A-Z]`.
pub type TicketCode = [u8; TICKET_LEN];

/// Draw a fresh cookie, each byte uniform in `33..=126`. Uniqueness against
/// live cookies is the caller's concern (rejection sampling in the store).
pub fn random_cookie() -> Cookie {
    let mut rng = rand::rng();
    let mut cookie = [0u8; COOKIE_LEN];
    for b in cookie.iter_mut() {
        *b = rng.random_range(COOKIE_BYTE_MIN..=COOKIE_BYTE_MAX);
    }
    cookie
}

/// Monotonic ticket-code sequence over the 36-symbol alphabet of digits
/// `0-9` followed by letters `A-Z`, digits ordered below letters.
///
/// The cursor starts at `"0000000"` and counts up in its least significant
/// (last) position: `'0'..'8'` and `'A'..'Y'` step to their successor, `'9'`
/// steps to `'A'`, and `'Z'` wraps to `'0'` with carry one position left.
/// That gives 36^7 distinct codes before the cursor revisits its start.
#[derive(Clone, Debug)]
pub struct TicketSeq {
    cursor: TicketCode,
}

impl TicketSeq {
    pub fn new() -> Self {
        Self { cursor: *b"0000000" }
    }

    /// Return the current code and advance the cursor.
    pub fn next_code(&mut self) -> TicketCode {
        let code = self.cursor;
        self.advance();
        code
    }

    fn advance(&mut self) {
        for b in self.cursor.iter_mut().rev() {
            *b = match *b {
                b'9' => b'A',
                b'Z' => b'0',
                other => other + 1,
            };
            if *b != b'0' {
                return;
            }
        }
    }
}

impl Default for TicketSeq {
    fn default() -> Self {
        Self::new()
    }
}
