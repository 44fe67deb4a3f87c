// src/catalog.rs
//! Event catalog: the immutable set of events loaded at startup plus each
//! event's mutable available-ticket count.
//!
//! The on-disk format is a UTF-8 text file of alternating lines: a
//! description line followed by a decimal initial ticket count. Event ids
//! are assigned 0, 1, 2, ... in stream order. A trailing description with
//! no count line is ignored.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

pub const MAX_DESCRIPTION_LEN: usize = 255;

#[derive(Clone, Debug)]
pub struct Event {
    pub id: u32,
    pub description: String,
    pub available: u16,
    pub initial: u16,
}

/// Immutable in membership after construction; only `available` mutates.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    events: Vec<Event>,
}

impl Catalog {
    /// Build a catalog from (description, initial ticket count) entries in
    /// id order. Descriptions must be 1..=255 bytes.
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, u16)>,
    {
        let mut events = Vec::new();
        for (description, initial) in entries {
            if description.is_empty() || description.len() > MAX_DESCRIPTION_LEN {
                bail!(
                    "event description must be 1..={MAX_DESCRIPTION_LEN} bytes, got {} ({:?})",
                    description.len(),
                    description
                );
            }
            events.push(Event {
                id: events.len() as u32,
                description,
                available: initial,
                initial,
            });
        }
        Ok(Self { events })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read catalog file {}", path.display()))?;

        let mut entries = Vec::new();
        let mut lines = text.lines();
        while let Some(description) = lines.next() {
            // A description on the last line with no count after it is
            // dropped, matching the pairwise read of the file format.
            let Some(count_line) = lines.next() else { break };
            let initial: u16 = count_line.trim().parse().with_context(|| {
                format!("ticket count for {:?} must be a decimal u16, got {:?}", description, count_line)
            })?;
            entries.push((description.to_string(), initial));
        }

        Self::from_entries(entries)
            .with_context(|| format!("invalid catalog file {}", path.display()))
    }

    #[inline]
    pub fn get(&self, event_id: u32) -> Option<&Event> {
        self.events.get(event_id as usize)
    }

    /// Subtract `count` tickets from the event's availability. Returns false
    /// if the event is unknown or has fewer than `count` available.
    pub fn debit(&mut self, event_id: u32, count: u16) -> bool {
        match self.events.get_mut(event_id as usize) {
            Some(ev) if count <= ev.available => {
                ev.available -= count;
                true
            }
            _ => false,
        }
    }

    /// Return `count` tickets to the event's availability.
    pub fn credit(&mut self, event_id: u32, count: u16) {
        if let Some(ev) = self.events.get_mut(event_id as usize) {
            debug_assert!(count <= ev.initial - ev.available, "credit past initial inventory");
            ev.available += count;
        }
    }

    /// Events in ascending id order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
