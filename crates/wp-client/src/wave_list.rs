//! In-memory wave list.
//!
//! Live events are appended; bulk fetches replace the list. Waves are keyed by
//! `(address, timestamp, message)` so an event already covered by a fetch is
//! never shown twice, and events that land while a fetch is in flight survive
//! the replacement.

use std::collections::HashSet;
use wp_types::{Wave, WaveKey};

/// Handed out when a bulk fetch starts; required to apply its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket {
    id: u64,
    first_live_seq: u64,
}

#[derive(Debug, Default, Clone)]
pub struct WaveList {
    entries: Vec<Wave>,
    keys: HashSet<WaveKey>,
    /// Events appended while at least one refresh is in flight.
    live: Vec<(u64, Wave)>,
    next_seq: u64,
    next_ticket: u64,
    applied_ticket: Option<u64>,
    pending: usize,
}

impl WaveList {
    pub fn as_slice(&self) -> &[Wave] {
        &self.entries
    }

    pub fn to_vec(&self) -> Vec<Wave> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn refresh_pending(&self) -> bool {
        self.pending > 0
    }

    /// Appends a live wave. Returns `false` if the wave is already listed.
    pub fn append(&mut self, wave: Wave) -> bool {
        if !self.keys.insert(wave.key()) {
            return false;
        }

        if self.pending > 0 {
            self.live.push((self.next_seq, wave.clone()));
        }
        self.next_seq += 1;
        self.entries.push(wave);
        true
    }

    pub fn begin_refresh(&mut self) -> RefreshTicket {
        let ticket = RefreshTicket {
            id: self.next_ticket,
            first_live_seq: self.next_seq,
        };
        self.next_ticket += 1;
        self.pending += 1;
        ticket
    }

    /// Replaces the list with `fetched`, re-appending live waves that arrived
    /// after `ticket` was issued and that `fetched` does not contain.
    ///
    /// Returns `false` if a newer refresh was already applied; the list is
    /// left untouched in that case.
    pub fn finish_refresh(&mut self, ticket: RefreshTicket, fetched: Vec<Wave>) -> bool {
        self.pending = self.pending.saturating_sub(1);

        let stale = self.applied_ticket.is_some_and(|applied| ticket.id < applied);
        if stale {
            self.settle();
            return false;
        }

        let mut keys: HashSet<WaveKey> = fetched.iter().map(Wave::key).collect();
        let mut merged = fetched;
        for (seq, wave) in &self.live {
            if *seq >= ticket.first_live_seq && keys.insert(wave.key()) {
                merged.push(wave.clone());
            }
        }

        self.entries = merged;
        self.keys = keys;
        self.applied_ticket = Some(ticket.id);
        self.settle();
        true
    }

    /// Gives up on a refresh whose fetch failed, keeping the current list.
    pub fn abandon_refresh(&mut self, _ticket: RefreshTicket) {
        self.pending = self.pending.saturating_sub(1);
        self.settle();
    }

    fn settle(&mut self) {
        if self.pending == 0 {
            self.live.clear();
        }
    }
}
