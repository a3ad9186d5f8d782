//! Boundary to the upstream travel-duration provider.
//!
//! Durations come from a third-party routing service.  This module fixes the
//! contract the core relies on and owns the bookkeeping that must not leak
//! into process-wide state:
//!
//! - [`DurationSource`] — per directed segment, either a duration in seconds
//!   or an explicit [`DurationLookup::Unavailable`].  A source must never
//!   substitute 0 for a failed lookup.
//! - [`assign_durations`] — splits pending segments into validated
//!   [`EdgeRecord`]s and a retry list.
//! - [`KeyRing`] — API-key rotation with per-key rate-limit cooldowns, held
//!   per client instance.

use std::time::{Duration, Instant};

use er_core::GeoPoint;

use crate::loader::EdgeRecord;

/// Default cooldown after a key is rate limited.
pub const DEFAULT_KEY_COOLDOWN: Duration = Duration::from_secs(120);

// ── Source contract ───────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DurationLookup {
    Seconds(f64),
    Unavailable,
}

/// Supplies travel durations for directed segments.
pub trait DurationSource {
    fn lookup(&mut self, from: GeoPoint, to: GeoPoint) -> DurationLookup;
}

/// A segment still waiting for a duration.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingEdge {
    pub u:      String,
    pub v:      String,
    pub u_pos:  GeoPoint,
    pub v_pos:  GeoPoint,
    pub length: Option<f64>,
}

/// Query `source` for each pending segment.
///
/// Returns `(assigned, failed)`.  `failed` keeps input order so it can be fed
/// straight back in for a retry pass.  A negative or non-finite duration is
/// treated as unavailable.
pub fn assign_durations<S: DurationSource + ?Sized>(
    pending: Vec<PendingEdge>,
    source: &mut S,
) -> (Vec<EdgeRecord>, Vec<PendingEdge>) {
    let mut assigned = Vec::with_capacity(pending.len());
    let mut failed = Vec::new();

    for edge in pending {
        match source.lookup(edge.u_pos, edge.v_pos) {
            DurationLookup::Seconds(d) if d.is_finite() && d >= 0.0 => {
                assigned.push(EdgeRecord {
                    u:        edge.u,
                    v:        edge.v,
                    u_pos:    edge.u_pos,
                    v_pos:    edge.v_pos,
                    duration: d,
                    length:   edge.length,
                    risk:     None,
                });
            }
            DurationLookup::Seconds(d) => {
                log::warn!("discarding invalid duration {d} for {} -> {}", edge.u, edge.v);
                failed.push(edge);
            }
            DurationLookup::Unavailable => failed.push(edge),
        }
    }

    log::info!("durations assigned: {} ok, {} failed", assigned.len(), failed.len());
    (assigned, failed)
}

// ── KeyRing ───────────────────────────────────────────────────────────────────

/// Round-robin API keys with per-key cooldowns.
///
/// Time is passed in explicitly so the rotation can be driven by a test clock.
#[derive(Debug, Clone)]
pub struct KeyRing<K> {
    keys:           Vec<K>,
    cooldown_until: Vec<Option<Instant>>,
    cooldown:       Duration,
    cursor:         usize,
}

impl<K> KeyRing<K> {
    pub fn new(keys: Vec<K>) -> Self {
        Self::with_cooldown(keys, DEFAULT_KEY_COOLDOWN)
    }

    pub fn with_cooldown(keys: Vec<K>, cooldown: Duration) -> Self {
        let n = keys.len();
        Self { keys, cooldown_until: vec![None; n], cooldown, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Next usable key at `now`, starting from the rotation cursor.
    ///
    /// Expired cooldowns are cleared on the way.  Returns `None` when every
    /// key is cooling down.
    pub fn next_available(&mut self, now: Instant) -> Option<(usize, &K)> {
        let n = self.keys.len();
        for step in 0..n {
            let idx = (self.cursor + step) % n;
            let until = self.cooldown_until[idx];
            match until {
                Some(until) if now < until => continue,
                Some(_) => self.cooldown_until[idx] = None,
                None => {}
            }
            self.cursor = (idx + 1) % n;
            return Some((idx, &self.keys[idx]));
        }
        None
    }

    /// Bench key `idx` until `now + cooldown`.
    pub fn mark_rate_limited(&mut self, idx: usize, now: Instant) {
        if let Some(slot) = self.cooldown_until.get_mut(idx) {
            *slot = Some(now + self.cooldown);
            log::warn!("API key #{} rate limited; cooling down for {:?}", idx + 1, self.cooldown);
        }
    }

    pub fn is_cooling_down(&self, idx: usize, now: Instant) -> bool {
        matches!(self.cooldown_until.get(idx), Some(Some(until)) if now < *until)
    }
}
