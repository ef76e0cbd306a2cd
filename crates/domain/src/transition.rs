//! Transition engine.
//!
//! A pure function from (stored row, observed LISTED zones) to a
//! `Transition`. No ports, no I/O — this is why it lives in the domain
//! crate rather than behind an application port.

use crate::zone::ZoneName;
use serde::{Deserialize, Serialize};

/// Canonical blockingLists string: ascending-sorted, comma-joined,
/// space-free, deduplicated.
pub fn canonical_zone_list(zones: &[ZoneName]) -> String {
    let mut names: Vec<&str> = zones.iter().map(|z| z.as_str()).collect();
    names.sort_unstable();
    names.dedup();
    names.join(",")
}

/// Inverse of `canonical_zone_list`: splits a stored `blockingLists` value
/// back into a sorted, deduplicated zone list. Empty string yields `[]`.
pub fn sorted_tokenize(blocking_lists: &str) -> Vec<ZoneName> {
    if blocking_lists.is_empty() {
        return Vec::new();
    }
    let mut zones: Vec<ZoneName> = blocking_lists.split(',').map(ZoneName::new).collect();
    zones.sort();
    zones.dedup();
    zones
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    NoOp,
    NewListing(Vec<ZoneName>),
    ZoneChange(Vec<ZoneName>),
    Cleared,
}

impl Transition {
    pub fn is_noop(&self) -> bool {
        matches!(self, Transition::NoOp)
    }

    pub fn zones(&self) -> Option<&[ZoneName]> {
        match self {
            Transition::NewListing(z) | Transition::ZoneChange(z) => Some(z),
            Transition::NoOp | Transition::Cleared => None,
        }
    }
}

/// Decides the transition for one IP given its stored `blockingLists` and
/// the set of zones that returned LISTED this run.
pub fn decide_transition(stored_blocking_lists: &str, observed_listed_zones: &[ZoneName]) -> Transition {
    let stored_list = sorted_tokenize(stored_blocking_lists);
    let mut observed_list = observed_listed_zones.to_vec();
    observed_list.sort();
    observed_list.dedup();

    match (stored_list.is_empty(), observed_list.is_empty()) {
        (true, true) => Transition::NoOp,
        (true, false) => Transition::NewListing(observed_list),
        (false, true) => Transition::Cleared,
        (false, false) => {
            if stored_list == observed_list {
                Transition::NoOp
            } else {
                Transition::ZoneChange(observed_list)
            }
        }
    }
}
