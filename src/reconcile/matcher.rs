//! Match predicate and tie-break

use super::catalog::{Catalog, CatalogEntry};
use crate::model::PlayEvent;
use std::cmp::Ordering;

/// Default duration tolerance in seconds
pub const DEFAULT_TOLERANCE_SECS: f64 = 4.0;

/// Numeric part of the fuzzy join
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchPolicy {
    /// Exclusive upper bound on `|length - duration|`
    pub tolerance_secs: f64,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE_SECS)
    }
}

impl MatchPolicy {
    pub fn new(tolerance_secs: f64) -> Self {
        Self { tolerance_secs }
    }

    /// Distance between a played length and a catalog duration, if within tolerance
    pub fn delta(&self, length: f64, duration: f64) -> Option<f64> {
        let delta = (length - duration).abs();
        (delta < self.tolerance_secs).then_some(delta)
    }
}

/// Result of resolving one play event against the catalog
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchOutcome<'a> {
    Matched(&'a CatalogEntry),
    /// No catalog song satisfied the predicate; not an error
    Unresolved,
}

impl<'a> MatchOutcome<'a> {
    pub fn entry(&self) -> Option<&'a CatalogEntry> {
        match self {
            MatchOutcome::Matched(entry) => Some(entry),
            MatchOutcome::Unresolved => None,
        }
    }

    pub fn is_matched(&self) -> bool {
        matches!(self, MatchOutcome::Matched(_))
    }
}

/// Pick the best candidate for a played length
///
/// Candidates are assumed to already agree on title and artist name. Among
/// those within tolerance the smallest delta wins, then the lowest `song_id`.
/// A missing length never matches.
pub fn best_match<'a>(
    length: Option<f64>,
    candidates: &'a [CatalogEntry],
    policy: &MatchPolicy,
) -> Option<&'a CatalogEntry> {
    let length = length?;
    candidates
        .iter()
        .filter_map(|c| policy.delta(length, c.duration).map(|d| (d, c)))
        .min_by(|(da, a), (db, b)| compare(*da, a, *db, b))
        .map(|(_, c)| c)
}

fn compare(da: f64, a: &CatalogEntry, db: f64, b: &CatalogEntry) -> Ordering {
    da.total_cmp(&db).then_with(|| a.song_id.cmp(&b.song_id))
}

/// Resolve a play event against the catalog
pub fn resolve<'a>(event: &PlayEvent, catalog: &'a Catalog, policy: &MatchPolicy) -> MatchOutcome<'a> {
    let (Some(title), Some(artist)) = (event.song_title.as_deref(), event.artist_name.as_deref())
    else {
        return MatchOutcome::Unresolved;
    };

    best_match(event.length, catalog.candidates(title, artist), policy)
        .map_or(MatchOutcome::Unresolved, MatchOutcome::Matched)
}
