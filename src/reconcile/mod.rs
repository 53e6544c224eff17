//! Songplay reconciliation
//!
//! The activity log and the track catalog share no key. A play event is tied
//! to a song when title and artist name are equal and the played length is
//! within a tolerance of the catalog duration. The join is left-outer: an
//! event without a match still becomes a songplay with null song and artist.
//!
//! # Overview
//!
//! - `Catalog` - songs joined with artists, indexed by `(title, artist_name)`
//! - `MatchPolicy` / `best_match` - tolerance predicate and tie-break
//! - `reconcile` / `reconcile_with` - the `songplays` fact table

mod catalog;
mod matcher;
mod reconciler;

pub use catalog::{Catalog, CatalogEntry};
pub use matcher::{best_match, resolve, MatchOutcome, MatchPolicy, DEFAULT_TOLERANCE_SECS};
pub use reconciler::{reconcile, reconcile_with, ReconcileOutput, ReconcileReport};
