//! Extraction stages
//!
//! Two independent stages turn raw records into dimension rows:
//! - Song Extractor: track metadata → `songs`, `artists`
//! - Event Extractor: activity log → `users`, `time` and the play events
//!   the reconciler joins against the catalog
//!
//! Both are pure functions over their input and share no state.

mod calendar;
mod events;
mod songs;
mod types;

pub use calendar::CalendarPolicy;
pub use events::{extract_events, PLAY_PAGE};
pub use songs::extract_songs;
pub use types::{EventTables, ExtractReport, SongTables};
