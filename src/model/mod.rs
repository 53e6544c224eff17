//! Star schema model
//!
//! Row types of the five output tables, the intermediate play event the
//! reconciler consumes, and the Arrow schema each table is persisted with.

mod rows;
mod schema;
mod table;

pub use rows::{Artist, PlayEvent, Song, Songplay, TimeRow, User};
pub use schema::table_schema;
pub use table::Table;

#[cfg(test)]
mod tests;
