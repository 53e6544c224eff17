//! Raw record access
//!
//! Input records are loosely typed JSON objects. This module provides
//! coercing field accessors and the shape checks that tell a dirty record
//! (dropped) apart from a batch of the wrong kind altogether (fatal).

mod fields;
mod shape;

pub use fields::{get_f64, get_field, get_i64, get_string};
pub use shape::{RecordShape, ShapeCheck, ACTIVITY_SHAPE, TRACK_SHAPE};
