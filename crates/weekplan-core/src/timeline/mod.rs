//! Time utilities.
//!
//! This module provides:
//! - Conversion between "HH:MM" clock strings and minute offsets
//! - Interval difference and free-interval bookkeeping for a single day

mod clock;
mod interval;

pub use clock::{to_minutes, to_time_string, MINUTES_PER_DAY};
pub use interval::{remove_block, subtract_block, FreeIntervals, Interval};
