//! Shared test doubles.

pub mod clock;

pub use clock::{MutableClock, fixture_timestamp};
