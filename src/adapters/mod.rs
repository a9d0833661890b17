//! Adapter implementations of the port traits.
//!
//! `live` talks to the real host, `recording` wraps another adapter and
//! captures each call into a cassette, `replaying` serves calls back from one.

pub mod live;
pub mod recording;
pub mod replaying;
