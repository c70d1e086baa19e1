//! Position tracking from NMEA-0183 sentence streams.
//!
//! A GPS receiver emits checksummed text sentences, one per line. This
//! crate takes candidate lines from any [`std::io::BufRead`] source,
//! validates the sentence framing, decodes geographic position from GLL
//! sentences and keeps the latest valid coordinate pair in a shared,
//! lock-guarded store.
//!
//! The pipeline for one line:
//!
//! `line → nmea::frame::Frame → checksum gate → address gate →`
//! `nmea::gll::Gll → fix gate → state::PositionStore`
//!
//! Lines that fail any gate are dropped; serial links are noisy and a
//! rejected sentence is never worth retrying. [`gps::Counters`] records
//! why lines were dropped.

pub mod gps;
pub mod nmea;
pub mod state;
pub mod udpstream;

pub use gps::{Gps, RejectReason};
pub use state::{Position, PositionStore};
