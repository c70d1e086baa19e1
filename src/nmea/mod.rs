//! NMEA-0183 sentence handling.
//!
//! [`frame`] deals with the generic sentence envelope (start marker,
//! address, data segment, checksum), [`gll`] decodes the data segment of
//! the one sentence type this crate understands.

pub mod frame;
pub mod gll;
