//! Pipeline from candidate sentence lines to position updates.

use std::io::BufRead;
use std::sync::Arc;
use std::fmt;

use thiserror::Error;

use crate::nmea::frame::{Frame, FrameError};
use crate::nmea::gll::{Gll, GllError};
use crate::state::PositionStore;

/// Why a candidate line did not produce a position update.
///
/// None of these are fatal. The transport keeps no failed lines for
/// replay, so the pipeline drops the line and waits for the next one.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RejectReason {
    /// The line is not a sentence at all.
    #[error("malformed frame: {0}")]
    MalformedFrame(#[from] FrameError),
    /// The declared and computed checksums differ.
    #[error("checksum mismatch: declared {declared:#04x}, computed {computed:#04x}")]
    ChecksumMismatch { declared: u8, computed: u8 },
    /// The sentence is intact but of a type this pipeline does not decode.
    #[error("unsupported address: {0}")]
    UnsupportedAddress(String),
    /// The data segment of a supported sentence did not decode.
    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] GllError),
    /// The receiver flags its own data as unusable.
    #[error("receiver reports no valid fix")]
    InvalidFix,
}

/// Tally of every line handed to [`Gps::handle_line`], by outcome.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Counters {
    pub accepted: u64,
    pub malformed_frames: u64,
    pub checksum_mismatches: u64,
    pub unsupported_addresses: u64,
    pub malformed_payloads: u64,
    pub invalid_fixes: u64,
}

impl Counters {
    fn record(&mut self, outcome: &Result<(), RejectReason>) {
        match outcome {
            Ok(()) => self.accepted += 1,
            Err(RejectReason::MalformedFrame(_)) => self.malformed_frames += 1,
            Err(RejectReason::ChecksumMismatch { .. }) => self.checksum_mismatches += 1,
            Err(RejectReason::UnsupportedAddress(_)) => self.unsupported_addresses += 1,
            Err(RejectReason::MalformedPayload(_)) => self.malformed_payloads += 1,
            Err(RejectReason::InvalidFix) => self.invalid_fixes += 1,
        }
    }
}

impl fmt::Display for Counters {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "accepted:              {}", self.accepted)?;
        writeln!(f, "malformed frames:      {}", self.malformed_frames)?;
        writeln!(f, "checksum mismatches:   {}", self.checksum_mismatches)?;
        writeln!(f, "unsupported addresses: {}", self.unsupported_addresses)?;
        writeln!(f, "malformed payloads:    {}", self.malformed_payloads)?;
        write!(f, "invalid fixes:         {}", self.invalid_fixes)
    }
}

/// Decodes candidate sentence lines and keeps the latest valid position.
///
/// The position store is shared: [`Gps::position`] hands out a reference
/// counted handle for reader tasks while the pipeline keeps writing.
#[derive(Default)]
pub struct Gps {
    position: Arc<PositionStore>,
    counters: Counters,
}

impl Gps {
    /// Initializes a new pipeline with a zeroed position store.
    pub fn new() -> Self {
        Gps {
            ..Default::default()
        }
    }

    /// Handle to the shared position store, e.g. for a display task.
    pub fn position(&self) -> Arc<PositionStore> {
        Arc::clone(&self.position)
    }

    /// Outcome tally over all lines handled so far.
    pub fn counters(&self) -> Counters {
        self.counters
    }

    /// Runs one candidate line through the decode gates.
    ///
    /// The position store is only touched when every gate passes; an
    /// `Err` means the line was dropped and the stored pair is unchanged.
    pub fn handle_line(&mut self, line: &str) -> Result<(), RejectReason> {
        let outcome = self.decode(line);
        self.counters.record(&outcome);
        outcome
    }

    fn decode(&self, line: &str) -> Result<(), RejectReason> {
        let frame: Frame = line.parse()?;
        if !frame.is_valid() {
            return Err(RejectReason::ChecksumMismatch {
                declared: frame.checksum(),
                computed: frame.lrc(),
            });
        }
        if frame.address() != Gll::ADDRESS {
            return Err(RejectReason::UnsupportedAddress(frame.address().to_string()));
        }
        let gll = Gll::from_data(frame.data())?;
        if !gll.is_valid() {
            return Err(RejectReason::InvalidFix);
        }
        self.position.update(gll.lat_dd(), gll.lng_dd());
        Ok(())
    }

    /// Drains a line source, dropping rejected lines.
    ///
    /// Rejections are tallied in the counters but otherwise ignored; a
    /// noisy serial link produces them routinely. Only transport errors
    /// from the source itself surface to the caller.
    pub fn run(&mut self, source: impl BufRead) -> std::io::Result<()> {
        for line in source.lines() {
            let _ = self.handle_line(&line?);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nmea::frame::FrameError;

    const VALID: &str = "$GPGLL,4717.11364,N,00833.91565,E,092321.00,A,A*60";

    #[test]
    fn valid_sentence_updates_the_position() {
        let mut gps = Gps::new();
        gps.handle_line(VALID).unwrap();
        let position = gps.position().get();
        assert!((position.latitude - 47.285227).abs() < 1e-4);
        assert!((position.longitude - 8.565261).abs() < 1e-4);
    }

    #[test]
    fn junk_line_is_a_malformed_frame() {
        let mut gps = Gps::new();
        assert_eq!(
            gps.handle_line("GPGLL no start marker"),
            Err(RejectReason::MalformedFrame(FrameError::MissingStart))
        );
    }

    #[test]
    fn corrupted_sentence_is_a_checksum_mismatch() {
        let mut gps = Gps::new();
        let corrupted = VALID.replace("4717", "4718");
        assert_eq!(
            gps.handle_line(&corrupted),
            Err(RejectReason::ChecksumMismatch {
                declared: 0x60,
                computed: 0x6f,
            })
        );
        assert_eq!(gps.position().get().latitude, 0.0);
    }

    #[test]
    fn other_sentence_types_are_unsupported() {
        let mut gps = Gps::new();
        let rmc = "$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6A";
        assert_eq!(
            gps.handle_line(rmc),
            Err(RejectReason::UnsupportedAddress("GPRMC".to_string()))
        );
    }

    #[test]
    fn short_payload_is_malformed_not_out_of_bounds() {
        let mut gps = Gps::new();
        assert_eq!(
            gps.handle_line("$GPGLL,4717.11364,N*04"),
            Err(RejectReason::MalformedPayload(GllError::FieldCount(2)))
        );
    }

    #[test]
    fn invalid_fix_never_touches_the_store() {
        let mut gps = Gps::new();
        gps.handle_line(VALID).unwrap();
        let before = gps.position().get();

        let no_fix = "$GPGLL,4717.11364,N,00833.91565,E,092321.00,V,A*77";
        assert_eq!(gps.handle_line(no_fix), Err(RejectReason::InvalidFix));
        assert_eq!(gps.position().get(), before);
    }

    #[test]
    fn counters_tally_each_outcome() {
        let mut gps = Gps::new();
        let _ = gps.handle_line(VALID);
        let _ = gps.handle_line("no marker");
        let _ = gps.handle_line("$GPGLL,4717.11364,N*04");
        let _ = gps.handle_line("$GPGLL,4717.11364,N,00833.91565,E,092321.00,V,A*77");
        let _ = gps.handle_line(VALID);

        let counters = gps.counters();
        assert_eq!(counters.accepted, 2);
        assert_eq!(counters.malformed_frames, 1);
        assert_eq!(counters.malformed_payloads, 1);
        assert_eq!(counters.invalid_fixes, 1);
        assert_eq!(counters.checksum_mismatches, 0);
        assert_eq!(counters.unsupported_addresses, 0);
    }
}
