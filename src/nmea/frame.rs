//! Tools to read the NMEA-0183 sentence envelope from a string.
//!
//! NMEA-0183 sentence layout:
//!
//!  `$<address>,<value>{,<value>}*<checksum><CR><LF>`
//!
//!  where:
//!
//!  • `$` — start character, always present
//!
//!  • address — sentence address (digits and uppercase letters, e.g. `GPGLL`)
//!
//!  • value fields — the data segment, fields delimited by `,`
//!
//!  • `*<checksum>` — two hex characters, the exclusive OR of all
//!    characters between `$` and `*`
//!
//!  • `<CR><LF>` — end sequence, may already be stripped by the line source

use std::str::FromStr;

use thiserror::Error;

/// Ways a candidate line can fail to be a sentence at all.
///
/// A sentence that frames correctly but carries a wrong checksum is not a
/// `FrameError`; it parses into a [`Frame`] whose [`Frame::is_valid`]
/// returns false.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    /// The line does not begin with the `$` start character.
    #[error("missing '$' start character")]
    MissingStart,
    /// No `,` terminates the address field before the checksum marker.
    #[error("address field is never delimited")]
    MissingDelimiter,
    /// The line carries no `*` checksum marker.
    #[error("missing '*' checksum marker")]
    MissingChecksum,
    /// Fewer than two characters follow the `*` marker.
    #[error("checksum field is truncated")]
    TruncatedChecksum,
    /// The two characters after `*` are not a hex number.
    #[error("checksum field is not hexadecimal")]
    BadChecksumDigits,
}

/// One parsed sentence envelope.
///
/// Constructed once per candidate line via [`FromStr`], read-only
/// afterwards. Callers must check [`Frame::is_valid`] before trusting the
/// address or data segments.
#[derive(Debug)]
pub struct Frame {
    address: String,
    data: String,
    checksum: u8,
    lrc: u8,
}

impl Frame {
    /// The address segment, e.g. `GPGLL`.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// The data segment between the first `,` and the `*` marker.
    pub fn data(&self) -> &str {
        &self.data
    }

    /// The checksum value the sentence declares for itself.
    pub fn checksum(&self) -> u8 {
        self.checksum
    }

    /// The longitudinal redundancy check computed over the sentence.
    pub fn lrc(&self) -> u8 {
        self.lrc
    }

    /// Compares the declared checksum against the computed LRC.
    pub fn is_valid(&self) -> bool {
        self.checksum == self.lrc
    }
}

impl FromStr for Frame {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.starts_with('$') {
            return Err(FrameError::MissingStart);
        }

        // The '*' position bounds everything else: the LRC range ends
        // there, so a trailing <CR><LF> can never leak into the checksum.
        let star = s.find('*').ok_or(FrameError::MissingChecksum)?;
        let comma = s
            .find(',')
            .filter(|&c| c < star)
            .ok_or(FrameError::MissingDelimiter)?;

        let address = s[1..comma].to_string();
        let data = s[comma + 1..star].to_string();

        let digits = s
            .get(star + 1..star + 3)
            .ok_or(FrameError::TruncatedChecksum)?;
        let checksum =
            u8::from_str_radix(digits, 16).map_err(|_| FrameError::BadChecksumDigits)?;

        let lrc = s.as_bytes()[1..star].iter().fold(0, |lrc, b| lrc ^ b);

        Ok(Frame {
            address,
            data,
            checksum,
            lrc,
        })
    }
}
