//! Decoder for the data segment of GLL sentences.
//!
//! Sentence structure:
//!
//! `$GPGLL,Latitude,N,Longitude,E,hhmmss.ss,Valid,Mode*cs<CR><LF>`
//!
//! Example:
//!
//! `$GPGLL,4717.11364,N,00833.91565,E,092321.00,A,A*60`
//!
//! | Field | Example     | Format     | Description                                  |
//! |-------|-------------|------------|----------------------------------------------|
//! | 1     | 4717.11364  | ddmm.mmmm  | Latitude, degrees + minutes                  |
//! | 2     | N           | character  | N/S indicator                                |
//! | 3     | 00833.91565 | dddmm.mmmm | Longitude, degrees + minutes                 |
//! | 4     | E           | character  | E/W indicator                                |
//! | 5     | 092321.00   | hhmmss.ss  | UTC time of the fix                          |
//! | 6     | A           | character  | V = data invalid or receiver warning, A = ok |
//! | 7     | A           | character  | Positioning mode                             |
//!
//! Only the data segment of a frame (fields 1-7, without the address) is
//! passed to this decoder.

use chrono::NaiveTime;
use thiserror::Error;

const PART_LATITUDE: usize = 0;
const PART_LAT_HEMI: usize = 1;
const PART_LONGITUDE: usize = 2;
const PART_LNG_HEMI: usize = 3;
const PART_UTC_TIME: usize = 4;
const PART_VALID: usize = 5;
const PART_MODE: usize = 6;

/// Number of fields in a GLL data segment.
const PART_MAX: usize = 7;
/// Longest field the receiver emits, with headroom.
const PART_LEN: usize = 15;

/// Ways a data segment can fail to decode.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GllError {
    /// The segment does not split into exactly seven fields.
    #[error("expected 7 fields, found {0}")]
    FieldCount(usize),
    /// A field exceeds the bounded per-field width.
    #[error("field {0} is longer than 15 characters")]
    FieldTooLong(usize),
    /// A coordinate field is too short to carry degrees and minutes.
    #[error("coordinate field is too short")]
    CoordinateTooShort,
    /// A coordinate field holds non-numeric text.
    #[error("coordinate field is not numeric")]
    CoordinateNotNumeric,
    /// A hemisphere field carries no character.
    #[error("hemisphere field is empty")]
    EmptyHemisphere,
}

/// One decoded GLL data segment.
///
/// Constructed once per validated frame, immutable afterwards. Coordinates
/// are exposed in the three common representations: decimal degrees (DD),
/// degrees + decimal minutes (DMM) and degrees/minutes/seconds (DMS).
///
/// Decimal degrees are unsigned magnitudes; the hemisphere is reported
/// separately and [`Gll::lat_signed_dd`]/[`Gll::lng_signed_dd`] fold it
/// into the sign for consumers that want signed coordinates.
#[derive(Debug)]
pub struct Gll {
    parts: Vec<String>,

    lat_deg: i32,
    lat_min: i32,
    lat_min_frac: f32,
    lat_sec: f32,
    lat_hemisphere: char,

    lng_deg: i32,
    lng_min: i32,
    lng_min_frac: f32,
    lng_sec: f32,
    lng_hemisphere: char,
}

/// Splits a `ddmm.mmmm`-style angle field, `deg_digits` wide in degrees.
///
/// Seconds are re-parsed from the field tail starting at the fractional
/// digits and scaled by 60, not derived from the fractional minutes
/// value. All seconds output in this crate goes through this one spot.
fn split_angle(field: &str, deg_digits: usize) -> Result<(i32, i32, f32, f32), GllError> {
    let deg = field
        .get(..deg_digits)
        .ok_or(GllError::CoordinateTooShort)?
        .parse()
        .map_err(|_| GllError::CoordinateNotNumeric)?;
    let min = field
        .get(deg_digits..deg_digits + 2)
        .ok_or(GllError::CoordinateTooShort)?
        .parse()
        .map_err(|_| GllError::CoordinateNotNumeric)?;
    let min_frac = float_from(field, deg_digits)?;
    let sec = float_from(field, deg_digits + 2)? * 60.0;
    Ok((deg, min, min_frac, sec))
}

/// Parses the tail of `field` starting at `offset` as a float.
///
/// An empty tail reads as 0.0 (a coordinate without fractional digits).
fn float_from(field: &str, offset: usize) -> Result<f32, GllError> {
    let tail = field.get(offset..).ok_or(GllError::CoordinateTooShort)?;
    if tail.is_empty() {
        return Ok(0.0);
    }
    tail.parse().map_err(|_| GllError::CoordinateNotNumeric)
}

fn first_char(field: &str) -> Result<char, GllError> {
    field.chars().next().ok_or(GllError::EmptyHemisphere)
}

impl Gll {
    /// Address of the sentences this decoder understands.
    pub const ADDRESS: &'static str = "GPGLL";

    /// Decodes a frame's data segment.
    pub fn from_data(data: &str) -> Result<Self, GllError> {
        let parts: Vec<String> = data.split(',').map(str::to_string).collect();
        if parts.len() != PART_MAX {
            return Err(GllError::FieldCount(parts.len()));
        }
        if let Some(i) = parts.iter().position(|p| p.len() > PART_LEN) {
            return Err(GllError::FieldTooLong(i));
        }

        // Latitude degrees span two digits, longitude three (0-180°).
        let (lat_deg, lat_min, lat_min_frac, lat_sec) = split_angle(&parts[PART_LATITUDE], 2)?;
        let lat_hemisphere = first_char(&parts[PART_LAT_HEMI])?;
        let (lng_deg, lng_min, lng_min_frac, lng_sec) = split_angle(&parts[PART_LONGITUDE], 3)?;
        let lng_hemisphere = first_char(&parts[PART_LNG_HEMI])?;

        Ok(Gll {
            parts,
            lat_deg,
            lat_min,
            lat_min_frac,
            lat_sec,
            lat_hemisphere,
            lng_deg,
            lng_min,
            lng_min_frac,
            lng_sec,
            lng_hemisphere,
        })
    }

    /// True when the receiver flags the fix as usable.
    ///
    /// A `V` (or anything else) means the coordinates must not be used.
    pub fn is_valid(&self) -> bool {
        self.parts[PART_VALID] == "A"
    }

    /// Latitude degrees.
    pub fn lat_deg(&self) -> i32 {
        self.lat_deg
    }

    /// Latitude minutes as a whole number.
    pub fn lat_min(&self) -> i32 {
        self.lat_min
    }

    /// Latitude minutes with fractional part.
    pub fn lat_min_frac(&self) -> f32 {
        self.lat_min_frac
    }

    /// Latitude seconds.
    pub fn lat_sec(&self) -> f32 {
        self.lat_sec
    }

    /// Latitude hemisphere indicator, stored verbatim.
    pub fn lat_hemisphere(&self) -> char {
        self.lat_hemisphere
    }

    /// Latitude in DMS format, e.g. `47°17'6.8"N`.
    pub fn lat_dms(&self) -> String {
        format!(
            "{}°{}'{:.1}\"{}",
            self.lat_deg, self.lat_min, self.lat_sec, self.lat_hemisphere
        )
    }

    /// Latitude in DMM format, e.g. `47 17.113640`.
    pub fn lat_dmm(&self) -> String {
        format!("{} {:.6}", self.lat_deg, self.lat_min_frac)
    }

    /// Latitude in decimal degrees, e.g. `47.285229`.
    pub fn lat_dd(&self) -> f32 {
        self.lat_deg as f32 + self.lat_min_frac / 60.0
    }

    /// Latitude in decimal degrees with the hemisphere folded into the
    /// sign, negative on the southern hemisphere.
    pub fn lat_signed_dd(&self) -> f32 {
        match self.lat_hemisphere {
            'S' => -self.lat_dd(),
            _ => self.lat_dd(),
        }
    }

    /// Longitude degrees.
    pub fn lng_deg(&self) -> i32 {
        self.lng_deg
    }

    /// Longitude minutes as a whole number.
    pub fn lng_min(&self) -> i32 {
        self.lng_min
    }

    /// Longitude minutes with fractional part.
    pub fn lng_min_frac(&self) -> f32 {
        self.lng_min_frac
    }

    /// Longitude seconds.
    pub fn lng_sec(&self) -> f32 {
        self.lng_sec
    }

    /// Longitude hemisphere indicator, stored verbatim.
    pub fn lng_hemisphere(&self) -> char {
        self.lng_hemisphere
    }

    /// Longitude in DMS format, e.g. `8°33'54.9"E`.
    pub fn lng_dms(&self) -> String {
        format!(
            "{}°{}'{:.1}\"{}",
            self.lng_deg, self.lng_min, self.lng_sec, self.lng_hemisphere
        )
    }

    /// Longitude in DMM format, e.g. `8 33.915649`.
    pub fn lng_dmm(&self) -> String {
        format!("{} {:.6}", self.lng_deg, self.lng_min_frac)
    }

    /// Longitude in decimal degrees, e.g. `8.565261`.
    pub fn lng_dd(&self) -> f32 {
        self.lng_deg as f32 + self.lng_min_frac / 60.0
    }

    /// Longitude in decimal degrees with the hemisphere folded into the
    /// sign, negative on the western hemisphere.
    pub fn lng_signed_dd(&self) -> f32 {
        match self.lng_hemisphere {
            'W' => -self.lng_dd(),
            _ => self.lng_dd(),
        }
    }

    /// The UTC time field verbatim, `hhmmss.ss`.
    pub fn utc_text(&self) -> &str {
        &self.parts[PART_UTC_TIME]
    }

    /// The UTC time field as a typed time of day, if it parses.
    pub fn utc(&self) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(&self.parts[PART_UTC_TIME], "%H%M%S%.f").ok()
    }

    /// The positioning mode field verbatim.
    pub fn mode(&self) -> &str {
        &self.parts[PART_MODE]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA: &str = "4717.11364,N,00833.91565,E,092321.00,A,A";

    #[test]
    fn decodes_latitude_fields() {
        let gll = Gll::from_data(DATA).unwrap();
        assert_eq!(gll.lat_deg(), 47);
        assert_eq!(gll.lat_min(), 17);
        assert!((gll.lat_min_frac() - 17.11364).abs() < 1e-4);
        assert!((gll.lat_sec() - 6.8184).abs() < 1e-3);
        assert_eq!(gll.lat_hemisphere(), 'N');
        assert!((gll.lat_dd() - 47.285227).abs() < 1e-4);
    }

    #[test]
    fn decodes_longitude_fields() {
        let gll = Gll::from_data(DATA).unwrap();
        assert_eq!(gll.lng_deg(), 8);
        assert_eq!(gll.lng_min(), 33);
        assert!((gll.lng_min_frac() - 33.91565).abs() < 1e-4);
        assert!((gll.lng_sec() - 54.939).abs() < 1e-3);
        assert_eq!(gll.lng_hemisphere(), 'E');
        assert!((gll.lng_dd() - 8.565261).abs() < 1e-4);
    }

    #[test]
    fn formats_dms_and_dmm_strings() {
        let gll = Gll::from_data(DATA).unwrap();
        assert_eq!(gll.lat_dms(), "47°17'6.8\"N");
        assert_eq!(gll.lng_dms(), "8°33'54.9\"E");
        assert_eq!(gll.lat_dmm(), "47 17.113640");
        assert_eq!(gll.lng_dmm(), "8 33.915649");
    }

    #[test]
    fn validity_flag_gates_the_fix() {
        let valid = Gll::from_data(DATA).unwrap();
        assert!(valid.is_valid());

        let invalid =
            Gll::from_data("4717.11364,N,00833.91565,E,092321.00,V,A").unwrap();
        assert!(!invalid.is_valid());
    }

    #[test]
    fn southern_and_western_hemispheres_stay_unsigned() {
        let gll = Gll::from_data("0503.8212,S,07430.7441,W,151213.00,A,D").unwrap();
        assert_eq!(gll.lat_hemisphere(), 'S');
        assert_eq!(gll.lng_hemisphere(), 'W');
        assert!((gll.lat_dd() - 5.063687).abs() < 1e-4);
        assert!((gll.lng_dd() - 74.512402).abs() < 1e-4);
        assert!((gll.lat_signed_dd() + 5.063687).abs() < 1e-4);
        assert!((gll.lng_signed_dd() + 74.512402).abs() < 1e-4);
    }

    #[test]
    fn rejects_wrong_field_counts() {
        assert_eq!(
            Gll::from_data("4717.11364,N").unwrap_err(),
            GllError::FieldCount(2)
        );
        assert_eq!(
            Gll::from_data("4717.11364,N,00833.91565,E,092321.00,A,A,X").unwrap_err(),
            GllError::FieldCount(8)
        );
    }

    #[test]
    fn rejects_overlong_fields() {
        assert_eq!(
            Gll::from_data("4717.113640123456789,N,00833.91565,E,092321.00,A,A")
                .unwrap_err(),
            GllError::FieldTooLong(0)
        );
    }

    #[test]
    fn rejects_empty_coordinate_fields() {
        // A receiver without a fix leaves the coordinate fields empty.
        assert_eq!(
            Gll::from_data(",,,,092321.00,V,N").unwrap_err(),
            GllError::CoordinateTooShort
        );
    }

    #[test]
    fn rejects_non_numeric_coordinates() {
        assert_eq!(
            Gll::from_data("47xy.11364,N,00833.91565,E,092321.00,A,A").unwrap_err(),
            GllError::CoordinateNotNumeric
        );
    }

    #[test]
    fn coordinate_without_fractional_digits_reads_as_zero_seconds() {
        let gll = Gll::from_data("4717,N,00833,E,092321.00,A,A").unwrap();
        assert_eq!(gll.lat_deg(), 47);
        assert_eq!(gll.lat_min(), 17);
        assert!((gll.lat_min_frac() - 17.0).abs() < 1e-6);
        assert_eq!(gll.lat_sec(), 0.0);
        assert_eq!(gll.lng_sec(), 0.0);
    }

    #[test]
    fn exposes_time_and_mode_fields() {
        let gll = Gll::from_data(DATA).unwrap();
        assert_eq!(gll.utc_text(), "092321.00");
        assert_eq!(gll.utc(), NaiveTime::from_hms_opt(9, 23, 21));
        assert_eq!(gll.mode(), "A");
    }

    #[test]
    fn decoding_is_idempotent() {
        let a = Gll::from_data(DATA).unwrap();
        let b = Gll::from_data(DATA).unwrap();
        assert_eq!(a.lat_dd().to_bits(), b.lat_dd().to_bits());
        assert_eq!(a.lng_dd().to_bits(), b.lng_dd().to_bits());
    }
}
