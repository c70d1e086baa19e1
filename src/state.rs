//! Last known position of the receiver.

use std::fmt;
use std::sync::Mutex;

/// A coordinate pair in decimal degrees.
///
/// Both values are unsigned magnitudes; the hemisphere indicators stay
/// with the decoded sentence and are not folded into the sign here.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Position {
    /// Latitude in decimal degrees
    pub latitude: f32,
    /// Longitude in decimal degrees
    pub longitude: f32,
}

impl Position {
    /// Create a new zeroed position, the state before any fix arrives.
    pub fn new() -> Position {
        Position {
            ..Default::default()
        }
    }

    /// Print the headline for a CSV document containing all fields seperated by `;`
    pub fn headline() -> String {
        String::from("latitude;longitude")
    }
}

/// Display state implementation for CSV document with separator `;`
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:.6};{:.6}", self.latitude, self.longitude)
    }
}

/// Shared store for the latest valid position.
///
/// One writer (the decode pipeline) and any number of readers (display or
/// reporting tasks). Update and snapshot each run under a single lock
/// acquisition, so a reader never sees the latitude of one fix paired
/// with the longitude of another.
#[derive(Debug, Default)]
pub struct PositionStore {
    inner: Mutex<Position>,
}

impl PositionStore {
    /// New store holding the zeroed position.
    pub fn new() -> Self {
        PositionStore {
            ..Default::default()
        }
    }

    /// Overwrites the stored pair. Callers gate on fix validity first.
    pub fn update(&self, latitude: f32, longitude: f32) {
        let mut position = self.inner.lock().unwrap();
        position.latitude = latitude;
        position.longitude = longitude;
    }

    /// Snapshot of the stored pair.
    pub fn get(&self) -> Position {
        *self.inner.lock().unwrap()
    }

    /// Latitude of the last stored pair.
    pub fn latitude(&self) -> f32 {
        self.get().latitude
    }

    /// Longitude of the last stored pair.
    pub fn longitude(&self) -> f32 {
        self.get().longitude
    }

    /// Latitude as decimal text, e.g. `47.285229`.
    pub fn latitude_str(&self) -> String {
        format!("{:.6}", self.latitude())
    }

    /// Longitude as decimal text, e.g. `8.565261`.
    pub fn longitude_str(&self) -> String {
        format!("{:.6}", self.longitude())
    }
}
