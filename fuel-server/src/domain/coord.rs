//! Geographic coordinate type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when constructing a coordinate out of range.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid coordinate ({latitude}, {longitude}): {reason}")]
pub struct InvalidCoordinate {
    latitude: f64,
    longitude: f64,
    reason: &'static str,
}

/// A WGS84 latitude/longitude pair in decimal degrees.
///
/// Latitude is within `[-90, 90]` and longitude within `[-180, 180]`;
/// both are finite. This type guarantees validity by construction.
///
/// # Examples
///
/// ```
/// use fuel_server::domain::Coordinate;
///
/// let denver = Coordinate::new(39.7392, -104.9903).unwrap();
/// assert_eq!(denver.latitude(), 39.7392);
///
/// assert!(Coordinate::new(91.0, 0.0).is_err());
/// assert!(Coordinate::new(0.0, f64::NAN).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate", into = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Create a coordinate, validating the ranges.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinate> {
        let invalid = |reason| InvalidCoordinate {
            latitude,
            longitude,
            reason,
        };

        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(invalid("must be finite"));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(invalid("latitude must be within [-90, 90]"));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(invalid("longitude must be within [-180, 180]"));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// The coordinate as a `geo` point (x = longitude, y = latitude).
    pub fn to_point(self) -> geo::Point<f64> {
        geo::Point::new(self.longitude, self.latitude)
    }

    /// The coordinate as `[latitude, longitude]`, the axis order used by the
    /// route spatial index.
    pub fn lat_lon(self) -> [f64; 2] {
        [self.latitude, self.longitude]
    }
}

impl fmt::Debug for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coordinate({}, {})", self.latitude, self.longitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5},{:.5}", self.latitude, self.longitude)
    }
}

/// Unvalidated wire form.
#[derive(Serialize, Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = InvalidCoordinate;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.latitude, raw.longitude)
    }
}

impl From<Coordinate> for RawCoordinate {
    fn from(c: Coordinate) -> Self {
        RawCoordinate {
            latitude: c.latitude,
            longitude: c.longitude,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_ranges() {
        assert!(Coordinate::new(0.0, 0.0).is_ok());
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
        assert!(Coordinate::new(41.8781, -87.6298).is_ok());
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(Coordinate::new(90.01, 0.0).is_err());
        assert!(Coordinate::new(-90.01, 0.0).is_err());
        assert!(Coordinate::new(0.0, 180.01).is_err());
        assert!(Coordinate::new(0.0, -180.01).is_err());
    }

    #[test]
    fn rejects_non_finite() {
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn point_axis_order() {
        let c = Coordinate::new(40.0, -75.0).unwrap();
        let p = c.to_point();
        assert_eq!(p.x(), -75.0);
        assert_eq!(p.y(), 40.0);
        assert_eq!(c.lat_lon(), [40.0, -75.0]);
    }

    #[test]
    fn error_display() {
        let err = Coordinate::new(100.0, 0.0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid coordinate (100, 0): latitude must be within [-90, 90]"
        );
    }

    #[test]
    fn serde_validates() {
        let ok: Coordinate = serde_json::from_str(r#"{"latitude":1.5,"longitude":2.5}"#).unwrap();
        assert_eq!(ok, Coordinate::new(1.5, 2.5).unwrap());

        let bad = serde_json::from_str::<Coordinate>(r#"{"latitude":95.0,"longitude":0.0}"#);
        assert!(bad.is_err());
    }
}
