//! Encode position readings as point features.
//!
//! Features follow the GeoJSON axis convention: coordinates are
//! `(longitude, latitude)`. Map consumers rely on that order, so
//! [`SpatialFeature::coordinates`] never returns latitude first.

use std::collections::BTreeMap;

use geo::Point;
use thiserror::Error;

use crate::{PositionReading, UserId};

/// Property key carrying the user identity.
pub(crate) const USER_ID_PROPERTY: &str = "userId";
/// Property key carrying the capture time.
pub(crate) const TIMESTAMP_PROPERTY: &str = "timestamp";
/// Property key carrying the accuracy radius.
pub(crate) const ACCURACY_PROPERTY: &str = "accuracy";

/// Scalar value stored in a feature's property bag.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum PropertyValue {
    /// Free text.
    Text(String),
    /// Whole number.
    Integer(i64),
    /// Floating-point number.
    Number(f64),
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// A point geometry plus its property bag.
///
/// The geometry stores longitude in `x` and latitude in `y`.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialFeature {
    /// Point location, `x = longitude`, `y = latitude`.
    pub geometry: Point<f64>,
    /// Scalar properties keyed by name.
    pub properties: BTreeMap<String, PropertyValue>,
}

impl SpatialFeature {
    /// Geometry type of every feature produced by this crate.
    pub const GEOMETRY_TYPE: &'static str = "Point";

    /// Coordinates in `(longitude, latitude)` order.
    #[must_use]
    pub fn coordinates(&self) -> (f64, f64) {
        self.geometry.x_y()
    }

    /// Look up a property by key.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for SpatialFeature {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(serde::Serialize)]
        struct PointView {
            #[serde(rename = "type")]
            kind: &'static str,
            coordinates: [f64; 2],
        }

        #[derive(serde::Serialize)]
        struct FeatureView<'a> {
            #[serde(rename = "type")]
            kind: &'static str,
            geometry: PointView,
            properties: &'a BTreeMap<String, PropertyValue>,
        }

        let (longitude, latitude) = self.coordinates();
        FeatureView {
            kind: "Feature",
            geometry: PointView {
                kind: Self::GEOMETRY_TYPE,
                coordinates: [longitude, latitude],
            },
            properties: &self.properties,
        }
        .serialize(serializer)
    }
}

/// Reasons a reading cannot become a feature.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    /// A coordinate or the accuracy was NaN or infinite.
    #[error("{field} must be finite, got {value}")]
    NonFinite {
        /// Offending field.
        field: &'static str,
        /// Offending value.
        value: f64,
    },
    /// Latitude outside `[-90, 90]`.
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    /// Longitude outside `[-180, 180]`.
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
    /// Accuracy radius below zero.
    #[error("accuracy {0} must not be negative")]
    NegativeAccuracy(f64),
    /// Timestamp too large to store as a signed integer property.
    #[error("timestamp {0} is out of range")]
    TimestampOutOfRange(u64),
}

/// Encode `reading` for `user_id` as a point feature.
///
/// The coordinate pair is swapped to `(longitude, latitude)`. Properties
/// carry the user id, timestamp and accuracy verbatim. Readings outside the
/// WGS84 bounds, with non-finite values or with a negative accuracy are
/// rejected rather than clamped.
///
/// # Examples
///
/// ```
/// use live_locations_core::{PositionReading, PropertyValue, UserId, encode};
///
/// # fn main() -> Result<(), live_locations_core::EncodeError> {
/// let reading = PositionReading::new(37.7749, -122.4194, 15.0, 1_700_000_000_000);
/// let feature = encode(&reading, &UserId::new("u1"))?;
/// assert_eq!(feature.coordinates(), (-122.4194, 37.7749));
/// assert_eq!(feature.property("userId"), Some(&PropertyValue::from("u1")));
/// # Ok(())
/// # }
/// ```
pub fn encode(reading: &PositionReading, user_id: &UserId) -> Result<SpatialFeature, EncodeError> {
    validate(reading)?;
    let timestamp = i64::try_from(reading.timestamp)
        .map_err(|_| EncodeError::TimestampOutOfRange(reading.timestamp))?;

    let properties = BTreeMap::from([
        (USER_ID_PROPERTY.to_owned(), PropertyValue::from(user_id.as_str())),
        (TIMESTAMP_PROPERTY.to_owned(), PropertyValue::Integer(timestamp)),
        (ACCURACY_PROPERTY.to_owned(), PropertyValue::Number(reading.accuracy)),
    ]);

    Ok(SpatialFeature {
        geometry: Point::new(reading.longitude, reading.latitude),
        properties,
    })
}

fn validate(reading: &PositionReading) -> Result<(), EncodeError> {
    for (field, value) in [
        ("latitude", reading.latitude),
        ("longitude", reading.longitude),
        ("accuracy", reading.accuracy),
    ] {
        if !value.is_finite() {
            return Err(EncodeError::NonFinite { field, value });
        }
    }
    if !(-90.0..=90.0).contains(&reading.latitude) {
        return Err(EncodeError::LatitudeOutOfRange(reading.latitude));
    }
    if !(-180.0..=180.0).contains(&reading.longitude) {
        return Err(EncodeError::LongitudeOutOfRange(reading.longitude));
    }
    if reading.accuracy < 0.0 {
        return Err(EncodeError::NegativeAccuracy(reading.accuracy));
    }
    Ok(())
}
