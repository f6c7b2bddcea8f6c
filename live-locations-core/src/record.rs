//! Feature records as returned by the store's read path.
//!
//! The store owns these records; this crate only holds transient copies.
//! Decoding is deliberately lenient: unknown members are ignored and the
//! geometry is kept raw so collections containing non-point features still
//! load.

use geo::Point;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Ordered feature records returned by a `GetFeature` request.
pub type FeatureCollection = Vec<FeatureRecord>;

/// Geometry member of a [`FeatureRecord`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordGeometry {
    /// GeoJSON geometry type, e.g. `"Point"`; empty when the source omits it.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Raw coordinate array.
    #[serde(default)]
    pub coordinates: Value,
}

/// A single feature-shaped record.
///
/// # Examples
///
/// ```
/// use live_locations_core::FeatureRecord;
///
/// let json = r#"{
///     "type": "Feature",
///     "id": "user_locations.7",
///     "geometry": {"type": "Point", "coordinates": [-122.4194, 37.7749]},
///     "properties": {"user_id": "u1", "timestamp": 1700000000000}
/// }"#;
/// let record: FeatureRecord = serde_json::from_str(json).unwrap();
/// let point = record.point().unwrap();
/// assert_eq!(point.x(), -122.4194);
/// assert_eq!(record.property("user_id").and_then(|v| v.as_str()), Some("u1"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    /// Store-assigned identifier, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    /// Geometry, absent for geometry-less records.
    #[serde(default)]
    pub geometry: Option<RecordGeometry>,
    /// Property bag; `null` in the source is kept as `None`.
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

impl FeatureRecord {
    /// Point location (`x = longitude`, `y = latitude`) when the geometry is
    /// a GeoJSON point with numeric coordinates.
    #[must_use]
    pub fn point(&self) -> Option<Point<f64>> {
        let geometry = self.geometry.as_ref()?;
        if geometry.kind != "Point" {
            return None;
        }
        let mut coords = geometry.coordinates.as_array()?.iter();
        let longitude = coords.next()?.as_f64()?;
        let latitude = coords.next()?.as_f64()?;
        Some(Point::new(longitude, latitude))
    }

    /// Look up a property by key.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.as_ref()?.get(key)
    }
}

/// Lenient conversion of one raw collection member.
///
/// Never fails: members of the wrong shape are dropped, and a non-object
/// value becomes an empty record, so one odd entry cannot hide the rest of a
/// collection.
impl From<Value> for FeatureRecord {
    fn from(value: Value) -> Self {
        let Value::Object(mut members) = value else {
            return Self::default();
        };
        let geometry = match members.remove("geometry") {
            Some(Value::Object(mut geometry)) => Some(RecordGeometry {
                kind: match geometry.remove("type") {
                    Some(Value::String(kind)) => kind,
                    _ => String::new(),
                },
                coordinates: geometry.remove("coordinates").unwrap_or_default(),
            }),
            _ => None,
        };
        let properties = match members.remove("properties") {
            Some(Value::Object(properties)) => Some(properties),
            _ => None,
        };
        Self {
            id: members.remove("id").filter(|id| !id.is_null()),
            geometry,
            properties,
        }
    }
}
