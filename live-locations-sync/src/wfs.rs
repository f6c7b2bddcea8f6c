//! Wire shape of GetFeature responses.

use live_locations_core::FeatureRecord;
use serde::Deserialize;
use serde_json::Value;

/// GeoJSON feature collection as returned by the store.
///
/// Only `features` matters; counters are kept for diagnostics. Members are
/// held raw and converted one by one, so only a `features` value that is not
/// an array fails the whole response.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct GetFeatureResponse {
    pub features: Option<Vec<Value>>,
    #[serde(rename = "numberReturned")]
    pub number_returned: Option<u64>,
}

impl GetFeatureResponse {
    /// Parse a response body.
    pub fn parse(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }

    /// Features in store order, or an empty list when the field is absent.
    pub fn into_features(self) -> Vec<FeatureRecord> {
        self.features
            .unwrap_or_default()
            .into_iter()
            .map(FeatureRecord::from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const BODY: &str = r#"{
        "type": "FeatureCollection",
        "numberReturned": 2,
        "features": [
            {"type": "Feature", "id": "user_locations.1",
             "geometry": {"type": "Point", "coordinates": [-122.4, 37.7]},
             "properties": {"user_id": "u1"}},
            {"type": "Feature", "id": "user_locations.2",
             "geometry": null, "properties": null}
        ]
    }"#;

    #[rstest]
    fn parses_features_in_order() {
        let response = GetFeatureResponse::parse(BODY).expect("valid body");
        assert_eq!(response.number_returned, Some(2));
        let features = response.into_features();
        assert_eq!(features.len(), 2);
        assert_eq!(
            features[0].property("user_id").and_then(|v| v.as_str()),
            Some("u1")
        );
        assert!(features[1].geometry.is_none());
    }

    #[rstest]
    fn odd_record_does_not_hide_its_neighbours() {
        let body = r#"{"features": [
            {"id": "a", "geometry": {"type": "Point", "coordinates": [1.0, 2.0]},
             "properties": {"user_id": "u1"}},
            {"id": "b", "geometry": {"coordinates": [3.0, 4.0]}, "properties": "n/a"}
        ]}"#;
        let features = GetFeatureResponse::parse(body)
            .expect("valid body")
            .into_features();
        assert_eq!(features.len(), 2);
        assert!(features[0].point().is_some());
        assert_eq!(features[1].id.as_ref().and_then(|v| v.as_str()), Some("b"));
        assert!(features[1].point().is_none());
        assert!(features[1].properties.is_none());
    }

    #[rstest]
    #[case(r#"{"type": "FeatureCollection"}"#)]
    #[case(r#"{"features": null}"#)]
    #[case("{}")]
    fn missing_features_yield_empty(#[case] body: &str) {
        let response = GetFeatureResponse::parse(body).expect("valid body");
        assert!(response.into_features().is_empty());
    }

    #[rstest]
    #[case("<ows:ExceptionReport/>")]
    #[case("")]
    #[case(r#"{"features": 3}"#)]
    fn malformed_bodies_are_rejected(#[case] body: &str) {
        assert!(GetFeatureResponse::parse(body).is_err());
    }
}
