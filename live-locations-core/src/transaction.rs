//! WFS-T insert transaction documents.
//!
//! The transaction uses GML's `EPSG:4326` axis order, so `gml:pos` carries
//! `latitude longitude`. This is the reverse of [`SpatialFeature`]'s GeoJSON
//! order and the two must stay distinct.

use quick_xml::escape::escape;

use crate::{SpatialFeature, StoreConfig, UserId};

const WFS_NAMESPACE: &str = "http://www.opengis.net/wfs/2.0";
const GML_NAMESPACE: &str = "http://www.opengis.net/gml/3.2";
const WFS_VERSION: &str = "2.0.0";
const SRS_NAME: &str = "EPSG:4326";

/// Serialise a single insert of `feature` into a WFS 2.0 transaction.
///
/// The configured namespace is declared inline as `xmlns:{ns}="http://{ns}"`
/// and prefixes the collection element and its `geom`, `user_id`,
/// `timestamp` and `accuracy` children. Text content is XML-escaped; element
/// names come from a validated [`StoreConfig`].
///
/// # Examples
///
/// ```
/// use live_locations_core::{
///     PositionReading, StoreConfig, UserId, build_insert_transaction, encode,
/// };
///
/// # fn main() -> Result<(), live_locations_core::EncodeError> {
/// let reading = PositionReading::new(37.7749, -122.4194, 15.0, 1_700_000_000_000);
/// let user = UserId::new("u1");
/// let feature = encode(&reading, &user)?;
/// let xml = build_insert_transaction(
///     &feature,
///     &user,
///     reading.timestamp,
///     reading.accuracy,
///     &StoreConfig::default(),
/// );
/// assert!(xml.contains("<gml:pos>37.7749 -122.4194</gml:pos>"));
/// assert!(xml.contains("<live_locations:user_id>u1</live_locations:user_id>"));
/// # Ok(())
/// # }
/// ```
#[must_use]
pub fn build_insert_transaction(
    feature: &SpatialFeature,
    user_id: &UserId,
    timestamp: u64,
    accuracy: f64,
    config: &StoreConfig,
) -> String {
    let ns = config.namespace();
    let layer = config.collection_name();
    let (longitude, latitude) = feature.coordinates();
    let raw_uri = format!("http://{ns}");
    let namespace_uri = escape(raw_uri.as_str());
    let user = escape(user_id.as_str());

    format!(
        r#"<wfs:Transaction service="WFS" version="{WFS_VERSION}"
  xmlns:wfs="{WFS_NAMESPACE}"
  xmlns:gml="{GML_NAMESPACE}"
  xmlns:{ns}="{namespace_uri}">
  <wfs:Insert>
    <{ns}:{layer}>
      <{ns}:geom>
        <gml:Point srsName="{SRS_NAME}">
          <gml:pos>{latitude} {longitude}</gml:pos>
        </gml:Point>
      </{ns}:geom>
      <{ns}:user_id>{user}</{ns}:user_id>
      <{ns}:timestamp>{timestamp}</{ns}:timestamp>
      <{ns}:accuracy>{accuracy}</{ns}:accuracy>
    </{ns}:{layer}>
  </wfs:Insert>
</wfs:Transaction>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PositionReading, encode};
    use quick_xml::Reader;
    use quick_xml::events::Event;
    use rstest::{fixture, rstest};

    /// Parse `xml` and return `(element name, text)` pairs for every element
    /// with direct text content, plus the element names in document order.
    fn parse(xml: &str) -> (Vec<(String, String)>, Vec<String>) {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);
        let mut texts = Vec::new();
        let mut names = Vec::new();
        let mut open: Vec<String> = Vec::new();
        loop {
            match reader.read_event() {
                Ok(Event::Start(start)) => {
                    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                    names.push(name.clone());
                    open.push(name);
                }
                Ok(Event::End(_)) => {
                    open.pop();
                }
                Ok(Event::Text(text)) => {
                    let current = open.last().cloned().unwrap_or_default();
                    let value = text.unescape().expect("valid text").into_owned();
                    texts.push((current, value));
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(err) => panic!("transaction is not well-formed XML: {err}"),
            }
        }
        assert!(open.is_empty(), "unclosed elements: {open:?}");
        (texts, names)
    }

    fn text_of<'a>(texts: &'a [(String, String)], element: &str) -> Option<&'a str> {
        texts
            .iter()
            .find(|(name, _)| name == element)
            .map(|(_, text)| text.as_str())
    }

    #[fixture]
    fn reading() -> PositionReading {
        PositionReading::new(37.7749, -122.4194, 15.0, 1_700_000_000_000)
    }

    fn build(reading: &PositionReading, user: &UserId, config: &StoreConfig) -> String {
        let feature = encode(reading, user).expect("valid reading");
        build_insert_transaction(&feature, user, reading.timestamp, reading.accuracy, config)
    }

    #[rstest]
    fn contains_exactly_one_insert(reading: PositionReading) {
        let xml = build(&reading, &UserId::new("u1"), &StoreConfig::default());
        let (_, names) = parse(&xml);
        let inserts = names.iter().filter(|name| *name == "wfs:Insert").count();
        assert_eq!(inserts, 1);
        assert_eq!(names.first().map(String::as_str), Some("wfs:Transaction"));
    }

    #[rstest]
    fn declares_service_version_and_namespaces(reading: PositionReading) {
        let xml = build(&reading, &UserId::new("u1"), &StoreConfig::default());
        assert!(xml.starts_with(r#"<wfs:Transaction service="WFS" version="2.0.0""#));
        assert!(xml.contains(r#"xmlns:wfs="http://www.opengis.net/wfs/2.0""#));
        assert!(xml.contains(r#"xmlns:gml="http://www.opengis.net/gml/3.2""#));
        assert!(xml.contains(r#"xmlns:live_locations="http://live_locations""#));
        assert!(xml.contains(r#"<gml:Point srsName="EPSG:4326">"#));
    }

    #[rstest]
    fn position_is_latitude_first(reading: PositionReading) {
        let xml = build(&reading, &UserId::new("u1"), &StoreConfig::default());
        let (texts, _) = parse(&xml);
        assert_eq!(text_of(&texts, "gml:pos"), Some("37.7749 -122.4194"));
    }

    #[rstest]
    fn scalar_fields_match_inputs(reading: PositionReading) {
        let xml = build(&reading, &UserId::new("u1"), &StoreConfig::default());
        let (texts, _) = parse(&xml);
        assert_eq!(text_of(&texts, "live_locations:user_id"), Some("u1"));
        assert_eq!(
            text_of(&texts, "live_locations:timestamp"),
            Some("1700000000000")
        );
        assert_eq!(text_of(&texts, "live_locations:accuracy"), Some("15"));
    }

    #[rstest]
    fn uses_configured_namespace_and_collection(reading: PositionReading) {
        let config = StoreConfig::new("http://example.com", "fleet", "vans").expect("valid");
        let xml = build(&reading, &UserId::new("u1"), &config);
        let (_, names) = parse(&xml);
        assert!(names.iter().any(|name| name == "fleet:vans"));
        assert!(names.iter().any(|name| name == "fleet:geom"));
        assert!(xml.contains(r#"xmlns:fleet="http://fleet""#));
    }

    #[rstest]
    #[case("<script>&\"'")]
    #[case("</live_locations:user_id><evil/>")]
    fn escapes_user_id(reading: PositionReading, #[case] raw: &str) {
        let xml = build(&reading, &UserId::new(raw), &StoreConfig::default());
        let (texts, names) = parse(&xml);
        assert_eq!(text_of(&texts, "live_locations:user_id"), Some(raw));
        assert!(!names.iter().any(|name| name == "evil"));
    }
}
