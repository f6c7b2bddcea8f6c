//! Addressable coordinates of the remote feature store.
//!
//! A [`StoreConfig`] names the service endpoint, the logical namespace
//! (GeoServer workspace) and the collection (layer) that receives location
//! features. Every operation accepts an optional override; when none is given
//! the fixed default from [`StoreConfig::default`] applies. There is no global
//! mutable configuration.

use thiserror::Error;
use url::Url;

/// Base endpoint used when no override is supplied.
pub const DEFAULT_ENDPOINT_BASE: &str = "http://localhost:8080/geoserver";
/// Namespace used when no override is supplied.
pub const DEFAULT_NAMESPACE: &str = "live_locations";
/// Collection name used when no override is supplied.
pub const DEFAULT_COLLECTION_NAME: &str = "user_locations";

/// Errors returned when constructing a [`StoreConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreConfigError {
    /// The endpoint is not an absolute URL.
    #[error("endpoint {endpoint:?} is not a valid URL: {message}")]
    InvalidEndpoint {
        /// Rejected endpoint.
        endpoint: String,
        /// Parser diagnostic.
        message: String,
    },
    /// The endpoint uses a scheme other than `http` or `https`.
    #[error("endpoint {endpoint:?} must use http or https")]
    UnsupportedScheme {
        /// Rejected endpoint.
        endpoint: String,
    },
    /// A namespace or collection name cannot be used as an XML name.
    #[error("{field} {value:?} is not a valid XML name")]
    InvalidName {
        /// Which setting was rejected.
        field: &'static str,
        /// Rejected value.
        value: String,
    },
}

/// Immutable location of the feature store.
///
/// Namespace and collection names become element names in the insert
/// transaction, so construction rejects anything that is not an XML NCName.
///
/// # Examples
///
/// ```
/// use live_locations_core::StoreConfig;
///
/// # fn main() -> Result<(), live_locations_core::StoreConfigError> {
/// let config = StoreConfig::new("https://maps.example.org/geoserver/", "fleet", "vans")?;
/// assert_eq!(config.transaction_url(), "https://maps.example.org/geoserver/wfs");
/// assert_eq!(config.type_name(), "fleet:vans");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    endpoint_base: String,
    namespace: String,
    collection_name: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            endpoint_base: DEFAULT_ENDPOINT_BASE.to_owned(),
            namespace: DEFAULT_NAMESPACE.to_owned(),
            collection_name: DEFAULT_COLLECTION_NAME.to_owned(),
        }
    }
}

impl StoreConfig {
    /// Validate and construct a configuration.
    ///
    /// A trailing `/` on the endpoint is dropped so URLs join cleanly.
    pub fn new(
        endpoint_base: impl Into<String>,
        namespace: impl Into<String>,
        collection_name: impl Into<String>,
    ) -> Result<Self, StoreConfigError> {
        let endpoint_base = validate_endpoint(endpoint_base.into())?;
        let namespace = validate_name("namespace", namespace.into())?;
        let collection_name = validate_name("collection name", collection_name.into())?;
        Ok(Self {
            endpoint_base,
            namespace,
            collection_name,
        })
    }

    /// Return the effective configuration: `override_config` when present,
    /// otherwise the default.
    ///
    /// # Examples
    ///
    /// ```
    /// use live_locations_core::StoreConfig;
    ///
    /// assert_eq!(StoreConfig::resolve(None), StoreConfig::default());
    /// ```
    #[must_use]
    pub fn resolve(override_config: Option<&Self>) -> Self {
        override_config.cloned().unwrap_or_default()
    }

    /// Service endpoint without a trailing slash.
    #[must_use]
    pub fn endpoint_base(&self) -> &str {
        &self.endpoint_base
    }

    /// Logical namespace (workspace) of the collection.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Name of the collection (layer) holding location features.
    #[must_use]
    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    /// Fully qualified type name, `namespace:collection`.
    #[must_use]
    pub fn type_name(&self) -> String {
        format!("{}:{}", self.namespace, self.collection_name)
    }

    /// URL receiving transaction documents.
    #[must_use]
    pub fn transaction_url(&self) -> String {
        format!("{}/wfs", self.endpoint_base)
    }

    /// URL returning every feature of the collection as GeoJSON.
    ///
    /// ```
    /// use live_locations_core::StoreConfig;
    ///
    /// assert_eq!(
    ///     StoreConfig::default().get_feature_url(),
    ///     "http://localhost:8080/geoserver/wfs?service=WFS&version=2.0.0&request=GetFeature\
    ///      &typeName=live_locations:user_locations&outputFormat=application/json",
    /// );
    /// ```
    #[must_use]
    pub fn get_feature_url(&self) -> String {
        // Names are NCNames, so the query needs no percent-encoding.
        format!(
            "{}?service=WFS&version=2.0.0&request=GetFeature&typeName={}&outputFormat=application/json",
            self.transaction_url(),
            self.type_name()
        )
    }
}

/// Partial configuration merged field by field over a base [`StoreConfig`].
///
/// Layered configuration sources (flags, files, environment) produce these.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreConfigOverride {
    /// Replacement endpoint.
    pub endpoint_base: Option<String>,
    /// Replacement namespace.
    pub namespace: Option<String>,
    /// Replacement collection name.
    pub collection_name: Option<String>,
}

impl StoreConfigOverride {
    /// Whether no field is overridden.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.endpoint_base.is_none() && self.namespace.is_none() && self.collection_name.is_none()
    }

    /// Merge the overridden fields over `base` and validate the result.
    ///
    /// # Examples
    ///
    /// ```
    /// use live_locations_core::{StoreConfig, StoreConfigOverride};
    ///
    /// # fn main() -> Result<(), live_locations_core::StoreConfigError> {
    /// let merged = StoreConfigOverride {
    ///     namespace: Some("fleet".into()),
    ///     ..StoreConfigOverride::default()
    /// }
    /// .apply_to(&StoreConfig::default())?;
    /// assert_eq!(merged.type_name(), "fleet:user_locations");
    /// # Ok(())
    /// # }
    /// ```
    pub fn apply_to(self, base: &StoreConfig) -> Result<StoreConfig, StoreConfigError> {
        if self.is_empty() {
            return Ok(base.clone());
        }
        StoreConfig::new(
            self.endpoint_base
                .unwrap_or_else(|| base.endpoint_base.clone()),
            self.namespace.unwrap_or_else(|| base.namespace.clone()),
            self.collection_name
                .unwrap_or_else(|| base.collection_name.clone()),
        )
    }
}

fn validate_endpoint(raw: String) -> Result<String, StoreConfigError> {
    let trimmed = raw.trim_end_matches('/');
    let parsed = Url::parse(trimmed).map_err(|err| StoreConfigError::InvalidEndpoint {
        endpoint: raw.clone(),
        message: err.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(StoreConfigError::UnsupportedScheme { endpoint: raw });
    }
    // Service paths are appended to the endpoint, so it must end in a path.
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(StoreConfigError::InvalidEndpoint {
            endpoint: raw,
            message: "query strings and fragments are not allowed".to_owned(),
        });
    }
    Ok(trimmed.to_owned())
}

fn validate_name(field: &'static str, value: String) -> Result<String, StoreConfigError> {
    if is_ncname(&value) {
        Ok(value)
    } else {
        Err(StoreConfigError::InvalidName { field, value })
    }
}

/// Whether `value` is a non-colonised XML name.
fn is_ncname(value: &str) -> bool {
    let mut chars = value.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn default_matches_documented_values() {
        let config = StoreConfig::default();
        assert_eq!(config.endpoint_base(), "http://localhost:8080/geoserver");
        assert_eq!(config.namespace(), "live_locations");
        assert_eq!(config.collection_name(), "user_locations");
        assert_eq!(
            config.transaction_url(),
            "http://localhost:8080/geoserver/wfs"
        );
    }

    #[rstest]
    fn resolve_prefers_override() {
        let custom = StoreConfig::new("http://gis.internal:9000", "ops", "trackers")
            .expect("valid config");
        assert_eq!(StoreConfig::resolve(Some(&custom)), custom);
    }

    #[rstest]
    fn new_trims_trailing_slashes() {
        let config =
            StoreConfig::new("http://example.com/geoserver//", "ns", "layer").expect("valid");
        assert_eq!(config.endpoint_base(), "http://example.com/geoserver");
    }

    #[rstest]
    #[case("not a url")]
    #[case("/relative/path")]
    #[case("http://example.com/geoserver?x=1")]
    #[case("http://example.com/geoserver#top")]
    #[case("http://example.com/geoserver?")]
    fn new_rejects_invalid_endpoints(#[case] endpoint: &str) {
        let err = StoreConfig::new(endpoint, "ns", "layer").expect_err("should fail");
        assert!(matches!(err, StoreConfigError::InvalidEndpoint { .. }));
    }

    #[rstest]
    fn new_rejects_non_http_schemes() {
        let err = StoreConfig::new("ftp://example.com", "ns", "layer").expect_err("should fail");
        assert!(matches!(err, StoreConfigError::UnsupportedScheme { .. }));
    }

    #[rstest]
    #[case("")]
    #[case("1layer")]
    #[case("ns:layer")]
    #[case("has space")]
    #[case("<tag>")]
    fn new_rejects_names_unusable_in_xml(#[case] name: &str) {
        let err = StoreConfig::new(DEFAULT_ENDPOINT_BASE, name, "layer").expect_err("should fail");
        assert!(matches!(
            err,
            StoreConfigError::InvalidName {
                field: "namespace",
                ..
            }
        ));
    }

    #[rstest]
    #[case("user_locations")]
    #[case("_private")]
    #[case("layer-2.v1")]
    fn new_accepts_ncnames(#[case] name: &str) {
        assert!(StoreConfig::new(DEFAULT_ENDPOINT_BASE, DEFAULT_NAMESPACE, name).is_ok());
    }

    #[rstest]
    fn empty_override_returns_base() {
        let base = StoreConfig::default();
        let merged = StoreConfigOverride::default()
            .apply_to(&base)
            .expect("empty override is valid");
        assert_eq!(merged, base);
    }

    #[rstest]
    fn override_merges_field_by_field() {
        let merged = StoreConfigOverride {
            endpoint_base: Some("https://gis.example.net".to_owned()),
            collection_name: Some("couriers".to_owned()),
            ..StoreConfigOverride::default()
        }
        .apply_to(&StoreConfig::default())
        .expect("valid override");
        assert_eq!(merged.endpoint_base(), "https://gis.example.net");
        assert_eq!(merged.namespace(), DEFAULT_NAMESPACE);
        assert_eq!(merged.collection_name(), "couriers");
    }

    #[rstest]
    fn override_is_validated() {
        let err = StoreConfigOverride {
            namespace: Some("bad name".to_owned()),
            ..StoreConfigOverride::default()
        }
        .apply_to(&StoreConfig::default())
        .expect_err("should fail");
        assert!(matches!(err, StoreConfigError::InvalidName { .. }));
    }

    #[rstest]
    fn get_feature_url_uses_custom_names() {
        let config = StoreConfig::new("http://example.com", "fleet", "vans").expect("valid");
        assert_eq!(
            config.get_feature_url(),
            "http://example.com/wfs?service=WFS&version=2.0.0&request=GetFeature\
             &typeName=fleet:vans&outputFormat=application/json"
        );
    }
}
