//! Store flags shared by every subcommand.

use live_locations_core::{StoreConfig, StoreConfigOverride};

use crate::CliError;

pub(crate) const ARG_ENDPOINT: &str = "endpoint";
pub(crate) const ARG_NAMESPACE: &str = "namespace";
pub(crate) const ARG_COLLECTION: &str = "collection";

/// Merge the optional store flags over the default store.
pub(crate) fn resolve_store(
    endpoint: Option<String>,
    namespace: Option<String>,
    collection: Option<String>,
) -> Result<StoreConfig, CliError> {
    let layered = StoreConfigOverride {
        endpoint_base: endpoint,
        namespace,
        collection_name: collection,
    };
    Ok(layered.apply_to(&StoreConfig::default())?)
}
