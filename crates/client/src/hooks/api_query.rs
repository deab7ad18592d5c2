use dioxus::prelude::*;
use serde::de::DeserializeOwned;

use crate::app::{use_store_signals, use_stores};
use crate::error::ClientError;
use crate::stores::{Query, QueryClient};

/// Load `GET path` through a [`Query`] cell owned by the calling component.
///
/// The resource re-runs whenever a mutation invalidates the query layer.
/// While it refetches the previous value stays readable, and a failed
/// refetch comes back as [`ClientError::StaleData`].
///
/// ```rust,ignore
/// let providers = use_api_query::<Vec<ProviderConfig>>(endpoints::API_SETTINGS);
/// match &*providers.read() {
///     Some(Ok(list)) => rsx! { "{list.len()} providers" },
///     Some(Err(e)) => rsx! { "{e}" },
///     None => rsx! { "Loading..." },
/// }
/// ```
pub fn use_api_query<T>(path: &'static str) -> Resource<Result<T, ClientError>>
where
    T: DeserializeOwned + Clone + 'static,
{
    let stores = use_stores();
    let signals = use_store_signals();
    let query: Query<T> = use_hook(|| stores.queries.query::<T>(path));

    use_resource(move || {
        // Subscribe to invalidations.
        let _generation = signals.queries.read();
        let query = query.clone();
        async move { query.ensure().await }
    })
}

/// The shared client for mutations.
pub fn use_query_client() -> QueryClient {
    use_stores().queries
}
