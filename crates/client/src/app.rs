//! Store provider for the Dioxus tree.
//!
//! The stores live outside Dioxus, so the provider mirrors their snapshots
//! into signals: each store's change stream is drained by a component
//! future that copies the new snapshot into its signal.

use dioxus::prelude::*;
use futures_util::StreamExt;

use crate::config::AppConfig;
use crate::stores::{AppStores, AuthState, DashboardState};

/// Reactive mirrors of the store snapshots.
#[derive(Clone, Copy)]
pub struct StoreSignals {
    pub auth: Signal<AuthState>,
    pub dashboard: Signal<DashboardState>,
    /// Current query generation; bumps after every successful mutation.
    pub queries: Signal<u64>,
}

#[component]
pub fn StoreProvider(children: Element) -> Element {
    let stores = use_context_provider(|| AppStores::from_config(&AppConfig::from_env()));

    let mut auth = use_signal(|| stores.auth.state());
    let mut dashboard = use_signal(|| stores.dashboard.state());
    let mut queries = use_signal(|| stores.queries.generation());

    let auth_store = stores.auth.clone();
    use_future(move || {
        let store = auth_store.clone();
        async move {
            let mut changes = store.subscribe();
            while changes.next().await.is_some() {
                auth.set(store.state());
            }
        }
    });

    let dashboard_store = stores.dashboard.clone();
    use_future(move || {
        let store = dashboard_store.clone();
        async move {
            let mut changes = store.subscribe();
            while changes.next().await.is_some() {
                dashboard.set(store.state());
            }
        }
    });

    let query_client = stores.queries.clone();
    use_future(move || {
        let client = query_client.clone();
        async move {
            let mut changes = client.subscribe();
            while changes.next().await.is_some() {
                let generation = client.generation();
                if *queries.peek() != generation {
                    queries.set(generation);
                }
            }
        }
    });

    use_context_provider(|| StoreSignals {
        auth,
        dashboard,
        queries,
    });

    children
}

pub fn use_stores() -> AppStores {
    use_context::<AppStores>()
}

pub fn use_store_signals() -> StoreSignals {
    use_context::<StoreSignals>()
}
