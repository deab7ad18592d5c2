//! Data hooks over the query layer.

mod api_query;

pub use api_query::{use_api_query, use_query_client};
