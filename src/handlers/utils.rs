use std::collections::HashMap;

use crate::api::ApiResponse;
use crate::error::ApiError;
use crate::filter::{Filter, FilterError};
use crate::id::DocumentId;

/// Reject malformed `:id` path parameters before any storage access.
pub fn parse_id(id: &str) -> Result<DocumentId, ApiResponse> {
    DocumentId::parse(id).map_err(|e| {
        tracing::debug!("rejected malformed id {:?}", id);
        ApiError::bad_request(e.to_string()).into()
    })
}

/// Exact-match filter from list query parameters.
pub fn list_filter(query: &HashMap<String, String>) -> Result<Filter, FilterError> {
    Filter::from_query(query)
}

/// Filter selecting documents whose `field` array holds an entry referencing `id`.
pub fn references_in(field: &str, key: &str, id: &DocumentId) -> Result<Filter, FilterError> {
    let mut entry = serde_json::Map::new();
    entry.insert(key.to_string(), serde_json::Value::String(id.to_hex()));
    let mut fragment = serde_json::Map::new();
    fragment.insert(field.to_string(), serde_json::Value::Array(vec![serde_json::Value::Object(entry)]));
    Filter::all().contains(serde_json::Value::Object(fragment))
}
