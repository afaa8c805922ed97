use serde::{Deserialize, Serialize};

use crate::error::StoreError;

const LOOKUP_URL: &str = "https://itunes.apple.com/lookup";

/// Published version and store-page URL for one application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreMetadata {
    pub version: String,
    pub store_url: String,
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(default)]
    results: Vec<LookupEntry>,
}

#[derive(Deserialize)]
struct LookupEntry {
    #[serde(default)]
    version: Option<String>,
    #[serde(rename = "trackViewUrl", default)]
    track_view_url: Option<String>,
}

/// Look up an application's published store listing by its identifier.
///
/// # Errors
/// Returns an error for a blank identifier (before any I/O), a transport
/// or HTTP failure, an empty or unparseable response body, or a lookup
/// that matched nothing.
pub async fn fetch_store_metadata(
    client: &reqwest::Client,
    app_id: &str,
) -> Result<StoreMetadata, StoreError> {
    if app_id.trim().is_empty() {
        return Err(StoreError::InvalidArgument);
    }

    let response = client
        .get(LOOKUP_URL)
        .query(&[("bundleId", app_id)])
        .send()
        .await
        .map_err(StoreError::Request)?;

    if !response.status().is_success() {
        let status = response.status();
        let body_snippet = response
            .text()
            .await
            .ok()
            .map(|body| response_snippet(&body, 160))
            .unwrap_or_default();
        return Err(StoreError::HttpStatus {
            status,
            body_snippet,
        });
    }

    let body = response.bytes().await.map_err(StoreError::Request)?;
    if body.is_empty() {
        return Err(StoreError::NoData);
    }

    let lookup: LookupResponse = serde_json::from_slice(&body).map_err(StoreError::Parse)?;
    metadata_from_lookup(lookup)
}

fn metadata_from_lookup(lookup: LookupResponse) -> Result<StoreMetadata, StoreError> {
    let entry = lookup
        .results
        .into_iter()
        .next()
        .ok_or(StoreError::NoResults)?;

    Ok(StoreMetadata {
        version: entry.version.unwrap_or_else(|| "0.0.0".to_string()),
        store_url: entry.track_view_url.unwrap_or_default(),
    })
}

fn response_snippet(body: &str, max_chars: usize) -> String {
    let snippet: String = body.chars().take(max_chars).collect();
    if snippet.is_empty() {
        String::new()
    } else {
        format!(": {snippet}")
    }
}
