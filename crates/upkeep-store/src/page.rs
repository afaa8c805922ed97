use log::debug;

use crate::error::StoreError;
use crate::lookup::fetch_store_metadata;

/// Look up the application's store listing and open its page with the
/// system handler.
///
/// # Errors
/// Fails with any [`fetch_store_metadata`] error, with
/// [`StoreError::InvalidUrl`] when the listing carries no openable page
/// URL, or with [`StoreError::OpenFailed`] when the system handler
/// refuses.
pub async fn open_store_page(client: &reqwest::Client, app_id: &str) -> Result<(), StoreError> {
    let metadata = fetch_store_metadata(client, app_id).await?;
    ensure_openable(&metadata.store_url)?;

    debug!("opening store page: {}", metadata.store_url);
    open::that(&metadata.store_url).map_err(StoreError::OpenFailed)
}

fn ensure_openable(url: &str) -> Result<(), StoreError> {
    if url.starts_with("https://") || url.starts_with("http://") {
        Ok(())
    } else {
        Err(StoreError::InvalidUrl)
    }
}
