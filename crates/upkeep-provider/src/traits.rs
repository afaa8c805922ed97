use async_trait::async_trait;

use crate::error::ProviderError;
use crate::types::{UpdateKind, UpdateMetadata};

/// The platform's update capability, injected into the coordinator for its
/// lifetime so tests can substitute a fake.
#[async_trait]
pub trait UpdateProvider: Send + Sync {
    /// Fetch the platform's current view of the available update.
    async fn update_metadata(&self) -> Result<UpdateMetadata, ProviderError>;

    /// Launch the update flow for `kind`.
    ///
    /// An `Err` here is the synchronous launch-failure class (the platform
    /// refusing to send the flow intent). Asynchronous outcomes arrive
    /// later through the flow-result and install-state channels.
    async fn start_update_flow(&self, kind: UpdateKind) -> Result<(), ProviderError>;

    /// Apply an update that has finished downloading.
    ///
    /// Fire-and-forget: the platform restarts and swaps the application on
    /// its own schedule, so there is nothing to await.
    fn complete_update(&self);
}

/// Answers whether an active foreground execution context is available.
pub trait ForegroundProbe: Send + Sync {
    fn is_foreground(&self) -> bool;
}
