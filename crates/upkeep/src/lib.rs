//! Bridge surface for embedding applications: method-name dispatch with a
//! stable `{code, message}` error envelope over the update-session
//! coordinator and the store lookup.

mod bridge;
mod package;

pub use bridge::{MethodReply, UpdateBridge};
pub use package::PackageInfo;

pub use upkeep_core::{SessionError, SessionPhase, UpdateCoordinator, UpdateTicket};
pub use upkeep_provider::{
    FlowOutcome, ForegroundProbe, InstallState, InstallStatus, ProviderError, UpdateAvailability,
    UpdateKind, UpdateMetadata, UpdateProvider,
};
pub use upkeep_store::{StoreError, StoreMetadata, StoreUpdate, check_for_store_update};
