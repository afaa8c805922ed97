mod error;
mod traits;
mod types;

pub use error::ProviderError;
pub use traits::{ForegroundProbe, UpdateProvider};
pub use types::{
    FlowOutcome, InstallErrorCode, InstallState, InstallStatus, UpdateAvailability, UpdateKind,
    UpdateKindParseError, UpdateMetadata,
};
