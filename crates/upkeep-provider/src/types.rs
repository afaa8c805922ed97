use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether the platform currently has an update on offer.
///
/// The numeric codes are the ones the platform reports; `from_code` maps
/// anything unrecognized to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateAvailability {
    Unknown,
    NotAvailable,
    Available,
    InProgress,
}

impl UpdateAvailability {
    #[must_use]
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => Self::NotAvailable,
            2 => Self::Available,
            3 => Self::InProgress,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            Self::Unknown => 0,
            Self::NotAvailable => 1,
            Self::Available => 2,
            Self::InProgress => 3,
        }
    }
}

/// Stage of the background download/install pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallStatus {
    Unknown,
    Pending,
    Downloading,
    Installing,
    Installed,
    Failed,
    Canceled,
    Downloaded,
}

impl InstallStatus {
    #[must_use]
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => Self::Pending,
            2 => Self::Downloading,
            3 => Self::Installing,
            4 => Self::Installed,
            5 => Self::Failed,
            6 => Self::Canceled,
            11 => Self::Downloaded,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            Self::Unknown => 0,
            Self::Pending => 1,
            Self::Downloading => 2,
            Self::Installing => 3,
            Self::Installed => 4,
            Self::Failed => 5,
            Self::Canceled => 6,
            Self::Downloaded => 11,
        }
    }
}

/// Platform install error code. Zero means no error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstallErrorCode(i32);

impl InstallErrorCode {
    pub const NO_ERROR: Self = Self(0);

    #[must_use]
    pub fn new(code: i32) -> Self {
        Self(code)
    }

    #[must_use]
    pub fn get(self) -> i32 {
        self.0
    }

    #[must_use]
    pub fn is_error(self) -> bool {
        self.0 != 0
    }
}

/// One transition on the install-state stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallState {
    pub status: InstallStatus,
    #[serde(default)]
    pub error_code: InstallErrorCode,
}

impl InstallState {
    #[must_use]
    pub fn new(status: InstallStatus) -> Self {
        Self {
            status,
            error_code: InstallErrorCode::NO_ERROR,
        }
    }

    #[must_use]
    pub fn with_error(status: InstallStatus, error_code: i32) -> Self {
        Self {
            status,
            error_code: InstallErrorCode::new(error_code),
        }
    }
}

/// Immediate blocks the application and resolves through a single
/// flow-result delivery; flexible downloads in the background and reports
/// progress through the install-state stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateKind {
    Immediate,
    Flexible,
}

impl UpdateKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Immediate => "immediate",
            Self::Flexible => "flexible",
        }
    }
}

impl fmt::Display for UpdateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected \"immediate\" or \"flexible\", got: {input}")]
pub struct UpdateKindParseError {
    pub input: String,
}

impl FromStr for UpdateKind {
    type Err = UpdateKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "immediate" => Ok(Self::Immediate),
            "flexible" => Ok(Self::Flexible),
            other => Err(UpdateKindParseError {
                input: other.to_string(),
            }),
        }
    }
}

/// Terminal outcome of a launched update flow, delivered out-of-band by the
/// platform's flow-result channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
    Completed,
    Canceled,
    Failed,
}

/// Snapshot of what the platform knows about the available update.
///
/// Produced fresh by every check; immutable once returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMetadata {
    pub update_availability: UpdateAvailability,
    pub immediate_allowed: bool,
    pub immediate_allowed_preconditions: Vec<i32>,
    pub flexible_allowed: bool,
    pub flexible_allowed_preconditions: Vec<i32>,
    pub available_version_code: i64,
    pub install_status: InstallStatus,
    pub package_name: String,
    pub client_version_staleness_days: Option<i64>,
    pub update_priority: i32,
}

impl UpdateMetadata {
    #[must_use]
    pub fn kind_allowed(&self, kind: UpdateKind) -> bool {
        match kind {
            UpdateKind::Immediate => self.immediate_allowed,
            UpdateKind::Flexible => self.flexible_allowed,
        }
    }

    /// The platform preconditions that failed for `kind`, empty when the
    /// kind is allowed.
    #[must_use]
    pub fn failed_preconditions(&self, kind: UpdateKind) -> &[i32] {
        match kind {
            UpdateKind::Immediate => &self.immediate_allowed_preconditions,
            UpdateKind::Flexible => &self.flexible_allowed_preconditions,
        }
    }
}
