use thiserror::Error;

/// Everything an update-session call can fail with.
///
/// None of these are retried internally; each failure is reported once to
/// the single pending caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no foreground execution context is available")]
    RequireForegroundContext,

    #[error("call check before starting or completing an update")]
    RequireCheckFirst,

    #[error("an update flow is already awaiting resolution")]
    AlreadyPending,

    /// Provider metadata fetch failed; carries the platform message.
    #[error("{0}")]
    TaskFailure(String),

    #[error("could not launch the update flow: {0}")]
    UpdateFlowFailed(String),

    #[error("the user dismissed the update flow")]
    UserDeniedUpdate,

    #[error("the platform reported the update flow failed")]
    InAppUpdateFailed,

    #[error("install failed with error code {0}")]
    InstallError(i32),
}

impl SessionError {
    /// Stable wire code for the `{code, message}` error envelope.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::RequireForegroundContext => "REQUIRE_FOREGROUND_ACTIVITY",
            Self::RequireCheckFirst => "REQUIRE_CHECK_FOR_UPDATE",
            Self::AlreadyPending => "UPDATE_ALREADY_PENDING",
            Self::TaskFailure(_) => "TASK_FAILURE",
            Self::UpdateFlowFailed(_) => "UPDATE_FLOW_FAILED",
            Self::UserDeniedUpdate => "USER_DENIED_UPDATE",
            Self::InAppUpdateFailed => "IN_APP_UPDATE_FAILED",
            Self::InstallError(_) => "INSTALL_ERROR",
        }
    }
}
