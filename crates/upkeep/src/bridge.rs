use std::sync::Arc;

use log::debug;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc;

use upkeep_core::{SessionError, UpdateCoordinator};
use upkeep_provider::{ForegroundProbe, InstallState, UpdateKind, UpdateProvider};
use upkeep_store::{StoreError, fetch_store_metadata, open_store_page};

use crate::package::PackageInfo;

/// Reply to one inbound method call.
///
/// Unrecognized method names get `NotImplemented`, never an error.
#[derive(Debug, Clone, PartialEq)]
pub enum MethodReply {
    Success(Value),
    Error { code: String, message: String },
    NotImplemented,
}

impl MethodReply {
    fn error(code: &str, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

impl From<SessionError> for MethodReply {
    fn from(error: SessionError) -> Self {
        Self::error(error.code(), error.to_string())
    }
}

impl From<StoreError> for MethodReply {
    fn from(error: StoreError) -> Self {
        Self::error(error.code(), error.to_string())
    }
}

fn success_json<T: Serialize>(value: &T) -> MethodReply {
    match serde_json::to_value(value) {
        Ok(value) => MethodReply::Success(value),
        Err(error) => MethodReply::error("PARSE_ERROR", error.to_string()),
    }
}

/// Method-call surface over the coordinator and the store lookup.
///
/// Install-state events are a separate surface: the subscription methods
/// hand out a receiver, and the host wires platform callbacks to the
/// coordinator's event entry points directly.
pub struct UpdateBridge {
    coordinator: Arc<UpdateCoordinator>,
    client: reqwest::Client,
    package: PackageInfo,
}

impl UpdateBridge {
    #[must_use]
    pub fn new(
        provider: Arc<dyn UpdateProvider>,
        foreground: Arc<dyn ForegroundProbe>,
        package: PackageInfo,
    ) -> Self {
        Self {
            coordinator: Arc::new(UpdateCoordinator::new(provider, foreground)),
            client: reqwest::Client::new(),
            package,
        }
    }

    /// The coordinator behind this bridge, for wiring platform flow
    /// results, install states, and resume notifications.
    #[must_use]
    pub fn coordinator(&self) -> &Arc<UpdateCoordinator> {
        &self.coordinator
    }

    /// Dispatch one inbound method call.
    pub async fn handle(&self, method: &str, args: &Value) -> MethodReply {
        debug!("dispatching method call: {method}");
        match method {
            "check" => self.check().await,
            "startUpdate" => self.start_update(args).await,
            "completeUpdate" => self.complete_update(),
            "getLocalPackageInfo" => success_json(&self.package),
            "fetchStoreMetadata" => self.fetch_store_metadata(args).await,
            "openStorePage" => self.open_store_page().await,
            _ => MethodReply::NotImplemented,
        }
    }

    pub fn subscribe_install_states(&self) -> mpsc::UnboundedReceiver<InstallState> {
        self.coordinator.subscribe_install_states()
    }

    pub fn unsubscribe_install_states(&self) {
        self.coordinator.unsubscribe_install_states();
    }

    async fn check(&self) -> MethodReply {
        match self.coordinator.check().await {
            Ok(metadata) => success_json(&metadata),
            Err(error) => error.into(),
        }
    }

    /// Starts the flow and holds the reply until the terminal outcome.
    async fn start_update(&self, args: &Value) -> MethodReply {
        let Some(kind) = args.get("kind").and_then(Value::as_str) else {
            return MethodReply::error("INVALID_ARGUMENT", "missing or invalid 'kind'");
        };
        let kind: UpdateKind = match kind.parse() {
            Ok(kind) => kind,
            Err(error) => return MethodReply::error("INVALID_ARGUMENT", error.to_string()),
        };

        match self.coordinator.start_update(kind).await {
            Ok(ticket) => match ticket.resolved().await {
                Ok(()) => MethodReply::Success(Value::Null),
                Err(error) => error.into(),
            },
            Err(error) => error.into(),
        }
    }

    fn complete_update(&self) -> MethodReply {
        match self.coordinator.complete_update() {
            Ok(()) => MethodReply::Success(Value::Null),
            Err(error) => error.into(),
        }
    }

    async fn fetch_store_metadata(&self, args: &Value) -> MethodReply {
        let Some(app_id) = args.get("appId").and_then(Value::as_str) else {
            return MethodReply::error("INVALID_ARGUMENT", "missing or invalid 'appId'");
        };

        match fetch_store_metadata(&self.client, app_id).await {
            Ok(metadata) => success_json(&metadata),
            Err(error) => error.into(),
        }
    }

    async fn open_store_page(&self) -> MethodReply {
        match open_store_page(&self.client, &self.package.package_name).await {
            Ok(()) => MethodReply::Success(Value::Bool(true)),
            Err(error) => error.into(),
        }
    }
}
