use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, error};
use tokio::sync::{mpsc, oneshot};
use upkeep_provider::{
    FlowOutcome, ForegroundProbe, InstallState, InstallStatus, UpdateAvailability, UpdateKind,
    UpdateMetadata, UpdateProvider,
};

use crate::error::SessionError;
use crate::session::{Resolution, Session, SessionPhase};

/// Await handle for the single terminal outcome of a started update flow.
#[must_use = "the terminal outcome of the flow arrives through this ticket"]
#[derive(Debug)]
pub struct UpdateTicket {
    receiver: oneshot::Receiver<Resolution>,
}

impl UpdateTicket {
    /// Wait for the flow's terminal outcome.
    ///
    /// Resolves exactly once: with `Ok` when the flow completed (immediate)
    /// or the download finished (flexible), with the matching
    /// [`SessionError`] otherwise. There is no timeout; the ticket waits
    /// until the platform delivers a terminal event.
    pub async fn resolved(self) -> Result<(), SessionError> {
        match self.receiver.await {
            Ok(resolution) => resolution,
            Err(_) => Err(SessionError::UpdateFlowFailed(
                "update session ended before the flow resolved".to_string(),
            )),
        }
    }
}

/// Owns the session state between a check and a terminal outcome,
/// validates call ordering, and relays install-state events to the
/// subscriber.
///
/// Call handlers and platform event entry points may run on different
/// threads; both synchronize on internal mutexes that are never held
/// across an await.
pub struct UpdateCoordinator {
    provider: Arc<dyn UpdateProvider>,
    foreground: Arc<dyn ForegroundProbe>,
    session: Mutex<Option<Session>>,
    subscriber: Mutex<Option<mpsc::UnboundedSender<InstallState>>>,
}

impl UpdateCoordinator {
    pub fn new(provider: Arc<dyn UpdateProvider>, foreground: Arc<dyn ForegroundProbe>) -> Self {
        Self {
            provider,
            foreground,
            session: Mutex::new(None),
            subscriber: Mutex::new(None),
        }
    }

    /// Fetch fresh update metadata and store it as the session.
    ///
    /// Requires a foreground execution context; without one the provider
    /// is not touched. A re-check supersedes the stored metadata in place,
    /// leaving any in-flight resolution waiting on the started flow.
    pub async fn check(&self) -> Result<UpdateMetadata, SessionError> {
        if !self.foreground.is_foreground() {
            return Err(SessionError::RequireForegroundContext);
        }

        let metadata = self
            .provider
            .update_metadata()
            .await
            .map_err(|e| SessionError::TaskFailure(e.message().to_string()))?;

        let mut guard = self.session_guard();
        match guard.as_mut() {
            Some(session) => session.metadata = metadata.clone(),
            None => *guard = Some(Session::new(metadata.clone())),
        }
        debug!(
            "update check succeeded, availability: {:?}",
            metadata.update_availability
        );
        Ok(metadata)
    }

    /// Start the platform update flow for `kind`.
    ///
    /// Preconditions, in order: a successful [`check`](Self::check) must
    /// have produced a session, a foreground context must be present, and
    /// no earlier flow may still await resolution. A synchronous launch
    /// failure clears the pending slot immediately so the next attempt
    /// starts clean.
    pub async fn start_update(&self, kind: UpdateKind) -> Result<UpdateTicket, SessionError> {
        let (sender, receiver) = oneshot::channel();
        {
            let mut guard = self.session_guard();
            let session = guard.as_mut().ok_or(SessionError::RequireCheckFirst)?;
            if !self.foreground.is_foreground() {
                return Err(SessionError::RequireForegroundContext);
            }
            if session.pending.is_some() {
                return Err(SessionError::AlreadyPending);
            }
            session.in_flight = Some(kind);
            session.pending = Some(sender);
        }

        if let Err(e) = self.provider.start_update_flow(kind).await {
            let mut guard = self.session_guard();
            if let Some(session) = guard.as_mut() {
                session.pending = None;
                session.in_flight = None;
            }
            return Err(SessionError::UpdateFlowFailed(e.message().to_string()));
        }

        debug!("{kind} update flow started");
        Ok(UpdateTicket { receiver })
    }

    /// Apply a downloaded update and end the session.
    ///
    /// Fire-and-forget: the provider performs a restart-and-swap that is
    /// not awaited, so this resolves immediately.
    pub fn complete_update(&self) -> Result<(), SessionError> {
        let mut guard = self.session_guard();
        if guard.is_none() {
            return Err(SessionError::RequireCheckFirst);
        }
        if !self.foreground.is_foreground() {
            return Err(SessionError::RequireForegroundContext);
        }

        self.provider.complete_update();
        *guard = None;
        Ok(())
    }

    /// Terminal delivery from the platform's flow-result channel.
    ///
    /// For an immediate flow every outcome is terminal. For a flexible
    /// flow `Completed` only means the dialog was accepted; the download
    /// continues and success arrives through the install-state stream.
    pub fn on_flow_outcome(&self, outcome: FlowOutcome) {
        let mut guard = self.session_guard();
        let Some(session) = guard.as_mut() else {
            return;
        };
        let Some(kind) = session.in_flight else {
            return;
        };

        let resolution = match (kind, outcome) {
            (UpdateKind::Immediate, FlowOutcome::Completed) => Some(Ok(())),
            (UpdateKind::Flexible, FlowOutcome::Completed) => None,
            (_, FlowOutcome::Canceled) => Some(Err(SessionError::UserDeniedUpdate)),
            (_, FlowOutcome::Failed) => Some(Err(SessionError::InAppUpdateFailed)),
        };

        if let Some(resolution) = resolution {
            resolve_terminal(&mut guard, resolution);
        }
    }

    /// One transition from the platform's install-state stream.
    ///
    /// The state is relayed to the subscriber first, in emission order,
    /// whether or not a flow is pending. A pending flexible flow then
    /// resolves on `Downloaded` or on any non-zero error code; every other
    /// state is relay-only. Events after the terminal one relay without
    /// effect.
    pub fn on_install_state(&self, state: InstallState) {
        self.relay(state);

        let mut guard = self.session_guard();
        let Some(session) = guard.as_mut() else {
            return;
        };
        if session.in_flight != Some(UpdateKind::Flexible) || session.pending.is_none() {
            return;
        }

        let resolution = if state.status == InstallStatus::Downloaded {
            Some(Ok(()))
        } else if state.error_code.is_error() {
            Some(Err(SessionError::InstallError(state.error_code.get())))
        } else {
            None
        };

        if let Some(resolution) = resolution {
            resolve_terminal(&mut guard, resolution);
        }
    }

    /// The execution context regained foreground focus.
    ///
    /// A stalled immediate flow (last known availability "in progress") is
    /// re-issued, covering the blocking dialog being dismissed by a
    /// context switch. Nothing awaits a resume, so launch failures are
    /// logged only.
    pub async fn on_foreground_resumed(&self) {
        let stalled_immediate = self.session_guard().as_ref().is_some_and(|session| {
            session.in_flight == Some(UpdateKind::Immediate)
                && session.metadata.update_availability == UpdateAvailability::InProgress
        });
        if !stalled_immediate {
            return;
        }

        debug!("re-entering the immediate update flow after resume");
        if let Err(e) = self
            .provider
            .start_update_flow(UpdateKind::Immediate)
            .await
        {
            error!("could not re-enter the immediate update flow: {e}");
        }
    }

    /// Receive every install-state transition as it occurs.
    ///
    /// Subscribing replaces any previous subscriber; the replaced
    /// receiver's channel closes.
    pub fn subscribe_install_states(&self) -> mpsc::UnboundedReceiver<InstallState> {
        let (sender, receiver) = mpsc::unbounded_channel();
        *self.subscriber_guard() = Some(sender);
        receiver
    }

    /// Stop relaying install states. Idempotent.
    pub fn unsubscribe_install_states(&self) {
        *self.subscriber_guard() = None;
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.session_guard()
            .as_ref()
            .map_or(SessionPhase::Idle, Session::phase)
    }

    /// The metadata from the most recent successful check, if a session is
    /// live.
    #[must_use]
    pub fn last_metadata(&self) -> Option<UpdateMetadata> {
        self.session_guard().as_ref().map(|s| s.metadata.clone())
    }

    fn relay(&self, state: InstallState) {
        let mut guard = self.subscriber_guard();
        let receiver_gone = guard
            .as_ref()
            .is_some_and(|sender| sender.send(state).is_err());
        if receiver_gone {
            // Same as an unsubscribe.
            *guard = None;
        }
    }

    fn session_guard(&self) -> MutexGuard<'_, Option<Session>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn subscriber_guard(&self) -> MutexGuard<'_, Option<mpsc::UnboundedSender<InstallState>>> {
        self.subscriber
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Resolve the pending callback exactly once and clear the session.
fn resolve_terminal(slot: &mut Option<Session>, resolution: Resolution) {
    if let Some(mut session) = slot.take()
        && let Some(sender) = session.pending.take()
    {
        let _ = sender.send(resolution);
    }
}
