//! Update-session coordination between an embedding application and a
//! platform update provider.
//!
//! The coordinator owns the state between a metadata check and a terminal
//! outcome, validates call ordering, translates provider failures into a
//! stable error vocabulary, and relays install-state events to a
//! subscriber. The actual download and install work belongs to the
//! injected [`upkeep_provider::UpdateProvider`].

mod coordinator;
mod error;
mod session;

pub use coordinator::{UpdateCoordinator, UpdateTicket};
pub use error::SessionError;
pub use session::SessionPhase;
