//! Live Session Module
//!
//! Shared presentation state driven by controllers and mirrored by viewers
//! over a persistent WebSocket.
//!
//! ## Architecture Overview
//! 1. **Connect**: each socket gets a `ClientId` and an outbox; the actor
//!    registers it and queues the full snapshot.
//! 2. **Command**: decoded frames are forwarded to the actor, which applies
//!    them one at a time.
//! 3. **Broadcast**: each state change is fanned out with an explicit scope
//!    (all, all-but-sender, sender-only) before the next command runs.
//! 4. **Disconnect**: the actor drops the outbox and the writer task ends.
//!
//! ## Submodules
//! - **`actor`**: `SessionActor` (state owner) and `SessionHandle`.
//! - **`broadcaster`**: connection registry and scoped delivery.
//! - **`handlers`**: WebSocket upgrade and per-connection loop.
//! - **`protocol`**: client and server event definitions.
//! - **`types`**: session state, announcement banner, client ids.

pub mod actor;
pub mod broadcaster;
pub mod handlers;
pub mod protocol;
pub mod types;

pub use actor::{SessionActor, SessionCommand, SessionHandle};
pub use broadcaster::{Broadcaster, Scope};
pub use protocol::{ClientMessage, ServerMessage};
pub use types::{AnnouncementState, AnnouncementUpdate, ClientId, SessionState};
