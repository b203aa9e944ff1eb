//! Live Song Presentation Server Library
//!
//! Backend of a live lyrics presentation: one operator drives which song and
//! which line are shown, and every connected screen follows in real time.
//! The binary (`main.rs`) wires these modules into one process.
//!
//! ## Architecture Modules
//!
//! - **`songs`**: song records and the parser that turns raw lyrics into
//!   display lines plus section quick-jumps.
//! - **`store`**: persistence contract for songs and saved announcements,
//!   with in-memory and SQLite implementations.
//! - **`search`**: weighted fuzzy index over the corpus.
//! - **`catalog`**: song CRUD, bulk import and announcements over HTTP; keeps
//!   the search index consistent with the store.
//! - **`session`**: the shared live state, owned by a single actor and
//!   broadcast to WebSocket clients.
//! - **`config`**, **`error`**, **`routes`**: process plumbing.

pub mod catalog;
pub mod config;
pub mod error;
pub mod routes;
pub mod search;
pub mod session;
pub mod songs;
pub mod store;

pub use catalog::Catalog;
pub use config::ServerConfig;
pub use error::AppError;
pub use routes::build_router;
pub use session::{SessionActor, SessionHandle};
