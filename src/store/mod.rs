//! Song & Announcement Store
//!
//! Persistence collaborator of the live session. Only the contract matters to
//! the rest of the system; two implementations are provided.
//!
//! ## Submodules
//! - **`repository`**: the `SongStore` trait.
//! - **`memory`**: `DashMap`-backed store, nothing survives a restart.
//! - **`sqlite`**: file-backed store with lazy schema migrations.
//! - **`types`**: announcement records and positions.

pub mod memory;
pub mod repository;
pub mod sqlite;
pub mod types;

pub use memory::MemoryStore;
pub use repository::SongStore;
pub use sqlite::SqliteStore;
pub use types::{Announcement, AnnouncementPosition};
