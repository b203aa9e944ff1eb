//! Catalog Module
//!
//! The song corpus as seen from the outside: CRUD, bulk import, saved
//! announcements and the search entry point.
//!
//! ## Consistency
//! Every corpus mutation rebuilds the search index synchronously before the
//! request completes, so the very next query reflects it.
//!
//! ## Submodules
//! - **`service`**: `Catalog`, owner of the store handle and the search index.
//! - **`handlers`**: HTTP request handlers for the Axum web server.
//! - **`protocol`**: request/response bodies and endpoint paths.

pub mod handlers;
pub mod protocol;
pub mod service;

pub use service::Catalog;

#[cfg(test)]
mod tests;
