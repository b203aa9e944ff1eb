//! Search Service Module
//!
//! Fuzzy, weighted search over the song corpus.
//!
//! ## Overview
//! The index is derived wholly from the corpus and rebuilt wholesale whenever
//! the corpus changes (see `catalog`). Queries are matched approximately
//! against four fields with different weights:
//! `title` (2), `content` (1), `nh` (1) and `type` (0.5).
//!
//! ## Scoring
//! Each field yields a distance in `[0, 1]` (0 when the field contains the
//! term). Fields beyond the match threshold are ignored; the others are
//! combined as a weighted geometric product. Results are ranked by ascending
//! score.
//!
//! ## Submodules
//! - **`engine`**: the index, field distance and ranking.
//! - **`handlers`**: HTTP request handler for the Axum web server.
//! - **`tokenizer`**: text normalization and word boundaries.
//! - **`types`**: fields, hits and Data Transfer Objects (DTOs).

pub mod engine;
pub mod handlers;
pub mod tokenizer;
pub mod types;

pub use engine::SearchIndex;
