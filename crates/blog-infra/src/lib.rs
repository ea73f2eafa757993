//! # Blog Infrastructure
//!
//! Concrete implementations of the ports defined in `blog-core`.
//! This crate contains database and file storage integrations.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL database support via SeaORM

pub mod database;
pub mod storage;

// Re-exports - In-Memory
pub use database::{
    InMemoryCategoryRepository, InMemoryPostRepository, InMemoryPostTagRepository,
    InMemoryTagRepository,
};
pub use storage::{InMemoryFileStorage, LocalFileStorage};
