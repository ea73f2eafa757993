//! # Blog Core
//!
//! The domain layer of the blog.
//! This crate contains the post controller and its rules with zero infrastructure dependencies.

pub mod controller;
pub mod domain;
pub mod error;
pub mod ports;
pub mod validation;

pub use controller::{Flash, Outcome, PostController, Route, View};
pub use error::DomainError;
pub use validation::{FieldErrors, PostForm, ThumbnailRule};
