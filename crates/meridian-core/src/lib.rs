//! # Meridian Core
//!
//! The domain layer of the Meridian site backend: blog content derivation,
//! the post view model, store/mailer ports and the services built on them.
//! This crate has no infrastructure dependencies.

pub mod content;
pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{DomainError, FetchError, RepoError};
