//! # appsec-core
//!
//! Core types and utilities for the Akamai Application Security API client.
//!
//! This crate provides the shared scaffolding that every resource operation
//! depends on: the generic request executor, the problem-detail error type,
//! and the HTTP client configuration.
//!
//! ## Modules
//!
//! - [`error`] - Error types and the problem-detail API error
//! - [`config`] - HTTP client configuration
//! - [`session`] - The shared session and generic request executor

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod session;

// Re-export commonly used types
pub use error::{ApiError, Error, Result};
pub use session::{Session, SessionBuilder};
