//! # fortios-core
//!
//! Core types and utilities for working with the FortiOS REST API.
//!
//! This crate provides the transport seam, error handling, configuration and the
//! schema/payload helpers shared by the CMDB and monitor client crates.
//!
//! ## Modules
//!
//! - [`error`] - Error types, HTTP status and FortiOS error code mapping
//! - [`types`] - API families and the transport-neutral request type
//! - [`response`] - The FortiOS response envelope
//! - [`config`] - Connection configuration and validation
//! - [`client`] - The [`ApiTransport`] trait, reqwest transport and retry logic
//! - [`query`] - Query string builder
//! - [`payload`] - Payload building and deprecated-attribute checks
//! - [`metadata`] - Static endpoint schemas and validation
//! - [`cache`] - TTL memoization for reference endpoints

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod metadata;
pub mod payload;
pub mod query;
pub mod response;
pub mod types;

// Re-export commonly used types
pub use client::{ApiTransport, ServiceClient, ServiceClientBuilder};
pub use config::FortiOsConfig;
pub use error::{Error, Result};
pub use response::ApiResponse;
pub use types::{ApiFamily, ApiRequest};
