//! Read-only FortiOS monitor endpoints.
//!
//! Monitor endpoints report live state (interface counters, sessions,
//! licenses) and accept a few action POSTs. Only a handful are typed; the
//! rest are reachable through [`MonitorClient::get`] and [`MonitorClient::post`].

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::MonitorClient;
pub use models::{InterfaceQuery, InterfaceStatus, LicenseEntry, LicenseStatus, SystemStatus};

/// Convenient result alias that reuses the shared FortiOS error type.
pub type Result<T> = fortios_core::Result<T>;
