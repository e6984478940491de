//! Monitor API models.

use chrono::{DateTime, Utc};
use fortios_core::query::QueryParams;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Result of `monitor/system/status`, completed with the device identity
/// FortiOS reports in the response envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SystemStatus {
    /// Hostname.
    #[serde(default)]
    pub hostname: Option<String>,
    /// Model family, e.g. `FortiGate`.
    #[serde(default)]
    pub model_name: Option<String>,
    /// Model number, e.g. `VM64`.
    #[serde(default)]
    pub model_number: Option<String>,
    /// Model code, e.g. `FGVMK6`.
    #[serde(default)]
    pub model: Option<String>,
    /// Log disk state.
    #[serde(default)]
    pub log_disk_status: Option<String>,
    /// Serial number, taken from the envelope.
    #[serde(default)]
    pub serial: Option<String>,
    /// Firmware version, taken from the envelope.
    #[serde(default)]
    pub version: Option<String>,
    /// Firmware build, taken from the envelope.
    #[serde(default)]
    pub build: Option<u64>,
}

/// Filters for `monitor/system/interface`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfaceQuery {
    /// Only report this interface.
    pub interface_name: Option<String>,
    /// Include VLAN interfaces.
    pub include_vlan: bool,
    /// Include aggregate interfaces.
    pub include_aggregate: bool,
    /// `vdom` or `global`.
    pub scope: Option<String>,
}

impl InterfaceQuery {
    /// Every physical interface of the current VDOM.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to one interface.
    #[must_use]
    pub fn with_interface(mut self, name: impl Into<String>) -> Self {
        self.interface_name = Some(name.into());
        self
    }

    /// Include VLAN and aggregate interfaces.
    #[must_use]
    pub const fn including_logical(mut self) -> Self {
        self.include_vlan = true;
        self.include_aggregate = true;
        self
    }

    /// Query across all VDOMs.
    #[must_use]
    pub fn global(mut self) -> Self {
        self.scope = Some("global".to_string());
        self
    }

    /// Convert into query pairs.
    #[must_use]
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = QueryParams::new();
        params.push_opt("interface_name", self.interface_name.as_deref());
        if self.include_vlan {
            params.push("include_vlan", true);
        }
        if self.include_aggregate {
            params.push("include_aggregate", true);
        }
        params.push_opt("scope", self.scope.as_deref());
        params.into_pairs()
    }
}

/// Live state of one interface.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InterfaceStatus {
    /// Interface name.
    pub name: String,
    /// Alias.
    #[serde(default)]
    pub alias: Option<String>,
    /// MAC address.
    #[serde(default)]
    pub mac: Option<String>,
    /// IPv4 address.
    #[serde(default)]
    pub ip: Option<String>,
    /// Prefix length.
    #[serde(default)]
    pub mask: Option<u8>,
    /// Link up.
    #[serde(default)]
    pub link: bool,
    /// Negotiated speed in Mbit/s.
    #[serde(default)]
    pub speed: Option<f64>,
    /// Packets sent.
    #[serde(default)]
    pub tx_packets: u64,
    /// Packets received.
    #[serde(default)]
    pub rx_packets: u64,
    /// Bytes sent.
    #[serde(default)]
    pub tx_bytes: u64,
    /// Bytes received.
    #[serde(default)]
    pub rx_bytes: u64,
    /// Transmit errors.
    #[serde(default)]
    pub tx_errors: u64,
    /// Receive errors.
    #[serde(default)]
    pub rx_errors: u64,
}

/// One entry of `monitor/license/status` (`antivirus`, `vdom`, `fortiguard`...).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LicenseEntry {
    /// License state, e.g. `licensed`, `expired`, `no_license`.
    #[serde(default)]
    pub status: Option<String>,
    /// License type.
    #[serde(default, rename = "type")]
    pub license_type: Option<String>,
    /// Signature or engine version.
    #[serde(default)]
    pub version: Option<String>,
    /// Expiry time.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_seconds_option"
    )]
    pub expires: Option<DateTime<Utc>>,
    /// Last signature update.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_seconds_option"
    )]
    pub last_update: Option<DateTime<Utc>>,
    /// Attributes specific to this license kind.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LicenseEntry {
    /// Returns true if the entry reports an active license.
    #[must_use]
    pub fn is_licensed(&self) -> bool {
        matches!(self.status.as_deref(), Some("licensed" | "registered" | "valid"))
    }

    /// Returns true if the license has an expiry time before `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires
            .is_some_and(|expires| expires.timestamp() > 0 && expires <= now)
    }
}

/// Result of `monitor/license/status`, keyed by license name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct LicenseStatus {
    /// Entries by license name.
    pub entries: BTreeMap<String, LicenseEntry>,
}

impl LicenseStatus {
    /// Look up one license.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&LicenseEntry> {
        self.entries.get(name)
    }

    /// Licenses expiring before `deadline`, soonest first.
    #[must_use]
    pub fn expiring_before(&self, deadline: DateTime<Utc>) -> Vec<(&str, &LicenseEntry)> {
        let mut expiring: Vec<_> = self
            .entries
            .iter()
            .filter(|(_, entry)| {
                entry
                    .expires
                    .is_some_and(|expires| expires.timestamp() > 0 && expires < deadline)
            })
            .map(|(name, entry)| (name.as_str(), entry))
            .collect();
        expiring.sort_by_key(|(_, entry)| entry.expires);
        expiring
    }
}
