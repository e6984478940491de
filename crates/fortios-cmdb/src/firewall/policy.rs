//! `firewall/policy`: IPv4/IPv6 firewall policies.
//!
//! Policies are matched top-down, so their order matters; use
//! [`CmdbEndpoint::move_entry`](crate::CmdbEndpoint::move_entry) to reorder
//! them after creation.

use crate::models::{NameRef, Toggle};
use fortios_core::metadata::{Category, DeprecatedField, EndpointSchema, FieldSpec, MkeyKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

static NAME_REF: [FieldSpec; 1] = [FieldSpec::string("name", "Object name.").max_len(79)];

static FIELDS: [FieldSpec; 18] = [
    FieldSpec::integer("policyid", "Policy ID.").range(0, 4_294_967_294),
    FieldSpec::option("status", "Enable or disable this policy.", &["enable", "disable"])
        .default_value("enable"),
    FieldSpec::string("name", "Policy name.").max_len(35),
    FieldSpec::uuid("uuid", "Universally Unique Identifier."),
    FieldSpec::table("srcintf", "Incoming (ingress) interface.", &NAME_REF).required(),
    FieldSpec::table("dstintf", "Outgoing (egress) interface.", &NAME_REF).required(),
    FieldSpec::table("srcaddr", "Source IPv4 address and address group names.", &NAME_REF),
    FieldSpec::table("dstaddr", "Destination IPv4 address and address group names.", &NAME_REF),
    FieldSpec::option("action", "Policy action.", &["accept", "deny", "ipsec"]).default_value("deny"),
    FieldSpec::table("service", "Service and service group names.", &NAME_REF),
    FieldSpec::string("schedule", "Schedule name.").max_len(35).default_value("always"),
    FieldSpec::option("nat", "Enable/disable source NAT.", &["enable", "disable"]).default_value("disable"),
    FieldSpec::option("logtraffic", "Enable or disable logging.", &["all", "utm", "disable"])
        .default_value("utm"),
    FieldSpec::option("inspection-mode", "Policy inspection mode.", &["proxy", "flow"]).default_value("flow"),
    FieldSpec::option("utm-status", "Enable to add one or more security profiles.", &["enable", "disable"])
        .default_value("disable"),
    FieldSpec::table("groups", "Names of user groups that can authenticate with this policy.", &NAME_REF),
    FieldSpec::string("comments", "Comment.").max_len(1023),
    FieldSpec::string("vpntunnel", "Policy-based IPsec VPN: name of the IPsec VPN Phase 1.").max_len(35),
];

static DEPRECATED: [DeprecatedField; 2] = [
    DeprecatedField::new("rtp-nat", "7.0.0"),
    DeprecatedField::new("ssl-mirror", "7.2.0"),
];

/// Static schema of `firewall/policy`.
pub static SCHEMA: EndpointSchema = EndpointSchema {
    path: "firewall",
    name: "policy",
    mkey: Some("policyid"),
    mkey_kind: MkeyKind::Integer,
    category: Category::Table,
    help: "Configure IPv4/IPv6 policies.",
    fields: &FIELDS,
    deprecated: &DEPRECATED,
};

/// Policy action.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PolicyAction {
    /// Allow matching traffic
    Accept,
    /// Drop matching traffic
    Deny,
    /// Policy-based IPsec
    Ipsec,
}

/// Traffic logging mode.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogTraffic {
    /// Log all sessions
    All,
    /// Log security events only
    Utm,
    /// No logging
    Disable,
}

/// A `firewall/policy` entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Policy {
    /// Policy ID (mkey). `None` or `0` lets FortiOS assign the next free ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policyid: Option<u32>,
    /// Policy name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Enabled state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Toggle>,
    /// Object UUID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<Uuid>,
    /// Ingress interfaces.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub srcintf: Vec<NameRef>,
    /// Egress interfaces.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dstintf: Vec<NameRef>,
    /// Source addresses.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub srcaddr: Vec<NameRef>,
    /// Destination addresses.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dstaddr: Vec<NameRef>,
    /// Action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<PolicyAction>,
    /// Services.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub service: Vec<NameRef>,
    /// Schedule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
    /// Source NAT.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nat: Option<Toggle>,
    /// Logging mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logtraffic: Option<LogTraffic>,
    /// User groups.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<NameRef>,
    /// Comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

impl Policy {
    /// Accept policy between two interfaces for all addresses and services.
    #[must_use]
    pub fn accept_all(srcintf: &str, dstintf: &str) -> Self {
        Self {
            srcintf: vec![NameRef::new(srcintf)],
            dstintf: vec![NameRef::new(dstintf)],
            srcaddr: vec![NameRef::new("all")],
            dstaddr: vec![NameRef::new("all")],
            service: vec![NameRef::new("ALL")],
            action: Some(PolicyAction::Accept),
            schedule: Some("always".to_string()),
            ..Self::default()
        }
    }
}
