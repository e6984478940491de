//! `router/static`: IPv4 static routes.

use crate::models::{NameRef, Toggle};
use fortios_core::metadata::{Category, EndpointSchema, FieldSpec, MkeyKind};
use serde::{Deserialize, Serialize};

static NAME_REF: [FieldSpec; 1] = [FieldSpec::string("name", "Address name.").max_len(79)];

static FIELDS: [FieldSpec; 12] = [
    FieldSpec::integer("seq-num", "Sequence number.").range(0, 4_294_967_295),
    FieldSpec::option("status", "Enable/disable this static route.", &["enable", "disable"]).default_value("enable"),
    FieldSpec::ipv4_netmask("dst", "Destination IP and mask for this route.").default_value("0.0.0.0 0.0.0.0"),
    FieldSpec::ipv4("gateway", "Gateway IP for this route.").default_value("0.0.0.0"),
    FieldSpec::integer("distance", "Administrative distance.").range(1, 255).default_value("10"),
    FieldSpec::integer("weight", "Administrative weight.").range(0, 255).default_value("0"),
    FieldSpec::integer("priority", "Administrative priority.").range(1, 65535).default_value("1"),
    FieldSpec::string("device", "Gateway out interface or tunnel.").max_len(35),
    FieldSpec::string("comment", "Optional comments.").max_len(255),
    FieldSpec::option("blackhole", "Enable/disable black hole.", &["enable", "disable"]).default_value("disable"),
    FieldSpec::string("dstaddr", "Name of firewall address or address group.").max_len(79),
    FieldSpec::table("sdwan-zone", "Choose SD-WAN Zone.", &NAME_REF),
];

/// Static schema of `router/static`.
pub static SCHEMA: EndpointSchema = EndpointSchema {
    path: "router",
    name: "static",
    mkey: Some("seq-num"),
    mkey_kind: MkeyKind::Integer,
    category: Category::Table,
    help: "Configure IPv4 static routing tables.",
    fields: &FIELDS,
    deprecated: &[],
};

/// A `router/static` entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct StaticRoute {
    /// Sequence number (mkey). `None` lets FortiOS assign one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seq_num: Option<u32>,
    /// Enabled state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Toggle>,
    /// Destination, e.g. `0.0.0.0 0.0.0.0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dst: Option<String>,
    /// Next hop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
    /// Egress interface.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    /// Administrative distance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<u8>,
    /// Priority among routes with the same distance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    /// Drop matching traffic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blackhole: Option<Toggle>,
    /// SD-WAN zones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdwan_zone: Option<Vec<NameRef>>,
    /// Comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl StaticRoute {
    /// Default route via `gateway` on `device`.
    #[must_use]
    pub fn default_route(gateway: impl Into<String>, device: impl Into<String>) -> Self {
        Self {
            dst: Some("0.0.0.0 0.0.0.0".to_string()),
            gateway: Some(gateway.into()),
            device: Some(device.into()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fortios_core::payload::build_payload;
    use serde_json::json;

    #[test]
    fn seq_num_is_kebab_case() {
        let route = StaticRoute {
            seq_num: Some(3),
            ..StaticRoute::default_route("198.51.100.1", "wan1")
        };
        let payload = build_payload(serde_json::to_value(&route).unwrap()).unwrap();
        assert_eq!(payload["seq-num"], json!(3));
        SCHEMA.validate_payload(&payload, true).unwrap();
    }

    #[test]
    fn gateway_must_be_ipv4() {
        let payload = build_payload(json!({"gateway": "wan1"})).unwrap();
        assert!(SCHEMA.validate_payload(&payload, false).is_err());
    }
}
