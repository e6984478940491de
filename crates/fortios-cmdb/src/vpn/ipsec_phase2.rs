//! `vpn.ipsec/phase2`: IPsec phase 2 selectors for policy-based VPNs.

use crate::models::Toggle;
use fortios_core::metadata::{Category, EndpointSchema, FieldSpec, MkeyKind};
use serde::{Deserialize, Serialize};

static FIELDS: [FieldSpec; 10] = [
    FieldSpec::string("name", "IPsec tunnel name.").required().max_len(35),
    FieldSpec::string("phase1name", "Phase 1 determines the options required for phase 2.")
        .required()
        .max_len(35),
    FieldSpec::multi_option(
        "proposal",
        "Phase2 proposal.",
        &["null-md5", "null-sha1", "des-sha256", "aes128-sha1", "aes128-sha256", "aes256-sha1", "aes256-sha256", "aes128gcm", "aes256gcm", "chacha20poly1305"],
    ),
    FieldSpec::option("pfs", "Enable/disable PFS feature.", &["enable", "disable"]).default_value("enable"),
    FieldSpec::multi_option("dhgrp", "Phase2 DH group.", &["1", "2", "5", "14", "15", "16", "19", "20", "21", "31", "32"])
        .default_value("14 5"),
    FieldSpec::option("replay", "Enable/disable replay detection.", &["enable", "disable"]).default_value("enable"),
    FieldSpec::option("keepalive", "Enable/disable keep alive.", &["enable", "disable"]).default_value("disable"),
    FieldSpec::integer("keylifeseconds", "Phase2 key life in time in seconds.")
        .range(120, 172_800)
        .default_value("43200"),
    FieldSpec::ipv4_netmask("src-subnet", "Local proxy ID subnet.").default_value("0.0.0.0 0.0.0.0"),
    FieldSpec::ipv4_netmask("dst-subnet", "Remote proxy ID subnet.").default_value("0.0.0.0 0.0.0.0"),
];

/// Static schema of `vpn.ipsec/phase2`.
pub static SCHEMA: EndpointSchema = EndpointSchema {
    path: "vpn.ipsec",
    name: "phase2",
    mkey: Some("name"),
    mkey_kind: MkeyKind::String,
    category: Category::Table,
    help: "Configure VPN autokey tunnel.",
    fields: &FIELDS,
    deprecated: &[],
};

/// A `vpn.ipsec/phase2` entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Phase2 {
    /// Tunnel name (mkey).
    pub name: String,
    /// Owning phase 1.
    pub phase1name: String,
    /// Space separated proposals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposal: Option<String>,
    /// Perfect forward secrecy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pfs: Option<Toggle>,
    /// Key lifetime in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keylifeseconds: Option<u32>,
    /// Local selector.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_subnet: Option<String>,
    /// Remote selector.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dst_subnet: Option<String>,
}

impl Phase2 {
    /// Phase 2 between two subnets under an existing phase 1.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        phase1name: impl Into<String>,
        src_subnet: impl Into<String>,
        dst_subnet: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            phase1name: phase1name.into(),
            src_subnet: Some(src_subnet.into()),
            dst_subnet: Some(dst_subnet.into()),
            ..Self::default()
        }
    }
}
