//! `vpn.ipsec/phase1`: interface-less IPsec phase 1 (policy-based VPN).

use fortios_core::metadata::{Category, DeprecatedField, EndpointSchema, FieldSpec, MkeyKind};
use serde::{Deserialize, Serialize};

static FIELDS: [FieldSpec; 14] = [
    FieldSpec::string("name", "IPsec remote gateway name.").required().max_len(35),
    FieldSpec::option("type", "Remote gateway type.", &["static", "dynamic", "ddns"]).default_value("static"),
    FieldSpec::string("interface", "Local physical, aggregate, or VLAN outgoing interface.")
        .required()
        .max_len(35),
    FieldSpec::option("ike-version", "IKE protocol version.", &["1", "2"]).default_value("1"),
    FieldSpec::ipv4("remote-gw", "Remote VPN gateway.").default_value("0.0.0.0"),
    FieldSpec::string("remotegw-ddns", "Domain name of remote gateway.").max_len(63),
    FieldSpec::option("authmethod", "Authentication method.", &["psk", "signature"]).default_value("psk"),
    FieldSpec::password("psksecret", "Pre-shared secret for PSK authentication."),
    FieldSpec::multi_option(
        "proposal",
        "Phase1 proposal.",
        &["des-md5", "des-sha1", "des-sha256", "aes128-sha1", "aes128-sha256", "aes256-sha1", "aes256-sha256", "aes128gcm-prfsha256", "aes256gcm-prfsha384", "chacha20poly1305-prfsha256"],
    ),
    FieldSpec::multi_option("dhgrp", "DH group.", &["1", "2", "5", "14", "15", "16", "19", "20", "21", "31", "32"])
        .default_value("14 5"),
    FieldSpec::integer("keylife", "Time to wait in seconds before phase 1 encryption key expires.")
        .range(120, 172_800)
        .default_value("86400"),
    FieldSpec::option("dpd", "Dead Peer Detection mode.", &["disable", "on-idle", "on-demand"])
        .default_value("on-demand"),
    FieldSpec::option("nattraversal", "Enable/disable NAT traversal.", &["enable", "disable", "forced"])
        .default_value("enable"),
    FieldSpec::string("comments", "Comment.").max_len(255),
];

static DEPRECATED: [DeprecatedField; 1] =
    [DeprecatedField::new("dpd-retryinterval-ms", "7.0.0").replaced_by("dpd-retryinterval")];

/// Static schema of `vpn.ipsec/phase1`.
pub static SCHEMA: EndpointSchema = EndpointSchema {
    path: "vpn.ipsec",
    name: "phase1",
    mkey: Some("name"),
    mkey_kind: MkeyKind::String,
    category: Category::Table,
    help: "Configure VPN remote gateway.",
    fields: &FIELDS,
    deprecated: &DEPRECATED,
};

/// IKE protocol version; FortiOS encodes it as the strings `"1"` and `"2"`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum IkeVersion {
    /// IKEv1
    #[serde(rename = "1")]
    V1,
    /// IKEv2
    #[serde(rename = "2")]
    V2,
}

/// A `vpn.ipsec/phase1` entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Phase1 {
    /// Gateway name (mkey).
    pub name: String,
    /// Outgoing interface.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
    /// IKE version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ike_version: Option<IkeVersion>,
    /// Remote gateway address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_gw: Option<String>,
    /// Pre-shared key. FortiOS never returns it in clear text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub psksecret: Option<String>,
    /// Space separated proposals, e.g. `aes256-sha256 aes128-sha1`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposal: Option<String>,
    /// Space separated DH groups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dhgrp: Option<String>,
    /// Key lifetime in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keylife: Option<u32>,
    /// NAT traversal: `enable`, `disable` or `forced`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nattraversal: Option<String>,
    /// Comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}
