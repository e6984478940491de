//! `system/interface`: physical, VLAN, aggregate and tunnel interfaces.

use crate::models::Toggle;
use fortios_core::metadata::{Category, DeprecatedField, EndpointSchema, FieldSpec, MkeyKind};
use serde::{Deserialize, Serialize};

static FIELDS: [FieldSpec; 15] = [
    FieldSpec::string("name", "Name.").required().max_len(15),
    FieldSpec::string("vdom", "Interface is in this virtual domain (VDOM).").required().max_len(31),
    FieldSpec::option("mode", "Addressing mode.", &["static", "dhcp", "pppoe"]).default_value("static"),
    FieldSpec::ipv4_netmask("ip", "Interface IPv4 address and subnet mask.").default_value("0.0.0.0 0.0.0.0"),
    FieldSpec::multi_option(
        "allowaccess",
        "Permitted types of management access to this interface.",
        &["ping", "https", "ssh", "snmp", "http", "telnet", "fgfm", "radius-acct", "probe-response", "fabric", "ftm", "speed-test"],
    ),
    FieldSpec::option("status", "Bring the interface up or shut the interface down.", &["up", "down"]).default_value("up"),
    FieldSpec::option(
        "type",
        "Interface type.",
        &["physical", "vlan", "aggregate", "redundant", "tunnel", "vdom-link", "loopback", "switch", "hard-switch", "vap-switch", "wl-mesh", "fext-wan", "vxlan", "geneve", "hdlc", "switch-vlan", "emac-vlan", "lan-extension"],
    )
    .default_value("vlan"),
    FieldSpec::string("alias", "Alias will be displayed with the interface name.").max_len(25),
    FieldSpec::option("role", "Interface role.", &["lan", "wan", "dmz", "undefined"]).default_value("undefined"),
    FieldSpec::string("interface", "Parent interface of a VLAN.").max_len(15),
    FieldSpec::integer("vlanid", "VLAN ID (0 on non-VLAN interfaces).").range(0, 4094),
    FieldSpec::integer("mtu", "MTU value for this interface.").range(0, 4_294_967_295).default_value("1500"),
    FieldSpec::option("mtu-override", "Enable to set a custom MTU.", &["enable", "disable"]).default_value("disable"),
    FieldSpec::string("description", "Description.").max_len(255),
    FieldSpec::option("device-identification", "Enable/disable passively gathering of device identity information.", &["enable", "disable"])
        .default_value("disable"),
];

static DEPRECATED: [DeprecatedField; 1] =
    [DeprecatedField::new("device-identification-active-scan", "7.0.0")];

/// Static schema of `system/interface`.
pub static SCHEMA: EndpointSchema = EndpointSchema {
    path: "system",
    name: "interface",
    mkey: Some("name"),
    mkey_kind: MkeyKind::String,
    category: Category::Table,
    help: "Configure interfaces.",
    fields: &FIELDS,
    deprecated: &DEPRECATED,
};

/// Interface addressing mode.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceMode {
    /// Static address
    Static,
    /// DHCP client
    Dhcp,
    /// PPPoE client
    Pppoe,
}

/// A `system/interface` entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Interface {
    /// Interface name (mkey).
    pub name: String,
    /// Owning VDOM.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vdom: Option<String>,
    /// Addressing mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<InterfaceMode>,
    /// Address and netmask.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    /// Space separated management protocols.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowaccess: Option<String>,
    /// `up` or `down`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Interface type.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub interface_type: Option<String>,
    /// Display alias.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Parent interface of a VLAN.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
    /// VLAN tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlanid: Option<u16>,
    /// Custom MTU, used when `mtu_override` is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,
    /// Enable the custom MTU.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtu_override: Option<Toggle>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Interface {
    /// VLAN sub-interface on `parent`.
    #[must_use]
    pub fn vlan(
        name: impl Into<String>,
        vdom: impl Into<String>,
        parent: impl Into<String>,
        vlanid: u16,
    ) -> Self {
        Self {
            name: name.into(),
            vdom: Some(vdom.into()),
            interface_type: Some("vlan".to_string()),
            interface: Some(parent.into()),
            vlanid: Some(vlanid),
            ..Self::default()
        }
    }
}
