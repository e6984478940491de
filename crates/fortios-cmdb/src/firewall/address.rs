//! `firewall/address`: IPv4 addresses.

use crate::models::{NameRef, Toggle};
use fortios_core::metadata::{Category, DeprecatedField, EndpointSchema, FieldSpec, MkeyKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

static INTERFACE_REF: [FieldSpec; 1] = [FieldSpec::string("name", "Tag name.").max_len(79)];

static FIELDS: [FieldSpec; 16] = [
    FieldSpec::string("name", "Address name.").required().max_len(79),
    FieldSpec::uuid("uuid", "Universally Unique Identifier (UUID; automatically assigned but can be manually reset)."),
    FieldSpec::option(
        "type",
        "Type of address.",
        &["ipmask", "iprange", "fqdn", "geography", "wildcard", "dynamic", "interface-subnet", "mac", "route-tag"],
    )
    .default_value("ipmask"),
    FieldSpec::ipv4_netmask("subnet", "IP address and subnet mask of address.").default_value("0.0.0.0 0.0.0.0"),
    FieldSpec::ipv4("start-ip", "First IP address (inclusive) in the range for the address.").default_value("0.0.0.0"),
    FieldSpec::ipv4("end-ip", "Final IP address (inclusive) in the range for the address.").default_value("0.0.0.0"),
    FieldSpec::string("fqdn", "Fully Qualified Domain Name address.").max_len(255),
    FieldSpec::string("country", "IP addresses associated to a specific country.").max_len(2),
    FieldSpec::ipv4_netmask("wildcard", "IP address and wildcard netmask.").default_value("0.0.0.0 0.0.0.0"),
    FieldSpec::integer("cache-ttl", "Defines the minimal TTL of individual IP addresses in FQDN cache measured in seconds.")
        .range(0, 86400)
        .default_value("0"),
    FieldSpec::string("associated-interface", "Network interface associated with address.").max_len(35),
    FieldSpec::integer("color", "Color of icon on the GUI.").range(0, 32).default_value("0"),
    FieldSpec::string("comment", "Comment.").max_len(255),
    FieldSpec::option("allow-routing", "Enable/disable use of this address in the static route configuration.", &["enable", "disable"])
        .default_value("disable"),
    FieldSpec::option("fabric-object", "Security Fabric global object setting.", &["enable", "disable"])
        .default_value("disable"),
    FieldSpec::table("tagging", "Config object tagging.", &INTERFACE_REF),
];

static DEPRECATED: [DeprecatedField; 2] = [
    DeprecatedField::new("visibility", "6.4.0"),
    DeprecatedField::new("policy-group", "7.0.0"),
];

/// Static schema of `firewall/address`.
pub static SCHEMA: EndpointSchema = EndpointSchema {
    path: "firewall",
    name: "address",
    mkey: Some("name"),
    mkey_kind: MkeyKind::String,
    category: Category::Table,
    help: "Configure IPv4 addresses.",
    fields: &FIELDS,
    deprecated: &DEPRECATED,
};

/// Address type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum AddressType {
    /// Subnet (`subnet`)
    Ipmask,
    /// Address range (`start-ip`..`end-ip`)
    Iprange,
    /// Domain name (`fqdn`)
    Fqdn,
    /// Country (`country`)
    Geography,
    /// Wildcard mask (`wildcard`)
    Wildcard,
    /// Dynamic address (SDN connector)
    Dynamic,
    /// Subnet of an interface
    InterfaceSubnet,
    /// MAC address
    Mac,
    /// Routes carrying a route tag
    RouteTag,
    /// Type introduced by newer firmware; decodes but cannot be written back
    #[serde(other)]
    Other,
}

/// A `firewall/address` entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Address {
    /// Address name (mkey).
    pub name: String,
    /// Object UUID, assigned by FortiOS when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<Uuid>,
    /// Address type.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub address_type: Option<AddressType>,
    /// Address and netmask, e.g. `10.0.0.0 255.255.255.0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnet: Option<String>,
    /// First address of an `iprange`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_ip: Option<String>,
    /// Last address of an `iprange`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_ip: Option<String>,
    /// Domain name of an `fqdn` address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fqdn: Option<String>,
    /// ISO country code of a `geography` address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Interface the address is bound to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub associated_interface: Option<String>,
    /// GUI icon color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<u8>,
    /// Comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Allow use in static routes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_routing: Option<Toggle>,
    /// Object tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagging: Option<Vec<NameRef>>,
}

impl Address {
    /// Subnet address, e.g. `Address::subnet("lan", "10.0.0.0 255.255.255.0")`.
    #[must_use]
    pub fn subnet(name: impl Into<String>, subnet: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address_type: Some(AddressType::Ipmask),
            subnet: Some(subnet.into()),
            ..Self::default()
        }
    }

    /// Domain name address.
    #[must_use]
    pub fn fqdn(name: impl Into<String>, fqdn: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address_type: Some(AddressType::Fqdn),
            fqdn: Some(fqdn.into()),
            ..Self::default()
        }
    }

    /// Address range.
    #[must_use]
    pub fn range(
        name: impl Into<String>,
        start_ip: impl Into<String>,
        end_ip: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            address_type: Some(AddressType::Iprange),
            start_ip: Some(start_ip.into()),
            end_ip: Some(end_ip.into()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fortios_core::payload::build_payload;
    use fortios_core::ApiResponse;
    use serde_json::json;

    #[test]
    fn serializes_kebab_case() {
        let address = Address {
            allow_routing: Some(Toggle::Enable),
            ..Address::subnet("lan", "10.0.0.0 255.255.255.0")
        };
        assert_eq!(
            serde_json::to_value(&address).unwrap(),
            json!({
                "name": "lan",
                "type": "ipmask",
                "subnet": "10.0.0.0 255.255.255.0",
                "allow-routing": "enable"
            })
        );
    }

    #[test]
    fn model_passes_schema_validation() {
        let body = serde_json::to_value(Address::range("pool", "10.0.0.10", "10.0.0.20")).unwrap();
        SCHEMA
            .validate_payload(&build_payload(body).unwrap(), true)
            .unwrap();
    }

    #[test]
    fn schema_rejects_bad_subnet() {
        let payload = build_payload(json!({"name": "x", "subnet": "10.0.0.0/33"})).unwrap();
        assert!(SCHEMA.validate_payload(&payload, true).is_err());
        assert!(SCHEMA.is_deprecated("visibility"));
    }

    #[test]
    fn decodes_device_entry() {
        let entry: Address = serde_json::from_value(json!({
            "name": "google-dns",
            "q_origin_key": "google-dns",
            "uuid": "c5b0d1f6-3f2e-51ee-7d6c-2b3f8e1a9c44",
            "type": "fqdn",
            "fqdn": "dns.google",
            "color": 0,
            "tagging": []
        }))
        .unwrap();
        assert_eq!(entry.address_type, Some(AddressType::Fqdn));
        assert!(entry.uuid.is_some());
    }

    #[test]
    fn decodes_newer_address_types() {
        let response = ApiResponse {
            results: json!([
                {"name": "tagged", "type": "route-tag", "route-tag": 42},
                {"name": "future", "type": "sdn-tag"},
                {"name": "lan", "type": "ipmask", "subnet": "10.0.0.0 255.255.255.0"}
            ]),
            ..ApiResponse::default()
        };
        let entries: Vec<Address> = response.results_as().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].address_type, Some(AddressType::RouteTag));
        assert_eq!(entries[1].address_type, Some(AddressType::Other));
        assert_eq!(entries[2].address_type, Some(AddressType::Ipmask));
    }

    #[test]
    fn schema_rejects_unknown_type_on_write() {
        let entry = Address {
            address_type: Some(AddressType::Other),
            ..Address::subnet("future", "10.0.0.0 255.255.255.0")
        };
        let payload = build_payload(serde_json::to_value(&entry).unwrap()).unwrap();
        assert!(SCHEMA.validate_payload(&payload, false).is_err());
    }
}
