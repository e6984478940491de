//! `firewall/dnstranslation`: DNS answer translation.

use fortios_core::metadata::{Category, EndpointSchema, FieldSpec, MkeyKind};
use serde::{Deserialize, Serialize};

static FIELDS: [FieldSpec; 4] = [
    FieldSpec::integer("id", "ID.").range(0, 4_294_967_295).default_value("0"),
    FieldSpec::ipv4("src", "IPv4 address or subnet on the internal network to compare with the resolved address in DNS query replies.")
        .default_value("0.0.0.0"),
    FieldSpec::ipv4("dst", "IPv4 address or subnet on the external network to substitute for the resolved address in DNS query replies.")
        .default_value("0.0.0.0"),
    FieldSpec::ipv4("netmask", "If src and dst are subnets rather than single IP addresses, enter the netmask for both src and dst.")
        .default_value("0.0.0.0"),
];

/// Static schema of `firewall/dnstranslation`.
pub static SCHEMA: EndpointSchema = EndpointSchema {
    path: "firewall",
    name: "dnstranslation",
    mkey: Some("id"),
    mkey_kind: MkeyKind::Integer,
    category: Category::Table,
    help: "Configure DNS translation.",
    fields: &FIELDS,
    deprecated: &[],
};

/// A `firewall/dnstranslation` entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DnsTranslation {
    /// Entry ID (mkey). `None` lets FortiOS assign one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    /// Internal address found in DNS replies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    /// External address substituted into the reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dst: Option<String>,
    /// Netmask applied to `src` and `dst`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub netmask: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_are_typed() {
        let defaults = SCHEMA.defaults();
        assert_eq!(defaults["id"], json!(0));
        assert_eq!(defaults["netmask"], json!("0.0.0.0"));
    }

    #[test]
    fn rejects_non_ipv4() {
        assert!(SCHEMA.validate_field("src", &json!("10.0.0.300")).is_err());
        assert!(SCHEMA.validate_field("src", &json!("10.0.0.3")).is_ok());
    }
}
