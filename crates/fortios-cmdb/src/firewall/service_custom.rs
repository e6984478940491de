//! `firewall.service/custom`: custom services.

use crate::models::Toggle;
use fortios_core::metadata::{Category, DeprecatedField, EndpointSchema, FieldSpec, MkeyKind};
use serde::{Deserialize, Serialize};

static FIELDS: [FieldSpec; 11] = [
    FieldSpec::string("name", "Custom service name.").required().max_len(79),
    FieldSpec::string("category", "Service category.").max_len(63),
    FieldSpec::option("protocol", "Protocol type based on IANA numbers.", &["TCP/UDP/UDP-Lite/SCTP", "ICMP", "ICMP6", "IP", "HTTP", "FTP", "CONNECT", "SOCKS-TCP", "SOCKS-UDP", "ALL"])
        .default_value("TCP/UDP/UDP-Lite/SCTP"),
    FieldSpec::string("tcp-portrange", "Multiple TCP port ranges."),
    FieldSpec::string("udp-portrange", "Multiple UDP port ranges."),
    FieldSpec::string("sctp-portrange", "Multiple SCTP port ranges."),
    FieldSpec::integer("protocol-number", "IP protocol number.").range(0, 254).default_value("0"),
    FieldSpec::integer("icmptype", "ICMP type.").range(0, 4_294_967_295),
    FieldSpec::integer("icmpcode", "ICMP code.").range(0, 255),
    FieldSpec::string("comment", "Comment.").max_len(255),
    FieldSpec::integer("color", "Color of icon on the GUI.").range(0, 32).default_value("0"),
];

static DEPRECATED: [DeprecatedField; 1] = [DeprecatedField::new("visibility", "6.4.0")];

/// Static schema of `firewall.service/custom`.
pub static SCHEMA: EndpointSchema = EndpointSchema {
    path: "firewall.service",
    name: "custom",
    mkey: Some("name"),
    mkey_kind: MkeyKind::String,
    category: Category::Table,
    help: "Configure custom services.",
    fields: &FIELDS,
    deprecated: &DEPRECATED,
};

/// A `firewall.service/custom` entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct ServiceCustom {
    /// Service name (mkey).
    pub name: String,
    /// Service category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Protocol family, e.g. `TCP/UDP/UDP-Lite/SCTP`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    /// TCP ranges as `dst[-dst_high][:src[-src_high]]`, space separated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcp_portrange: Option<String>,
    /// UDP ranges.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub udp_portrange: Option<String>,
    /// IP protocol number for `IP` services.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol_number: Option<u8>,
    /// Comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// GUI icon color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<u8>,
    /// Display in the proxy service list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<Toggle>,
}

impl ServiceCustom {
    /// TCP service for the given port range, e.g. `"8080-8081"`.
    #[must_use]
    pub fn tcp(name: impl Into<String>, portrange: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            protocol: Some("TCP/UDP/UDP-Lite/SCTP".to_string()),
            tcp_portrange: Some(portrange.into()),
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
    fn api_path_uses_dotted_category() {
        assert_eq!(SCHEMA.api_path(), "firewall.service/custom");
    }

    #[test]
    fn tcp_service_payload() {
        let payload =
            build_payload(serde_json::to_value(ServiceCustom::tcp("web-alt", "8080-8081")).unwrap())
                .unwrap();
        assert_eq!(payload["tcp-portrange"], json!("8080-8081"));
        SCHEMA.validate_payload(&payload, true).unwrap();
    }

    #[test]
    fn rejects_unknown_protocol() {
        let err = SCHEMA
            .validate_field("protocol", &json!("GRE"))
            .unwrap_err();
        assert!(err.to_string().contains("GRE"));
    }
}
