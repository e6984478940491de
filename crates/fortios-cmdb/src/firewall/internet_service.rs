//! `firewall/internet-service`: the vendor maintained Internet Service
//! Database. Read-only and large, so GETs go through the reference cache.

use fortios_core::metadata::{Category, EndpointSchema, FieldSpec, MkeyKind};
use serde::{Deserialize, Serialize};

static FIELDS: [FieldSpec; 8] = [
    FieldSpec::integer("id", "Internet Service ID.").range(0, 4_294_967_295),
    FieldSpec::string("name", "Internet Service name.").max_len(63),
    FieldSpec::integer("icon-id", "Icon ID of Internet Service.").range(0, 4_294_967_295),
    FieldSpec::option("direction", "How this service may be used in a firewall policy.", &["src", "dst", "both"]),
    FieldSpec::option("database", "Database name this Internet Service belongs to.", &["isdb", "irdb"]),
    FieldSpec::integer("ip-range-number", "Number of IPv4 ranges.").range(0, 4_294_967_295),
    FieldSpec::integer("ip-number", "Total number of IPv4 addresses.").range(0, 4_294_967_295),
    FieldSpec::integer("singularity", "Singular level of the Internet Service.").range(0, 65535),
];

/// Static schema of `firewall/internet-service`.
pub static SCHEMA: EndpointSchema = EndpointSchema {
    path: "firewall",
    name: "internet-service",
    mkey: Some("id"),
    mkey_kind: MkeyKind::Integer,
    category: Category::Reference,
    help: "Show Internet Service application.",
    fields: &FIELDS,
    deprecated: &[],
};

/// A `firewall/internet-service` entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct InternetService {
    /// Service ID (mkey).
    pub id: u32,
    /// Service name, e.g. `Google-Gmail`.
    pub name: String,
    /// GUI icon.
    #[serde(default)]
    pub icon_id: Option<u32>,
    /// Usable direction (`src`, `dst`, `both`).
    #[serde(default)]
    pub direction: Option<String>,
    /// Source database (`isdb` or `irdb`).
    #[serde(default)]
    pub database: Option<String>,
    /// Number of IPv4 ranges.
    #[serde(default)]
    pub ip_range_number: Option<u32>,
    /// Number of IPv4 addresses.
    #[serde(default)]
    pub ip_number: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_reference_entry() {
        let entry: InternetService = serde_json::from_value(json!({
            "id": 65646,
            "q_origin_key": 65646,
            "name": "Google-Gmail",
            "icon-id": 213,
            "direction": "both",
            "database": "isdb",
            "ip-range-number": 12,
            "ip-number": 1024,
            "singularity": 0
        }))
        .unwrap();
        assert_eq!(entry.id, 65646);
        assert_eq!(entry.ip_range_number, Some(12));
    }

    #[test]
    fn is_reference_category() {
        assert_eq!(SCHEMA.category, Category::Reference);
        assert!(SCHEMA.help().contains("read-only"));
    }
}
