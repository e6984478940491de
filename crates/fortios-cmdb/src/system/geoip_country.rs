//! `system/geoip-country`: country codes known to the GeoIP database.

use fortios_core::metadata::{Category, EndpointSchema, FieldSpec, MkeyKind};
use serde::{Deserialize, Serialize};

static FIELDS: [FieldSpec; 2] = [
    FieldSpec::string("id", "Country ID code.").max_len(2),
    FieldSpec::string("name", "Country name.").max_len(63),
];

/// Static schema of `system/geoip-country`.
pub static SCHEMA: EndpointSchema = EndpointSchema {
    path: "system",
    name: "geoip-country",
    mkey: Some("id"),
    mkey_kind: MkeyKind::String,
    category: Category::Reference,
    help: "Define geoip country name-ID table.",
    fields: &FIELDS,
    deprecated: &[],
};

/// A `system/geoip-country` entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeoipCountry {
    /// ISO 3166 alpha-2 code (mkey).
    pub id: String,
    /// Country name.
    #[serde(default)]
    pub name: String,
}
