//! `system/global`: device wide settings.

use crate::models::Toggle;
use fortios_core::metadata::{Category, DeprecatedField, EndpointSchema, FieldSpec, MkeyKind};
use serde::{Deserialize, Serialize};

static FIELDS: [FieldSpec; 10] = [
    FieldSpec::string("hostname", "FortiGate unit's hostname.").max_len(35),
    FieldSpec::string("alias", "Alias for your FortiGate unit.").max_len(35),
    FieldSpec::integer("timezone", "Number corresponding to your time zone from 00 to 86.").range(0, 86),
    FieldSpec::option("admin-https-redirect", "Enable/disable redirection of HTTP administration access to HTTPS.", &["enable", "disable"])
        .default_value("enable"),
    FieldSpec::integer("admin-sport", "Administrative access port for HTTPS.").range(1, 65535).default_value("443"),
    FieldSpec::integer("admin-port", "Administrative access port for HTTP.").range(1, 65535).default_value("80"),
    FieldSpec::integer("admintimeout", "Number of minutes before an idle administrator session times out.")
        .range(1, 480)
        .default_value("5"),
    FieldSpec::option("language", "GUI display language.", &["english", "french", "spanish", "portuguese", "japanese", "trach", "simch", "korean"])
        .default_value("english"),
    FieldSpec::option("gui-theme", "Color scheme for the administration GUI.", &["jade", "neutrino", "mariner", "graphite", "melongene", "jet-stream", "security-fabric", "retro", "dark-matter", "onyx", "eclipse"])
        .default_value("jade"),
    FieldSpec::option("rest-api-key-url-query", "Enable/disable support for passing REST API keys through URL query parameters.", &["enable", "disable"])
        .default_value("disable"),
];

static DEPRECATED: [DeprecatedField; 1] =
    [DeprecatedField::new("admin-concurrent", "7.2.0").replaced_by("admin-login-max")];

/// Static schema of `system/global`.
pub static SCHEMA: EndpointSchema = EndpointSchema {
    path: "system",
    name: "global",
    mkey: None,
    mkey_kind: MkeyKind::String,
    category: Category::Singleton,
    help: "Configure global attributes.",
    fields: &FIELDS,
    deprecated: &DEPRECATED,
};

/// The `system/global` settings object.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct GlobalSettings {
    /// Hostname.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// Alias.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Time zone index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<u8>,
    /// Redirect HTTP administration to HTTPS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_https_redirect: Option<Toggle>,
    /// HTTPS administration port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_sport: Option<u16>,
    /// Idle administrator timeout in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admintimeout: Option<u16>,
    /// GUI language.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use fortios_core::payload::build_payload;
    use serde_json::json;

    #[test]
    fn singleton_without_mkey() {
        assert_eq!(SCHEMA.mkey, None);
        assert!(SCHEMA.help().starts_with("system/global (complex)"));
    }

    #[test]
    fn partial_update_validates() {
        let settings = GlobalSettings {
            hostname: Some("fw-edge-01".into()),
            admintimeout: Some(30),
            ..GlobalSettings::default()
        };
        let payload = build_payload(serde_json::to_value(&settings).unwrap()).unwrap();
        assert_eq!(payload.len(), 2);
        SCHEMA.validate_payload(&payload, false).unwrap();
    }

    #[test]
    fn admintimeout_range() {
        assert!(SCHEMA.validate_field("admintimeout", &json!(481)).is_err());
    }
}
