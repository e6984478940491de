//! `firewall/addrgrp`: IPv4 address groups.

use crate::models::{NameRef, Toggle};
use fortios_core::metadata::{Category, DeprecatedField, EndpointSchema, FieldSpec, MkeyKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

static MEMBER: [FieldSpec; 1] = [FieldSpec::string("name", "Address name.").max_len(79)];

static FIELDS: [FieldSpec; 9] = [
    FieldSpec::string("name", "Address group name.").required().max_len(79),
    FieldSpec::option("type", "Address group type.", &["default", "folder"]).default_value("default"),
    FieldSpec::uuid("uuid", "Universally Unique Identifier."),
    FieldSpec::table("member", "Address objects contained within the group.", &MEMBER),
    FieldSpec::option("exclude", "Enable/disable address exclusion.", &["enable", "disable"])
        .default_value("disable"),
    FieldSpec::table("exclude-member", "Address exclusion member.", &MEMBER),
    FieldSpec::string("comment", "Comment.").max_len(255),
    FieldSpec::integer("color", "Color of icon on the GUI.").range(0, 32).default_value("0"),
    FieldSpec::option("allow-routing", "Enable/disable use of this group in the static route configuration.", &["enable", "disable"])
        .default_value("disable"),
];

static DEPRECATED: [DeprecatedField; 1] = [DeprecatedField::new("visibility", "6.4.0")];

/// Static schema of `firewall/addrgrp`.
pub static SCHEMA: EndpointSchema = EndpointSchema {
    path: "firewall",
    name: "addrgrp",
    mkey: Some("name"),
    mkey_kind: MkeyKind::String,
    category: Category::Table,
    help: "Configure IPv4 address groups.",
    fields: &FIELDS,
    deprecated: &DEPRECATED,
};

/// A `firewall/addrgrp` entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct AddressGroup {
    /// Group name (mkey).
    pub name: String,
    /// Object UUID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<Uuid>,
    /// Member addresses or groups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member: Option<Vec<NameRef>>,
    /// Enable member exclusion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Toggle>,
    /// Excluded members.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_member: Option<Vec<NameRef>>,
    /// Comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// GUI icon color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<u8>,
    /// Allow use in static routes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_routing: Option<Toggle>,
}

impl AddressGroup {
    /// Group with the given members.
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            member: Some(crate::models::name_refs(members)),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn members_serialize_as_name_refs() {
        let group = AddressGroup::new("web", ["web1", "web2"]);
        assert_eq!(
            serde_json::to_value(&group).unwrap(),
            json!({"name": "web", "member": [{"name": "web1"}, {"name": "web2"}]})
        );
    }

    #[test]
    fn schema_help_mentions_members() {
        let help = SCHEMA.field_help("exclude_member").unwrap();
        assert!(help.contains("exclude-member"));
    }
}
