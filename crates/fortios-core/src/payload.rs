//! Request payload helpers.
//!
//! FortiOS expects kebab-case attribute names (`start-ip`, `allow-routing`),
//! list-of-name tables as `[{"name": ...}]`, and silently ignores nothing:
//! `null` attributes are rejected. These helpers turn caller input into
//! payloads the API accepts.

use serde_json::{Map, Value};
use tracing::warn;

use crate::error::{Error, Result};
use crate::metadata::{DeprecatedField, EndpointSchema, FieldKind};

/// Convert a snake_case attribute name into the kebab-case FortiOS uses.
#[must_use]
pub fn to_api_key(key: &str) -> String {
    key.replace('_', "-")
}

/// Normalise a caller supplied payload.
///
/// Top-level keys are converted with [`to_api_key`] and `null` values are
/// dropped. Nested objects are left untouched.
///
/// # Errors
///
/// Returns [`Error::ValidationError`] if `value` is not a JSON object.
pub fn build_payload(value: Value) -> Result<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map
            .into_iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| (to_api_key(&k), v))
            .collect()),
        Value::Null => Ok(Map::new()),
        other => Err(Error::ValidationError(format!(
            "payload must be a JSON object, got {}",
            json_type_name(&other)
        ))),
    }
}

/// Normalise a name-list table value.
///
/// FortiOS represents member lists as tables of single-key objects. A single
/// string or an array of strings is expanded into that form using `key`;
/// objects are passed through unchanged.
#[must_use]
pub fn normalize_name_list(value: Value, key: &str) -> Value {
    let wrap = |name: String| {
        let mut entry = Map::new();
        entry.insert(key.to_string(), Value::String(name));
        Value::Object(entry)
    };

    match value {
        Value::String(name) => Value::Array(vec![wrap(name)]),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| match item {
                    Value::String(name) => wrap(name),
                    Value::Number(n) => wrap(n.to_string()),
                    other => other,
                })
                .collect(),
        ),
        other => other,
    }
}

/// Apply [`normalize_name_list`] to every table field of `schema` present in
/// `payload`, keyed by the table's first child attribute.
pub fn normalize_tables(payload: &mut Map<String, Value>, schema: &EndpointSchema) {
    for field in schema.fields {
        if field.kind != FieldKind::Table {
            continue;
        }
        let Some(child) = field.children.first() else {
            continue;
        };
        if let Some(value) = payload.remove(field.name) {
            payload.insert(field.name.to_string(), normalize_name_list(value, child.name));
        }
    }
}

/// Merge `overrides` into `base`; keys in `overrides` win.
#[must_use]
pub fn merge_payload(
    mut base: Map<String, Value>,
    overrides: Map<String, Value>,
) -> Map<String, Value> {
    for (key, value) in overrides {
        base.insert(key, value);
    }
    base
}

/// Report deprecated attributes present in `payload`.
///
/// Each hit is logged at warn level. The attributes are left in the payload;
/// FortiOS decides whether it still accepts them.
pub fn check_deprecated_fields<'a>(
    payload: &Map<String, Value>,
    deprecated: &'a [DeprecatedField],
    endpoint: &str,
) -> Vec<&'a str> {
    let mut hits = Vec::new();
    for field in deprecated {
        if !payload.contains_key(field.name) {
            continue;
        }
        match field.replacement {
            Some(replacement) => warn!(
                endpoint,
                field = field.name,
                since = field.since,
                replacement,
                "deprecated FortiOS attribute, use the replacement instead"
            ),
            None => warn!(
                endpoint,
                field = field.name,
                since = field.since,
                "deprecated FortiOS attribute"
            ),
        }
        hits.push(field.name);
    }
    hits
}

/// Extract the primary key from a payload as a string.
///
/// # Errors
///
/// Returns [`Error::ValidationError`] if the key is missing, empty, or not a
/// string or number.
pub fn extract_mkey(payload: &Map<String, Value>, mkey_field: &str) -> Result<String> {
    match payload.get(mkey_field) {
        Some(Value::String(value)) if !value.is_empty() => Ok(value.clone()),
        Some(Value::String(_)) => Err(Error::ValidationError(format!(
            "primary key `{mkey_field}` must not be empty"
        ))),
        Some(Value::Number(value)) => Ok(value.to_string()),
        Some(other) => Err(Error::ValidationError(format!(
            "`{mkey_field}` must be a string or integer, got {}",
            json_type_name(other)
        ))),
        None => Err(Error::ValidationError(format!(
            "payload is missing the primary key `{mkey_field}`"
        ))),
    }
}

pub(crate) const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{Category, FieldSpec, MkeyKind};
    use serde_json::json;

    static MEMBER_CHILDREN: [FieldSpec; 1] = [FieldSpec::string("name", "Member name.")];
    static FIELDS: [FieldSpec; 2] = [
        FieldSpec::string("name", "Group name."),
        FieldSpec::table("member", "Members.", &MEMBER_CHILDREN),
    ];
    static DEPRECATED: [DeprecatedField; 2] = [
        DeprecatedField::new("visibility", "6.4.0"),
        DeprecatedField::new("old-attr", "7.0.0").replaced_by("new-attr"),
    ];
    static SCHEMA: EndpointSchema = EndpointSchema {
        path: "firewall",
        name: "addrgrp",
        mkey: Some("name"),
        mkey_kind: MkeyKind::String,
        category: Category::Table,
        help: "Address groups.",
        fields: &FIELDS,
        deprecated: &DEPRECATED,
    };

    #[test]
    fn to_api_key_converts_underscores() {
        assert_eq!(to_api_key("start_ip"), "start-ip");
        assert_eq!(to_api_key("name"), "name");
    }

    #[test]
    fn build_payload_drops_nulls_and_converts_keys() {
        let payload = build_payload(json!({
            "allow_routing": "enable",
            "comment": null,
            "subnet": "10.0.0.0/24"
        }))
        .unwrap();

        assert_eq!(payload.len(), 2);
        assert_eq!(payload["allow-routing"], "enable");
        assert!(!payload.contains_key("comment"));
    }

    #[test]
    fn build_payload_rejects_non_objects() {
        let err = build_payload(json!(["a"])).unwrap_err();
        assert!(matches!(err, Error::ValidationError(msg) if msg.contains("array")));
        assert!(build_payload(Value::Null).unwrap().is_empty());
    }

    #[test]
    fn normalize_name_list_variants() {
        assert_eq!(
            normalize_name_list(json!("all"), "name"),
            json!([{"name": "all"}])
        );
        assert_eq!(
            normalize_name_list(json!(["a", {"name": "b"}, 3]), "name"),
            json!([{"name": "a"}, {"name": "b"}, {"name": "3"}])
        );
        assert_eq!(normalize_name_list(json!(true), "name"), json!(true));
    }

    #[test]
    fn normalize_tables_uses_schema() {
        let mut payload = build_payload(json!({"name": "grp", "member": ["a", "b"]})).unwrap();
        normalize_tables(&mut payload, &SCHEMA);
        assert_eq!(payload["member"], json!([{"name": "a"}, {"name": "b"}]));
        assert_eq!(payload["name"], "grp");
    }

    #[test]
    fn merge_payload_overrides_win() {
        let base = build_payload(json!({"name": "a", "comment": "x"})).unwrap();
        let extra = build_payload(json!({"comment": "y", "color": 3})).unwrap();
        let merged = merge_payload(base, extra);
        assert_eq!(merged["comment"], "y");
        assert_eq!(merged["color"], 3);
        assert_eq!(merged["name"], "a");
    }

    #[test]
    fn check_deprecated_fields_reports_hits() {
        let payload = build_payload(json!({"name": "a", "visibility": "enable"})).unwrap();
        let hits = check_deprecated_fields(&payload, SCHEMA.deprecated, "firewall/addrgrp");
        assert_eq!(hits, vec!["visibility"]);
        assert!(payload.contains_key("visibility"));

        let clean = build_payload(json!({"name": "a"})).unwrap();
        assert!(check_deprecated_fields(&clean, SCHEMA.deprecated, "firewall/addrgrp").is_empty());
    }

    #[test]
    fn extract_mkey_variants() {
        let payload = build_payload(json!({"name": "web", "policyid": 7, "bad": [1]})).unwrap();
        assert_eq!(extract_mkey(&payload, "name").unwrap(), "web");
        assert_eq!(extract_mkey(&payload, "policyid").unwrap(), "7");
        assert!(matches!(
            extract_mkey(&payload, "bad"),
            Err(Error::ValidationError(_))
        ));
        assert!(matches!(
            extract_mkey(&payload, "missing"),
            Err(Error::ValidationError(msg)) if msg.contains("missing")
        ));
    }
}
