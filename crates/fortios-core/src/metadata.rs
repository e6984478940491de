//! Static endpoint schemas and schema introspection.
//!
//! Every generated endpoint carries an [`EndpointSchema`] describing its
//! attributes. The schema answers "what fields exist", "what does this field
//! mean", "what are the defaults" and validates payloads before they are sent.

use serde_json::{Map, Number, Value};
use std::fmt::Write as _;
use std::net::Ipv4Addr;
use tracing::debug;

use crate::error::{Error, Result};
use crate::payload::{json_type_name, to_api_key};

/// Attribute type as FortiOS reports it in its schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Free-form string
    String,
    /// Integer, optionally range-limited
    Integer,
    /// One value out of `options`
    Option,
    /// Space separated subset of `options`
    MultiOption,
    /// IPv4 address
    Ipv4Address,
    /// IPv4 address with netmask or prefix length
    Ipv4Netmask,
    /// RFC 4122 UUID
    Uuid,
    /// Secret string; never echoed back by FortiOS
    Password,
    /// Nested table described by `children`
    Table,
}

impl FieldKind {
    /// Name of the kind as shown in help output.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Option => "option",
            Self::MultiOption => "multiple-option",
            Self::Ipv4Address => "ipv4-address",
            Self::Ipv4Netmask => "ipv4-classnet",
            Self::Uuid => "uuid",
            Self::Password => "password",
            Self::Table => "table",
        }
    }
}

/// Type of an endpoint's primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MkeyKind {
    /// String key (`name`)
    String,
    /// Integer key (`policyid`, `seq-num`)
    Integer,
}

/// Shape of a CMDB endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Table of entries addressed by mkey
    Table,
    /// Single settings object without mkey
    Singleton,
    /// Read-only table of vendor supplied reference data
    Reference,
}

impl Category {
    /// Name of the category as shown in help output.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Singleton => "complex",
            Self::Reference => "read-only",
        }
    }
}

/// Description of a single endpoint attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Attribute name as sent on the wire (kebab-case)
    pub name: &'static str,
    /// Attribute type
    pub kind: FieldKind,
    /// Human readable description
    pub description: &'static str,
    /// Whether the attribute must be present when creating an entry
    pub required: bool,
    /// Default value FortiOS applies, in CLI notation
    pub default: Option<&'static str>,
    /// Allowed values for option kinds
    pub options: &'static [&'static str],
    /// Inclusive minimum for integers
    pub min: Option<i64>,
    /// Inclusive maximum for integers
    pub max: Option<i64>,
    /// Maximum length for strings
    pub max_length: Option<usize>,
    /// Child attributes for tables
    pub children: &'static [FieldSpec],
}

impl FieldSpec {
    const fn base(name: &'static str, kind: FieldKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            description,
            required: false,
            default: None,
            options: &[],
            min: None,
            max: None,
            max_length: None,
            children: &[],
        }
    }

    /// String attribute.
    #[must_use]
    pub const fn string(name: &'static str, description: &'static str) -> Self {
        Self::base(name, FieldKind::String, description)
    }

    /// Integer attribute.
    #[must_use]
    pub const fn integer(name: &'static str, description: &'static str) -> Self {
        Self::base(name, FieldKind::Integer, description)
    }

    /// Single-choice attribute.
    #[must_use]
    pub const fn option(
        name: &'static str,
        description: &'static str,
        options: &'static [&'static str],
    ) -> Self {
        let mut spec = Self::base(name, FieldKind::Option, description);
        spec.options = options;
        spec
    }

    /// Multiple-choice attribute.
    #[must_use]
    pub const fn multi_option(
        name: &'static str,
        description: &'static str,
        options: &'static [&'static str],
    ) -> Self {
        let mut spec = Self::base(name, FieldKind::MultiOption, description);
        spec.options = options;
        spec
    }

    /// IPv4 address attribute.
    #[must_use]
    pub const fn ipv4(name: &'static str, description: &'static str) -> Self {
        Self::base(name, FieldKind::Ipv4Address, description)
    }

    /// IPv4 address/netmask attribute.
    #[must_use]
    pub const fn ipv4_netmask(name: &'static str, description: &'static str) -> Self {
        Self::base(name, FieldKind::Ipv4Netmask, description)
    }

    /// UUID attribute.
    #[must_use]
    pub const fn uuid(name: &'static str, description: &'static str) -> Self {
        Self::base(name, FieldKind::Uuid, description)
    }

    /// Password attribute.
    #[must_use]
    pub const fn password(name: &'static str, description: &'static str) -> Self {
        Self::base(name, FieldKind::Password, description)
    }

    /// Nested table attribute.
    #[must_use]
    pub const fn table(
        name: &'static str,
        description: &'static str,
        children: &'static [FieldSpec],
    ) -> Self {
        let mut spec = Self::base(name, FieldKind::Table, description);
        spec.children = children;
        spec
    }

    /// Mark the attribute as required on create.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the default value.
    #[must_use]
    pub const fn default_value(mut self, value: &'static str) -> Self {
        self.default = Some(value);
        self
    }

    /// Set the inclusive integer range.
    #[must_use]
    pub const fn range(mut self, min: i64, max: i64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    /// Set the maximum string length.
    #[must_use]
    pub const fn max_len(mut self, length: usize) -> Self {
        self.max_length = Some(length);
        self
    }

    /// Default value converted to JSON according to the attribute kind.
    #[must_use]
    pub fn default_json(&self) -> Option<Value> {
        let raw = self.default?;
        if self.kind == FieldKind::Integer {
            if let Ok(number) = raw.parse::<i64>() {
                return Some(Value::Number(Number::from(number)));
            }
        }
        Some(Value::String(raw.to_string()))
    }

    /// Validate a value against this attribute.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] describing the first violation.
    pub fn validate(&self, value: &Value) -> Result<()> {
        match self.kind {
            FieldKind::String | FieldKind::Password => {
                let text = self.expect_str(value)?;
                if let Some(max) = self.max_length {
                    let length = text.chars().count();
                    if length > max {
                        return Err(self.invalid(format!(
                            "length {length} exceeds maximum of {max}"
                        )));
                    }
                }
                Ok(())
            }
            FieldKind::Integer => {
                let number = match value {
                    Value::Number(n) => n.as_i64(),
                    Value::String(s) => s.trim().parse::<i64>().ok(),
                    _ => None,
                }
                .ok_or_else(|| {
                    self.invalid(format!("expected integer, got {}", json_type_name(value)))
                })?;

                if self.min.is_some_and(|min| number < min)
                    || self.max.is_some_and(|max| number > max)
                {
                    return Err(self.invalid(format!(
                        "{number} is outside the range {}-{}",
                        self.min.unwrap_or(i64::MIN),
                        self.max.unwrap_or(i64::MAX)
                    )));
                }
                Ok(())
            }
            FieldKind::Option => {
                let text = self.expect_str(value)?;
                self.check_option(text)
            }
            FieldKind::MultiOption => {
                let text = self.expect_str(value)?;
                text.split_whitespace()
                    .try_for_each(|item| self.check_option(item))
            }
            FieldKind::Ipv4Address => {
                let text = self.expect_str(value)?;
                text.trim()
                    .parse::<Ipv4Addr>()
                    .map(|_| ())
                    .map_err(|_| self.invalid(format!("`{text}` is not an IPv4 address")))
            }
            FieldKind::Ipv4Netmask => {
                let text = self.expect_str(value)?;
                if is_ipv4_netmask(text) {
                    Ok(())
                } else {
                    Err(self.invalid(format!("`{text}` is not an IPv4 address/netmask")))
                }
            }
            FieldKind::Uuid => {
                let text = self.expect_str(value)?;
                uuid::Uuid::parse_str(text)
                    .map(|_| ())
                    .map_err(|err| self.invalid(format!("`{text}` is not a UUID: {err}")))
            }
            FieldKind::Table => {
                let Value::Array(entries) = value else {
                    return Err(self.invalid(format!(
                        "expected array of objects, got {}",
                        json_type_name(value)
                    )));
                };
                for entry in entries {
                    let Value::Object(map) = entry else {
                        return Err(self.invalid(format!(
                            "table entries must be objects, got {}",
                            json_type_name(entry)
                        )));
                    };
                    for (key, child_value) in map {
                        match self.children.iter().find(|c| c.name == key) {
                            Some(child) => child.validate(child_value).map_err(|err| {
                                Error::ValidationError(format!("{}.{}", self.name, strip(&err)))
                            })?,
                            None => debug!(table = self.name, key = %key, "unknown table attribute"),
                        }
                    }
                }
                Ok(())
            }
        }
    }

    fn expect_str<'v>(&self, value: &'v Value) -> Result<&'v str> {
        value.as_str().ok_or_else(|| {
            self.invalid(format!("expected string, got {}", json_type_name(value)))
        })
    }

    fn check_option(&self, candidate: &str) -> Result<()> {
        if self.options.is_empty() || self.options.contains(&candidate) {
            Ok(())
        } else {
            Err(self.invalid(format!(
                "`{candidate}` is not one of [{}]",
                self.options.join(", ")
            )))
        }
    }

    fn invalid(&self, reason: String) -> Error {
        Error::ValidationError(format!("{}: {reason}", self.name))
    }
}

fn strip(err: &Error) -> String {
    match err {
        Error::ValidationError(message) => message.clone(),
        other => other.to_string(),
    }
}

fn is_ipv4_netmask(text: &str) -> bool {
    let text = text.trim();
    if let Some((addr, prefix)) = text.split_once('/') {
        return addr.parse::<Ipv4Addr>().is_ok()
            && prefix.parse::<u8>().is_ok_and(|len| len <= 32);
    }
    let mut parts = text.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(addr), None, None) => addr.parse::<Ipv4Addr>().is_ok(),
        (Some(addr), Some(mask), None) => {
            addr.parse::<Ipv4Addr>().is_ok()
                && mask
                    .parse::<Ipv4Addr>()
                    .is_ok_and(|m| u32::from(m).leading_ones() == u32::from(m).count_ones())
        }
        _ => false,
    }
}

/// An attribute that FortiOS still accepts but has deprecated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeprecatedField {
    /// Attribute name
    pub name: &'static str,
    /// FortiOS version that deprecated the attribute
    pub since: &'static str,
    /// Attribute to use instead, if any
    pub replacement: Option<&'static str>,
}

impl DeprecatedField {
    /// Create a deprecation entry.
    #[must_use]
    pub const fn new(name: &'static str, since: &'static str) -> Self {
        Self {
            name,
            since,
            replacement: None,
        }
    }

    /// Name the replacing attribute.
    #[must_use]
    pub const fn replaced_by(mut self, replacement: &'static str) -> Self {
        self.replacement = Some(replacement);
        self
    }
}

/// Static description of a CMDB endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointSchema {
    /// Path part before the slash (`firewall`, `vpn.ipsec`)
    pub path: &'static str,
    /// Endpoint name (`address`, `phase1`)
    pub name: &'static str,
    /// Primary key attribute; `None` for singletons
    pub mkey: Option<&'static str>,
    /// Type of the primary key
    pub mkey_kind: MkeyKind,
    /// Endpoint shape
    pub category: Category,
    /// One-line endpoint description
    pub help: &'static str,
    /// Top-level attributes
    pub fields: &'static [FieldSpec],
    /// Deprecated attributes
    pub deprecated: &'static [DeprecatedField],
}

impl EndpointSchema {
    /// Resource path used in URLs (`firewall.service/custom`).
    #[must_use]
    pub fn api_path(&self) -> String {
        format!("{}/{}", self.path, self.name)
    }

    /// All top-level attributes.
    #[must_use]
    pub const fn fields(&self) -> &'static [FieldSpec] {
        self.fields
    }

    /// Names of all top-level attributes.
    #[must_use]
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|field| field.name).collect()
    }

    /// Look up an attribute by kebab- or snake-case name.
    #[must_use]
    pub fn field_info(&self, name: &str) -> Option<&'static FieldSpec> {
        let key = to_api_key(name);
        self.fields.iter().find(|field| field.name == key)
    }

    /// Returns true if the attribute exists.
    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.field_info(name).is_some()
    }

    /// Attributes that must be present on create.
    #[must_use]
    pub fn required_fields(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|field| field.required)
            .map(|field| field.name)
            .collect()
    }

    /// Defaults FortiOS applies to omitted attributes.
    #[must_use]
    pub fn defaults(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .filter_map(|field| field.default_json().map(|v| (field.name.to_string(), v)))
            .collect()
    }

    /// Returns the deprecation entry for an attribute, if deprecated.
    #[must_use]
    pub fn deprecation(&self, name: &str) -> Option<&'static DeprecatedField> {
        let key = to_api_key(name);
        self.deprecated.iter().find(|field| field.name == key)
    }

    /// Returns true if the attribute is deprecated.
    #[must_use]
    pub fn is_deprecated(&self, name: &str) -> bool {
        self.deprecation(name).is_some()
    }

    /// Multi-line endpoint summary listing every attribute.
    #[must_use]
    pub fn help(&self) -> String {
        let mut out = String::new();
        let _ = write!(out, "{} ({}", self.api_path(), self.category.name());
        if let Some(mkey) = self.mkey {
            let _ = write!(out, ", mkey: {mkey}");
        }
        let _ = writeln!(out, ")");
        let _ = writeln!(out, "{}", self.help);

        if !self.fields.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Fields:");
            let width = self.fields.iter().map(|f| f.name.len()).max().unwrap_or(0);
            for field in self.fields {
                let marker = if field.required { "required" } else { "" };
                let _ = writeln!(
                    out,
                    "  {:width$}  {:15}  {:8}  {}",
                    field.name,
                    field.kind.name(),
                    marker,
                    field.description,
                    width = width
                );
            }
        }

        if !self.deprecated.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Deprecated:");
            for field in self.deprecated {
                let _ = writeln!(out, "  {} (since {})", field.name, field.since);
            }
        }
        out
    }

    /// Detailed description of one attribute.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] if the attribute does not exist.
    pub fn field_help(&self, name: &str) -> Result<String> {
        let field = self.field_info(name).ok_or_else(|| self.unknown(name))?;

        let mut out = format!("{} ({}", field.name, field.kind.name());
        if field.required {
            out.push_str(", required");
        }
        out.push_str(")\n");
        let _ = writeln!(out, "  {}", field.description);
        if !field.options.is_empty() {
            let _ = writeln!(out, "  options: {}", field.options.join(", "));
        }
        if let (Some(min), Some(max)) = (field.min, field.max) {
            let _ = writeln!(out, "  range: {min}-{max}");
        }
        if let Some(max) = field.max_length {
            let _ = writeln!(out, "  max length: {max}");
        }
        if let Some(default) = field.default {
            let _ = writeln!(out, "  default: {default}");
        }
        if !field.children.is_empty() {
            let names: Vec<_> = field.children.iter().map(|c| c.name).collect();
            let _ = writeln!(out, "  children: {}", names.join(", "));
        }
        if let Some(deprecated) = self.deprecation(name) {
            let _ = writeln!(out, "  deprecated since {}", deprecated.since);
        }
        Ok(out)
    }

    /// Validate a single attribute value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] if the attribute is unknown or the
    /// value violates its constraints.
    pub fn validate_field(&self, name: &str, value: &Value) -> Result<()> {
        self.field_info(name)
            .ok_or_else(|| self.unknown(name))?
            .validate(value)
    }

    /// Validate a complete payload.
    ///
    /// Known attributes are validated, unknown attributes are tolerated (the
    /// device may be newer than this schema). With `for_create`, every
    /// required attribute must be present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] for the first violation found.
    pub fn validate_payload(&self, payload: &Map<String, Value>, for_create: bool) -> Result<()> {
        if for_create {
            let missing: Vec<_> = self
                .fields
                .iter()
                .filter(|field| field.required && !payload.contains_key(field.name))
                .map(|field| field.name)
                .collect();
            if !missing.is_empty() {
                return Err(Error::ValidationError(format!(
                    "{}: missing required attribute(s): {}",
                    self.api_path(),
                    missing.join(", ")
                )));
            }
        }

        for (key, value) in payload {
            match self.fields.iter().find(|field| field.name == key) {
                Some(field) => field.validate(value).map_err(|err| {
                    Error::ValidationError(format!("{}: {}", self.api_path(), strip(&err)))
                })?,
                None if self.is_deprecated(key) => {}
                None => debug!(endpoint = %self.api_path(), key = %key, "attribute not in schema"),
            }
        }
        Ok(())
    }

    fn unknown(&self, name: &str) -> Error {
        Error::ValidationError(format!(
            "{} has no attribute `{}`",
            self.api_path(),
            to_api_key(name)
        ))
    }
}
