//! Model types shared by several CMDB endpoints.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A reference to another CMDB object by name (`{"name": "web-servers"}`).
///
/// FortiOS uses this shape for every member list: address group members,
/// policy source/destination addresses, interfaces, services.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NameRef {
    /// Referenced object name.
    pub name: String,
}

impl NameRef {
    /// Reference an object by name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl From<&str> for NameRef {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for NameRef {
    fn from(name: String) -> Self {
        Self { name }
    }
}

/// Build a member list from plain names.
#[must_use]
pub fn name_refs<I, S>(names: I) -> Vec<NameRef>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    names.into_iter().map(|name| NameRef::new(name)).collect()
}

/// The `enable` / `disable` switch used by most FortiOS attributes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Toggle {
    /// `enable`
    Enable,
    /// `disable`
    Disable,
}

impl Toggle {
    /// Returns true for [`Toggle::Enable`].
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        matches!(self, Self::Enable)
    }
}

impl From<bool> for Toggle {
    fn from(enabled: bool) -> Self {
        if enabled {
            Self::Enable
        } else {
            Self::Disable
        }
    }
}

impl fmt::Display for Toggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Enable => "enable",
            Self::Disable => "disable",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn name_ref_serializes_as_object() {
        let members = name_refs(["web1", "web2"]);
        assert_eq!(
            serde_json::to_value(&members).unwrap(),
            json!([{"name": "web1"}, {"name": "web2"}])
        );
        assert_eq!(NameRef::from("all"), NameRef::new("all"));
    }

    #[test]
    fn toggle_round_trips_lowercase() {
        assert_eq!(serde_json::to_value(Toggle::Enable).unwrap(), json!("enable"));
        let parsed: Toggle = serde_json::from_value(json!("disable")).unwrap();
        assert!(!parsed.is_enabled());
        assert_eq!(Toggle::from(true).to_string(), "enable");
    }
}
