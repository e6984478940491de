//! Convenience builder for HTTP query parameters.
//!
//! FortiOS encodes most GET modifiers in the query string (`filter`, `format`,
//! `with_meta`, `vdom`, ...). This builder assembles those pairs from optional
//! values so endpoint code stays free of `if let` chains.

use std::fmt::Display;

/// Builder for assembling query parameter pairs.
#[derive(Debug, Default, Clone)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    /// Create a new, empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Append a key/value pair when the value is present.
    pub fn push_opt<T>(&mut self, key: &'static str, value: Option<T>)
    where
        T: ToString,
    {
        if let Some(value) = value {
            self.pairs.push((key, value.to_string()));
        }
    }

    /// Append using a mapping function when the value is present.
    pub fn push_opt_with<T, F>(&mut self, key: &'static str, value: Option<T>, mut map: F)
    where
        F: FnMut(T) -> String,
    {
        if let Some(value) = value {
            self.pairs.push((key, map(value)));
        }
    }

    /// Append a required key/value pair.
    pub fn push<T>(&mut self, key: &'static str, value: T)
    where
        T: Display,
    {
        self.pairs.push((key, value.to_string()));
    }

    /// Append `key=1` when the flag is set. FortiOS treats flag presence as true.
    pub fn push_flag(&mut self, key: &'static str, enabled: bool) {
        if enabled {
            self.pairs.push((key, "1".to_string()));
        }
    }

    /// Append one pair per value, repeating the key.
    pub fn push_each<I, T>(&mut self, key: &'static str, values: I)
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        for value in values {
            self.pairs.push((key, value.to_string()));
        }
    }

    /// Append the values joined by `separator` when there is at least one.
    pub fn push_joined<I, T>(&mut self, key: &'static str, values: I, separator: &str)
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        let joined = values
            .into_iter()
            .map(|value| value.to_string())
            .collect::<Vec<_>>()
            .join(separator);
        if !joined.is_empty() {
            self.pairs.push((key, joined));
        }
    }

    /// Return the collected key/value pairs.
    #[must_use]
    pub fn into_pairs(self) -> Vec<(&'static str, String)> {
        self.pairs
    }

    /// Returns true if no parameters have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::QueryParams;

    #[test]
    fn push_opt_skips_none() {
        let mut params = QueryParams::new();
        params.push_opt("vdom", Option::<String>::None);
        assert!(params.is_empty());
    }

    #[test]
    fn push_opt_with_applies_mapper() {
        let mut params = QueryParams::new();
        params.push_opt_with("count", Some(5u32), |v| format!("{v:02}"));
        assert_eq!(params.into_pairs(), vec![("count", "05".to_string())]);
    }

    #[test]
    fn push_flag_only_when_enabled() {
        let mut params = QueryParams::new();
        params.push_flag("with_meta", false);
        params.push_flag("datasource", true);
        assert_eq!(params.into_pairs(), vec![("datasource", "1".to_string())]);
    }

    #[test]
    fn push_each_repeats_key() {
        let mut params = QueryParams::new();
        params.push_each("filter", ["name==a", "type==fqdn"]);
        assert_eq!(
            params.into_pairs(),
            vec![
                ("filter", "name==a".to_string()),
                ("filter", "type==fqdn".to_string())
            ]
        );
    }

    #[test]
    fn push_joined_skips_empty() {
        let mut params = QueryParams::new();
        params.push_joined("format", Vec::<String>::new(), "|");
        assert!(params.is_empty());
        params.push_joined("format", ["name", "subnet"], "|");
        assert_eq!(params.into_pairs(), vec![("format", "name|subnet".to_string())]);
    }
}
