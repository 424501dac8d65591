//! Proxy rules and the prefix table built from them.
//!
//! # Design Decisions
//! - Prefix matching is case-sensitive, no regex
//! - Inserting an existing prefix replaces the rule in place (last wins, position kept)
//! - Lookup picks the longest matching prefix
//! - Serializes as a prefix → rule map, in insertion order

use serde::ser::{Serialize, SerializeMap, Serializer};

/// A single upstream forwarding rule.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRule {
    /// Request path prefix, always starts with `/`. Serialized as the table key.
    #[serde(skip)]
    pub prefix: String,

    /// Upstream base URL, as written in the specification.
    pub target: String,

    /// Rewrite the Host header to the target's.
    pub change_origin: bool,

    /// Proxy websocket upgrades.
    pub ws: bool,

    /// Strip the prefix from the forwarded path.
    pub rewrite: bool,

    /// `Some(false)` for `https` targets so self-signed upstreams are accepted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
}

impl ProxyRule {
    /// Create a rule. `target_is_https` controls certificate verification.
    pub fn new(
        prefix: impl Into<String>,
        target: impl Into<String>,
        rewrite: bool,
        target_is_https: bool,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            target: target.into(),
            change_origin: true,
            ws: true,
            rewrite,
            secure: if target_is_https { Some(false) } else { None },
        }
    }

    /// Returns true if the request path falls under this rule.
    pub fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }

    /// The path forwarded upstream for a matching request path.
    pub fn rewrite_path(&self, path: &str) -> String {
        if !self.rewrite {
            return path.to_string();
        }
        match path.strip_prefix(self.prefix.as_str()) {
            Some("") => "/".to_string(),
            Some(rest) => rest.to_string(),
            None => path.to_string(),
        }
    }
}

/// Mapping from path prefix to [`ProxyRule`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyTable {
    rules: Vec<ProxyRule>,
}

impl ProxyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a rule. A rule with the same prefix is replaced and returned.
    pub fn insert(&mut self, rule: ProxyRule) -> Option<ProxyRule> {
        match self.rules.iter_mut().find(|r| r.prefix == rule.prefix) {
            Some(existing) => Some(std::mem::replace(existing, rule)),
            None => {
                self.rules.push(rule);
                None
            }
        }
    }

    /// Get the rule registered for exactly this prefix.
    pub fn get(&self, prefix: &str) -> Option<&ProxyRule> {
        self.rules.iter().find(|r| r.prefix == prefix)
    }

    /// Find the rule for a request path (longest matching prefix).
    pub fn lookup(&self, path: &str) -> Option<&ProxyRule> {
        self.rules
            .iter()
            .filter(|r| r.matches(path))
            .max_by_key(|r| r.prefix.len())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProxyRule> {
        self.rules.iter()
    }

    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.prefix.as_str())
    }
}

impl Serialize for ProxyTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.rules.len()))?;
        for rule in &self.rules {
            map.serialize_entry(&rule.prefix, rule)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_replaces_in_place() {
        let mut table = ProxyTable::new();
        assert!(table.insert(ProxyRule::new("/api", "http://a", false, false)).is_none());
        assert!(table.insert(ProxyRule::new("/img", "http://b", false, false)).is_none());

        let replaced = table.insert(ProxyRule::new("/api", "http://c", true, false));
        assert_eq!(replaced.map(|r| r.target), Some("http://a".to_string()));
        assert_eq!(table.len(), 2);
        assert_eq!(table.prefixes().collect::<Vec<_>>(), vec!["/api", "/img"]);
        assert_eq!(table.get("/api").unwrap().target, "http://c");
    }

    #[test]
    fn test_lookup_longest_prefix() {
        let mut table = ProxyTable::new();
        table.insert(ProxyRule::new("/api", "http://general", false, false));
        table.insert(ProxyRule::new("/api/v2", "http://v2", false, false));

        assert_eq!(table.lookup("/api/v2/users").unwrap().target, "http://v2");
        assert_eq!(table.lookup("/api/v1/users").unwrap().target, "http://general");
        assert!(table.lookup("/images/logo.png").is_none());
    }

    #[test]
    fn test_rewrite_path() {
        let rewriting = ProxyRule::new("/api", "http://localhost:9000", true, false);
        assert_eq!(rewriting.rewrite_path("/api/users"), "/users");
        assert_eq!(rewriting.rewrite_path("/api"), "/");

        let passthrough = ProxyRule::new("/api", "http://localhost:9000", false, false);
        assert_eq!(passthrough.rewrite_path("/api/users"), "/api/users");
    }

    #[test]
    fn test_serializes_as_prefix_map() {
        let mut table = ProxyTable::new();
        table.insert(ProxyRule::new("/api", "http://localhost:9000", true, false));
        table.insert(ProxyRule::new("/secure", "https://upstream.internal", false, true));

        let value = serde_json::to_value(&table).unwrap();
        assert_eq!(
            value,
            json!({
                "/api": {
                    "target": "http://localhost:9000",
                    "changeOrigin": true,
                    "ws": true,
                    "rewrite": true
                },
                "/secure": {
                    "target": "https://upstream.internal",
                    "changeOrigin": true,
                    "ws": true,
                    "rewrite": false,
                    "secure": false
                }
            })
        );
    }
}
