//! Override loading from disk.

use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

/// Error type for override loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error in {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("JSON parse error in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("override in {} must be a table at the top level", .0.display())]
    NotATable(PathBuf),
}

/// Load an override file. `.json` files are read as JSON, everything else as TOML.
pub async fn load_overrides(path: &Path) -> Result<Value, ConfigError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let overrides = parse_overrides(path, &content)?;

    tracing::debug!(path = %path.display(), "Override file loaded");
    Ok(overrides)
}

/// Parse override content, picking the format from the file extension.
pub fn parse_overrides(path: &Path, content: &str) -> Result<Value, ConfigError> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let value: Value = if is_json {
        serde_json::from_str(content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        toml::from_str(content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?
    };

    if !value.is_object() {
        return Err(ConfigError::NotATable(path.to_path_buf()));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_toml() {
        let content = r#"
base = "/admin/"

[server]
port = 4000

[resolve.alias]
"@/" = "/opt/shared/"
"#;
        let value = parse_overrides(Path::new("overrides.toml"), content).unwrap();
        assert_eq!(
            value,
            json!({
                "base": "/admin/",
                "server": { "port": 4000 },
                "resolve": { "alias": { "@/": "/opt/shared/" } }
            })
        );
    }

    #[test]
    fn test_parse_json() {
        let value = parse_overrides(Path::new("overrides.JSON"), r#"{"server":{"open":false}}"#).unwrap();
        assert_eq!(value, json!({ "server": { "open": false } }));
    }

    #[test]
    fn test_top_level_must_be_table() {
        let err = parse_overrides(Path::new("overrides.json"), "[1, 2]").unwrap_err();
        assert!(matches!(err, ConfigError::NotATable(_)));
    }

    #[test]
    fn test_parse_errors() {
        let err = parse_overrides(Path::new("overrides.toml"), "server = {").unwrap_err();
        assert!(matches!(err, ConfigError::Toml { .. }));

        let err = parse_overrides(Path::new("overrides.json"), "{").unwrap_err();
        assert!(matches!(err, ConfigError::Json { .. }));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_overrides(&dir.path().join("absent.toml")).await.unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
