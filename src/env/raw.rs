//! Raw environment variables and `.env` file loading.
//!
//! # Responsibilities
//! - Hold the untyped name → value mapping for one resolution
//! - Load `.env`-style files for a mode, layered with the process environment
//! - Keep only prefixed variables and strip the prefix
//!
//! # Design Decisions
//! - Missing env files are not an error; unreadable or unparsable ones are
//! - Later layers win: `.env` < `.env.local` < `.env.<mode>` < `.env.<mode>.local` < process

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Prefix that marks variables meant for the application configuration.
pub const DEFAULT_ENV_PREFIX: &str = "VITE_";

/// Errors raised while loading env files from disk.
#[derive(Debug, Error)]
pub enum EnvError {
    /// The file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file contents are not valid dotenv syntax.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
}

/// Untyped environment variables, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEnvironment {
    vars: BTreeMap<String, String>,
}

impl RawEnvironment {
    /// Create an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a variable.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Set a variable, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.vars.insert(name.into(), value.into())
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawEnvironment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl From<BTreeMap<String, String>> for RawEnvironment {
    fn from(vars: BTreeMap<String, String>) -> Self {
        Self { vars }
    }
}

/// Env file names for a mode, lowest precedence first.
pub fn env_files_for_mode(mode: &str) -> Vec<String> {
    vec![
        ".env".to_string(),
        ".env.local".to_string(),
        format!(".env.{}", mode),
        format!(".env.{}.local", mode),
    ]
}

/// Load the environment for `mode` from `root`, layered with the process environment.
pub async fn load_env(root: &Path, mode: &str, prefix: &str) -> Result<RawEnvironment, EnvError> {
    load_env_with(root, mode, prefix, std::env::vars()).await
}

/// Same as [`load_env`], with the process layer supplied by the caller.
pub async fn load_env_with<I>(
    root: &Path,
    mode: &str,
    prefix: &str,
    process_vars: I,
) -> Result<RawEnvironment, EnvError>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut env = RawEnvironment::new();

    for file_name in env_files_for_mode(mode) {
        let path = root.join(&file_name);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(source) => return Err(EnvError::Io { path, source }),
        };

        let mut loaded = 0usize;
        for item in dotenvy::from_read_iter(content.as_bytes()) {
            let (key, value) = item.map_err(|source| EnvError::Parse {
                path: path.clone(),
                source,
            })?;
            if let Some(name) = strip_prefix(&key, prefix) {
                env.insert(name, value);
                loaded += 1;
            }
        }
        tracing::debug!(file = %path.display(), variables = loaded, "Env file loaded");
    }

    for (key, value) in process_vars {
        if let Some(name) = strip_prefix(&key, prefix) {
            env.insert(name, value);
        }
    }

    Ok(env)
}

fn strip_prefix<'a>(key: &'a str, prefix: &str) -> Option<&'a str> {
    key.strip_prefix(prefix).filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_strip_prefix() {
        assert_eq!(strip_prefix("VITE_PORT", "VITE_"), Some("PORT"));
        assert_eq!(strip_prefix("PORT", "VITE_"), None);
        assert_eq!(strip_prefix("VITE_", "VITE_"), None);
        assert_eq!(strip_prefix("PORT", ""), Some("PORT"));
    }

    #[tokio::test]
    async fn test_layer_precedence() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".env"), "VITE_PORT=1000\nVITE_PUBLIC_PATH=/app/\n").unwrap();
        fs::write(dir.path().join(".env.local"), "VITE_PORT=2000\n").unwrap();
        fs::write(dir.path().join(".env.development"), "VITE_PORT=3000\nVITE_USE_HTTPS=true\n").unwrap();
        fs::write(dir.path().join(".env.production"), "VITE_PORT=9999\n").unwrap();
        fs::write(dir.path().join(".env.development.local"), "VITE_PORT=4000\n").unwrap();

        let env = load_env_with(dir.path(), "development", "VITE_", Vec::new()).await.unwrap();
        assert_eq!(env.get("PORT"), Some("4000"));
        assert_eq!(env.get("PUBLIC_PATH"), Some("/app/"));
        assert_eq!(env.get("USE_HTTPS"), Some("true"));

        let process = vec![("VITE_PORT".to_string(), "5000".to_string())];
        let env = load_env_with(dir.path(), "development", "VITE_", process).await.unwrap();
        assert_eq!(env.get("PORT"), Some("5000"));
    }

    #[tokio::test]
    async fn test_unprefixed_keys_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".env"), "SECRET=hunter2\nVITE_PROXY=/api|http://localhost:9000\n").unwrap();

        let process = vec![("HOME".to_string(), "/root".to_string())];
        let env = load_env_with(dir.path(), "production", "VITE_", process).await.unwrap();
        assert_eq!(env.len(), 1);
        assert_eq!(env.get("PROXY"), Some("/api|http://localhost:9000"));
        assert_eq!(env.get("SECRET"), None);
    }

    #[tokio::test]
    async fn test_missing_files_yield_empty_env() {
        let dir = tempfile::tempdir().unwrap();
        let env = load_env_with(dir.path(), "production", "VITE_", Vec::new()).await.unwrap();
        assert!(env.is_empty());
    }
}
