//! Configuration composition.
//!
//! # Responsibilities
//! - Normalize the raw environment
//! - Build the proxy table (HTTPS off only)
//! - Derive compile-time constants from package metadata
//! - Select plugins
//! - Assemble the base configuration and merge overrides on top
//!
//! # Design Decisions
//! - Composition never fails; every fallible step degrades locally
//! - Each call builds fresh settings, table and configuration
//! - HTTPS and path proxying are mutually exclusive

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde_json::{Map, Value};

use crate::compose::metadata::create_define_data;
use crate::compose::plugins::{select_plugins, DROPPED_CALLS};
use crate::config::merge::deep_merge;
use crate::config::schema::{AppConfig, EsbuildConfig, ResolveConfig, RunMode, ServerConfig};
use crate::env::{normalize, NormalizedSettings, RawEnvironment};
use crate::routing::{parse_proxy_spec, ParsedProxySpec, ProxyTable, SkippedRecord};

/// Import prefix aliased to the application source root.
pub const SOURCE_ALIAS: &str = "~/";
pub const SOURCE_DIR: &str = "src";

/// Inputs of one resolution.
#[derive(Debug, Clone)]
pub struct ComposeRequest {
    /// Project root (working directory).
    pub root: PathBuf,
    pub command: RunMode,
    pub env: RawEnvironment,
    /// Partial configuration merged on top of the base.
    pub overrides: Value,
    /// Timestamp recorded in the app info constant.
    pub build_time: NaiveDateTime,
}

impl ComposeRequest {
    /// Request with no overrides, stamped with the current local time.
    pub fn new(root: impl Into<PathBuf>, command: RunMode, env: RawEnvironment) -> Self {
        Self {
            root: root.into(),
            command,
            env,
            overrides: Value::Object(Map::new()),
            build_time: chrono::Local::now().naive_local(),
        }
    }

    pub fn with_overrides(mut self, overrides: Value) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn with_build_time(mut self, build_time: NaiveDateTime) -> Self {
        self.build_time = build_time;
        self
    }
}

/// The final configuration, owned by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfiguration {
    value: Value,
    skipped_proxy_records: Vec<SkippedRecord>,
}

impl ResolvedConfiguration {
    /// Look up a value by JSON pointer, e.g. `/server/port`.
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        self.value.pointer(pointer)
    }

    pub fn as_value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    /// Proxy records dropped while building the table.
    pub fn skipped_proxy_records(&self) -> &[SkippedRecord] {
        &self.skipped_proxy_records
    }
}

/// Resolve the configuration for one invocation.
pub async fn compose(request: ComposeRequest) -> ResolvedConfiguration {
    let ComposeRequest {
        root,
        command,
        env,
        overrides,
        build_time,
    } = request;

    let settings = normalize(&env);
    let ParsedProxySpec { table, skipped } = proxy_table_for(&settings);
    let define = create_define_data(&root, build_time).await;

    let base = assemble_base(&root, command, &settings, table, define);
    let value = deep_merge(base_value(&base), overrides);

    tracing::info!(
        root = %root.display(),
        command = %command,
        port = settings.port,
        https = settings.use_https,
        proxy_rules = base.server.proxy.len(),
        skipped_proxy_records = skipped.len(),
        plugins = base.plugins.len(),
        "Configuration resolved"
    );

    ResolvedConfiguration {
        value,
        skipped_proxy_records: skipped,
    }
}

/// Proxy table for the dev server. Always empty with HTTPS on.
pub fn proxy_table_for(settings: &NormalizedSettings) -> ParsedProxySpec {
    if settings.use_https {
        if !settings.proxy.trim().is_empty() {
            tracing::debug!("HTTPS enabled, ignoring proxy specification");
        }
        return ParsedProxySpec::default();
    }
    parse_proxy_spec(&settings.proxy)
}

/// Assemble the typed base configuration.
pub fn assemble_base(
    root: &Path,
    command: RunMode,
    settings: &NormalizedSettings,
    proxy: ProxyTable,
    define: BTreeMap<String, String>,
) -> AppConfig {
    let plugins = select_plugins(command, settings, &proxy);

    let pure = if command == RunMode::Build && settings.drop_console {
        DROPPED_CALLS.iter().map(|c| c.to_string()).collect()
    } else {
        Vec::new()
    };

    AppConfig {
        root: root.display().to_string(),
        base: settings.public_path.clone(),
        resolve: ResolveConfig {
            alias: BTreeMap::from([(
                SOURCE_ALIAS.to_string(),
                format!("{}/", root.join(SOURCE_DIR).display()),
            )]),
        },
        server: ServerConfig {
            host: settings.use_https,
            port: settings.port,
            https: settings.use_https,
            proxy,
            ..Default::default()
        },
        esbuild: EsbuildConfig { pure },
        define,
        plugins,
        ..Default::default()
    }
}

fn base_value(base: &AppConfig) -> Value {
    match serde_json::to_value(base) {
        Ok(value) => value,
        Err(e) => {
            // unreachable with string-keyed maps; keep composition infallible
            tracing::error!(error = %e, "Failed to serialize base configuration");
            Value::Object(Map::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn defaults() -> NormalizedSettings {
        NormalizedSettings::default()
    }

    #[test]
    fn test_https_disables_proxy() {
        let settings = NormalizedSettings {
            use_https: true,
            proxy: "/api|http://localhost:9000".to_string(),
            ..defaults()
        };
        assert_eq!(proxy_table_for(&settings), ParsedProxySpec::default());

        let settings = NormalizedSettings {
            use_https: false,
            ..settings
        };
        assert_eq!(proxy_table_for(&settings).table.len(), 1);
    }

    #[test]
    fn test_assemble_base() {
        let base = assemble_base(
            Path::new("/work/app"),
            RunMode::Serve,
            &defaults(),
            ProxyTable::new(),
            BTreeMap::new(),
        );
        let value = base_value(&base);

        assert_eq!(value["root"], json!("/work/app"));
        assert_eq!(value["base"], json!("/"));
        assert_eq!(value["resolve"]["alias"], json!({ "~/": "/work/app/src/" }));
        assert_eq!(
            value["server"],
            json!({ "host": false, "port": 3000, "open": true, "https": false, "proxy": {} })
        );
        assert_eq!(value["define"], json!({}));
    }

    #[test]
    fn test_pure_calls_only_in_build() {
        let settings = NormalizedSettings {
            drop_console: true,
            ..defaults()
        };
        let build = assemble_base(Path::new("/a"), RunMode::Build, &settings, ProxyTable::new(), BTreeMap::new());
        assert_eq!(build.esbuild.pure, vec!["console.log", "debugger"]);

        let serve = assemble_base(Path::new("/a"), RunMode::Serve, &settings, ProxyTable::new(), BTreeMap::new());
        assert!(serve.esbuild.pure.is_empty());
    }
}
