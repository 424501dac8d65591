//! Configuration schema definitions.
//!
//! This module defines the typed base configuration handed to the
//! bundler/dev-server runtime. Field names serialize in camelCase, the
//! shape the runtime consumes. Overrides are merged on the serialized form,
//! see [`crate::config::merge`].

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::routing::ProxyTable;

/// Whether configuration is resolved for a dev session or a production build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Live development server.
    Serve,
    /// Production artifact build.
    Build,
}

impl RunMode {
    /// Env-file mode used when the caller does not name one.
    pub fn default_env_mode(self) -> &'static str {
        match self {
            RunMode::Serve => "development",
            RunMode::Build => "production",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RunMode::Serve => "serve",
            RunMode::Build => "build",
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "serve" => Ok(RunMode::Serve),
            "build" => Ok(RunMode::Build),
            other => Err(format!("unknown run mode {:?}, expected \"serve\" or \"build\"", other)),
        }
    }
}

/// Root of the base configuration.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Project root directory.
    pub root: String,

    /// Public base path for built assets.
    pub base: String,

    /// Module resolution settings.
    pub resolve: ResolveConfig,

    /// Dev-server settings.
    pub server: ServerConfig,

    /// Minifier settings.
    pub esbuild: EsbuildConfig,

    /// Compile-time constants, name → JSON-encoded literal.
    pub define: BTreeMap<String, String>,

    /// Production build settings.
    pub build: BuildConfig,

    pub css: CssConfig,

    /// Ordered plugin descriptors. Order is transform order downstream.
    pub plugins: Vec<PluginSpec>,
}

/// Module resolution settings.
#[derive(Debug, Clone, Serialize, Default)]
pub struct ResolveConfig {
    /// Import prefix → absolute path.
    pub alias: BTreeMap<String, String>,
}

/// Dev-server settings.
#[derive(Debug, Clone, Serialize)]
pub struct ServerConfig {
    /// Listen on all local addresses.
    pub host: bool,

    pub port: u16,

    /// Open the browser on start.
    pub open: bool,

    /// Serve over TLS.
    pub https: bool,

    /// Path prefix → upstream. Empty when TLS is on.
    pub proxy: ProxyTable,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: false,
            port: crate::env::normalize::DEFAULT_PORT,
            open: true,
            https: false,
            proxy: ProxyTable::new(),
        }
    }
}

/// Minifier settings.
#[derive(Debug, Clone, Serialize, Default)]
pub struct EsbuildConfig {
    /// Calls treated as side-effect free and dropped by the minifier.
    pub pure: Vec<String>,
}

/// Production build settings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfig {
    /// Minimum language target.
    pub target: String,

    /// Minimum browser target for CSS.
    pub css_target: String,

    pub rollup_options: RollupOptions,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            target: "es2015".to_string(),
            css_target: "chrome80".to_string(),
            rollup_options: RollupOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct RollupOptions {
    pub output: RollupOutput,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RollupOutput {
    /// Chunk name → modules grouped into it.
    pub manual_chunks: BTreeMap<String, Vec<String>>,
}

impl Default for RollupOutput {
    fn default() -> Self {
        // framework runtime isolated from application code
        let framework = ["vue", "pinia", "vue-router"]
            .iter()
            .map(|m| m.to_string())
            .collect();
        Self {
            manual_chunks: BTreeMap::from([("vue".to_string(), framework)]),
        }
    }
}

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CssConfig {
    pub preprocessor_options: BTreeMap<String, Value>,
}

/// A plugin the runtime should instantiate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginSpec {
    pub name: String,

    #[serde(default)]
    pub options: Value,
}

impl PluginSpec {
    pub fn new(name: impl Into<String>, options: Value) -> Self {
        Self {
            name: name.into(),
            options,
        }
    }
}
