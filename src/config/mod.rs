//! Configuration schema, merging and override loading.
//!
//! # Data Flow
//! ```text
//! NormalizedSettings + ProxyTable + define + plugins
//!     → schema.rs (typed AppConfig base)
//!     → serde_json::Value
//!     → merge.rs (deep merge, override on top)   ← loader.rs (override file, TOML/JSON)
//!     → ResolvedConfiguration (owned by the caller)
//!
//! On input change (watch mode):
//!     watcher.rs detects change
//!     → full re-resolution
//! ```
//!
//! # Design Decisions
//! - The base is typed; the merged result is an untyped value tree, since
//!   overrides may introduce keys the schema does not know
//! - All schema fields have defaults
//! - Merge is a pure function with documented precedence

pub mod loader;
pub mod merge;
pub mod schema;
pub mod watcher;

pub use loader::{load_overrides, ConfigError};
pub use merge::deep_merge;
pub use schema::{AppConfig, BuildConfig, PluginSpec, ResolveConfig, RunMode, ServerConfig};
