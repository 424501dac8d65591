//! Front-end application build/dev-server configuration resolver.
//!
//! Composes environment-derived settings, dev-server proxy rules,
//! conditional plugin sets and caller overrides into the configuration
//! object consumed by the bundler/dev-server runtime.

pub mod compose;
pub mod config;
pub mod env;
pub mod observability;
pub mod routing;

pub use compose::{compose, ComposeRequest, ResolvedConfiguration};
pub use config::RunMode;
pub use env::{NormalizedSettings, RawEnvironment};
pub use routing::{ProxyRule, ProxyTable};
