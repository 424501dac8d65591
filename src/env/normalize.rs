//! Raw environment → typed settings.
//!
//! | Name | Type | Default |
//! |---|---|---|
//! | `PORT` | integer | `3000` |
//! | `PROXY` | encoded string | `""` |
//! | `USE_HTTPS` | `"true"` / `"false"` | `false` |
//! | `PUBLIC_PATH` | string | `"/"` |
//! | `DROP_CONSOLE` | `"true"` / `"false"` | `false` |
//!
//! Normalization never fails. Absent or malformed values fall back to the
//! default for that field.

use serde::Serialize;

use crate::env::raw::RawEnvironment;

pub const ENV_PORT: &str = "PORT";
pub const ENV_PROXY: &str = "PROXY";
pub const ENV_USE_HTTPS: &str = "USE_HTTPS";
pub const ENV_PUBLIC_PATH: &str = "PUBLIC_PATH";
pub const ENV_DROP_CONSOLE: &str = "DROP_CONSOLE";

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_PUBLIC_PATH: &str = "/";

/// Typed settings derived from the raw environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedSettings {
    /// Dev-server listening port.
    pub port: u16,

    /// Serve over HTTPS. Disables path proxying.
    pub use_https: bool,

    /// Base path for built assets.
    pub public_path: String,

    /// Strip console calls in build mode.
    pub drop_console: bool,

    /// Encoded proxy specification, see [`crate::routing::grammar`].
    pub proxy: String,
}

impl Default for NormalizedSettings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            use_https: false,
            public_path: DEFAULT_PUBLIC_PATH.to_string(),
            drop_console: false,
            proxy: String::new(),
        }
    }
}

/// Normalize a raw environment.
pub fn normalize(env: &RawEnvironment) -> NormalizedSettings {
    NormalizedSettings {
        port: parse_port(env.get(ENV_PORT)),
        use_https: parse_flag(ENV_USE_HTTPS, env.get(ENV_USE_HTTPS)),
        public_path: env
            .get(ENV_PUBLIC_PATH)
            .unwrap_or(DEFAULT_PUBLIC_PATH)
            .to_string(),
        drop_console: parse_flag(ENV_DROP_CONSOLE, env.get(ENV_DROP_CONSOLE)),
        proxy: env.get(ENV_PROXY).unwrap_or_default().to_string(),
    }
}

fn parse_port(raw: Option<&str>) -> u16 {
    let Some(raw) = raw else {
        return DEFAULT_PORT;
    };
    match raw.trim().parse::<u16>() {
        Ok(port) => port,
        Err(e) => {
            tracing::debug!(
                variable = ENV_PORT,
                value = raw,
                error = %e,
                default = DEFAULT_PORT,
                "Malformed port, using default"
            );
            DEFAULT_PORT
        }
    }
}

// Case-sensitive: only the literal "true" enables a flag.
fn parse_flag(name: &str, raw: Option<&str>) -> bool {
    match raw {
        Some("true") => true,
        None | Some("false") => false,
        Some(other) => {
            tracing::debug!(variable = name, value = other, "Unrecognized boolean literal, using false");
            false
        }
    }
}
