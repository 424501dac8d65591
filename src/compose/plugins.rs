//! Plugin selection.
//!
//! A pure function of run mode and settings. The order below is the
//! transform order downstream and never varies for identical inputs:
//!
//! | # | Plugin | When |
//! |---|---|---|
//! | 1 | `vue` | always |
//! | 2 | `vue-jsx` | always |
//! | 3 | `basic-ssl` | serve, HTTPS on |
//! | 4 | `dev-proxy` | serve, HTTPS off, proxy table not empty |
//! | 5 | `drop-console` | build, DROP_CONSOLE on |
//! | 6 | `compression` | build |

use serde_json::{json, Value};

use crate::config::schema::{PluginSpec, RunMode};
use crate::env::NormalizedSettings;
use crate::routing::ProxyTable;

pub const PLUGIN_VUE: &str = "vue";
pub const PLUGIN_VUE_JSX: &str = "vue-jsx";
pub const PLUGIN_BASIC_SSL: &str = "basic-ssl";
pub const PLUGIN_DEV_PROXY: &str = "dev-proxy";
pub const PLUGIN_DROP_CONSOLE: &str = "drop-console";
pub const PLUGIN_COMPRESSION: &str = "compression";

/// Calls stripped when console dropping is enabled.
pub const DROPPED_CALLS: &[&str] = &["console.log", "debugger"];

/// Select the plugin sequence. `proxy` is the table actually installed on the dev server.
pub fn select_plugins(mode: RunMode, settings: &NormalizedSettings, proxy: &ProxyTable) -> Vec<PluginSpec> {
    let mut plugins = vec![
        PluginSpec::new(PLUGIN_VUE, empty()),
        PluginSpec::new(PLUGIN_VUE_JSX, empty()),
    ];

    match mode {
        RunMode::Serve => {
            if settings.use_https {
                plugins.push(PluginSpec::new(PLUGIN_BASIC_SSL, empty()));
            } else if !proxy.is_empty() {
                let prefixes: Vec<&str> = proxy.prefixes().collect();
                plugins.push(PluginSpec::new(PLUGIN_DEV_PROXY, json!({ "prefixes": prefixes })));
            }
        }
        RunMode::Build => {
            if settings.drop_console {
                plugins.push(PluginSpec::new(PLUGIN_DROP_CONSOLE, json!({ "pure": DROPPED_CALLS })));
            }
            plugins.push(PluginSpec::new(
                PLUGIN_COMPRESSION,
                json!({ "algorithm": "gzip", "threshold": 10240 }),
            ));
        }
    }

    tracing::debug!(
        mode = %mode,
        plugins = ?plugins.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
        "Plugins selected"
    );
    plugins
}

fn empty() -> Value {
    Value::Object(Default::default())
}
