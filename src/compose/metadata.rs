//! Package metadata → compile-time constants.
//!
//! Produces a single `__APP_INFO__` constant holding the package name,
//! version, dependency lists and the build timestamp, JSON-encoded.
//! Any failure collapses the constant set to empty.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const PACKAGE_FILE: &str = "package.json";
pub const APP_INFO_KEY: &str = "__APP_INFO__";
pub const BUILD_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("failed to read package metadata: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid package metadata: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The subset of `package.json` exposed to the application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_dependencies: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AppInfo<'a> {
    pkg: &'a PackageMetadata,
    last_build_time: String,
}

/// Read `package.json` from `root`.
pub async fn read_package_metadata(root: &Path) -> Result<PackageMetadata, MetadataError> {
    let content = tokio::fs::read_to_string(root.join(PACKAGE_FILE)).await?;
    Ok(serde_json::from_str(&content)?)
}

/// Build the constant set. Never fails: errors yield an empty set.
pub async fn create_define_data(root: &Path, build_time: NaiveDateTime) -> BTreeMap<String, String> {
    match read_package_metadata(root).await {
        Ok(pkg) => match app_info_define(&pkg, build_time) {
            Ok(define) => define,
            Err(e) => {
                tracing::debug!(error = %e, "Failed to encode app info, no constants defined");
                BTreeMap::new()
            }
        },
        Err(e) => {
            tracing::debug!(root = %root.display(), error = %e, "Package metadata unavailable, no constants defined");
            BTreeMap::new()
        }
    }
}

/// Encode package metadata and build time as the `__APP_INFO__` constant.
pub fn app_info_define(
    pkg: &PackageMetadata,
    build_time: NaiveDateTime,
) -> Result<BTreeMap<String, String>, MetadataError> {
    let info = AppInfo {
        pkg,
        last_build_time: build_time.format(BUILD_TIME_FORMAT).to_string(),
    };
    let encoded = serde_json::to_string(&info)?;
    Ok(BTreeMap::from([(APP_INFO_KEY.to_string(), encoded)]))
}
