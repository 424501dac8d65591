//! Configuration composition subsystem.
//!
//! # Data Flow
//! ```text
//! ComposeRequest (root, run mode, RawEnvironment, override)
//!     → env::normalize (NormalizedSettings)
//!     → routing (ProxyTable, HTTPS off only)
//!     → metadata.rs (package.json → __APP_INFO__, empty on failure)
//!     → plugins.rs (ordered plugin descriptors)
//!     → composer.rs (typed base → value tree → deep merge)
//!     → ResolvedConfiguration
//! ```
//!
//! # Design Decisions
//! - Pure function of its inputs, apart from the package metadata read
//! - No state kept between invocations
//! - Never fails; see each step for its degradation policy

pub mod composer;
pub mod metadata;
pub mod plugins;

pub use composer::{compose, ComposeRequest, ResolvedConfiguration};
