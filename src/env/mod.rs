//! Environment subsystem.
//!
//! # Data Flow
//! ```text
//! .env, .env.local, .env.<mode>, .env.<mode>.local, process env
//!     → raw.rs (layer, filter by prefix, strip prefix)
//!     → RawEnvironment (untyped, immutable for one resolution)
//!     → normalize.rs (one default policy per variable)
//!     → NormalizedSettings
//! ```
//!
//! # Design Decisions
//! - Loading may fail (disk I/O); normalization never does
//! - Normalization is a pure function, independent of the process environment

pub mod normalize;
pub mod raw;

pub use normalize::{normalize, NormalizedSettings};
pub use raw::{load_env, EnvError, RawEnvironment, DEFAULT_ENV_PREFIX};
