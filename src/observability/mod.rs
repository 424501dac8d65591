//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! env, routing, compose, config
//!     → tracing events with structured fields
//!     → logging.rs (fmt layer on stderr, EnvFilter)
//! ```
//!
//! # Design Decisions
//! - Defaults that fire on malformed input log at debug
//! - Skipped proxy records log at warn
//! - One info event per resolution

pub mod logging;
