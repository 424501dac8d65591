//! Dev-server proxy routing.
//!
//! # Data Flow
//! ```text
//! PROXY variable (encoded string)
//!     → grammar.rs (split records, parse fields, validate)
//!     → table.rs (ProxyTable: prefix → ProxyRule)
//!     → server.proxy in the resolved configuration
//! ```
//!
//! # Design Decisions
//! - Table built fresh per resolution, immutable afterwards
//! - Malformed records are skipped and reported, never fatal
//! - Duplicate prefixes: last record wins
//! - No regex, prefix matching only

pub mod grammar;
pub mod table;

pub use grammar::{parse_proxy_spec, ParsedProxySpec, RecordError, SkippedRecord};
pub use table::{ProxyRule, ProxyTable};
