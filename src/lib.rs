//! meta-diag - Operational diagnostics for the metadata governance service
//!
//! Three independent diagnostic tools:
//! - Local metadata store inspection (row counts per table)
//! - Single-endpoint API probe with response assertions
//! - Concurrent multi-endpoint API fan-out with per-endpoint report
//!
//! Each tool is a thin binary over this library. All of them are
//! diagnostics, not gate checks: failures are reported inline and the
//! process always exits 0.

pub mod config;
pub mod fanout;
pub mod inspect;
pub mod probe;

pub use config::{AppConfig, SharedConfig};
pub use fanout::{ApiFanout, ProbeResult, ENDPOINTS};
pub use inspect::{inspect, CountReport, MetadataDb, COUNT_QUERIES};
pub use probe::{ApiProber, ProbeOutcome};

/// Application result type
pub type Result<T> = anyhow::Result<T>;
