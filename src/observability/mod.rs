//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! SolrClient::execute produces:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (request counters and latency histograms)
//!
//! Consumers:
//!     → whatever subscriber / recorder the application installs
//! ```
//!
//! # Design Decisions
//! - The library only emits; installing a subscriber or metrics recorder
//!   is left to the application (the CLI installs a fmt subscriber)
//! - Metric updates are no-ops when no recorder is installed

pub mod logging;
pub mod metrics;
