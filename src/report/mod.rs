//! Send pipeline: deduplication, filtering, formatting and batching
//!
//! [`Reporter::send`] runs every record through duplicate suppression, the
//! ignore list, the resource-size floor, formatting and the
//! `before_data_report` hook, then either delivers it at once or buffers it
//! behind a trailing-debounce timer.

pub mod buffer;
pub mod dedup;
pub mod errors;
pub mod metrics;
pub mod reporter;

pub use buffer::ReportBuffer;
pub use dedup::SubmittedUids;
pub use errors::ReportError;
pub use metrics::{ReportMetrics, ReportMetricsSnapshot};
pub use reporter::{Reporter, SendOutcome};
