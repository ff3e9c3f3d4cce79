//! Bounded, time-ordered history of recent actions
//!
//! Consumers push breadcrumbs for noteworthy actions; the report pipeline
//! attaches a snapshot to every outgoing error record.

pub mod history;
pub mod types;

pub use history::Breadcrumb;
pub use types::{BreadcrumbEntry, BreadcrumbKind, SeverityLevel};
