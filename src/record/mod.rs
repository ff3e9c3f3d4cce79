//! Normalized telemetry records and the wire envelope
//!
//! Plugins turn raw captured data into [`EventRecord`]s; the report pipeline
//! wraps one or more records into an [`Envelope`] for transmission.

pub mod envelope;
pub mod hash;
pub mod stack;
pub mod types;

pub use envelope::{Envelope, NetworkInfo, ReportData};
pub use hash::{error_uid, hash_code};
pub use stack::{StackFrame, StackTrace, parse_stack_frames, parse_stack_line};
pub use types::{BehaviorData, ErrorData, EventKind, EventRecord, MainData, PerformanceData};
