use crate::delivery::TransportError;

/// Failures of the send pipeline itself
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// No collector URL is configured; the record was dropped
    #[error("Report url is not configured")]
    MissingUrl,

    #[error(transparent)]
    Transport(#[from] TransportError),
}
