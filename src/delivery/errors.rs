/// Failures while delivering an envelope
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to serialize envelope: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Collector at '{url}' responded with status {status}")]
    Status { url: String, status: u16 },

    #[error("Delivery task failed: {0}")]
    Task(String),
}
