//! Faults raised by plugin code running under the bus

/// Failure inside a plugin's monitor, transform or consumer
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    /// A subscriber returned an error
    #[error("subscriber '{subscriber}' failed on '{event}': {message}")]
    SubscriberFailed {
        event: String,
        subscriber: String,
        message: String,
    },

    /// A subscriber panicked; the panic was contained at the bus
    #[error("subscriber '{subscriber}' panicked on '{event}': {message}")]
    SubscriberPanicked {
        event: String,
        subscriber: String,
        message: String,
    },

    /// Installing a plugin's instrumentation failed
    #[error("monitor for plugin '{plugin}' failed: {message}")]
    MonitorFailed { plugin: String, message: String },

    /// Raw data did not have the shape the transform expects
    #[error("invalid payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl PluginError {
    pub fn other(message: impl Into<String>) -> Self {
        PluginError::Other(message.into())
    }
}

/// Render a caught panic payload as text
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
