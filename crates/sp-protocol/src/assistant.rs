use serde::{Deserialize, Serialize};

/// Free-text query submitted to the assistant endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantQuery {
    #[serde(default)]
    pub query: String,
}

/// Assistant reply. Every dispatch outcome (answer, denial, not-understood)
/// is the same shape: plain text, no structured error codes at this layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantReply {
    pub message: String,
}

impl AssistantReply {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
