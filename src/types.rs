use serde::{Deserialize, Serialize};

/// Body of `users.messages.send`.
#[derive(Debug, Serialize)]
pub struct RawMessage {
    pub raw: String,
}

/// Message resource returned after a successful send.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct SentMessage {
    pub id: Option<String>,
    #[serde(rename = "threadId")]
    pub thread_id: Option<String>,
    #[serde(rename = "labelIds")]
    pub label_ids: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiError,
}

#[derive(Debug, Deserialize)]
pub struct ApiError {
    pub code: Option<u16>,
    pub message: Option<String>,
    pub status: Option<String>,
}
