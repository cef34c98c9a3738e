//! Shared response envelope types for API handlers.
//!
//! Success bodies carry `success: true` plus a human-readable message and
//! an RFC 3339 timestamp. Endpoints with richer payloads define their own
//! response structs next to their handlers, following the same envelope.

use chrono::Utc;
use serde::Serialize;

use ballotbox_core::types::Timestamp;

/// Standard `{success, message, timestamp}` response body.
#[derive(Debug, Serialize)]
pub struct ApiMessage {
    pub success: bool,
    pub message: String,
    pub timestamp: Timestamp,
}

impl ApiMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}
