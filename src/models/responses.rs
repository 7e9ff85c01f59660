use serde::{Deserialize, Serialize};

/// One-time passcode handed back to the caller
///
/// Delivery over SMS is an external concern; until it is wired up the
/// passcode travels in the response body, as the clients expect in dev.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpResponse {
    pub otp: String,
}

/// Bearer token issued after passcode verification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    pub user_id: i64,
}

/// Response for a recorded swipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwipeResponse {
    pub success: bool,
    pub swipe_id: i64,
}

/// Response for a recorded purchase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseResponse {
    pub success: bool,
    pub purchase_id: i64,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
