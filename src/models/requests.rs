use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to register a new account
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 5, max = 20))]
    pub phone_number: String,
}

/// Request to start a login (issues a fresh passcode)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 5, max = 20))]
    pub phone_number: String,
}

/// Request to verify a passcode and obtain a bearer token
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyOtpRequest {
    #[validate(length(min = 5, max = 20))]
    pub phone_number: String,
    #[validate(length(equal = 6))]
    pub otp: String,
}

/// Request to record a swipe
///
/// `swiper_id` is accepted for wire compatibility but always overwritten
/// from the resolved identity.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SwipeRequest {
    #[serde(default)]
    pub swiper_id: Option<i64>,
    #[validate(range(min = 1))]
    pub profile_id: i64,
    #[validate(length(min = 1))]
    pub swipe_type: String,
}

/// Request to store dating preferences
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PreferencesRequest {
    #[serde(default)]
    pub date_mode: bool,
    #[serde(default)]
    pub bff_mode: bool,
    #[serde(default)]
    pub preferred_gender: String,
    #[validate(range(min = 0, max = 150))]
    #[serde(default)]
    pub min_age: i32,
    #[validate(range(min = 0, max = 150))]
    #[serde(default)]
    pub max_age: i32,
}

/// Request to create or update a catalog package
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PackageRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub feature: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(length(min = 1, max = 8))]
    pub currency: String,
}

/// Request to purchase a premium package
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PurchaseRequest {
    #[validate(range(min = 1))]
    pub package_id: i64,
}
