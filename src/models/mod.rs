// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Card, Package, Preference, PreferredGender, Profile, Purchase, Swipe, SwipeDirection, User,
};
pub use requests::{
    LoginRequest, PackageRequest, PreferencesRequest, PurchaseRequest, SignupRequest, SwipeRequest,
    VerifyOtpRequest,
};
pub use responses::{
    ErrorResponse, HealthResponse, OtpResponse, PurchaseResponse, SwipeResponse, TokenResponse,
};
