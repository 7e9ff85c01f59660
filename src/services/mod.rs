// Service exports
pub mod identity;
pub mod otp;
pub mod postgres;
pub mod shown_cards;

pub use identity::{Claims, CurrentUser, TokenError, TokenManager, Unauthorized};
pub use otp::{generate_passcode, hash_passcode, verify_passcode, OtpError};
pub use postgres::{PostgresClient, PostgresError};
pub use shown_cards::ShownCardCache;
