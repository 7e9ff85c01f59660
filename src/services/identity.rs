use actix_web::error::ResponseError;
use actix_web::http::header;
use actix_web::{dev::Payload, web, FromRequest, HttpRequest, HttpResponse};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};
use thiserror::Error;
use uuid::Uuid;

use crate::models::ErrorResponse;

/// Errors that can occur when issuing or verifying bearer tokens
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token encoding failed: {0}")]
    Encode(#[from] jsonwebtoken::errors::Error),

    #[error("invalid or expired token")]
    Invalid,
}

/// Bearer token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub exp: usize,
    pub jti: Uuid,
}

/// Issues and verifies the bearer tokens that stand in for a session
///
/// Handlers never see the token machinery; they receive a resolved user id
/// through the `CurrentUser` extractor.
pub struct TokenManager {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: u64,
}

impl TokenManager {
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }

    /// Issue a token for a verified user
    pub fn issue(&self, user_id: i64) -> Result<String, TokenError> {
        let exp = (Utc::now() + chrono::Duration::seconds(self.ttl_secs as i64)).timestamp();
        let claims = Claims {
            sub: user_id,
            exp: exp as usize,
            jti: Uuid::new_v4(),
        };

        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Resolve a token back to its user id
    pub fn verify(&self, token: &str) -> Result<i64, TokenError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims.sub)
            .map_err(|_| TokenError::Invalid)
    }
}

/// 401 response for requests without a resolvable identity
#[derive(Debug, Error)]
#[error("Unauthorized")]
pub struct Unauthorized;

impl ResponseError for Unauthorized {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::Unauthorized().json(ErrorResponse {
            error: "unauthorized".to_string(),
            message: "missing or invalid bearer token".to_string(),
            status_code: 401,
        })
    }
}

/// The user id resolved from the request's bearer token
///
/// Using this extractor is what makes a route authenticated.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub i64);

impl FromRequest for CurrentUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::to_owned);

        let resolved = match (token, req.app_data::<web::Data<TokenManager>>()) {
            (Some(token), Some(tokens)) => tokens
                .verify(&token)
                .map(CurrentUser)
                .map_err(|_| Unauthorized.into()),
            _ => Err(Unauthorized.into()),
        };

        ready(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let tokens = TokenManager::new("test-secret", 3600);

        let token = tokens.issue(42).unwrap();
        assert_eq!(tokens.verify(&token).unwrap(), 42);
    }

    #[test]
    fn test_garbage_token_rejected() {
        let tokens = TokenManager::new("test-secret", 3600);

        assert!(matches!(
            tokens.verify("not-a-token"),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = TokenManager::new("secret-a", 3600);
        let verifier = TokenManager::new("secret-b", 3600);

        let token = issuer.issue(42).unwrap();
        assert!(verifier.verify(&token).is_err());
    }
}
