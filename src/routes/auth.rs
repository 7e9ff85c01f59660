use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{
    ErrorResponse, LoginRequest, OtpResponse, SignupRequest, TokenResponse, VerifyOtpRequest,
};
use crate::routes::AppState;
use crate::services::{generate_passcode, hash_passcode, verify_passcode, PostgresError};

/// Configure signup/login/verification routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/signup", web::post().to(signup))
        .route("/login", web::post().to(login))
        .route("/verify-otp", web::post().to(verify_otp));
}

/// Generate, hash, and store a fresh passcode for a user
async fn issue_passcode(state: &AppState, user_id: i64) -> Result<String, HttpResponse> {
    let passcode = generate_passcode();

    let hash = hash_passcode(&passcode).map_err(|e| {
        tracing::error!("Failed to hash passcode for user {}: {}", user_id, e);
        HttpResponse::InternalServerError().json(ErrorResponse {
            error: "passcode_error".to_string(),
            message: "failed to prepare passcode".to_string(),
            status_code: 500,
        })
    })?;

    state.postgres.save_otp(user_id, &hash).await.map_err(|e| {
        tracing::error!("Failed to store passcode for user {}: {}", user_id, e);
        HttpResponse::InternalServerError().json(ErrorResponse {
            error: "persistence_error".to_string(),
            message: "failed to store passcode".to_string(),
            status_code: 500,
        })
    })?;

    Ok(passcode)
}

/// Register a new account from a phone number
///
/// POST /signup
async fn signup(state: web::Data<AppState>, req: web::Json<SignupRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let user_id = match state.postgres.create_user(&req.phone_number).await {
        Ok(id) => id,
        Err(PostgresError::Conflict(message)) => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "phone_number_taken".to_string(),
                message,
                status_code: 400,
            });
        }
        Err(e) => {
            tracing::error!("Failed to create user: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "persistence_error".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    // Delivery over SMS is handled by an external provider; the passcode
    // travels in the response body, which is what the dev clients expect.
    match issue_passcode(&state, user_id).await {
        Ok(otp) => {
            tracing::info!("Registered user {} and issued passcode", user_id);
            HttpResponse::Created().json(OtpResponse { otp })
        }
        Err(response) => response,
    }
}

/// Start a login by issuing a fresh passcode
///
/// POST /login
async fn login(state: web::Data<AppState>, req: web::Json<LoginRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let user_id = match state.postgres.find_user_id_by_phone(&req.phone_number).await {
        Ok(Some(id)) => id,
        Ok(None) => {
            return HttpResponse::Unauthorized().json(ErrorResponse {
                error: "unknown_phone_number".to_string(),
                message: "invalid phone number".to_string(),
                status_code: 401,
            });
        }
        Err(e) => {
            tracing::error!("Failed to look up phone number: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "persistence_error".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    match issue_passcode(&state, user_id).await {
        Ok(otp) => {
            tracing::info!("Issued login passcode for user {}", user_id);
            HttpResponse::Ok().json(OtpResponse { otp })
        }
        Err(response) => response,
    }
}

/// Verify a passcode; on success the user is marked verified and receives
/// a bearer token
///
/// POST /verify-otp
async fn verify_otp(state: web::Data<AppState>, req: web::Json<VerifyOtpRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let user_id = match state.postgres.find_user_id_by_phone(&req.phone_number).await {
        Ok(Some(id)) => id,
        Ok(None) => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "unknown_phone_number".to_string(),
                message: "invalid phone number".to_string(),
                status_code: 400,
            });
        }
        Err(e) => {
            tracing::error!("Failed to look up phone number: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "persistence_error".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let stored_hash = match state.postgres.otp_hash(user_id).await {
        Ok(Some(hash)) => hash,
        Ok(None) => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "passcode_not_found".to_string(),
                message: "no passcode issued for this user".to_string(),
                status_code: 400,
            });
        }
        Err(e) => {
            tracing::error!("Failed to fetch passcode hash for {}: {}", user_id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "persistence_error".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    if !verify_passcode(&req.otp, &stored_hash) {
        tracing::info!("Rejected passcode for user {}", user_id);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "invalid_passcode".to_string(),
            message: "invalid passcode".to_string(),
            status_code: 400,
        });
    }

    // Passcodes are single-use
    if let Err(e) = state.postgres.clear_otp(user_id).await {
        tracing::warn!("Failed to clear used passcode for {}: {}", user_id, e);
    }

    if let Err(e) = state.postgres.mark_verified(user_id).await {
        tracing::error!("Failed to mark user {} verified: {}", user_id, e);
        return HttpResponse::InternalServerError().json(ErrorResponse {
            error: "persistence_error".to_string(),
            message: e.to_string(),
            status_code: 500,
        });
    }

    match state.tokens.issue(user_id) {
        Ok(token) => {
            tracing::info!("Verified user {} and issued token", user_id);
            HttpResponse::Ok().json(TokenResponse { token, user_id })
        }
        Err(e) => {
            tracing::error!("Failed to issue token for {}: {}", user_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "token_error".to_string(),
                message: "failed to issue token".to_string(),
                status_code: 500,
            })
        }
    }
}
