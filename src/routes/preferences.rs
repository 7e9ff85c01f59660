use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{ErrorResponse, Preference, PreferencesRequest};
use crate::routes::AppState;
use crate::services::CurrentUser;

/// Configure preference routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/preferences",
        web::get().to(get_preferences),
    )
    .route("/preferences", web::put().to(put_preferences));
}

/// Stored preferences for the current user, or the unset defaults
///
/// GET /preferences
async fn get_preferences(state: web::Data<AppState>, user: CurrentUser) -> impl Responder {
    match state.postgres.get_preferences(user.0).await {
        Ok(Some(preferences)) => HttpResponse::Ok().json(preferences),
        Ok(None) => HttpResponse::Ok().json(Preference::unset(user.0)),
        Err(e) => {
            tracing::error!("Failed to fetch preferences for {}: {}", user.0, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "persistence_error".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Create or replace the current user's preferences
///
/// PUT /preferences
async fn put_preferences(
    state: web::Data<AppState>,
    user: CurrentUser,
    req: web::Json<PreferencesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    // 0 means unbounded, so the ordering check only applies when both are set
    if req.min_age > 0 && req.max_age > 0 && req.min_age > req.max_age {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: "min_age must not exceed max_age".to_string(),
            status_code: 400,
        });
    }

    let update = req.into_inner();

    match state.postgres.upsert_preferences(user.0, &update).await {
        Ok(preferences) => {
            tracing::info!("Stored preferences for user {}", user.0);
            HttpResponse::Ok().json(preferences)
        }
        Err(e) => {
            tracing::error!("Failed to store preferences for {}: {}", user.0, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "persistence_error".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}
