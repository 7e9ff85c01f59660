use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::core::SwipeError;
use crate::models::{ErrorResponse, SwipeDirection, SwipeRequest, SwipeResponse};
use crate::routes::AppState;
use crate::services::CurrentUser;

/// Configure swipe routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/swipe", web::post().to(swipe));
}

/// Record a like/pass on a profile
///
/// POST /swipe
///
/// Request body:
/// ```json
/// {
///   "profile_id": 456,
///   "swipe_type": "like"
/// }
/// ```
async fn swipe(
    state: web::Data<AppState>,
    user: CurrentUser,
    req: web::Json<SwipeRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let direction = match SwipeDirection::parse(&req.swipe_type) {
        Some(direction) => direction,
        None => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "invalid_swipe_type".to_string(),
                message: "swipe_type must be one of: like, pass".to_string(),
                status_code: 400,
            });
        }
    };

    // The body may carry a swiper_id; the resolved identity always wins
    match state
        .swipe_guard
        .record_swipe(user.0, req.profile_id, direction)
        .await
    {
        Ok(swipe) => HttpResponse::Created().json(SwipeResponse {
            success: true,
            swipe_id: swipe.id,
        }),
        Err(e @ SwipeError::DailyLimitExceeded) => HttpResponse::BadRequest().json(ErrorResponse {
            error: "daily_limit_exceeded".to_string(),
            message: e.to_string(),
            status_code: 400,
        }),
        Err(e @ SwipeError::DuplicateSwipe) => HttpResponse::BadRequest().json(ErrorResponse {
            error: "duplicate_swipe".to_string(),
            message: e.to_string(),
            status_code: 400,
        }),
        Err(SwipeError::Store(e)) => {
            tracing::error!("Failed to record swipe for {}: {}", user.0, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "persistence_error".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}
