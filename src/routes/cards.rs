use actix_web::{web, HttpResponse, Responder};

use crate::models::{ErrorResponse, Preference};
use crate::routes::AppState;
use crate::services::CurrentUser;

/// Configure feed routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/cards", web::get().to(cards));
}

/// Preference-filtered card feed, deduplicated for the current day
///
/// GET /cards
async fn cards(state: web::Data<AppState>, user: CurrentUser) -> impl Responder {
    let preferences = match state.postgres.get_preferences(user.0).await {
        Ok(Some(preferences)) => preferences,
        // Preferences are created lazily; an absent row filters nothing
        Ok(None) => Preference::unset(user.0),
        Err(e) => {
            tracing::error!("Failed to fetch preferences for {}: {}", user.0, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "persistence_error".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    match state.feed.next_cards(user.0, &preferences).await {
        Ok(cards) => {
            tracing::info!("Returning {} cards for viewer {}", cards.len(), user.0);
            HttpResponse::Ok().json(cards)
        }
        Err(e) => {
            tracing::error!("Failed to build feed for {}: {}", user.0, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "persistence_error".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}
