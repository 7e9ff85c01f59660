// Route exports
pub mod auth;
pub mod cards;
pub mod packages;
pub mod preferences;
pub mod swipes;

use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;

use crate::core::{CardFeed, SwipeGuard};
use crate::models::HealthResponse;
use crate::services::{PostgresClient, TokenManager};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub postgres: Arc<PostgresClient>,
    pub swipe_guard: SwipeGuard<PostgresClient>,
    pub feed: CardFeed<PostgresClient>,
    pub tokens: Arc<TokenManager>,
}

/// Configure all routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .configure(auth::configure)
        .configure(swipes::configure)
        .configure(cards::configure)
        .configure(preferences::configure)
        .configure(packages::configure);
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_check_response() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            timestamp: chrono::Utc::now(),
        };

        assert_eq!(response.status, "healthy");
    }
}
