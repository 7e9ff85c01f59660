use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{ErrorResponse, PackageRequest, PurchaseRequest, PurchaseResponse};
use crate::routes::AppState;
use crate::services::{CurrentUser, PostgresError};

/// Configure package catalog and purchase routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/packages")
            .route("/create", web::post().to(create_package))
            .route("", web::get().to(list_packages))
            .route("/edit/{id}", web::put().to(update_package))
            .route("/delete/{id}", web::patch().to(delete_package)),
    )
    .route("/purchase", web::post().to(purchase));
}

/// Create a new catalog package
///
/// POST /packages/create
async fn create_package(
    state: web::Data<AppState>,
    _user: CurrentUser,
    req: web::Json<PackageRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    match state
        .postgres
        .create_package(&req.name, &req.feature, req.price, &req.currency)
        .await
    {
        Ok(id) => {
            tracing::info!("Created package {} ({})", id, req.name);
            HttpResponse::Created().json(serde_json::json!({ "id": id }))
        }
        Err(e) => {
            tracing::error!("Failed to create package: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "persistence_error".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// List live packages
///
/// GET /packages
async fn list_packages(state: web::Data<AppState>, _user: CurrentUser) -> impl Responder {
    match state.postgres.list_packages().await {
        Ok(packages) => HttpResponse::Ok().json(packages),
        Err(e) => {
            tracing::error!("Failed to list packages: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "persistence_error".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Update a package by id
///
/// PUT /packages/edit/{id}
async fn update_package(
    state: web::Data<AppState>,
    _user: CurrentUser,
    path: web::Path<i64>,
    req: web::Json<PackageRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let id = path.into_inner();

    match state
        .postgres
        .update_package(id, &req.name, &req.feature, req.price, &req.currency)
        .await
    {
        Ok(true) => HttpResponse::Ok().finish(),
        Ok(false) => HttpResponse::NotFound().json(ErrorResponse {
            error: "not_found".to_string(),
            message: "Package not found".to_string(),
            status_code: 404,
        }),
        Err(e) => {
            tracing::error!("Failed to update package {}: {}", id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "persistence_error".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Soft-delete a package by id
///
/// PATCH /packages/delete/{id}
async fn delete_package(
    state: web::Data<AppState>,
    _user: CurrentUser,
    path: web::Path<i64>,
) -> impl Responder {
    let id = path.into_inner();

    match state.postgres.delete_package(id).await {
        Ok(true) => HttpResponse::NoContent().finish(),
        Ok(false) => HttpResponse::NotFound().json(ErrorResponse {
            error: "not_found".to_string(),
            message: "Package not found".to_string(),
            status_code: 404,
        }),
        Err(e) => {
            tracing::error!("Failed to delete package {}: {}", id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "persistence_error".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Purchase a premium package; the ledger insert also flags the buyer
/// premium
///
/// POST /purchase
async fn purchase(
    state: web::Data<AppState>,
    user: CurrentUser,
    req: web::Json<PurchaseRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    match state.postgres.record_purchase(user.0, req.package_id).await {
        Ok(purchase_id) => HttpResponse::Created().json(PurchaseResponse {
            success: true,
            purchase_id,
        }),
        Err(PostgresError::NotFound(message)) => HttpResponse::BadRequest().json(ErrorResponse {
            error: "unknown_package".to_string(),
            message,
            status_code: 400,
        }),
        Err(e) => {
            tracing::error!("Failed to record purchase for {}: {}", user.0, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "persistence_error".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}
