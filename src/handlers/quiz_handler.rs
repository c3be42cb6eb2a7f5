use actix_web::{get, post, web, HttpResponse};
use chrono::Utc;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::{ApiResponse, GenerateQuizRequest, GenerateQuizResponse},
};

/// Generates a quiz from a chat transcript, publishes it and mails the link.
#[post("/receive")]
pub async fn receive(
    state: web::Data<AppState>,
    request: web::Json<GenerateQuizRequest>,
) -> Result<HttpResponse, AppError> {
    let result = state
        .quiz_service
        .create_and_send_quiz(request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(GenerateQuizResponse::from(result))))
}

#[get("/health")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[get("/")]
pub async fn index() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "POST /receive": "Generate a quiz from a chat transcript",
            "GET /health": "Health check"
        }
    }))
}

async fn not_found(req: actix_web::HttpRequest) -> Result<HttpResponse, AppError> {
    Err(AppError::NotFound(format!(
        "No route for {} {}",
        req.method(),
        req.path()
    )))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::ValidationError(err.to_string()).into()
    }))
    .service(receive)
    .service(health_check)
    .service(index)
    .default_service(web::route().to(not_found));
}
