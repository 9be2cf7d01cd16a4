use actix_web::{web, HttpResponse, Result as ActixResult};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::core::BargainHunter;
use crate::search::SearchParams;

/// API request for a single chat turn
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// API request for a product question
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct ClassifyQuery {
    #[serde(default)]
    pub message: String,
}

/// Configure API routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/deals/search", web::get().to(search_deals))
            .route("/chat", web::post().to(chat))
            .route("/ask", web::post().to(ask))
            .route("/classify", web::get().to(classify))
            .route("/categories", web::get().to(categories))
            .route("/health", web::get().to(health_check)),
    );
}

/// Search the catalog
async fn search_deals(
    app: web::Data<Arc<BargainHunter>>,
    params: web::Query<SearchParams>,
) -> ActixResult<HttpResponse> {
    info!("API: Searching deals for '{}'", params.query);

    let response = app.search_deals(&params).await;
    Ok(HttpResponse::Ok().json(response))
}

/// Route one message to a deal search or a product answer
async fn chat(
    app: web::Data<Arc<BargainHunter>>,
    req: web::Json<ChatRequest>,
) -> ActixResult<HttpResponse> {
    let session = app.new_session();

    match session.accept_input(&req.message) {
        Ok(Some(message)) => {
            info!("API: Chat message '{}'", message);
            let reply = app.reply_to(message).await;
            Ok(HttpResponse::Ok().json(reply))
        }
        Ok(None) => Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "message": "Message must not be empty"
        }))),
        Err(e) => {
            warn!("API: Rejected chat message: {}", e);
            Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "message": e.to_string()
            })))
        }
    }
}

/// Answer a product question
async fn ask(
    app: web::Data<Arc<BargainHunter>>,
    req: web::Json<AskRequest>,
) -> ActixResult<HttpResponse> {
    let query = req.query.trim();
    if query.is_empty() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "message": "Query must not be empty"
        })));
    }

    info!("API: Answering question '{}'", query);
    let answer = app.answer_question(query).await;
    Ok(HttpResponse::Ok().json(answer))
}

async fn classify(
    app: web::Data<Arc<BargainHunter>>,
    query: web::Query<ClassifyQuery>,
) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(app.classify_with_decision(&query.message)))
}

async fn categories(app: web::Data<Arc<BargainHunter>>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(app.categories()))
}

/// Health check endpoint
async fn health_check() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": crate::utils::current_timestamp()
    })))
}
