use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use log::{error, info};
use serde_json::json;

use crate::generator::{MessageContext, Tone};
use crate::web::models::{GenerateRequest, GenerateResponse};
use crate::AppState;

// Health check endpoint
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
        "service": "ConversationAssistant API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// Message suggestion endpoint
pub async fn generate_message(
    data: web::Data<AppState>,
    req: web::Json<GenerateRequest>,
) -> impl Responder {
    let req = req.into_inner();

    let tone = Tone::from_dial(req.tone_dial_value);
    let context = MessageContext::from_request(&req);

    info!(
        "Generate message request (tone: {:?}, first contact: {})",
        tone,
        context.is_first_contact()
    );

    match data.generator.generate(&context, tone).await {
        Ok(suggestions) => {
            info!("Generated {} suggestions", suggestions.len());
            HttpResponse::Ok().json(GenerateResponse {
                suggestions,
                model: data.generator.model_tag().to_string(),
            })
        }
        Err(e) => {
            error!("Error generating message: {:#}", e);
            HttpResponse::InternalServerError().json(json!({
                "error": {
                    "message": "メッセージ生成に失敗しました",
                    "details": e.to_string(),
                }
            }))
        }
    }
}
