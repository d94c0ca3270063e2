mod generator;
mod web;

use actix_cors::Cors;
use actix_web::{http, App, HttpServer, web::Data};
use dotenv::dotenv;
use log::{error, info};
use std::env;
use std::sync::Arc;

use generator::{Generate, LlmGenerator, TemplateGenerator};
use web::routes;

// App state structure
pub struct AppState {
    pub generator: Arc<dyn Generate>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize environment
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting conversation assistant server");

    // Pick the generation mode: "llm" calls the chat-completions API,
    // anything else serves from the local template pools.
    let mode = env::var("GENERATOR_MODE").unwrap_or_else(|_| "template".to_string());
    let generator: Arc<dyn Generate> = match mode.as_str() {
        "llm" => match LlmGenerator::new() {
            Ok(llm) => {
                info!("Using LLM-backed generator ({})", llm.model_tag());
                Arc::new(llm)
            }
            Err(e) => {
                error!("Failed to initialize LLM generator: {}", e);
                std::process::exit(1);
            }
        },
        _ => {
            info!("Using template-backed generator");
            Arc::new(TemplateGenerator::new())
        }
    };

    let app_state = Data::new(AppState { generator });

    let port = env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    info!("Listening on 0.0.0.0:{}", port);
    info!("Health check: http://localhost:{}/health", port);
    info!(
        "Generate endpoint: http://localhost:{}/api/generate-message",
        port
    );

    // Start web server
    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST"])
            .allowed_headers(vec![http::header::CONTENT_TYPE, http::header::AUTHORIZATION]);

        App::new()
            .app_data(app_state.clone())
            .wrap(cors)
            .configure(routes::configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
