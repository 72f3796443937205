//! HTTP server exposing the trivia generation endpoint.

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, HttpServer, ResponseError, middleware, web};
use serde::Serialize;
use tracing::Instrument;
use uuid::Uuid;

use crate::TriviaError;
use crate::protocol::{ErrorResponse, GENERATE_TRIVIA_PATH, GenerateTriviaRequest, parse_keywords};

use super::config::{ModelIds, ServerConfig};
use super::generate::{GenerateError, generate_round};
use super::llm::{GeminiClient, TriviaModel};
use super::prompt::build_prompt;

const JSON_LIMIT_BYTES: usize = 16 * 1024;

/// State shared by every worker.
#[derive(Clone)]
pub struct AppState {
    model: Arc<dyn TriviaModel>,
    models: ModelIds,
}

impl AppState {
    pub fn new(model: Arc<dyn TriviaModel>, models: ModelIds) -> Self {
        Self { model, models }
    }
}

#[derive(Debug, thiserror::Error)]
enum ApiError {
    #[error("Keywords are required.")]
    MissingKeywords,
    #[error(transparent)]
    Generate(#[from] GenerateError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingKeywords => StatusCode::BAD_REQUEST,
            ApiError::Generate(GenerateError::Model(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Generate(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        json_error(self.status_code(), self.to_string())
    }
}

fn json_error(status: StatusCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: message.into(),
    })
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT_BYTES)
        .error_handler(|err, _req| {
            let response = json_error(StatusCode::BAD_REQUEST, format!("Invalid request body: {err}"));
            actix_web::error::InternalError::from_response(err, response).into()
        })
}

#[derive(Serialize)]
struct HealthResponse<'a> {
    status: &'static str,
    service: &'static str,
    primary_model: &'a str,
    fallback_model: &'a str,
}

async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy",
        service: "pet-trivia",
        primary_model: &state.models.primary,
        fallback_model: &state.models.fallback,
    })
}

async fn generate_trivia(
    state: web::Data<AppState>,
    req: web::Json<GenerateTriviaRequest>,
) -> Result<HttpResponse, ApiError> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("generate_trivia", %request_id);

    async move {
        let keywords = parse_keywords(req.keywords.as_deref().unwrap_or_default());
        if keywords.is_empty() {
            tracing::debug!("rejected request without keywords");
            return Err(ApiError::MissingKeywords);
        }

        tracing::info!(
            keywords = %keywords.join(", "),
            last_round_score = ?req.last_round_score,
            "generating round"
        );

        let prompt = build_prompt(&keywords, req.last_round_score);
        let questions = generate_round(state.model.as_ref(), &state.models, &prompt)
            .await
            .inspect_err(|err| tracing::error!(error = %err, "trivia generation failed"))?;

        Ok::<_, ApiError>(HttpResponse::Ok().json(questions))
    }
    .instrument(span)
    .await
}

/// Register routes; shared by the server and the handler tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/health", web::get().to(health))
        .route(GENERATE_TRIVIA_PATH, web::post().to(generate_trivia));
}

/// Run the trivia backend until it is shut down.
pub async fn run(config: ServerConfig) -> Result<(), TriviaError> {
    let model = GeminiClient::new(&config)?;
    let state = AppState::new(Arc::new(model), config.models.clone());

    tracing::info!(
        port = config.port,
        primary_model = %config.models.primary,
        fallback_model = %config.models.fallback,
        "starting trivia backend"
    );

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(("0.0.0.0", config.port))?
    .run()
    .await?;

    tracing::info!("trivia backend stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test as awtest};
    use serde_json::{Value, json};

    use super::super::generate::tests::{ScriptedModel, round_json, upstream};
    use super::*;

    fn state_with(model: Arc<ScriptedModel>) -> AppState {
        AppState::new(model, ModelIds::default())
    }

    async fn post(model: Arc<ScriptedModel>, body: Value) -> (StatusCode, Value) {
        let app = awtest::init_service(
            App::new()
                .app_data(web::Data::new(state_with(model)))
                .configure(configure),
        )
        .await;

        let req = awtest::TestRequest::post()
            .uri(GENERATE_TRIVIA_PATH)
            .set_json(body)
            .to_request();
        let resp = awtest::call_service(&app, req).await;
        let status = resp.status();
        let body: Value = awtest::read_body_json(resp).await;
        (status, body)
    }

    #[actix_web::test]
    async fn test_generate_returns_five_questions() {
        let model = Arc::new(ScriptedModel::new(vec![Ok(round_json(5))]));
        let (status, body) = post(
            model.clone(),
            json!({ "keywords": "space, cats", "lastRoundScore": 3 }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().map(Vec::len), Some(5));
        assert_eq!(body[0]["difficulty"], "Easy");
        assert_eq!(model.calls().len(), 1);
    }

    #[actix_web::test]
    async fn test_generate_rejects_missing_keywords() {
        let model = Arc::new(ScriptedModel::new(vec![]));
        let (status, body) = post(model.clone(), json!({ "lastRoundScore": null })).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Keywords are required.");
        assert!(model.calls().is_empty());
    }

    #[actix_web::test]
    async fn test_generate_rejects_blank_keywords() {
        let model = Arc::new(ScriptedModel::new(vec![]));
        let (status, _) = post(model.clone(), json!({ "keywords": " , " })).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(model.calls().is_empty());
    }

    #[actix_web::test]
    async fn test_generate_rejects_malformed_body() {
        let model = Arc::new(ScriptedModel::new(vec![]));
        let (status, body) = post(
            model,
            json!({ "keywords": "space", "lastRoundScore": "lots" }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap_or_default().contains("Invalid request body"));
    }

    #[actix_web::test]
    async fn test_generate_accepts_negative_score() {
        let model = Arc::new(ScriptedModel::new(vec![Ok(round_json(5))]));
        let (status, body) = post(
            model.clone(),
            json!({ "keywords": "space", "lastRoundScore": -1 }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().map(Vec::len), Some(5));
        assert_eq!(model.calls().len(), 1);
    }

    #[actix_web::test]
    async fn test_generate_maps_wrong_count_to_bad_gateway() {
        let model = Arc::new(ScriptedModel::new(vec![Ok(round_json(3))]));
        let (status, body) = post(model, json!({ "keywords": "space" })).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["error"].as_str().unwrap_or_default().contains("expected 5"));
    }

    #[actix_web::test]
    async fn test_generate_maps_non_array_to_bad_gateway() {
        let model = Arc::new(ScriptedModel::new(vec![Ok(r#"{"oops":true}"#.to_string())]));
        let (status, _) = post(model, json!({ "keywords": "space" })).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[actix_web::test]
    async fn test_generate_falls_back_once_then_gives_up() {
        let model = Arc::new(ScriptedModel::new(vec![
            Err(upstream(404)),
            Err(upstream(403)),
        ]));
        let (status, _) = post(model.clone(), json!({ "keywords": "space" })).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        let ids = ModelIds::default();
        assert_eq!(model.calls(), vec![ids.primary, ids.fallback]);
    }

    #[actix_web::test]
    async fn test_generate_surfaces_other_failures_as_internal() {
        let model = Arc::new(ScriptedModel::new(vec![Err(upstream(503))]));
        let (status, body) = post(model.clone(), json!({ "keywords": "space" })).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap_or_default().contains("503"));
        assert_eq!(model.calls().len(), 1);
    }

    #[actix_web::test]
    async fn test_health_reports_models() {
        let app = awtest::init_service(
            App::new()
                .app_data(web::Data::new(state_with(Arc::new(ScriptedModel::new(vec![])))))
                .configure(configure),
        )
        .await;

        let req = awtest::TestRequest::get().uri("/health").to_request();
        let body: Value = awtest::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["primary_model"], ModelIds::default().primary);
    }
}
