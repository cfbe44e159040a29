use actix_web::{web, HttpResponse, Responder};
use crate::core::IdentityScorer;
use crate::models::{ErrorResponse, HealthResponse, ScoreRequest};

/// Longest diagnostic passed back to clients on scoring failure
pub const MAX_DIAGNOSTIC_CHARS: usize = 300;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub scorer: IdentityScorer,
}

/// Configure identity scoring routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/identity/score", web::post().to(score));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        model: state.scorer.model().to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Score two candidate records
///
/// POST /identity/score
///
/// Request body:
/// ```json
/// {
///   "a": { "customerId": "string", "firstName": "string", "lastName": "string",
///          "channels": [], "shippingAddress": {}, "billingAddress": {} },
///   "b": { "customerId": "string" }
/// }
/// ```
async fn score(
    state: web::Data<AppState>,
    req: web::Json<ScoreRequest>,
) -> impl Responder {
    match state.scorer.score(&req).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            tracing::error!(
                "Identity scoring failed for {} / {}: {}",
                req.a.customer_id,
                req.b.customer_id,
                e
            );
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "scoring_failed".to_string(),
                message: format!("Identity scoring failed: {}", truncate_diagnostic(&e.to_string())),
                status_code: 500,
            })
        }
    }
}

/// First [`MAX_DIAGNOSTIC_CHARS`] characters of `message`
pub fn truncate_diagnostic(message: &str) -> &str {
    match message.char_indices().nth(MAX_DIAGNOSTIC_CHARS) {
        Some((idx, _)) => &message[..idx],
        None => message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::features::NormalizedFeatures;
    use crate::models::{CandidateRecord, ScoreResponse};
    use crate::services::oracle::{OracleError, OracleVerdict, ReasoningOracle};
    use actix_web::{test as actix_test, App};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Arc;

    /// Oracle that always fails with a long upstream message
    struct FailingOracle;

    #[async_trait]
    impl ReasoningOracle for FailingOracle {
        fn model(&self) -> &str {
            "failing-model"
        }

        async fn evaluate(
            &self,
            _features: &NormalizedFeatures,
            _raw_a: &CandidateRecord,
            _raw_b: &CandidateRecord,
        ) -> Result<OracleVerdict, OracleError> {
            Err(OracleError::ApiError { status: 500, message: "e".repeat(1000) })
        }
    }

    fn state() -> web::Data<AppState> {
        web::Data::new(AppState {
            scorer: IdentityScorer::new(Arc::new(FailingOracle)),
        })
    }

    #[actix_web::test]
    async fn test_health_reports_model() {
        let app = actix_test::init_service(App::new().app_data(state()).configure(configure)).await;

        let req = actix_test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["ok"], true);
        assert_eq!(body["model"], "failing-model");
    }

    #[actix_web::test]
    async fn test_score_name_mismatch() {
        let app = actix_test::init_service(App::new().app_data(state()).configure(configure)).await;

        let req = actix_test::TestRequest::post()
            .uri("/identity/score")
            .set_json(json!({
                "a": {"customerId": "1", "firstName": "John", "lastName": "Smith"},
                "b": {"customerId": "2", "firstName": "Jane", "lastName": "Doe"}
            }))
            .to_request();
        let body: ScoreResponse = actix_test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.score, 0.05);
        assert_eq!(body.signals["a_name"], "john smith");
    }

    #[actix_web::test]
    async fn test_score_accepts_empty_customer_id() {
        let app = actix_test::init_service(App::new().app_data(state()).configure(configure)).await;

        let req = actix_test::TestRequest::post()
            .uri("/identity/score")
            .set_json(json!({
                "a": {"customerId": "", "firstName": "John", "lastName": "Smith"},
                "b": {"customerId": "2", "firstName": "Jane", "lastName": "Doe"}
            }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), 200);
    }

    #[actix_web::test]
    async fn test_score_rejects_missing_customer_id() {
        let app = actix_test::init_service(App::new().app_data(state()).configure(configure)).await;

        let req = actix_test::TestRequest::post()
            .uri("/identity/score")
            .set_json(json!({ "a": {"firstName": "Ali"}, "b": {"customerId": "2"} }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn test_score_oracle_failure_is_truncated_500() {
        let app = actix_test::init_service(App::new().app_data(state()).configure(configure)).await;

        let req = actix_test::TestRequest::post()
            .uri("/identity/score")
            .set_json(json!({
                "a": {"customerId": "1", "firstName": "Ali", "lastName": "Veli"},
                "b": {"customerId": "2", "firstName": "ALİ", "lastName": "VELİ"}
            }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), 500);
        let body: ErrorResponse = actix_test::read_body_json(resp).await;
        let prefix = "Identity scoring failed: ";
        assert!(body.message.starts_with(prefix));
        assert_eq!(body.message.chars().count(), prefix.len() + MAX_DIAGNOSTIC_CHARS);
    }

    #[test]
    fn test_truncate_short_message_untouched() {
        assert_eq!(truncate_diagnostic("boom"), "boom");
    }

    #[test]
    fn test_truncate_long_message() {
        let long = "x".repeat(500);
        assert_eq!(truncate_diagnostic(&long).len(), 300);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let long = "ş".repeat(400);
        let truncated = truncate_diagnostic(&long);
        assert_eq!(truncated.chars().count(), 300);
    }
}
