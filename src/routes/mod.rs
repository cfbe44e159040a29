// Route exports
pub mod identity;

use actix_cors::Cors;
use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(identity::configure);
}

/// Any origin, method and header; credentials are never allowed
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allow_any_method()
        .allow_any_header()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::IdentityScorer;
    use crate::routes::identity::AppState;
    use crate::services::OpenAiOracle;
    use actix_web::{http::header, test as actix_test, App};
    use std::sync::Arc;
    use std::time::Duration;

    #[actix_web::test]
    async fn test_cors_allows_any_origin_without_credentials() {
        let oracle = OpenAiOracle::new(
            "http://127.0.0.1:9".to_string(),
            None,
            "test-model".to_string(),
            Duration::from_secs(1),
        )
        .unwrap();
        let state = AppState { scorer: IdentityScorer::new(Arc::new(oracle)) };
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .wrap(cors())
                .configure(configure_routes),
        )
        .await;

        let req = actix_test::TestRequest::get()
            .uri("/health")
            .insert_header((header::ORIGIN, "https://admin.example.com"))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert!(resp.status().is_success());
        assert!(resp.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
        assert!(!resp.headers().contains_key(header::ACCESS_CONTROL_ALLOW_CREDENTIALS));
    }
}
