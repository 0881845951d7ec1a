pub mod health;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::admin;
use crate::auth::handlers as auth_handlers;
use crate::correction::handlers as correction_handlers;
use crate::state::AppState;
use crate::themes;
use crate::webhook;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Session lifecycle
        .route("/api/v1/auth/login", post(auth_handlers::handle_login))
        .route("/api/v1/auth/register", post(auth_handlers::handle_register))
        .route("/api/v1/auth/logout", post(auth_handlers::handle_logout))
        .route("/api/v1/auth/recover", post(auth_handlers::handle_recover))
        .route("/api/v1/me", get(auth_handlers::handle_me))
        // Corrections
        .route(
            "/api/v1/corrections",
            post(correction_handlers::handle_submit).get(correction_handlers::handle_history),
        )
        .route("/api/v1/corrections/:id", get(correction_handlers::handle_get))
        .route(
            "/api/v1/corrections/:id/ideal",
            get(correction_handlers::handle_ideal_version),
        )
        // Themes
        .route(
            "/api/v1/themes",
            get(themes::handle_list).post(themes::handle_create),
        )
        .route("/api/v1/themes/:id", delete(themes::handle_delete))
        // Mentor administration
        .route("/api/v1/admin/users", get(admin::handle_list_users))
        .route(
            "/api/v1/admin/users/:id",
            patch(admin::handle_update_user).delete(admin::handle_delete_user),
        )
        // Payment provider webhook (POST only; axum answers 405 otherwise)
        .route("/api/webhook/payment", post(webhook::handle_payment))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::auth::AuthClient;
    use crate::config::Config;
    use crate::grading::{EssayGrader, GradingError, GradingRequest};
    use crate::models::correction::GradedEssay;
    use crate::store::memory::MemoryStore;

    struct UnreachableGrader;

    #[async_trait]
    impl EssayGrader for UnreachableGrader {
        async fn grade(&self, _request: &GradingRequest) -> Result<GradedEssay, GradingError> {
            Err(GradingError::EmptyContent)
        }
    }

    fn test_state() -> AppState {
        AppState {
            store: Arc::new(MemoryStore::new()),
            grader: Arc::new(UnreachableGrader),
            auth: AuthClient::new(
                "http://localhost:1".to_string(),
                "test-key".to_string(),
            ),
            config: Config {
                database_url: "postgres://localhost/unused".to_string(),
                auth_base_url: "http://localhost:1".to_string(),
                auth_api_key: "test-key".to_string(),
                gemini_api_key: None,
                admin_email: "gugakgb@hotmail.com".to_string(),
                port: 0,
                rust_log: "info".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_webhook_route_is_post_only() {
        let app = build_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/webhook/payment")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_health_responds_ok() {
        let app = build_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
