// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! HTTP surface for the opsdoc service.
//!
//! One documentation endpoint plus a readiness probe:
//!
//! - `POST /generate-docs` — body `{"logs": string}`; responds
//!   `200 {"message", "blob_name"}`, `400 {"error"}`, or `500 {"error"}`
//! - `GET /healthz` — `200` once the server is up, for the job runner's probe
//!
//! Concurrency, keep-alive, and connection handling all belong to actix; the
//! pipeline itself runs strictly sequentially per request.

use actix_web::{get, post, web, HttpResponse, Responder};
use serde::Serialize;

use crate::handler::{generate_docs, AppContext};
use crate::types::{LogPayload, OutcomeStatus, RequestOutcome};

/// Success response body.
#[derive(Debug, Serialize)]
struct SuccessBody {
    message: String,
    blob_name: String,
}

/// Error response body, shared by 400 and 500.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Map a pipeline outcome onto an HTTP response.
fn outcome_response(outcome: RequestOutcome) -> HttpResponse {
    match outcome.status {
        OutcomeStatus::Success => HttpResponse::Ok().json(SuccessBody {
            message: outcome.message,
            // Success always carries a blob name; guard anyway.
            blob_name: outcome.blob_name.unwrap_or_default(),
        }),
        OutcomeStatus::ClientError => HttpResponse::BadRequest().json(ErrorBody {
            error: outcome.message,
        }),
        OutcomeStatus::ServerError => HttpResponse::InternalServerError().json(ErrorBody {
            error: outcome.message,
        }),
    }
}

/// Documentation generation endpoint.
#[post("/generate-docs")]
async fn generate_docs_endpoint(
    ctx: web::Data<AppContext>,
    payload: web::Json<LogPayload>,
) -> impl Responder {
    let outcome = generate_docs(ctx.get_ref(), &payload).await;
    outcome_response(outcome)
}

/// Readiness probe for the cluster scheduler.
#[get("/healthz")]
async fn healthz() -> impl Responder {
    HttpResponse::Ok().body("ok")
}

/// Register all routes on an actix service config.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(generate_docs_endpoint).service(healthz);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::types::{GeneratedDocument, MockArtifactStore, MockDocEngine, StoredArtifact};
    use actix_web::{test, App};
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn app_data(engine: MockDocEngine, store: MockArtifactStore) -> web::Data<AppContext> {
        web::Data::new(AppContext::new(
            Arc::new(engine),
            Arc::new(store),
            "20240101-000000",
        ))
    }

    #[actix_web::test]
    async fn test_generate_docs_success_response() {
        let mut engine = MockDocEngine::new();
        engine
            .expect_generate()
            .returning(|_| Ok(GeneratedDocument::new("generated documentation")));
        let mut store = MockArtifactStore::new();
        store.expect_put_text().returning(|name, _| {
            Ok(StoredArtifact {
                blob_name: name.to_string(),
                container: "docs".to_string(),
            })
        });

        let app = test::init_service(
            App::new()
                .app_data(app_data(engine, store))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/generate-docs")
            .set_json(json!({"logs": "Sample CI/CD log: Deployment succeeded."}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body,
            json!({
                "message": "Documentation generated and stored successfully",
                "blob_name": "devops-doc-20240101-000000.txt"
            })
        );
    }

    #[actix_web::test]
    async fn test_generate_docs_empty_logs_is_400() {
        let mut engine = MockDocEngine::new();
        engine.expect_generate().times(0);
        let mut store = MockArtifactStore::new();
        store.expect_put_text().times(0);

        let app = test::init_service(
            App::new()
                .app_data(app_data(engine, store))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/generate-docs")
            .set_json(json!({"logs": ""}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"error": "No logs provided"}));
    }

    #[actix_web::test]
    async fn test_generate_docs_missing_field_is_400() {
        let mut engine = MockDocEngine::new();
        engine.expect_generate().times(0);
        let mut store = MockArtifactStore::new();
        store.expect_put_text().times(0);

        let app = test::init_service(
            App::new()
                .app_data(app_data(engine, store))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/generate-docs")
            .set_json(json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn test_generate_docs_engine_failure_is_500() {
        let mut engine = MockDocEngine::new();
        engine
            .expect_generate()
            .returning(|_| Err(EngineError::NetworkError("connection refused".to_string())));
        let mut store = MockArtifactStore::new();
        store.expect_put_text().times(0);

        let app = test::init_service(
            App::new()
                .app_data(app_data(engine, store))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/generate-docs")
            .set_json(json!({"logs": "some logs"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 500);

        let body: Value = test::read_body_json(resp).await;
        let error = body.get("error").and_then(Value::as_str).unwrap();
        assert!(error.contains("connection refused"));
        assert!(body.get("blob_name").is_none());
    }

    #[actix_web::test]
    async fn test_healthz() {
        let mut engine = MockDocEngine::new();
        engine.expect_generate().times(0);
        let mut store = MockArtifactStore::new();
        store.expect_put_text().times(0);

        let app = test::init_service(
            App::new()
                .app_data(app_data(engine, store))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/healthz").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
    }
}
