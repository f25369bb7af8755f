//! API router. All routes live under `/api/`; responses use the
//! `{success, data, message, error}` envelope.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::api::types::AppState;
use crate::config;

/// Build the full application router.
pub fn app_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route(
            "/reports",
            post(endpoints::reports::upload).get(endpoints::reports::list),
        )
        .route(
            "/reports/:id",
            get(endpoints::reports::get).delete(endpoints::reports::delete),
        )
        .route(
            "/reports/:id/reanalyze",
            post(endpoints::reports::reanalyze),
        )
        .route("/classify", post(endpoints::classify::classify))
        .route("/standardize", post(endpoints::standardize::run))
        .route("/image-analysis", post(endpoints::analysis::image_analysis))
        .route("/ai", post(endpoints::analysis::ask))
        .route("/voice", post(endpoints::analysis::voice))
        .route(
            "/recommendations",
            post(endpoints::recommendations::generate),
        )
        .route("/health-plan", post(endpoints::health_plan::generate))
        .route("/trends", get(endpoints::trends::trends))
        .with_state(state);

    Router::new()
        .nest("/api", api)
        // Multipart bodies carry the file plus field overhead
        .layer(DefaultBodyLimit::max(config::MAX_UPLOAD_BYTES + 64 * 1024))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::analysis::model::{FailingModel, MockModel};
    use crate::analysis::{AnalysisModel, AnalysisOrchestrator};
    use crate::pipeline::acquire::ocr::{FailingOcr, FixedOcr};
    use crate::pipeline::acquire::OcrEngine;

    const MODEL_JSON: &str = r#"{
        "summary": "White cell count is mildly elevated.",
        "findings": ["WBC above reference range"],
        "recommendations": ["Repeat CBC in two weeks"],
        "follow_up_recommended": true,
        "ai_confidence_score": 0.85
    }"#;

    const CBC_TEXT: &str =
        "Complete Blood Count\nWBC: 12.5 x10^9/L (4.0-11.0)\nHemoglobin: 14.2 g/dL (13.5-17.5)";

    /// State backed by a temp-file database. The tempdir guard must be
    /// kept alive for the duration of the test.
    fn test_state(
        model: Arc<dyn AnalysisModel>,
        ocr: Arc<dyn OcrEngine>,
    ) -> (AppState, tempfile::TempDir) {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("labsight.db");
        // Run migrations up front, as the binary does
        crate::db::open_database(&db_path).unwrap();
        let state = AppState::new(db_path, Arc::new(AnalysisOrchestrator::new(model)), ocr);
        (state, tmp)
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart_upload(uri: &str, file_name: &str, content_type: &str, content: &str) -> Request<Body> {
        let boundary = "labsight-test-boundary";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
             Content-Type: {content_type}\r\n\r\n\
             {content}\r\n\
             --{boundary}\r\n\
             Content-Disposition: form-data; name=\"user_id\"\r\n\r\n\
             alice\r\n\
             --{boundary}--\r\n"
        );
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn response_json(response: axum::http::Response<Body>) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 1 << 20)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn health_envelope_shape() {
        let (state, _tmp) = test_state(Arc::new(FailingModel), Arc::new(FailingOcr));
        let app = app_router(state);

        let response = app
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["status"], "ok");
        assert!(json["data"]["version"].is_string());
    }

    #[tokio::test]
    async fn classify_cbc_text() {
        let (state, _tmp) = test_state(Arc::new(FailingModel), Arc::new(FailingOcr));
        let app = app_router(state);

        let body = serde_json::json!({ "text": CBC_TEXT }).to_string();
        let response = app
            .oneshot(json_request("POST", "/api/classify", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["data"]["report_type"], "cbc");
        assert_eq!(json["data"]["display_name"], "Complete Blood Count");
    }

    #[tokio::test]
    async fn classify_requires_text() {
        let (state, _tmp) = test_state(Arc::new(FailingModel), Arc::new(FailingOcr));
        let app = app_router(state);

        let response = app
            .oneshot(json_request("POST", "/api/classify", r#"{"text": "  "}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = response_json(response).await;
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().contains("text"));
    }

    #[tokio::test]
    async fn standardize_mirrors_results_into_parameters() {
        let (state, _tmp) = test_state(Arc::new(FailingModel), Arc::new(FailingOcr));
        let app = app_router(state);

        let body = serde_json::json!({ "text": CBC_TEXT, "file_name": "cbc.txt" }).to_string();
        let response = app
            .oneshot(json_request("POST", "/api/standardize", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["data"]["report_type"], "cbc");
        assert_eq!(json["data"]["results"], json["data"]["parameters"]);
        let wbc = json["data"]["results"]
            .as_array()
            .unwrap()
            .iter()
            .find(|p| p["name"] == "WBC")
            .unwrap();
        assert_eq!(wbc["status"], "high");
    }

    #[tokio::test]
    async fn upload_then_analysis_completes() {
        let (state, _tmp) = test_state(Arc::new(MockModel::new(MODEL_JSON)), Arc::new(FailingOcr));

        let response = app_router(state.clone())
            .oneshot(multipart_upload("/api/reports", "cbc.txt", "text/plain", CBC_TEXT))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["status"], "processing");
        assert_eq!(json["data"]["user_id"], "alice");
        let id = json["data"]["id"].as_str().unwrap().to_string();

        // The analysis task runs in the background; poll until it lands.
        let mut completed = serde_json::Value::Null;
        for _ in 0..100 {
            tokio::time::sleep(Duration::from_millis(10)).await;
            let response = app_router(state.clone())
                .oneshot(
                    Request::get(format!("/api/reports/{id}"))
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            let json = response_json(response).await;
            if json["data"]["status"] != "processing" {
                completed = json;
                break;
            }
        }

        assert_eq!(completed["data"]["status"], "completed");
        assert_eq!(
            completed["data"]["analysis"]["summary"],
            "White cell count is mildly elevated."
        );
        let wbc = completed["data"]["results"]
            .as_array()
            .unwrap()
            .iter()
            .find(|p| p["name"] == "WBC")
            .unwrap();
        assert_eq!(wbc["status"], "high");
    }

    #[tokio::test]
    async fn upload_with_failed_model_completes_with_errors() {
        let (state, _tmp) = test_state(Arc::new(FailingModel), Arc::new(FailingOcr));

        let response = app_router(state.clone())
            .oneshot(multipart_upload("/api/reports", "cbc.txt", "text/plain", CBC_TEXT))
            .await
            .unwrap();
        let json = response_json(response).await;
        let id = json["data"]["id"].as_str().unwrap().to_string();

        let mut status = String::new();
        for _ in 0..100 {
            tokio::time::sleep(Duration::from_millis(10)).await;
            let response = app_router(state.clone())
                .oneshot(
                    Request::get(format!("/api/reports/{id}"))
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            let json = response_json(response).await;
            status = json["data"]["status"].as_str().unwrap().to_string();
            if status != "processing" {
                break;
            }
        }
        // Degraded analysis still completes the report
        assert_eq!(status, "completed_with_errors");
    }

    #[tokio::test]
    async fn upload_unsupported_type_rejected() {
        let (state, _tmp) = test_state(Arc::new(FailingModel), Arc::new(FailingOcr));

        let response = app_router(state)
            .oneshot(multipart_upload(
                "/api/reports",
                "data.xyz",
                "application/octet-stream",
                "opaque",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = response_json(response).await;
        assert!(json["error"].as_str().unwrap().contains("Unsupported"));
    }

    #[tokio::test]
    async fn upload_without_file_rejected() {
        let (state, _tmp) = test_state(Arc::new(FailingModel), Arc::new(FailingOcr));

        let boundary = "labsight-test-boundary";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"user_id\"\r\n\r\n\
             alice\r\n\
             --{boundary}--\r\n"
        );
        let request = Request::builder()
            .method("POST")
            .uri("/api/reports")
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let response = app_router(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn get_invalid_and_unknown_ids() {
        let (state, _tmp) = test_state(Arc::new(FailingModel), Arc::new(FailingOcr));

        let response = app_router(state.clone())
            .oneshot(
                Request::get("/api/reports/not-a-uuid")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app_router(state)
            .oneshot(
                Request::get(format!("/api/reports/{}", uuid::Uuid::new_v4()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_then_gone() {
        let (state, _tmp) = test_state(Arc::new(FailingModel), Arc::new(FailingOcr));

        let response = app_router(state.clone())
            .oneshot(multipart_upload("/api/reports", "cbc.txt", "text/plain", CBC_TEXT))
            .await
            .unwrap();
        let json = response_json(response).await;
        let id = json["data"]["id"].as_str().unwrap().to_string();

        let response = app_router(state.clone())
            .oneshot(
                Request::delete(format!("/api/reports/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app_router(state)
            .oneshot(
                Request::get(format!("/api/reports/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_filters_by_user() {
        let (state, _tmp) = test_state(Arc::new(FailingModel), Arc::new(FailingOcr));

        app_router(state.clone())
            .oneshot(multipart_upload("/api/reports", "cbc.txt", "text/plain", CBC_TEXT))
            .await
            .unwrap();

        let response = app_router(state.clone())
            .oneshot(
                Request::get("/api/reports?user_id=alice")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let json = response_json(response).await;
        assert_eq!(json["data"].as_array().unwrap().len(), 1);

        let response = app_router(state)
            .oneshot(
                Request::get("/api/reports?user_id=nobody")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let json = response_json(response).await;
        assert!(json["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn qa_falls_back_when_model_down() {
        let (state, _tmp) = test_state(Arc::new(FailingModel), Arc::new(FailingOcr));

        let response = app_router(state)
            .oneshot(json_request(
                "POST",
                "/api/ai",
                r#"{"question": "What does WBC mean?"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["source"], "fallback");
        assert!(!json["data"]["answer"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn voice_transcript_answered() {
        let (state, _tmp) = test_state(
            Arc::new(MockModel::new("Your white cell count is explained here.")),
            Arc::new(FailingOcr),
        );

        let response = app_router(state)
            .oneshot(json_request(
                "POST",
                "/api/voice",
                r#"{"transcript": "what is my white cell count"}"#,
            ))
            .await
            .unwrap();
        let json = response_json(response).await;
        assert_eq!(json["data"]["source"], "model");
    }

    #[tokio::test]
    async fn recommendations_generated_and_persisted() {
        let (state, _tmp) = test_state(
            Arc::new(MockModel::new(r#"["Walk daily", "Hydrate well"]"#)),
            Arc::new(FailingOcr),
        );

        let response = app_router(state.clone())
            .oneshot(json_request(
                "POST",
                "/api/recommendations",
                r#"{"user_id": "alice"}"#,
            ))
            .await
            .unwrap();
        let json = response_json(response).await;
        assert_eq!(json["data"]["source"], "model");
        assert_eq!(json["data"]["recommendations"].as_array().unwrap().len(), 2);

        let conn = state.open_db().unwrap();
        let rows = crate::db::repository::list_recommendations(&conn, "alice").unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn health_plan_fallback_persisted() {
        let (state, _tmp) = test_state(Arc::new(FailingModel), Arc::new(FailingOcr));

        let response = app_router(state.clone())
            .oneshot(json_request("POST", "/api/health-plan", r#"{"user_id": "bob"}"#))
            .await
            .unwrap();
        let json = response_json(response).await;
        assert_eq!(json["data"]["source"], "fallback");
        assert!(!json["data"]["actions"].as_array().unwrap().is_empty());

        let conn = state.open_db().unwrap();
        let plans = crate::db::repository::list_health_plans(&conn, "bob").unwrap();
        assert_eq!(plans.len(), 1);
    }

    #[tokio::test]
    async fn trends_track_uploaded_values() {
        let (state, _tmp) = test_state(Arc::new(FailingModel), Arc::new(FailingOcr));

        app_router(state.clone())
            .oneshot(multipart_upload("/api/reports", "cbc.txt", "text/plain", CBC_TEXT))
            .await
            .unwrap();

        let response = app_router(state)
            .oneshot(
                Request::get("/api/trends?user_id=alice&parameter=WBC")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let json = response_json(response).await;
        let series = json["data"].as_array().unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0]["parameter"], "WBC");
        assert_eq!(series[0]["points"][0]["value"], 12.5);
        assert_eq!(series[0]["points"][0]["status"], "high");
    }

    #[tokio::test]
    async fn image_analysis_with_ocr_text() {
        use base64::Engine;
        let (state, _tmp) = test_state(
            Arc::new(FailingModel),
            Arc::new(FixedOcr::new("Glucose: 180 mg/dL (70-100)")),
        );

        let payload = base64::engine::general_purpose::STANDARD.encode([0xFFu8, 0xD8, 0xFF]);
        let body = serde_json::json!({ "image": payload, "file_name": "labs.jpg" }).to_string();
        let response = app_router(state)
            .oneshot(json_request("POST", "/api/image-analysis", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["data"]["degraded"], false);
        assert_eq!(json["data"]["standardized"]["report_type"], "metabolic_panel");
        // Model is down — analysis must still be a valid object
        assert_eq!(json["data"]["analysis"]["source"], "fallback");
        assert!(json["data"]["analysis"]["summary"].is_string());
    }

    #[tokio::test]
    async fn unknown_route_404() {
        let (state, _tmp) = test_state(Arc::new(FailingModel), Arc::new(FailingOcr));
        let response = app_router(state)
            .oneshot(Request::get("/api/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
