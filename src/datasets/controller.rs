use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    app::models::{api_error::ApiError, json_from_request::JsonFromRequest},
    AppState,
};

use super::{
    dtos::generate_dataset_dto::GenerateDatasetDto,
    errors::DatasetApiError,
    models::generation_result::BatchFailureResponse,
    service::{self, DatasetOutcome},
    ARCHIVE_FILE_NAME,
};

pub async fn generate_dataset(
    State(state): State<Arc<AppState>>,
    JsonFromRequest(dto): JsonFromRequest<GenerateDatasetDto>,
) -> Result<Response, ApiError> {
    if dto.validate().is_err() {
        return Err(DatasetApiError::MissingPrompt.value());
    }

    let request_id = Uuid::new_v4().to_string();

    match service::generate_dataset(&dto, &request_id, &state).await? {
        DatasetOutcome::Archive(bytes) => Ok((
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/zip".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", ARCHIVE_FILE_NAME),
                ),
            ],
            bytes,
        )
            .into_response()),
        DatasetOutcome::Failed(results) => Ok((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(BatchFailureResponse {
                success: false,
                results,
            }),
        )
            .into_response()),
    }
}

#[cfg(test)]
mod tests {
    use std::{io::Cursor, path::PathBuf};

    use axum::{body::Body, http::Request, Router};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::{
        app::env::Envy, datasets::service::tests::FakeGenerator,
        media::apis::image_generator::ImageGenerator, router,
    };

    use super::*;

    fn app(base_dir: PathBuf) -> Router {
        let envy = Envy {
            app_env: "test".to_string(),
            frontend_url: "http://localhost:3000".to_string(),
            port: None,
            gradio_url: "http://127.0.0.1:0".to_string(),
            generation_timeout_secs: 5,
            generation_concurrency: 2,
            base_dir,
            workspace_ttl_secs: 600,
            keep_workspaces: false,
        };
        let generator: Arc<dyn ImageGenerator> = Arc::new(FakeGenerator::default());

        router(Arc::new(AppState {
            envy: Arc::new(envy),
            generator,
            active_requests: Default::default(),
        }))
    }

    fn post_llm(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/llm")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_bytes(response: Response) -> bytes::Bytes {
        hyper::body::to_bytes(response.into_body()).await.unwrap()
    }

    #[tokio::test]
    async fn returns_a_zip_when_every_prompt_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(dir.path().to_path_buf())
            .oneshot(post_llm(json!({ "prompt": "Cat/a/b END Dog/c" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/zip");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"generated_images.zip\""
        );

        let bytes = body_bytes(response).await;
        let archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        let mut names: Vec<String> = archive.file_names().map(|n| n.to_string()).collect();
        names.sort();
        assert_eq!(
            names,
            vec!["Dataset/CAT/64.png", "Dataset/CAT/65.png", "Dataset/DOG/66.png"]
        );

        // the request workspace is gone once the archive has been read
        let leftovers = std::fs::read_dir(dir.path().join("requests")).unwrap().count();
        assert_eq!(leftovers, 0);
    }

    #[tokio::test]
    async fn reports_every_result_when_a_prompt_fails() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(dir.path().to_path_buf())
            .oneshot(post_llm(json!({ "prompt": "Cat/a/fail END Dog/c" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body["success"], json!(false));
        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0]["success"], json!(true));
        assert_eq!(results[1]["success"], json!(false));
        assert_eq!(results[1]["image_path"], Value::Null);
        assert_eq!(results[2]["message"], json!("Image 66.png saved for prompt: c"));
    }

    #[tokio::test]
    async fn rejects_missing_prompts() {
        let dir = tempfile::tempdir().unwrap();

        for body in [json!({}), json!({ "prompt": null }), json!({ "prompt": "" })] {
            let response = app(dir.path().to_path_buf())
                .oneshot(post_llm(body))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
            assert_eq!(body, json!({ "success": false, "message": "Prompt is missing" }));
        }
    }

    #[tokio::test]
    async fn rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let request = Request::builder()
            .method("POST")
            .uri("/llm")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app(dir.path().to_path_buf()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body["success"], json!(false));
    }

    #[tokio::test]
    async fn fails_when_no_prompt_yields_an_image() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(dir.path().to_path_buf())
            .oneshot(post_llm(json!({ "prompt": "OnlyClassName" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body, json!({ "success": false, "message": "No images generated" }));
    }

    #[tokio::test]
    async fn answers_preflight_only_for_the_frontend_origin() {
        let dir = tempfile::tempdir().unwrap();
        let preflight = |origin: &str| {
            Request::builder()
                .method("OPTIONS")
                .uri("/llm")
                .header(header::ORIGIN, origin)
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                .body(Body::empty())
                .unwrap()
        };

        let allowed = app(dir.path().to_path_buf())
            .oneshot(preflight("http://localhost:3000"))
            .await
            .unwrap();
        assert_eq!(
            allowed.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:3000"
        );

        let denied = app(dir.path().to_path_buf())
            .oneshot(preflight("http://evil.example"))
            .await
            .unwrap();
        // the configured origin is echoed back, which browsers reject for any other origin
        assert_ne!(
            denied.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://evil.example"
        );
        assert_eq!(
            denied.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:3000"
        );
    }
}
