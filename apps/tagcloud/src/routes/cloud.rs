//! Axum route handlers for the Cloud Layout API.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::layout::host::HeadlessElement;
use crate::layout::{
    CloudHost, CloudOptions, HeadlessHost, MetricMeasurer, OmittedTopic, RenderStatus, Size,
    TagCloud, TextMeasurer, Typeface,
};
use crate::models::Topic;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutOptions {
    pub word_class: Option<String>,
    pub weight_class: Option<String>,
    pub id_head: Option<String>,
    #[serde(default)]
    pub no_scale: bool,
    #[serde(default)]
    pub circle: bool,
    pub typeface: Option<Typeface>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRequest {
    /// Left optional so a missing list is reported by the cloud itself.
    #[serde(default)]
    pub topics: Option<Vec<Topic>>,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub options: LayoutOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerGeometry {
    pub width: f64,
    pub height: f64,
    pub margin_left: f64,
    pub margin_top: f64,
    pub scale: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResponse {
    pub status: RenderStatus,
    pub container: ContainerGeometry,
    /// Realized elements with their live position after auto-fit.
    pub elements: Vec<HeadlessElement>,
    pub omitted: Vec<OmittedTopic>,
    /// Topics in rank order, annotated with `adjustedWeight`.
    pub topics: Vec<Topic>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/clouds/layout
///
/// Lays out the given topics in a `width` x `height` container and returns
/// the realized elements. The pass runs on the blocking pool.
pub async fn handle_layout(
    State(state): State<AppState>,
    Json(request): Json<LayoutRequest>,
) -> Result<Json<LayoutResponse>, AppError> {
    validate_dimensions(request.width, request.height)?;

    if let Some(topics) = &request.topics {
        if topics.len() > state.config.max_topics {
            return Err(AppError::Validation(format!(
                "at most {} topics are accepted, got {}",
                state.config.max_topics,
                topics.len()
            )));
        }
    }

    let typeface = request.options.typeface.unwrap_or(state.config.typeface);
    let response = tokio::task::spawn_blocking(move || run_layout(request, typeface))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in cloud layout: {e}")))??;

    Ok(Json(response))
}

// ────────────────────────────────────────────────────────────────────────────
// Internal helpers
// ────────────────────────────────────────────────────────────────────────────

fn validate_dimensions(width: f64, height: f64) -> Result<(), AppError> {
    for (name, value) in [("width", width), ("height", height)] {
        if !value.is_finite() || value <= 0.0 {
            return Err(AppError::Validation(format!(
                "{name} must be a positive number of pixels"
            )));
        }
    }
    Ok(())
}

/// Runs one synchronous layout pass against a fresh headless host.
pub(crate) fn run_layout(
    request: LayoutRequest,
    typeface: Typeface,
) -> Result<LayoutResponse, AppError> {
    let measurer: Arc<dyn TextMeasurer> = Arc::new(MetricMeasurer::new(typeface));
    let host = HeadlessHost::new(
        Size::new(request.width, request.height),
        Arc::clone(&measurer),
    );

    let options = CloudOptions {
        topics: request.topics,
        container: Some(host),
        measurer: Some(measurer),
        word_class: request.options.word_class,
        weight_class: request.options.weight_class,
        id_head: request.options.id_head,
        no_scale: request.options.no_scale,
        circle: request.options.circle,
        ..CloudOptions::default()
    };

    let mut cloud = TagCloud::new(options)?;
    let report = cloud.render();
    let host = cloud.host();
    let size = host.container_size();

    Ok(LayoutResponse {
        status: report.status,
        container: ContainerGeometry {
            width: size.width,
            height: size.height,
            margin_left: host.margin().x,
            margin_top: host.margin().y,
            scale: host.scale(),
        },
        elements: host.elements().to_vec(),
        omitted: report.omitted,
        topics: cloud.topics().to_vec(),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::routes::build_router;

    fn app() -> axum::Router {
        build_router(AppState {
            config: Config {
                max_topics: 5,
                ..Config::default()
            },
        })
    }

    async fn post_layout(body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/clouds/layout")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn sample_body() -> Value {
        json!({
            "width": 600,
            "height": 400,
            "topics": [
                { "text": "Beedog", "weight": 2, "url": "http://beedogs.com" },
                { "text": "Topic", "weight": 10, "dataAttributes": { "foo": "bar" } },
                { "text": "Raptor", "weight": 5 },
                { "text": "LOL u said LOL", "weight": 1, "title": "loltastic" }
            ]
        })
    }

    // ── run_layout ──────────────────────────────────────────────────────────

    #[test]
    fn test_run_layout_ranks_and_places() {
        let request: LayoutRequest = serde_json::from_value(sample_body()).unwrap();
        let response = run_layout(request, Typeface::Inter).unwrap();
        assert!(matches!(response.status, RenderStatus::Rendered));
        assert_eq!(response.elements.len(), 4);
        let tiers: Vec<Option<u8>> = response.topics.iter().map(|t| t.adjusted_weight).collect();
        assert_eq!(tiers, vec![Some(10), Some(5), Some(2), Some(1)]);
        assert!(response.container.scale > 0.0);
    }

    #[test]
    fn test_run_layout_missing_topics() {
        let request: LayoutRequest =
            serde_json::from_value(json!({ "width": 100, "height": 100 })).unwrap();
        let err = run_layout(request, Typeface::Inter).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_run_layout_circle_reports_margin() {
        let request: LayoutRequest = serde_json::from_value(json!({
            "width": 300,
            "height": 200,
            "topics": [],
            "options": { "circle": true }
        }))
        .unwrap();
        let response = run_layout(request, Typeface::Inter).unwrap();
        assert_eq!(response.container.width, 200.0);
        assert_eq!(response.container.margin_left, 50.0);
        assert!(response.elements.is_empty());
    }

    #[test]
    fn test_validate_dimensions() {
        assert!(validate_dimensions(10.0, 10.0).is_ok());
        assert!(validate_dimensions(0.0, 10.0).is_err());
        assert!(validate_dimensions(10.0, -1.0).is_err());
        assert!(validate_dimensions(f64::NAN, 10.0).is_err());
        assert!(validate_dimensions(10.0, f64::INFINITY).is_err());
    }

    // ── HTTP ────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_layout_endpoint_returns_elements() {
        let (status, body) = post_layout(sample_body()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "rendered");
        let elements = body["elements"].as_array().unwrap();
        assert_eq!(elements.len(), 4);
        assert_eq!(elements[0]["spec"]["id"], "epixcloud-0");
        assert_eq!(elements[0]["spec"]["className"], "epixword epixweight-10");
        assert_eq!(elements[0]["spec"]["dataAttributes"]["foo"], "bar");
        assert_eq!(elements[0]["spec"]["href"], "#");
        assert_eq!(elements[3]["spec"]["title"], "loltastic");
    }

    #[tokio::test]
    async fn test_layout_endpoint_applies_options() {
        let mut body = sample_body();
        body["options"] = json!({
            "wordClass": "testeytest",
            "idHead": "elRaptor-",
            "noScale": true,
            "typeface": "oswald"
        });
        let (status, body) = post_layout(body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["container"]["scale"], 1.0);
        assert_eq!(body["elements"][1]["spec"]["id"], "elRaptor-1");
        assert_eq!(body["elements"][1]["spec"]["className"], "testeytest epixweight-5");
    }

    #[tokio::test]
    async fn test_layout_endpoint_rejects_bad_dimensions() {
        let (status, body) = post_layout(json!({ "width": 0, "height": 100, "topics": [] })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_layout_endpoint_rejects_too_many_topics() {
        let topics: Vec<Value> = (0..6)
            .map(|i| json!({ "text": format!("t{i}"), "weight": i + 1 }))
            .collect();
        let (status, body) =
            post_layout(json!({ "width": 100, "height": 100, "topics": topics })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["message"].as_str().unwrap().contains("at most 5"));
    }

    #[tokio::test]
    async fn test_layout_endpoint_rejects_blank_text() {
        let (status, body) = post_layout(json!({
            "width": 100,
            "height": 100,
            "topics": [{ "text": "", "weight": 1 }]
        }))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "topic #0 is invalid: text is empty");
    }

    #[tokio::test]
    async fn test_health_and_unknown_route() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app()
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
