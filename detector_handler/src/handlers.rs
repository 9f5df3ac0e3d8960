use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::response::Json;
use lib::service::emotion_service::error::ClassificationError;
use lib::service::CommonService;
use lib::utilities::format_emotion_statement;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

const INDEX_HTML: &str = include_str!("../templates/index.html");


#[derive(Debug, Deserialize, Default)]
pub struct DetectEmotionParams {
    #[serde(rename = "textToAnalyze")]
    pub text_to_analyze: Option<String>,
}


pub struct DetectionError(ClassificationError);

impl From<ClassificationError> for DetectionError {
    fn from(error: ClassificationError) -> Self {
        Self(error)
    }
}

impl IntoResponse for DetectionError {
    fn into_response(self) -> Response {
        error!("Error classifying text: {}", self.0);
        let status = if self.0.is_timeout() {
            StatusCode::GATEWAY_TIMEOUT
        } else {
            StatusCode::BAD_GATEWAY
        };
        (status, "Emotion service unavailable. Please try again later.").into_response()
    }
}


pub async fn detect_emotion(
    State(service): State<CommonService>,
    Query(params): Query<DetectEmotionParams>,
) -> Result<String, DetectionError> {
    let text = params.text_to_analyze.unwrap_or_default();
    let analysis = service.emotion.classify(&text).await?;

    if let Some(dominant) = analysis.dominant_emotion() {
        info!("dominant emotion: {}", dominant);
    }

    Ok(format_emotion_statement(&analysis))
}

pub async fn index_page() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "ok": true,
        "service": "emotion-detector"
    }))
}


#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::HeaderMap;
    use axum::routing::post;
    use axum::Router;
    use lib::service::emotion_service::{EmotionServiceConfig, DEFAULT_MODEL_ID};
    use lib::utilities::INVALID_TEXT_MESSAGE;
    use serde_json::Value;

    use super::*;
    use crate::app;

    const PREDICT_PATH: &str = "/v1/watson.runtime.nlp.v1/NlpService/EmotionPredict";

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", address)
    }

    async fn stub_predict(headers: HeaderMap, Json(body): Json<Value>) -> Response {
        assert_eq!(headers.get("grpc-metadata-mm-model-id").unwrap(), DEFAULT_MODEL_ID);
        let text = body["raw_document"]["text"].as_str().unwrap_or_default();
        match text {
            "" => StatusCode::BAD_REQUEST.into_response(),
            "I am so mad" => Json(json!({
                "emotionPredictions": [
                    {"emotion": {"anger": 0.8, "disgust": 0.1, "fear": 0.05, "joy": 0.0, "sadness": 0.05}}
                ]
            })).into_response(),
            "overloaded" => (StatusCode::SERVICE_UNAVAILABLE, "rate limited").into_response(),
            "garbled" => Json(json!({"predictions": [{"label": "joy"}]})).into_response(),
            "slow" => {
                tokio::time::sleep(Duration::from_secs(3)).await;
                StatusCode::OK.into_response()
            },
            _ => Json(json!({
                "emotionPredictions": [
                    {"emotion": {"anger": 0.0, "disgust": 0.0, "fear": 0.0, "joy": 0.9, "sadness": 0.1}}
                ]
            })).into_response(),
        }
    }

    // Starts a stubbed emotion service and the detector app pointing at it.
    async fn spawn_detector() -> String {
        let stub = serve(Router::new().route(PREDICT_PATH, post(stub_predict))).await;
        let config = EmotionServiceConfig {
            endpoint: format!("{}{}", stub, PREDICT_PATH),
            model_id: DEFAULT_MODEL_ID.to_owned(),
            timeout: Duration::from_millis(500),
        };
        serve(app(CommonService::new(&config).unwrap())).await
    }

    async fn get(url: &str) -> (u16, String, String) {
        let response = reqwest::get(url).await.unwrap();
        let status = response.status().as_u16();
        let content_type = response.headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        (status, content_type, response.text().await.unwrap())
    }

    #[tokio::test]
    async fn detects_joy() {
        let base = spawn_detector().await;
        let (status, content_type, body) =
            get(&format!("{}/emotionDetector?textToAnalyze=I%20am%20feeling%20happy%20today.", base)).await;

        assert_eq!(status, 200);
        assert!(content_type.starts_with("text/plain"));
        assert_eq!(
            body,
            "For the given statement, the system response is: 'anger': 0.0, 'disgust': 0.0, \
            'fear': 0.0, 'joy': 0.9, 'sadness': 0.1. Dominant emotion: joy"
        );
    }

    #[tokio::test]
    async fn detects_anger() {
        let base = spawn_detector().await;
        let (status, _, body) = get(&format!("{}/emotionDetector?textToAnalyze=I+am+so+mad", base)).await;

        assert_eq!(status, 200);
        assert!(body.starts_with("For the given statement, the system response is: 'anger': 0.8, "));
        assert!(body.ends_with("Dominant emotion: anger"));
    }

    #[tokio::test]
    async fn empty_text_returns_invalid_message() {
        let base = spawn_detector().await;
        let (status, _, body) = get(&format!("{}/emotionDetector?textToAnalyze=", base)).await;

        assert_eq!(status, 200);
        assert_eq!(body, INVALID_TEXT_MESSAGE);
    }

    #[tokio::test]
    async fn missing_parameter_is_treated_as_empty() {
        let base = spawn_detector().await;
        let (status, _, body) = get(&format!("{}/emotionDetector", base)).await;

        assert_eq!(status, 200);
        assert_eq!(body, INVALID_TEXT_MESSAGE);
    }

    #[tokio::test]
    async fn slow_service_returns_gateway_timeout() {
        let base = spawn_detector().await;
        let (status, _, _) = get(&format!("{}/emotionDetector?textToAnalyze=slow", base)).await;

        assert_eq!(status, 504);
    }

    #[tokio::test]
    async fn unreachable_service_returns_bad_gateway() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let closed = listener.local_addr().unwrap();
        drop(listener);

        let config = EmotionServiceConfig {
            endpoint: format!("http://{}{}", closed, PREDICT_PATH),
            ..EmotionServiceConfig::default()
        };
        let base = serve(app(CommonService::new(&config).unwrap())).await;
        let (status, _, _) = get(&format!("{}/emotionDetector?textToAnalyze=hello", base)).await;

        assert_eq!(status, 502);
    }

    #[tokio::test]
    async fn service_error_status_returns_bad_gateway() {
        let base = spawn_detector().await;
        let (status, content_type, body) = get(&format!("{}/emotionDetector?textToAnalyze=overloaded", base)).await;

        assert_eq!(status, 502);
        assert!(content_type.starts_with("text/plain"));
        assert!(!body.contains("Dominant emotion"));
    }

    #[tokio::test]
    async fn malformed_service_payload_returns_bad_gateway() {
        let base = spawn_detector().await;
        let (status, _, body) = get(&format!("{}/emotionDetector?textToAnalyze=garbled", base)).await;

        assert_eq!(status, 502);
        assert_ne!(body, INVALID_TEXT_MESSAGE);
    }

    #[tokio::test]
    async fn index_page_is_html() {
        let base = spawn_detector().await;
        let (status, content_type, body) = get(&format!("{}/", base)).await;

        assert_eq!(status, 200);
        assert!(content_type.starts_with("text/html"));
        assert!(body.contains("/emotionDetector"));
    }

    #[tokio::test]
    async fn health_check_reports_ok() {
        let base = spawn_detector().await;
        let (status, _, body) = get(&format!("{}/healthz", base)).await;

        assert_eq!(status, 200);
        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["ok"], true);
    }
}
