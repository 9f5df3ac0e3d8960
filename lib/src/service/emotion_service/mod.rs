pub mod error;
pub mod structs;

use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::{header::{HeaderMap, HeaderName, HeaderValue}, Client, StatusCode};
use tracing::{debug, warn};

use crate::env_keys::{EMOTION_API_URL, EMOTION_MODEL_ID, EMOTION_TIMEOUT_SECS};
use super::common_structs::EmotionAnalysis;
use error::ClassificationError;
use structs::{EmotionPredictRequest, EmotionPredictResponse};

pub const DEFAULT_EMOTION_API_URL: &str = "https://sn-watson-emotion.labs.skills.network/v1/watson.runtime.nlp.v1/NlpService/EmotionPredict";
pub const DEFAULT_MODEL_ID: &str = "emotion_aggregated-workflow_lang_en_stock";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

const MODEL_ID_HEADER: &str = "grpc-metadata-mm-model-id";


#[derive(Debug, Clone, PartialEq)]
pub struct EmotionServiceConfig {
    pub endpoint: String,
    pub model_id: String,
    pub timeout: Duration,
}

impl Default for EmotionServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_EMOTION_API_URL.to_owned(),
            model_id: DEFAULT_MODEL_ID.to_owned(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl EmotionServiceConfig {
    /// Reads overrides from the environment, falling back to the public Watson endpoint.
    pub fn from_env() -> Result<Self> {
        let timeout = match std::env::var(EMOTION_TIMEOUT_SECS) {
            Ok(value) => parse_timeout(&value)?,
            Err(_) => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            endpoint: std::env::var(EMOTION_API_URL).unwrap_or(DEFAULT_EMOTION_API_URL.to_owned()),
            model_id: std::env::var(EMOTION_MODEL_ID).unwrap_or(DEFAULT_MODEL_ID.to_owned()),
            timeout,
        })
    }
}

// seconds, fractional allowed; must be positive
fn parse_timeout(value: &str) -> Result<Duration> {
    let seconds: f64 = value.trim().parse()
        .with_context(|| format!("{} is not a number: {}", EMOTION_TIMEOUT_SECS, value))?;
    if seconds.is_nan() || seconds <= 0.0 {
        bail!("{} must be positive: {}", EMOTION_TIMEOUT_SECS, value);
    }
    Duration::try_from_secs_f64(seconds)
        .with_context(|| format!("{} is not a valid duration: {}", EMOTION_TIMEOUT_SECS, value))
}


#[derive(Debug, Clone)]
pub struct EmotionService {
    client: Client,
    endpoint: String,
    headers: HeaderMap,
    timeout: Duration,
}

impl EmotionService {
    pub fn new(config: &EmotionServiceConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(MODEL_ID_HEADER),
            HeaderValue::from_str(&config.model_id).context("model id is not a valid header value")?,
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Error building emotion service client")?;

        Ok(Self {
            client,
            endpoint: config.endpoint.to_owned(),
            headers,
            timeout: config.timeout,
        })
    }

    /// Sends `text` to the emotion service.
    ///
    /// A 400 from the service means it could not process the text (empty input included)
    /// and is returned as [`EmotionAnalysis::unprocessable`] rather than an error.
    pub async fn classify(&self, text: &str) -> Result<EmotionAnalysis, ClassificationError> {
        debug!(endpoint = %self.endpoint, text_len = text.len(), "sending emotion predict request");

        let response = self.client
            .post(&self.endpoint)
            .headers(self.headers.clone())
            .json(&EmotionPredictRequest::new(text))
            .send()
            .await
            .map_err(|error| self.transport_error(error))?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST {
            warn!("emotion service rejected the text as unprocessable");
            return Ok(EmotionAnalysis::unprocessable());
        }
        if !status.is_success() {
            return Err(ClassificationError::UnexpectedStatus(status));
        }

        let body_string = response.text().await.map_err(|error| self.transport_error(error))?;
        debug!("response_body: {}", body_string);

        let payload = serde_json::from_str::<EmotionPredictResponse>(&body_string)
            .map_err(|error| ClassificationError::MalformedResponse(error.to_string()))?;
        let scores = payload.into_scores()?;

        Ok(EmotionAnalysis::from_scores(scores))
    }

    fn transport_error(&self, error: reqwest::Error) -> ClassificationError {
        if error.is_timeout() {
            ClassificationError::Timeout(self.timeout)
        } else {
            ClassificationError::Network(error)
        }
    }
}
