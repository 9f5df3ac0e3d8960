use serde::{Deserialize, Serialize};

use crate::service::common_structs::EmotionScores;
use super::error::ClassificationError;


// {"raw_document": {"text": "..."}}
#[derive(Debug, Serialize, Clone)]
pub struct EmotionPredictRequest<'a> {
    pub raw_document: RawDocument<'a>,
}

#[derive(Debug, Serialize, Clone)]
pub struct RawDocument<'a> {
    pub text: &'a str,
}

impl<'a> EmotionPredictRequest<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            raw_document: RawDocument { text }
        }
    }
}


// {"emotionPredictions": [{"emotion": {"anger": .., "disgust": .., "fear": .., "joy": .., "sadness": ..}, ...}], ...}
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EmotionPredictResponse {
    pub emotion_predictions: Vec<EmotionPrediction>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmotionPrediction {
    pub emotion: EmotionScores,
}

impl EmotionPredictResponse {
    /// Scores of the first prediction, checked to lie within [0, 1].
    pub fn into_scores(self) -> Result<EmotionScores, ClassificationError> {
        let prediction = self.emotion_predictions
            .into_iter()
            .next()
            .ok_or_else(|| ClassificationError::MalformedResponse("emotionPredictions is empty".to_owned()))?;

        let scores = prediction.emotion;
        if let Some((emotion, score)) = scores.first_out_of_range() {
            return Err(ClassificationError::MalformedResponse(
                format!("score for {} out of range: {}", emotion, score)
            ));
        }
        Ok(scores)
    }
}
