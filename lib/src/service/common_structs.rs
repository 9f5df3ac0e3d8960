use std::fmt;

use serde::{Deserialize, Serialize, Serializer};


#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Anger,
    Disgust,
    Fear,
    Joy,
    Sadness,
}

impl Emotion {
    // order used for display and for breaking ties
    pub const ALL: [Emotion; 5] = [
        Emotion::Anger,
        Emotion::Disgust,
        Emotion::Fear,
        Emotion::Joy,
        Emotion::Sadness,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Anger => "anger",
            Emotion::Disgust => "disgust",
            Emotion::Fear => "fear",
            Emotion::Joy => "joy",
            Emotion::Sadness => "sadness",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}


/// Confidence values in [0, 1] for each emotion, as returned by the emotion service.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct EmotionScores {
    pub anger: f64,
    pub disgust: f64,
    pub fear: f64,
    pub joy: f64,
    pub sadness: f64,
}

impl EmotionScores {
    pub fn score(&self, emotion: Emotion) -> f64 {
        match emotion {
            Emotion::Anger => self.anger,
            Emotion::Disgust => self.disgust,
            Emotion::Fear => self.fear,
            Emotion::Joy => self.joy,
            Emotion::Sadness => self.sadness,
        }
    }

    /// First emotion whose score is NaN or outside [0, 1].
    pub fn first_out_of_range(&self) -> Option<(Emotion, f64)> {
        Emotion::ALL
            .into_iter()
            .map(|emotion| (emotion, self.score(emotion)))
            .find(|(_, score)| !(0.0..=1.0).contains(score))
    }

    /// Highest scoring emotion. Ties go to the earliest entry of `Emotion::ALL`.
    pub fn dominant_emotion(&self) -> Emotion {
        let mut dominant = Emotion::ALL[0];
        for emotion in Emotion::ALL.into_iter().skip(1) {
            if self.score(emotion) > self.score(dominant) {
                dominant = emotion;
            }
        }
        dominant
    }
}


/// Outcome of one classification call.
///
/// Either carries scores together with their dominant emotion, or nothing at all
/// when the service refused the text (empty or unprocessable input).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmotionAnalysis {
    scores: Option<EmotionScores>,
    dominant_emotion: Option<Emotion>,
}

impl EmotionAnalysis {
    pub fn from_scores(scores: EmotionScores) -> Self {
        Self {
            dominant_emotion: Some(scores.dominant_emotion()),
            scores: Some(scores),
        }
    }

    pub fn unprocessable() -> Self {
        Self {
            scores: None,
            dominant_emotion: None,
        }
    }

    pub fn scores(&self) -> Option<&EmotionScores> {
        self.scores.as_ref()
    }

    pub fn score(&self, emotion: Emotion) -> Option<f64> {
        self.scores.map(|scores| scores.score(emotion))
    }

    pub fn dominant_emotion(&self) -> Option<Emotion> {
        self.dominant_emotion
    }

    pub fn is_unprocessable(&self) -> bool {
        self.dominant_emotion.is_none()
    }
}

// {"anger": .., "disgust": .., "fear": .., "joy": .., "sadness": .., "dominant_emotion": ..}, nulls when unprocessable
#[derive(Serialize)]
struct FlatAnalysis {
    anger: Option<f64>,
    disgust: Option<f64>,
    fear: Option<f64>,
    joy: Option<f64>,
    sadness: Option<f64>,
    dominant_emotion: Option<Emotion>,
}

impl Serialize for EmotionAnalysis {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        FlatAnalysis {
            anger: self.score(Emotion::Anger),
            disgust: self.score(Emotion::Disgust),
            fear: self.score(Emotion::Fear),
            joy: self.score(Emotion::Joy),
            sadness: self.score(Emotion::Sadness),
            dominant_emotion: self.dominant_emotion,
        }
        .serialize(serializer)
    }
}
