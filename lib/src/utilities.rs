use crate::service::common_structs::EmotionAnalysis;

pub const INVALID_TEXT_MESSAGE: &str = "Invalid Text! Please try again!";


// For the given statement, the system response is: 'anger': 0.0, ... 'sadness': 0.1. Dominant emotion: joy
pub fn format_emotion_statement(analysis: &EmotionAnalysis) -> String {
    let (Some(scores), Some(dominant)) = (analysis.scores(), analysis.dominant_emotion()) else {
        return INVALID_TEXT_MESSAGE.to_owned();
    };

    format!(
        "For the given statement, the system response is: \
        'anger': {}, 'disgust': {}, 'fear': {}, 'joy': {}, 'sadness': {}. \
        Dominant emotion: {}",
        format_score(scores.anger),
        format_score(scores.disgust),
        format_score(scores.fear),
        format_score(scores.joy),
        format_score(scores.sadness),
        dominant
    )
}

// 0.0, 0.9, 4.5e-05: shortest round-trip digits, exponent signed and padded to two digits
pub fn format_score(score: f64) -> String {
    let repr = format!("{:?}", score);
    let Some((mantissa, exponent)) = repr.split_once('e') else {
        return repr;
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("+", exponent),
    };
    format!("{}e{}{:0>2}", mantissa, sign, digits)
}
