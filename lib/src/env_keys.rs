pub static EMOTION_API_URL: &str = "EMOTION_API_URL";
pub static EMOTION_MODEL_ID: &str = "EMOTION_MODEL_ID";
pub static EMOTION_TIMEOUT_SECS: &str = "EMOTION_TIMEOUT_SECS";

pub static HOST: &str = "HOST";
pub static PORT: &str = "PORT";
