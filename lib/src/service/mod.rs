pub mod emotion_service;
pub mod common_structs;

use anyhow::Result;
use emotion_service::{EmotionService, EmotionServiceConfig};


#[derive(Debug, Clone)]
pub struct CommonService {
    pub emotion: EmotionService,
}

impl CommonService {
    pub fn new(config: &EmotionServiceConfig) -> Result<Self> {
        Ok(Self {
            emotion: EmotionService::new(config)?,
        })
    }
}
