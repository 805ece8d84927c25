use serde::{Deserialize, Serialize};

/// Text-generation backend used for symptom guidance and food feedback.
pub trait AdviceProvider: Send + Sync {
    fn symptom_guidance(&self, prompt: &str) -> Result<String, ProviderError>;
    fn food_feedback(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Image classifier returning concept labels, best match first.
pub trait FoodRecognizer: Send + Sync {
    fn recognize(&self, image_base64: &str) -> Result<Vec<Concept>, ProviderError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    pub name: String,
    pub confidence: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider rejected the request: {0}")]
    Rejected(String),
    #[error("provider unavailable: {0}")]
    Unavailable(String),
    #[error("provider returned no usable result")]
    Empty,
}
