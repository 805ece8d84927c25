//! AI relay: symptom consultations and meal photo analysis behind provider traits.

pub mod food;
pub mod providers;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use food::{strip_data_url, FoodEstimate, FALLBACK_FEEDBACK};
pub use providers::{AdviceProvider, Concept, FoodRecognizer, ProviderError};
pub use router::assistant_router;
pub use service::{AssistantError, AssistantService, Consultation, MealAnalysis, DISCLAIMER};
