use serde::{Deserialize, Serialize};

use super::providers::Concept;
use crate::workflows::journal::SugarStatus;

/// Grams of sugar assumed per keyword found in a recognised label; first match wins.
const SUGAR_TABLE: [(&str, f64); 12] = [
    ("rice", 0.5),
    ("bread", 2.0),
    ("pasta", 1.0),
    ("potato", 0.8),
    ("fruit", 10.0),
    ("vegetable", 2.0),
    ("meat", 0.0),
    ("fish", 0.0),
    ("cake", 25.0),
    ("candy", 50.0),
    ("juice", 12.0),
    ("soda", 10.0),
];

const DEFAULT_SUGAR: f64 = 5.0;

pub const FALLBACK_FEEDBACK: &str = "Consume in moderation.";

/// Rough nutrition estimate for a photographed dish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodEstimate {
    pub food_name: String,
    pub confidence: f64,
    pub sugar_content: f64,
    pub calories: f64,
    pub carbs: f64,
}

impl FoodEstimate {
    pub fn from_concept(concept: &Concept) -> Self {
        let label = concept.name.to_lowercase();
        let sugar = SUGAR_TABLE
            .iter()
            .find(|(keyword, _)| label.contains(keyword))
            .map_or(DEFAULT_SUGAR, |(_, sugar)| *sugar);

        Self {
            food_name: concept.name.clone(),
            confidence: concept.confidence,
            sugar_content: sugar,
            calories: sugar * 4.0 + 100.0,
            carbs: sugar * 1.2,
        }
    }

    /// Estimate used when the recogniser cannot label the image.
    pub fn unknown() -> Self {
        Self {
            food_name: "unknown food".to_string(),
            confidence: 0.0,
            sugar_content: DEFAULT_SUGAR,
            calories: 150.0,
            carbs: 15.0,
        }
    }

    pub fn status(&self) -> SugarStatus {
        SugarStatus::classify(self.sugar_content)
    }
}

/// Drop a leading `data:image/<type>;base64,` header if present.
pub fn strip_data_url(image: &str) -> &str {
    let Some(rest) = image.strip_prefix("data:image/") else {
        return image;
    };
    match rest.split_once(";base64,") {
        Some((subtype, payload))
            if !subtype.is_empty()
                && subtype
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_') =>
        {
            payload
        }
        _ => image,
    }
}
