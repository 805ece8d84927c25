use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::domain::RecordId;
use crate::workflows::subjects::SubjectId;

const SUGAR_WARNING_GRAMS: f64 = 10.0;
const SUGAR_DANGER_GRAMS: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

/// Traffic-light rating of a food's sugar load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SugarStatus {
    Normal,
    Warning,
    Danger,
}

impl SugarStatus {
    pub fn classify(sugar_grams: f64) -> Self {
        if sugar_grams > SUGAR_DANGER_GRAMS {
            Self::Danger
        } else if sugar_grams > SUGAR_WARNING_GRAMS {
            Self::Warning
        } else {
            Self::Normal
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub image: String,
    #[serde(default)]
    pub food_name: Option<String>,
    #[serde(default)]
    pub sugar_content: Option<f64>,
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default)]
    pub carbs: Option<f64>,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub status: Option<SugarStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMeal {
    pub meal_type: MealType,
    pub date: NaiveDate,
    pub foods: Vec<FoodItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealEntry {
    pub id: RecordId,
    pub subject_id: SubjectId,
    pub meal_type: MealType,
    pub date: NaiveDate,
    pub foods: Vec<FoodItem>,
    pub total_sugar: f64,
    pub total_calories: f64,
    pub created_at: DateTime<Utc>,
}

impl MealEntry {
    /// Totals treat missing per-food values as zero.
    pub fn from_submission(subject_id: SubjectId, meal: NewMeal, created_at: DateTime<Utc>) -> Self {
        let total_sugar = meal
            .foods
            .iter()
            .map(|food| food.sugar_content.unwrap_or(0.0))
            .sum();
        let total_calories = meal
            .foods
            .iter()
            .map(|food| food.calories.unwrap_or(0.0))
            .sum();

        Self {
            id: RecordId::next("meal"),
            subject_id,
            meal_type: meal.meal_type,
            date: meal.date,
            foods: meal.foods,
            total_sugar,
            total_calories,
            created_at,
        }
    }
}
