use serde::{Deserialize, Serialize};

use super::super::catalog::{category_of, Category};

/// How a `yes` answer is routed to a risk counter.
///
/// `IdRange` reproduces the historical positional rule (1-4, 5-7, 8-10, 11-12, rest) and
/// counts ids the catalog does not know as cancer. `Catalog` uses each question's declared
/// category and ignores unknown ids. Both agree on every id in the reference catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryBucketing {
    #[default]
    Catalog,
    IdRange,
}

impl CategoryBucketing {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "catalog" => Some(Self::Catalog),
            "id_range" | "id-range" | "range" => Some(Self::IdRange),
            _ => None,
        }
    }

    pub fn bucket(self, question_id: u32) -> Option<Category> {
        match self {
            Self::Catalog => category_of(question_id),
            Self::IdRange => Some(match question_id {
                0..=4 => Category::Diabetes,
                5..=7 => Category::Hypertension,
                8..=10 => Category::Cardiovascular,
                11..=12 => Category::Respiratory,
                _ => Category::Cancer,
            }),
        }
    }
}
