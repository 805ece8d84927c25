use serde::{Deserialize, Serialize};

/// Disease domains covered by the screening questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Diabetes,
    Hypertension,
    Cardiovascular,
    Respiratory,
    Cancer,
}

impl Category {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Diabetes,
            Self::Hypertension,
            Self::Cardiovascular,
            Self::Respiratory,
            Self::Cancer,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Diabetes => "diabetes",
            Self::Hypertension => "hypertension",
            Self::Cardiovascular => "cardiovascular",
            Self::Respiratory => "respiratory",
            Self::Cancer => "cancer",
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

/// Minimum age at which a question is asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeGate {
    Any,
    Adult,
    MiddleAge,
}

impl AgeGate {
    pub const fn min_age(self) -> Option<u32> {
        match self {
            Self::Any => None,
            Self::Adult => Some(18),
            Self::MiddleAge => Some(40),
        }
    }

    pub const fn admits(self, age_years: u32) -> bool {
        match self.min_age() {
            None => true,
            Some(min) => age_years >= min,
        }
    }
}

/// A single catalog entry. Ids are stable across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub id: u32,
    pub text: &'static str,
    pub category: Category,
    pub gate: AgeGate,
}

impl Question {
    const fn new(id: u32, text: &'static str, category: Category, gate: AgeGate) -> Self {
        Self {
            id,
            text,
            category,
            gate,
        }
    }

    pub fn view(&self) -> QuestionView {
        QuestionView {
            id: self.id,
            question: self.text.to_string(),
            category: self.category,
        }
    }
}

/// Client-facing shape of a question; the age gate stays server side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionView {
    pub id: u32,
    pub question: String,
    pub category: Category,
}

/// Reference questionnaire, grouped by category in declaration order.
pub static CATALOG: [Question; 14] = [
    Question::new(1, "Have you been diagnosed with diabetes?", Category::Diabetes, AgeGate::Any),
    Question::new(2, "Has anyone in your family had diabetes?", Category::Diabetes, AgeGate::Any),
    Question::new(3, "Do you often feel thirsty?", Category::Diabetes, AgeGate::Any),
    Question::new(
        4,
        "Has your weight dropped or risen unexpectedly?",
        Category::Diabetes,
        AgeGate::Any,
    ),
    Question::new(5, "Do you get frequent headaches?", Category::Hypertension, AgeGate::MiddleAge),
    Question::new(6, "Does your heart often race?", Category::Hypertension, AgeGate::MiddleAge),
    Question::new(
        7,
        "Has anyone in your family had cardiovascular disease?",
        Category::Hypertension,
        AgeGate::MiddleAge,
    ),
    Question::new(8, "Do you feel chest pain?", Category::Cardiovascular, AgeGate::MiddleAge),
    Question::new(
        9,
        "Do you have episodes of shortness of breath?",
        Category::Cardiovascular,
        AgeGate::MiddleAge,
    ),
    Question::new(10, "Do you smoke?", Category::Cardiovascular, AgeGate::Adult),
    Question::new(11, "Do you have a long-lasting cough?", Category::Respiratory, AgeGate::Any),
    Question::new(12, "Do you find it hard to breathe?", Category::Respiratory, AgeGate::Any),
    Question::new(
        13,
        "Has anyone in your family had cancer?",
        Category::Cancer,
        AgeGate::MiddleAge,
    ),
    Question::new(
        14,
        "Have you lost a noticeable amount of body weight?",
        Category::Cancer,
        AgeGate::MiddleAge,
    ),
];

/// Questions applicable to a subject of the given age, in catalog order.
///
/// Negative or implausible ages are the caller's concern; `u32` already rules out the former.
pub fn select_questions(age_years: u32) -> Vec<&'static Question> {
    Category::ordered()
        .into_iter()
        .flat_map(|category| {
            CATALOG
                .iter()
                .filter(move |question| question.category == category)
        })
        .filter(|question| question.gate.admits(age_years))
        .collect()
}

pub fn find_question(question_id: u32) -> Option<&'static Question> {
    CATALOG.iter().find(|question| question.id == question_id)
}

/// Declared category of a catalog question, `None` for ids the catalog does not know.
pub fn category_of(question_id: u32) -> Option<Category> {
    find_question(question_id).map(|question| question.category)
}
