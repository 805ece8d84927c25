use super::super::catalog::Category;
use super::super::domain::{Finding, RiskLevel};
use super::rules::RiskCounters;

const CANCER_MIN_AGE: u32 = 40;

struct Referral {
    disease: &'static str,
    specialty: &'static str,
    recommendation: &'static str,
}

const fn referral(category: Category) -> Referral {
    match category {
        Category::Diabetes => Referral {
            disease: "Diabetes mellitus",
            specialty: "Endocrinologist",
            recommendation: "Check blood sugar regularly and keep to a healthy diet",
        },
        Category::Hypertension => Referral {
            disease: "Hypertension",
            specialty: "Cardiologist",
            recommendation: "Measure blood pressure regularly",
        },
        Category::Cardiovascular => Referral {
            disease: "Cardiovascular disease",
            specialty: "Cardiologist",
            recommendation: "Get an ECG examination",
        },
        Category::Respiratory => Referral {
            disease: "Respiratory disease",
            specialty: "Pulmonologist",
            recommendation: "Get a lung examination",
        },
        Category::Cancer => Referral {
            disease: "Cancer risk",
            specialty: "Oncologist",
            recommendation: "Undergo a full examination",
        },
    }
}

/// Threshold rule for a single category, `None` when nothing is reported.
fn grade(category: Category, count: u32, age_years: u32) -> Option<RiskLevel> {
    match category {
        Category::Diabetes | Category::Hypertension | Category::Cardiovascular => match count {
            0 | 1 => None,
            2 => Some(RiskLevel::Moderate),
            _ => Some(RiskLevel::High),
        },
        Category::Respiratory => (count >= 1).then_some(RiskLevel::Moderate),
        Category::Cancer => {
            (count >= 2 && age_years >= CANCER_MIN_AGE).then_some(RiskLevel::Moderate)
        }
    }
}

pub(crate) fn findings_for(counters: &RiskCounters, age_years: u32) -> Vec<Finding> {
    Category::ordered()
        .into_iter()
        .filter_map(|category| {
            let level = grade(category, counters.get(category), age_years)?;
            let referral = referral(category);
            Some(Finding {
                disease: referral.disease.to_string(),
                risk_level: level,
                referral_specialty: referral.specialty.to_string(),
                recommendation: referral.recommendation.to_string(),
            })
        })
        .collect()
}
