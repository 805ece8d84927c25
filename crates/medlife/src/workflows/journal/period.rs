use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Reporting granularity for journal statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatsPeriod {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl StatsPeriod {
    /// Window containing `target`. Weeks run Sunday through Saturday.
    pub fn window(self, target: NaiveDate) -> DateWindow {
        match self {
            Self::Daily => DateWindow {
                start: target,
                end: target,
            },
            Self::Weekly => {
                let offset = i64::from(target.weekday().num_days_from_sunday());
                let start = target - Duration::days(offset);
                DateWindow {
                    start,
                    end: start + Duration::days(6),
                }
            }
            Self::Monthly => {
                let start = target.with_day(1).unwrap_or(target);
                let next_month = if start.month() == 12 {
                    NaiveDate::from_ymd_opt(start.year() + 1, 1, 1)
                } else {
                    NaiveDate::from_ymd_opt(start.year(), start.month() + 1, 1)
                };
                let end = next_month
                    .and_then(|first| first.pred_opt())
                    .unwrap_or(target);
                DateWindow { start, end }
            }
            Self::Yearly => DateWindow {
                start: NaiveDate::from_ymd_opt(target.year(), 1, 1).unwrap_or(target),
                end: NaiveDate::from_ymd_opt(target.year(), 12, 31).unwrap_or(target),
            },
        }
    }
}
