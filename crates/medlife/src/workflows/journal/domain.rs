use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier shared by every journal entry kind; the prefix tells them apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub String);

static RECORD_SEQUENCE: AtomicU64 = AtomicU64::new(1);

impl RecordId {
    pub(crate) fn next(prefix: &str) -> Self {
        let id = RECORD_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        Self(format!("{prefix}-{id:06}"))
    }
}

/// Wall-clock time of day carried as `HH:MM` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    pub fn parse(raw: &str) -> Result<Self, String> {
        let trimmed = raw.trim();
        NaiveTime::parse_from_str(trimmed, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
            .map(|time| Self(time.with_second(0).unwrap_or(time)))
            .map_err(|err| format!("failed to parse '{raw}' as HH:MM ({err})"))
    }

    pub fn minutes_since_midnight(self) -> i64 {
        i64::from(self.0.hour()) * 60 + i64::from(self.0.minute())
    }

    pub fn time(self) -> NaiveTime {
        self.0
    }
}

impl From<NaiveTime> for ClockTime {
    fn from(value: NaiveTime) -> Self {
        Self(value.with_second(0).unwrap_or(value))
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_time_round_trips_through_json() {
        let time: ClockTime = serde_json::from_str("\"08:30\"").expect("parses");
        assert_eq!(time.minutes_since_midnight(), 510);
        assert_eq!(serde_json::to_string(&time).expect("serializes"), "\"08:30\"");
    }

    #[test]
    fn clock_time_drops_seconds() {
        let time = ClockTime::parse("21:05:59").expect("parses with seconds");
        assert_eq!(time.to_string(), "21:05");
    }

    #[test]
    fn clock_time_rejects_garbage() {
        assert!(ClockTime::parse("quarter past").is_err());
        assert!(serde_json::from_str::<ClockTime>("\"25:00\"").is_err());
    }
}
