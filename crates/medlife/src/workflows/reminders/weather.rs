use serde::Serialize;

/// Current conditions source, keyed by the subject's region name.
pub trait WeatherProvider: Send + Sync {
    fn current_temperature(&self, region: &str) -> Result<f64, WeatherError>;
}

#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("no weather data for region '{0}'")]
    UnknownRegion(String),
    #[error("weather provider unavailable: {0}")]
    Unavailable(String),
}

const HOT_CELSIUS: f64 = 30.0;
const WARM_CELSIUS: f64 = 25.0;
const COLD_CELSIUS: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherAdvisory {
    Hot,
    Warm,
    Cold,
}

impl WeatherAdvisory {
    pub const fn message(self) -> &'static str {
        match self {
            Self::Hot => {
                "It is very hot today. Drink more water and avoid long spells in the sun. \
                 Keep an eye on your blood sugar."
            }
            Self::Warm => "It is warm today. Remember to drink water and rest in the shade.",
            Self::Cold => {
                "It is cold today. Keep moving and dress warmly. \
                 Eat regularly and take your medication."
            }
        }
    }
}

/// Advice for a temperature in degrees Celsius; mild weather gets none.
pub fn advisory_for(celsius: f64) -> Option<WeatherAdvisory> {
    if celsius > HOT_CELSIUS {
        Some(WeatherAdvisory::Hot)
    } else if celsius < COLD_CELSIUS {
        Some(WeatherAdvisory::Cold)
    } else if celsius > WARM_CELSIUS {
        Some(WeatherAdvisory::Warm)
    } else {
        None
    }
}
