//! Weather condition categories derived from temperature and radiation

use serde::{Deserialize, Serialize};
use std::fmt;

/// Display category for a (temperature, radiation) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Clear,
    Cloudy,
    Rainy,
    Normal,
}

impl Condition {
    /// Static image shown for this condition
    pub fn image_path(self) -> &'static str {
        match self {
            Condition::Clear => "/assets/weather/sunny.png",
            Condition::Cloudy => "/assets/weather/cloudy.png",
            Condition::Rainy => "/assets/weather/rainy.png",
            Condition::Normal => "/assets/weather/normal.png",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Clear => write!(f, "clear"),
            Condition::Cloudy => write!(f, "cloudy"),
            Condition::Rainy => write!(f, "rainy"),
            Condition::Normal => write!(f, "normal"),
        }
    }
}

/// Classify a reading. The first matching band wins; `NaN` matches nothing.
pub fn classify(temperature: f64, radiation: f64) -> Condition {
    if (25.0..=35.0).contains(&temperature) && radiation > 700.0 {
        Condition::Clear
    } else if (20.0..=25.0).contains(&temperature) && radiation > 200.0 && radiation <= 700.0 {
        Condition::Cloudy
    } else if (18.0..=24.0).contains(&temperature) && radiation < 200.0 {
        Condition::Rainy
    } else {
        Condition::Normal
    }
}
