//! BDD test world for farmwatch

use cucumber::World;
use farmwatch::condition::Condition;
use farmwatch::forecast::{ForecastEntry, FORECAST_DAYS};
use farmwatch::state::StateHandle;

#[derive(Debug, Default, World)]
pub struct FarmwatchWorld {
    // Forecast testing
    pub inputs: Option<(f64, f64)>,
    pub forecast: Option<[ForecastEntry; FORECAST_DAYS]>,
    pub second_forecast: Option<[ForecastEntry; FORECAST_DAYS]>,

    // Classification testing
    pub condition: Option<Condition>,

    // State testing
    pub state: Option<StateHandle>,
}
