//! Shared dashboard state: sensor readings and the derived forecast

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tokio::sync::RwLock;

use crate::forecast::ForecastSet;
use crate::sensor::{payload_to_string, Reading, SensorKey, SensorReadings};

/// What an update did to the state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub changed: bool,
    pub forecast_recomputed: bool,
}

/// State owned by the controller and read by the dashboard
#[derive(Debug)]
pub struct DashboardState {
    pub readings: SensorReadings,
    pub forecast: ForecastSet,
    /// Number of forecast computations so far
    pub forecast_generation: u64,
    pub last_update_epoch_ms: Option<u64>,
    pub started_at: Instant,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardState {
    pub fn new() -> Self {
        Self {
            readings: SensorReadings::default(),
            forecast: ForecastSet::Loading,
            forecast_generation: 0,
            last_update_epoch_ms: None,
            started_at: Instant::now(),
        }
    }

    /// Apply one store notification for `key`.
    ///
    /// The forecast is rebuilt when ambient temperature or radiation changes
    /// and neither of them is still loading.
    pub fn apply_update(
        &mut self,
        key: SensorKey,
        payload: Option<&Value>,
        now_ms: u64,
    ) -> UpdateOutcome {
        let value = payload_to_string(payload);
        let changed = self.readings.set(key, value);
        self.last_update_epoch_ms = Some(now_ms);

        let forecast_input = matches!(key, SensorKey::DhtTemperature | SensorKey::Radiation);
        let forecast_recomputed = changed && forecast_input && self.recompute_forecast();

        UpdateOutcome {
            changed,
            forecast_recomputed,
        }
    }

    fn recompute_forecast(&mut self) -> bool {
        let (Reading::Value(temperature), Reading::Value(radiation)) =
            (&self.readings.dht_temperature, &self.readings.radiation)
        else {
            return false;
        };

        self.forecast = ForecastSet::from_readings(temperature, radiation);
        self.forecast_generation += 1;
        true
    }
}

/// Thread-safe shared state handle
pub type StateHandle = Arc<RwLock<DashboardState>>;

pub fn new_state_handle() -> StateHandle {
    Arc::new(RwLock::new(DashboardState::new()))
}
