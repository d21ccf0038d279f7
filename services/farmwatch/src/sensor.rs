//! Sensor keys, readings and payload normalisation

use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Text shown for a reading that has not received its first update
pub const LOADING: &str = "Loading...";

/// One of the eight measurements published under `sensor/` in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SensorKey {
    SoilMoisture,
    SoilPh,
    WindSpeed,
    Rainfall,
    Radiation,
    SoilTemperature,
    DhtTemperature,
    DhtHumidity,
}

impl SensorKey {
    /// All keys, in display order
    pub const ALL: [SensorKey; 8] = [
        SensorKey::SoilMoisture,
        SensorKey::SoilPh,
        SensorKey::WindSpeed,
        SensorKey::Rainfall,
        SensorKey::Radiation,
        SensorKey::SoilTemperature,
        SensorKey::DhtTemperature,
        SensorKey::DhtHumidity,
    ];

    /// Node name under `sensor/` in the store
    pub fn sensor_id(self) -> &'static str {
        match self {
            SensorKey::SoilMoisture => "kelembaban_tanah",
            SensorKey::SoilPh => "ph_tanah",
            SensorKey::WindSpeed => "kecepatan_angin",
            SensorKey::Rainfall => "curah_hujan",
            SensorKey::Radiation => "radiasi",
            SensorKey::SoilTemperature => "suhu",
            SensorKey::DhtTemperature => "dht_temperature",
            SensorKey::DhtHumidity => "dht_humidity",
        }
    }

    /// Store path subscribed to for this key
    pub fn path(self) -> String {
        format!("sensor/{}", self.sensor_id())
    }

    /// Resolve a store path back to its key
    pub fn from_path(path: &str) -> Option<SensorKey> {
        let id = path.trim_matches('/').strip_prefix("sensor/")?;
        SensorKey::ALL.into_iter().find(|k| k.sensor_id() == id)
    }

    /// Field name used in the JSON API
    pub fn field_name(self) -> &'static str {
        match self {
            SensorKey::SoilMoisture => "soilMoisture",
            SensorKey::SoilPh => "soilPH",
            SensorKey::WindSpeed => "windSpeed",
            SensorKey::Rainfall => "rainfall",
            SensorKey::Radiation => "radiation",
            SensorKey::SoilTemperature => "soilTemperature",
            SensorKey::DhtTemperature => "dhtTemperature",
            SensorKey::DhtHumidity => "dhtHumidity",
        }
    }

    /// Card label on the dashboard
    pub fn label(self) -> &'static str {
        match self {
            SensorKey::SoilMoisture => "Soil Moisture",
            SensorKey::SoilPh => "Soil PH",
            SensorKey::WindSpeed => "Wind Speed",
            SensorKey::Rainfall => "Rainfall",
            SensorKey::Radiation => "Radiation",
            SensorKey::SoilTemperature => "Soil Temperature",
            SensorKey::DhtTemperature => "Dht Temperature",
            SensorKey::DhtHumidity => "Dht Humidity",
        }
    }
}

impl fmt::Display for SensorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.field_name())
    }
}

/// Current value of a single sensor
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Reading {
    #[default]
    Loading,
    Value(String),
}

impl Reading {
    pub fn is_loading(&self) -> bool {
        matches!(self, Reading::Loading)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Reading::Loading => LOADING,
            Reading::Value(v) => v,
        }
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Reading {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// The latest reading for each of the eight sensors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorReadings {
    pub soil_moisture: Reading,
    #[serde(rename = "soilPH")]
    pub soil_ph: Reading,
    pub wind_speed: Reading,
    pub rainfall: Reading,
    pub radiation: Reading,
    pub soil_temperature: Reading,
    pub dht_temperature: Reading,
    pub dht_humidity: Reading,
}

impl SensorReadings {
    pub fn get(&self, key: SensorKey) -> &Reading {
        match key {
            SensorKey::SoilMoisture => &self.soil_moisture,
            SensorKey::SoilPh => &self.soil_ph,
            SensorKey::WindSpeed => &self.wind_speed,
            SensorKey::Rainfall => &self.rainfall,
            SensorKey::Radiation => &self.radiation,
            SensorKey::SoilTemperature => &self.soil_temperature,
            SensorKey::DhtTemperature => &self.dht_temperature,
            SensorKey::DhtHumidity => &self.dht_humidity,
        }
    }

    fn get_mut(&mut self, key: SensorKey) -> &mut Reading {
        match key {
            SensorKey::SoilMoisture => &mut self.soil_moisture,
            SensorKey::SoilPh => &mut self.soil_ph,
            SensorKey::WindSpeed => &mut self.wind_speed,
            SensorKey::Rainfall => &mut self.rainfall,
            SensorKey::Radiation => &mut self.radiation,
            SensorKey::SoilTemperature => &mut self.soil_temperature,
            SensorKey::DhtTemperature => &mut self.dht_temperature,
            SensorKey::DhtHumidity => &mut self.dht_humidity,
        }
    }

    /// Replace one reading, returning true if the value changed
    pub fn set(&mut self, key: SensorKey, value: String) -> bool {
        let slot = self.get_mut(key);
        let changed = slot.as_str() != value || slot.is_loading();
        *slot = Reading::Value(value);
        changed
    }

    /// Iterate readings in display order
    pub fn iter(&self) -> impl Iterator<Item = (SensorKey, &Reading)> {
        SensorKey::ALL.into_iter().map(move |k| (k, self.get(k)))
    }
}

/// Convert a store payload into the text stored for a reading.
///
/// Missing and falsy payloads (null, false, 0, NaN, "") become `"0"`.
pub fn payload_to_string(payload: Option<&Value>) -> String {
    match payload {
        None | Some(Value::Null) | Some(Value::Bool(false)) => "0".to_string(),
        Some(Value::Bool(true)) => "true".to_string(),
        Some(Value::String(s)) if s.is_empty() => "0".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                match n.as_f64() {
                    Some(f) if f == 0.0 || f.is_nan() => "0".to_string(),
                    // f64 Display prints 30.0 as "30" and 23.5 as "23.5"
                    Some(f) => f.to_string(),
                    None => n.to_string(),
                }
            }
        }
        Some(other) => other.to_string(),
    }
}
