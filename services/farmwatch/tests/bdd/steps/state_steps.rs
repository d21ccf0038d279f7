//! BDD step definitions for sensor state feature

use cucumber::{given, then, when};
use serde_json::{json, Value};

use farmwatch::controller::apply_event;
use farmwatch::state::{new_state_handle, StateHandle};
use farmwatch::store::StoreEvent;

use crate::world::FarmwatchWorld;

fn state(world: &FarmwatchWorld) -> &StateHandle {
    world.state.as_ref().expect("state not set")
}

async fn report(world: &mut FarmwatchWorld, sensor_id: &str, value: Option<Value>) {
    let event = StoreEvent {
        path: format!("sensor/{}", sensor_id),
        value,
    };
    apply_event(state(world), event).await;
}

#[given("a fresh dashboard state")]
fn fresh_state(world: &mut FarmwatchWorld) {
    world.state = Some(new_state_handle());
}

#[when(expr = "sensor {string} reports {string}")]
async fn sensor_reports(world: &mut FarmwatchWorld, sensor_id: String, value: String) {
    report(world, &sensor_id, Some(json!(value))).await;
}

#[when(expr = "sensor {string} reports the number {float}")]
async fn sensor_reports_number(world: &mut FarmwatchWorld, sensor_id: String, value: f64) {
    report(world, &sensor_id, Some(json!(value))).await;
}

#[when(expr = "sensor {string} reports null")]
async fn sensor_reports_null(world: &mut FarmwatchWorld, sensor_id: String) {
    report(world, &sensor_id, Some(Value::Null)).await;
}

#[then(expr = "reading {string} is {string}")]
async fn reading_is(world: &mut FarmwatchWorld, field: String, expected: String) {
    let s = state(world).read().await;
    let (_, reading) = s
        .readings
        .iter()
        .find(|(key, _)| key.field_name() == field)
        .unwrap_or_else(|| panic!("Unknown reading: {}", field));
    assert_eq!(reading.as_str(), expected);
}

#[then("the forecast is still loading")]
async fn forecast_loading(world: &mut FarmwatchWorld) {
    let s = state(world).read().await;
    assert!(s.forecast.is_loading());
    assert_eq!(s.forecast_generation, 0);
}

#[then(expr = "the forecast has generation {int}")]
async fn forecast_generation(world: &mut FarmwatchWorld, generation: u64) {
    let s = state(world).read().await;
    assert_eq!(s.forecast_generation, generation);
}

#[then(expr = "the dashboard shows {string} for {string}")]
async fn dashboard_day(world: &mut FarmwatchWorld, text: String, day: String) {
    let s = state(world).read().await;
    let views = farmwatch::dashboard::day_views(&s.forecast);
    let view = views
        .iter()
        .find(|v| v.key == day)
        .unwrap_or_else(|| panic!("Unknown day: {}", day));
    assert_eq!(format!("{}°C, {} W/m²", view.temperature, view.radiation), text);
}

#[then(expr = "the dashboard condition for {string} is {string}")]
async fn dashboard_condition(world: &mut FarmwatchWorld, day: String, condition: String) {
    let s = state(world).read().await;
    let views = farmwatch::dashboard::day_views(&s.forecast);
    let view = views
        .iter()
        .find(|v| v.key == day)
        .unwrap_or_else(|| panic!("Unknown day: {}", day));
    assert_eq!(view.condition.to_string(), condition);
}
