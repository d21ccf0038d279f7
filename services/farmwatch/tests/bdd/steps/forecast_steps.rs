//! BDD step definitions for forecast feature

use cucumber::{given, then, when};

use farmwatch::forecast::forecast;

use crate::world::FarmwatchWorld;

#[given(expr = "today's temperature is {float} and radiation is {float}")]
fn todays_readings(world: &mut FarmwatchWorld, temperature: f64, radiation: f64) {
    world.inputs = Some((temperature, radiation));
}

#[given("unparseable temperature and radiation readings")]
fn unparseable_readings(world: &mut FarmwatchWorld) {
    world.inputs = Some((f64::NAN, f64::NAN));
}

#[when("the forecast is computed")]
fn compute_forecast(world: &mut FarmwatchWorld) {
    let (temperature, radiation) = world.inputs.expect("inputs not set");
    world.forecast = Some(forecast(temperature, radiation));
}

#[when("the forecast is computed twice")]
fn compute_forecast_twice(world: &mut FarmwatchWorld) {
    let (temperature, radiation) = world.inputs.expect("inputs not set");
    world.forecast = Some(forecast(temperature, radiation));
    world.second_forecast = Some(forecast(temperature, radiation));
}

#[then(expr = "day {int} shows temperature {string} and radiation {string}")]
fn day_shows(world: &mut FarmwatchWorld, day: usize, temperature: String, radiation: String) {
    let entries = world.forecast.as_ref().expect("forecast not computed");
    assert_eq!(entries[day].temperature, temperature);
    assert_eq!(entries[day].radiation, radiation);
}

#[then(expr = "day {int} is classified as {string}")]
fn day_classified(world: &mut FarmwatchWorld, day: usize, condition: String) {
    let entries = world.forecast.as_ref().expect("forecast not computed");
    assert_eq!(entries[day].condition().to_string(), condition);
}

#[then("both forecasts are identical")]
fn forecasts_identical(world: &mut FarmwatchWorld) {
    assert_eq!(world.forecast, world.second_forecast);
    assert!(world.forecast.is_some());
}
