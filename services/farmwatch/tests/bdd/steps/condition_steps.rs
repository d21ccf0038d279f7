//! BDD step definitions for condition feature

use cucumber::{then, when};

use farmwatch::condition::classify;

use crate::world::FarmwatchWorld;

#[when(expr = "classifying temperature {float} and radiation {float}")]
fn classify_reading(world: &mut FarmwatchWorld, temperature: f64, radiation: f64) {
    world.condition = Some(classify(temperature, radiation));
}

#[when("classifying an unparseable reading")]
fn classify_nan(world: &mut FarmwatchWorld) {
    world.condition = Some(classify(f64::NAN, f64::NAN));
}

#[then(expr = "the condition is {string}")]
fn condition_is(world: &mut FarmwatchWorld, expected: String) {
    let condition = world.condition.expect("nothing classified");
    assert_eq!(condition.to_string(), expected);
}

#[then(expr = "the image is {string}")]
fn image_is(world: &mut FarmwatchWorld, expected: String) {
    let condition = world.condition.expect("nothing classified");
    assert_eq!(condition.image_path(), expected);
}
