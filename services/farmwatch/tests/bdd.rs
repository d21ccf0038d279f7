//! BDD test entry point for farmwatch

#[path = "bdd/world.rs"]
mod world;

#[path = "bdd/steps/mod.rs"]
mod steps;

use cucumber::World as _;
use world::FarmwatchWorld;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    FarmwatchWorld::run("tests/features").await;
}
