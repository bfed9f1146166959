#[macro_use]
extern crate rocket;

#[macro_use]
extern crate log;

#[cfg(test)]
#[macro_use]
extern crate ledger_test;

use rocket::{Build, Rocket};

use crate::config::{ConfigFairing, RegistryFairing};
use crate::logging::LoggerFairing;

pub mod api;
pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;

/// Assemble the server, configured from `Rocket.toml` and the environment,
/// telling the time by the wall clock.
pub fn build() -> Rocket<Build> {
    rocket_with_registry(rocket::build(), RegistryFairing::system())
}

/// Mount routes and attach fairings onto a base Rocket instance.
fn rocket_with_registry(rocket: Rocket<Build>, registry: RegistryFairing) -> Rocket<Build> {
    rocket
        .mount("/", api::routes())
        .register("/", api::catchers())
        .attach(LoggerFairing)
        .attach(ConfigFairing)
        .attach(registry)
}

/// Secret shared between the test server and the tokens tests mint.
#[cfg(test)]
const TEST_JWT_SECRET: &str = "ledger-test-secret";

/// Assemble a test server whose registry tells the time by `clock`.
#[cfg(test)]
fn rocket_for_clock(clock: clock::ManualClock) -> Rocket<Build> {
    let figment = rocket::Config::figment()
        .merge(("jwt_secret", TEST_JWT_SECRET))
        .merge(("auth_ttl", 3600))
        .merge(("log_level", "off"));
    rocket_with_registry(
        rocket::custom(figment),
        RegistryFairing::with_clock(std::sync::Arc::new(clock)),
    )
}
