mod client;
mod controller;
mod hub;
mod loop_worker;
mod synthetic;

pub use client::SensorClient;
pub use controller::SensingController;
pub use hub::{SensorHub, SensorSnapshot};
