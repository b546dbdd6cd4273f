mod report;
mod sensor;

pub use report::{TierSeconds, WalkReport};
pub use sensor::SensorReading;
