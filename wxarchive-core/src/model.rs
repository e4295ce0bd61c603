use serde::{Deserialize, Serialize};

/// Observation point used to populate query parameters. Built once at
/// process start from config and CLI flags, never changed afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
    pub name: String,
}

impl Default for Location {
    fn default() -> Self {
        Location {
            lat: 47.608,
            lon: -122.3352,
            name: "Seattle".to_string(),
        }
    }
}

/// The part of a One Call response the transform step reads. Every other
/// field of the provider document is ignored; an absent `hourly` array is
/// the same as an empty one.
#[derive(Debug, Default, Deserialize)]
pub struct OneCallResponse {
    #[serde(default)]
    pub hourly: Vec<HourlyReading>,
}

/// One element of the provider's hourly array. The provider omits `temp`
/// for some products, so it stays optional here.
#[derive(Debug, Clone, Deserialize)]
pub struct HourlyReading {
    pub dt: i64,
    pub temp: Option<f64>,
}

/// One output line of the transform step. The derived temperatures are
/// present exactly when the source kelvin reading is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyTemp {
    pub epoch: i64,
    pub timestamp: String,
    pub temp_kelvin: Option<f64>,
    pub temp_fahrenheit: Option<f64>,
    pub temp_celsius: Option<f64>,
}
