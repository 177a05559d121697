//! Comfort derivation shared by every publishing device

use std::fmt;

/// Below this temperature (°C) the heat index equals the air temperature
pub const HEAT_INDEX_THRESHOLD: f64 = 26.7;

/// Heat index ("feels like" temperature) in °C.
///
/// Rothfusz regression expressed in Celsius. Only meaningful in warm air,
/// so cooler readings are returned unchanged.
pub fn heat_index(temperature: f64, humidity: f64) -> f64 {
    if temperature < HEAT_INDEX_THRESHOLD {
        return temperature;
    }

    let t = temperature;
    let h = humidity;
    -8.784695 + 1.61139411 * t + 2.338549 * h
        - 0.14611605 * t * h
        - 0.01230809 * t * t
        - 0.016424828 * h * h
        + 0.002211732 * t * t * h
        + 0.00072546 * t * h * h
        - 0.000003582 * t * t * h * h
}

/// Perceived thermal comfort band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComfortStatus {
    Cold,
    Comfortable,
    Hot,
    Dangerous,
}

impl ComfortStatus {
    /// Classify an air temperature in °C
    pub fn from_temperature(temperature: f64) -> Self {
        if temperature < 15.0 {
            Self::Cold
        } else if temperature <= 26.0 {
            Self::Comfortable
        } else if temperature <= 32.0 {
            Self::Hot
        } else {
            Self::Dangerous
        }
    }

    /// Label sent on the wire in `status_conforto`
    pub fn label(self) -> &'static str {
        match self {
            Self::Cold => "Frio",
            Self::Comfortable => "Confortavel",
            Self::Hot => "Quente",
            Self::Dangerous => "Perigoso",
        }
    }
}

impl fmt::Display for ComfortStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
