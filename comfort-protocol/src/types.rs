//! Reading payload and protocol errors

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// One climate measurement as published by a sensor device.
///
/// Field names on the wire are fixed by the deployed firmware, so the Rust
/// names are mapped with `serde(rename)`. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Air temperature in °C
    #[serde(rename = "temperatura")]
    pub temperature: f64,
    /// Relative humidity in %
    #[serde(rename = "umidade")]
    pub humidity: f64,
    /// "Feels like" temperature in °C
    #[serde(rename = "indice_calor")]
    pub heat_index: f64,
    /// Comfort label, e.g. `Confortavel`
    #[serde(rename = "status_conforto")]
    pub comfort_status: String,
    pub device_id: String,
    /// Device uptime in seconds when the reading was taken. Values that are
    /// not a non-negative integer read as `None` instead of failing the reading.
    #[serde(
        default,
        deserialize_with = "lenient_uptime",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<u64>,
}

fn lenient_uptime<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(serde_json::Value::as_u64))
}

impl Reading {
    /// Parse a raw message payload
    pub fn from_payload(payload: &[u8]) -> Result<Self, ProtocolError> {
        let text = std::str::from_utf8(payload)?;
        Ok(serde_json::from_str(text)?)
    }

    /// Serialize into the JSON payload devices publish
    pub fn to_payload(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Common error types
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Payload is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    #[error("Invalid reading JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_parses_firmware_payload() {
        let payload = br#"{"device_id":"sensor_animais_01","temperatura":27.0,"umidade":65.0,"indice_calor":28.6,"status_conforto":"Quente","timestamp":120}"#;
        let reading = Reading::from_payload(payload).unwrap();

        assert_eq!(reading.device_id, "sensor_animais_01");
        assert_eq!(reading.temperature, 27.0);
        assert_eq!(reading.humidity, 65.0);
        assert_eq!(reading.heat_index, 28.6);
        assert_eq!(reading.comfort_status, "Quente");
        assert_eq!(reading.timestamp, Some(120));
    }

    #[test]
    fn test_reading_ignores_unknown_fields() {
        let payload = br#"{"temperatura":20,"umidade":50,"indice_calor":20,"status_conforto":"Confortavel","device_id":"a","rssi":-61}"#;
        let reading = Reading::from_payload(payload).unwrap();

        assert_eq!(reading.temperature, 20.0);
        assert!(reading.timestamp.is_none());
    }

    #[test]
    fn test_odd_timestamp_does_not_reject_reading() {
        for timestamp in [r#""2026-10-18T10:00:00Z""#, "-5", "1.5", "null", "{}"] {
            let payload = format!(
                r#"{{"temperatura":21,"umidade":50,"indice_calor":21,"status_conforto":"Confortavel","device_id":"a","timestamp":{}}}"#,
                timestamp
            );
            let reading = Reading::from_payload(payload.as_bytes()).unwrap();

            assert_eq!(reading.temperature, 21.0);
            assert!(reading.timestamp.is_none(), "timestamp {}", timestamp);
        }
    }

    #[test]
    fn test_reading_rejects_missing_field() {
        let payload = br#"{"temperatura":20,"umidade":50,"status_conforto":"Frio","device_id":"a"}"#;
        let err = Reading::from_payload(payload).unwrap_err();
        assert!(matches!(err, ProtocolError::Json(_)));
        assert!(err.to_string().contains("indice_calor"));
    }

    #[test]
    fn test_reading_rejects_wrong_type() {
        let payload = br#"{"temperatura":"hot","umidade":50,"indice_calor":20,"status_conforto":"Frio","device_id":"a"}"#;
        assert!(Reading::from_payload(payload).is_err());
    }

    #[test]
    fn test_reading_rejects_invalid_utf8() {
        let err = Reading::from_payload(&[0xff, 0xfe, 0x7b]).unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidUtf8(_)));
    }

    #[test]
    fn test_to_payload_uses_wire_names() {
        let reading = Reading {
            temperature: 21.5,
            humidity: 40.0,
            heat_index: 21.5,
            comfort_status: "Confortavel".to_string(),
            device_id: "sensor-01".to_string(),
            timestamp: None,
        };

        let json = reading.to_payload().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["temperatura"], 21.5);
        assert_eq!(parsed["umidade"], 40.0);
        assert_eq!(parsed["indice_calor"], 21.5);
        assert_eq!(parsed["status_conforto"], "Confortavel");
        assert_eq!(parsed["device_id"], "sensor-01");
        assert!(parsed.get("timestamp").is_none());
    }
}
