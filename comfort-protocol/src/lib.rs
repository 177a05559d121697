//! Comfort Monitor Protocol
//!
//! Shared wire definitions used between the sensor devices that publish
//! climate readings and the dashboard that renders them.
//!
//! # Features
//!
//! - **Reading payload**: the JSON object published once per measurement
//! - **Comfort derivation**: heat index and comfort bands computed on the device
//! - **Defaults**: topic and broker ports both sides agree on
//!
//! # Example
//!
//! ```rust
//! use comfort_protocol::{Reading, READINGS_TOPIC};
//!
//! let payload = br#"{"temperatura":23.4,"umidade":61.0,"indice_calor":23.4,
//!     "status_conforto":"Confortavel","device_id":"sensor-01"}"#;
//! let reading = Reading::from_payload(payload).unwrap();
//! assert_eq!(reading.device_id, "sensor-01");
//! println!("listening on {}", READINGS_TOPIC);
//! ```

pub mod comfort;
pub mod types;

pub use comfort::{heat_index, ComfortStatus};
pub use types::*;

/// Topic readings are published to and subscribed from
pub const READINGS_TOPIC: &str = "esp32/dht11/data";

/// Broker port for plain MQTT over TCP
pub const DEFAULT_TCP_PORT: u16 = 1883;

/// Broker port for MQTT over WebSockets
pub const DEFAULT_WS_PORT: u16 = 9001;
