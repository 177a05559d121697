pub mod mqtt_types;
pub mod mqtt_utils;
pub mod native;

pub use mqtt_types::*;
pub use mqtt_utils::{generate_client_id, topic_matches};
pub use native::{mqtt_options, MqttTransport};
