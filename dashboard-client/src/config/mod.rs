use clap::ValueEnum;
use comfort_protocol::{DEFAULT_WS_PORT, READINGS_TOPIC};
use std::env;

use crate::mqtt::mqtt_utils::{generate_client_id, CLIENT_ID_PREFIX};

/// Default `strftime` format of the "last update" slot (day first, 24h clock)
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// How the dashboard reaches the broker
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TransportKind {
    /// MQTT over WebSockets (`ws://host:port/path`)
    #[value(name = "ws")]
    WebSocket,
    /// Plain MQTT over TCP
    Tcp,
}

/// Configuration for the broker connection and display
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub host: String,
    pub port: u16,
    /// Path of the WebSocket endpoint, ignored for TCP
    pub ws_path: String,
    pub topic: String,
    pub client_id: String,
    pub transport: TransportKind,
    pub keep_alive_secs: u64,
    pub timestamp_format: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: DEFAULT_WS_PORT,
            ws_path: "/mqtt".to_string(),
            topic: READINGS_TOPIC.to_string(),
            client_id: generate_client_id(CLIENT_ID_PREFIX),
            transport: TransportKind::WebSocket,
            keep_alive_secs: 60,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from environment variables or use defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, falling back to defaults for
    /// missing or unparsable values
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let host = lookup("MQTT_BROKER_HOST").unwrap_or(defaults.host);
        let port = lookup("MQTT_BROKER_PORT")
            .and_then(|port| port.parse().ok())
            .unwrap_or(defaults.port);
        let ws_path = lookup("MQTT_WS_PATH").unwrap_or(defaults.ws_path);
        let topic = lookup("COMFORT_TOPIC").unwrap_or(defaults.topic);

        Self {
            host,
            port,
            ws_path,
            topic,
            ..defaults
        }
    }

    /// Get the broker address as a string for display purposes
    pub fn broker_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Full WebSocket endpoint URL
    pub fn websocket_url(&self) -> String {
        let path = self.ws_path.trim_start_matches('/');
        format!("ws://{}:{}/{}", self.host, self.port, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();

        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 9001);
        assert_eq!(config.topic, "esp32/dht11/data");
        assert_eq!(config.transport, TransportKind::WebSocket);
        assert!(config.client_id.starts_with("dashboard_client_"));
        assert_eq!(config.websocket_url(), "ws://localhost:9001/mqtt");
    }

    #[test]
    fn test_client_id_differs_per_instance() {
        assert_ne!(
            DashboardConfig::default().client_id,
            DashboardConfig::default().client_id
        );
    }

    #[test]
    fn test_environment_overrides() {
        let config = DashboardConfig::from_lookup(lookup_from(&[
            ("MQTT_BROKER_HOST", "192.168.3.2"),
            ("MQTT_BROKER_PORT", "8080"),
            ("MQTT_WS_PATH", "ws"),
            ("COMFORT_TOPIC", "barn/+/data"),
        ]));

        assert_eq!(config.broker_address(), "192.168.3.2:8080");
        assert_eq!(config.websocket_url(), "ws://192.168.3.2:8080/ws");
        assert_eq!(config.topic, "barn/+/data");
    }

    #[test]
    fn test_invalid_port_falls_back_to_default() {
        let config = DashboardConfig::from_lookup(lookup_from(&[("MQTT_BROKER_PORT", "nope")]));
        assert_eq!(config.port, 9001);
    }
}
