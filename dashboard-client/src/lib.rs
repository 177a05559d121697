//! Comfort Monitor dashboard
//!
//! Connects to an MQTT broker (WebSockets by default), subscribes to the
//! readings topic and renders every reading into a fixed set of display slots.
//!
//! The pieces are kept apart so the handler logic can run without a broker:
//!
//! - [`bridge::DashboardBridge`] reacts to connection and message events
//! - [`mqtt::PubSubClient`] is the capability the bridge drives
//! - [`view::DashboardView`] is the surface the bridge writes to

pub mod bridge;
pub mod config;
pub mod mqtt;
pub mod view;

pub use bridge::{run_bridge, BridgeError, ConnectionState, DashboardBridge};
pub use config::{DashboardConfig, TransportKind};
pub use mqtt::{BridgeEvent, MqttTransport, PubSubClient};
pub use view::{DashboardView, PageModel, Slot, TerminalView};
