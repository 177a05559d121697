use chrono::{DateTime, Local};
use comfort_protocol::Reading;
use log::{debug, error, info, warn};
use std::ops::ControlFlow;

use super::bridge_types::{BridgeError, ConnectionState};
use super::format::{
    comfort_class, format_celsius, format_percent, format_timestamp, is_valid_timestamp_format,
    STATUS_CARD_BASE_CLASS,
};
use crate::config::DEFAULT_TIMESTAMP_FORMAT;
use crate::mqtt::mqtt_types::{loss_code, BridgeEvent, PubSubClient};
use crate::mqtt::mqtt_utils::topic_matches;
use crate::view::{DashboardView, Slot};

/// Connects one pub/sub client to one dashboard view.
///
/// Owns the client handle, the view and the connection state; every
/// lifecycle callback and message goes through here, one at a time.
pub struct DashboardBridge<C, V> {
    client: C,
    view: V,
    topic: String,
    state: ConnectionState,
    timestamp_format: String,
    started: bool,
}

impl<C: PubSubClient, V: DashboardView> DashboardBridge<C, V> {
    pub fn new(client: C, view: V, topic: impl Into<String>) -> Self {
        Self {
            client,
            view,
            topic: topic.into(),
            state: ConnectionState::Disconnected,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            started: false,
        }
    }

    /// Use a custom `strftime` pattern for the last update slot
    pub fn with_timestamp_format(mut self, format: &str) -> Result<Self, BridgeError> {
        if !is_valid_timestamp_format(format) {
            return Err(BridgeError::InvalidTimestampFormat(format.to_string()));
        }
        self.timestamp_format = format.to_string();
        Ok(self)
    }

    pub const fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub const fn client(&self) -> &C {
        &self.client
    }

    pub const fn view(&self) -> &V {
        &self.view
    }

    /// Start the single connection attempt. The outcome arrives later as
    /// [`Self::on_connected`] or [`Self::on_connect_failed`].
    pub fn connect(&mut self) -> Result<(), BridgeError> {
        if self.started {
            warn!("⚠️ connect() called again, ignoring");
            return Err(BridgeError::AlreadyStarted);
        }
        self.started = true;

        info!("🔌 Connecting dashboard (topic: {})", self.topic);
        self.set_state(ConnectionState::Connecting);

        if let Err(e) = self.client.connect() {
            self.on_connect_failed(&e.to_string());
            return Err(e);
        }
        self.view.commit();
        Ok(())
    }

    pub fn on_connected(&mut self) {
        if self.state == ConnectionState::Connected {
            debug!("Duplicate connected notification ignored");
            return;
        }

        info!("✅ Connected to broker");
        self.set_state(ConnectionState::Connected);

        match self.client.subscribe(&self.topic) {
            Ok(()) => info!("📡 Subscribed to topic: {}", self.topic),
            Err(e) => error!("❌ Failed to subscribe to {}: {}", self.topic, e),
        }
        self.view.commit();
    }

    /// The initial attempt failed. Terminal: nothing is retried.
    pub fn on_connect_failed(&mut self, reason: &str) {
        error!("❌ Connection failed: {}", reason);
        self.set_state(ConnectionState::Failed);
        self.view.commit();
    }

    /// A live connection ended. Code 0 is an intentional close and leaves
    /// the status display as it was.
    pub fn on_connection_lost(&mut self, code: i32, reason: &str) {
        if code == loss_code::CLEAN_CLOSE {
            info!("👋 Connection closed: {}", reason);
            self.state = ConnectionState::Disconnected;
            return;
        }

        error!("❌ Connection lost (code {}): {}", code, reason);
        self.set_state(ConnectionState::Lost);
        self.view.commit();
    }

    /// Render one payload, stamped with the current local time
    pub fn on_message(&mut self, payload: &[u8]) {
        self.on_message_at(payload, Local::now());
    }

    /// Render one payload received at `received_at`.
    ///
    /// A payload that does not parse into a complete reading is logged and
    /// leaves every slot untouched.
    pub fn on_message_at(&mut self, payload: &[u8], received_at: DateTime<Local>) {
        debug!("📥 Message received: {}", String::from_utf8_lossy(payload));

        let reading = match Reading::from_payload(payload) {
            Ok(reading) => reading,
            Err(e) => {
                error!("❌ Failed to process reading JSON: {}", e);
                return;
            }
        };

        self.render_reading(&reading, &received_at);
        self.view.commit();
    }

    /// Request a clean close. Reported back as a code 0 connection loss.
    pub fn disconnect(&mut self) -> Result<(), BridgeError> {
        info!("🛑 Closing broker connection");
        self.client.disconnect()
    }

    /// Dispatch one event to its callback. Breaks once the connection is over.
    pub fn handle_event(&mut self, event: BridgeEvent) -> ControlFlow<()> {
        match event {
            BridgeEvent::Connected => {
                self.on_connected();
                ControlFlow::Continue(())
            }
            BridgeEvent::ConnectFailed { reason } => {
                self.on_connect_failed(&reason);
                ControlFlow::Break(())
            }
            BridgeEvent::ConnectionLost { code, reason } => {
                self.on_connection_lost(code, &reason);
                ControlFlow::Break(())
            }
            BridgeEvent::Message { topic, payload } => {
                if topic_matches(&self.topic, &topic) {
                    self.on_message(&payload);
                } else {
                    debug!("Ignoring message on unsubscribed topic '{}'", topic);
                }
                ControlFlow::Continue(())
            }
        }
    }

    fn set_state(&mut self, state: ConnectionState) {
        self.state = state;
        self.view.set_text(Slot::ConnectionStatus, state.status_text());
        self.view.set_class_name(Slot::ConnectionStatus, state.status_class());
    }

    fn render_reading(&mut self, reading: &Reading, received_at: &DateTime<Local>) {
        self.view.set_text(Slot::Temperature, &format_celsius(reading.temperature));
        self.view.set_text(Slot::Humidity, &format_percent(reading.humidity));
        self.view.set_text(Slot::HeatIndex, &format_celsius(reading.heat_index));
        self.view.set_text(Slot::ComfortStatus, &reading.comfort_status);
        self.view.set_text(Slot::DeviceId, &reading.device_id);
        self.view.set_text(
            Slot::Timestamp,
            &format_timestamp(received_at, &self.timestamp_format),
        );

        self.view.set_class_name(Slot::StatusCard, STATUS_CARD_BASE_CLASS);
        self.view.add_class(Slot::StatusCard, &comfort_class(&reading.comfort_status));

        info!(
            "🌡️ {} | {} | {} | feels {} | {}",
            reading.device_id,
            format_celsius(reading.temperature),
            format_percent(reading.humidity),
            format_celsius(reading.heat_index),
            reading.comfort_status
        );
    }
}
