use crate::bridge::BridgeError;

/// Codes carried by [`BridgeEvent::ConnectionLost`]
pub mod loss_code {
    /// Intentional close requested by this client
    pub const CLEAN_CLOSE: i32 = 0;
    pub const GENERIC: i32 = 1;
    /// Broker violated the MQTT session state (unexpected packet, ...)
    pub const PROTOCOL: i32 = 3;
    pub const TIMEOUT: i32 = 7;
    pub const IO: i32 = 8;
}

/// Connection lifecycle and message notifications delivered to the bridge
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeEvent {
    /// Handshake accepted by the broker
    Connected,
    /// The initial connection attempt failed
    ConnectFailed { reason: String },
    /// A live connection ended. `code` is [`loss_code::CLEAN_CLOSE`] for an intentional close.
    ConnectionLost { code: i32, reason: String },
    /// A publish received on a subscribed topic
    Message { topic: String, payload: Vec<u8> },
}

/// Pub/sub capability the dashboard bridge is driven through.
///
/// Requests are fire-and-forget; their outcome comes back as [`BridgeEvent`]s
/// on whatever channel the implementation was created with.
pub trait PubSubClient {
    /// Start the single connection attempt
    fn connect(&mut self) -> Result<(), BridgeError>;

    /// Request a subscription to `topic`
    fn subscribe(&mut self, topic: &str) -> Result<(), BridgeError>;

    /// Request a clean close of the connection
    fn disconnect(&mut self) -> Result<(), BridgeError>;
}
