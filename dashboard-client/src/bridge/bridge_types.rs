use thiserror::Error;

/// Connection lifecycle as shown in the status slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Lost,
    Failed,
}

impl ConnectionState {
    /// Text of the connection status slot
    pub const fn status_text(self) -> &'static str {
        match self {
            Self::Disconnected => "Disconnected",
            Self::Connecting => "Connecting...",
            Self::Connected => "Connected",
            Self::Lost => "Connection Lost",
            Self::Failed => "Connection Failed",
        }
    }

    /// Style class of the connection status slot
    pub const fn status_class(self) -> &'static str {
        match self {
            Self::Connecting => "status-connecting",
            Self::Connected => "status-connected",
            Self::Disconnected | Self::Lost | Self::Failed => "status-disconnected",
        }
    }

    /// No further events are expected after this state
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Lost | Self::Failed)
    }
}

/// Dashboard error types
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Connection was already started")]
    AlreadyStarted,
    #[error("Client is not connected")]
    NotConnected,
    #[error("MQTT client request failed: {0}")]
    Client(#[from] rumqttc::ClientError),
    #[error("Invalid timestamp format: {0:?}")]
    InvalidTimestampFormat(String),
    #[error("Event channel closed before the connection ended")]
    ChannelClosed,
}
