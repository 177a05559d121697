use log::{debug, error, info, warn};
use rumqttc::{
    AsyncClient, ConnectionError, Event, EventLoop, Incoming, MqttOptions, Outgoing, QoS, Transport,
};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::mqtt_types::{loss_code, BridgeEvent, PubSubClient};
use crate::bridge::BridgeError;
use crate::config::{DashboardConfig, TransportKind};

/// Capacity of the rumqttc request channel
const REQUEST_CAPACITY: usize = 10;

/// Build rumqttc options for the configured broker and transport
pub fn mqtt_options(config: &DashboardConfig) -> MqttOptions {
    let mut options = match config.transport {
        TransportKind::WebSocket => {
            let mut options =
                MqttOptions::new(&config.client_id, config.websocket_url(), config.port);
            options.set_transport(Transport::Ws);
            options
        }
        TransportKind::Tcp => MqttOptions::new(&config.client_id, &config.host, config.port),
    };
    options.set_keep_alive(Duration::from_secs(config.keep_alive_secs));
    options.set_clean_session(true);
    options
}

/// rumqttc backed [`PubSubClient`].
///
/// `connect` spawns a tokio task that owns the event loop and forwards
/// lifecycle and message notifications to the receiver returned by [`MqttTransport::new`].
/// The task ends after the first connection failure or loss; nothing is retried.
pub struct MqttTransport {
    options: Option<MqttOptions>,
    client: Option<AsyncClient>,
    events: mpsc::UnboundedSender<BridgeEvent>,
    task: Option<JoinHandle<()>>,
}

impl MqttTransport {
    pub fn new(options: MqttOptions) -> (Self, mpsc::UnboundedReceiver<BridgeEvent>) {
        let (events, events_rx) = mpsc::unbounded_channel();
        let transport = Self {
            options: Some(options),
            client: None,
            events,
            task: None,
        };
        (transport, events_rx)
    }

    /// Whether the event loop task is still running
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl PubSubClient for MqttTransport {
    /// Must be called from within a tokio runtime
    fn connect(&mut self) -> Result<(), BridgeError> {
        let options = self.options.take().ok_or(BridgeError::AlreadyStarted)?;
        let (host, port) = options.broker_address();
        info!(
            "🔄 Connecting to MQTT broker at {}:{} as {}",
            host,
            port,
            options.client_id()
        );

        let (client, eventloop) = AsyncClient::new(options, REQUEST_CAPACITY);
        self.task = Some(tokio::spawn(drive_event_loop(eventloop, self.events.clone())));
        self.client = Some(client);
        Ok(())
    }

    fn subscribe(&mut self, topic: &str) -> Result<(), BridgeError> {
        let client = self.client.as_ref().ok_or(BridgeError::NotConnected)?;
        client.try_subscribe(topic, QoS::AtMostOnce)?;
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), BridgeError> {
        let client = self.client.as_ref().ok_or(BridgeError::NotConnected)?;
        client.try_disconnect()?;
        Ok(())
    }
}

/// What the event loop driver does with one poll result
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum LoopStep {
    Continue,
    Emit(BridgeEvent),
    /// Emit the event, then stop polling
    Finish(BridgeEvent),
}

async fn drive_event_loop(mut eventloop: EventLoop, events: mpsc::UnboundedSender<BridgeEvent>) {
    let mut connected = false;

    loop {
        let step = translate(eventloop.poll().await, &mut connected);
        match step {
            LoopStep::Continue => {}
            LoopStep::Emit(event) => {
                if events.send(event).is_err() {
                    debug!("Dashboard bridge gone, stopping MQTT event loop");
                    return;
                }
            }
            LoopStep::Finish(event) => {
                let _ = events.send(event);
                info!("🛑 MQTT event loop stopped");
                return;
            }
        }
    }
}

/// Map one rumqttc poll result onto the bridge's callbacks
pub(crate) fn translate(polled: Result<Event, ConnectionError>, connected: &mut bool) -> LoopStep {
    match polled {
        Ok(Event::Incoming(Incoming::ConnAck(_))) => {
            info!("✅ Connected to MQTT broker");
            *connected = true;
            LoopStep::Emit(BridgeEvent::Connected)
        }
        Ok(Event::Incoming(Incoming::Publish(p))) => {
            debug!(
                "📥 MQTT message received on topic '{}' ({} bytes)",
                p.topic,
                p.payload.len()
            );
            LoopStep::Emit(BridgeEvent::Message {
                topic: p.topic,
                payload: p.payload.to_vec(),
            })
        }
        Ok(Event::Incoming(Incoming::SubAck(_))) => {
            info!("📨 Subscription acknowledged");
            LoopStep::Continue
        }
        Ok(Event::Incoming(Incoming::Disconnect)) => {
            warn!("⚠️ Broker closed the session");
            *connected = false;
            LoopStep::Finish(BridgeEvent::ConnectionLost {
                code: loss_code::GENERIC,
                reason: "broker sent DISCONNECT".to_string(),
            })
        }
        Ok(Event::Outgoing(Outgoing::Disconnect)) => {
            *connected = false;
            LoopStep::Finish(BridgeEvent::ConnectionLost {
                code: loss_code::CLEAN_CLOSE,
                reason: "client disconnected".to_string(),
            })
        }
        Ok(_) => LoopStep::Continue,
        Err(e) if *connected => {
            *connected = false;
            let code = connection_loss_code(&e);
            if code != loss_code::CLEAN_CLOSE {
                error!("❌ MQTT connection lost: {}", e);
            }
            LoopStep::Finish(BridgeEvent::ConnectionLost {
                code,
                reason: e.to_string(),
            })
        }
        Err(e) => {
            error!("❌ MQTT connection failed: {}", e);
            LoopStep::Finish(BridgeEvent::ConnectFailed {
                reason: e.to_string(),
            })
        }
    }
}

/// Classify a rumqttc error into a [`loss_code`]
pub fn connection_loss_code(error: &ConnectionError) -> i32 {
    match error {
        // Every client handle was dropped, which only happens on shutdown
        ConnectionError::RequestsDone => loss_code::CLEAN_CLOSE,
        ConnectionError::NetworkTimeout => loss_code::TIMEOUT,
        ConnectionError::Io(_) => loss_code::IO,
        ConnectionError::MqttState(_) => loss_code::PROTOCOL,
        _ => loss_code::GENERIC,
    }
}
