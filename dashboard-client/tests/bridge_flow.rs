//! End-to-end dashboard flow against an in-process broker stand-in

use comfort_dashboard::mqtt::loss_code;
use comfort_dashboard::{
    run_bridge, BridgeError, BridgeEvent, ConnectionState, DashboardBridge, PageModel,
    PubSubClient, Slot,
};
use std::future;
use std::time::Duration;
use tokio::sync::mpsc;

/// Behaves like a broker that accepts the connection and replays a script
/// of publishes once the subscription arrives
struct ScriptedBroker {
    events: mpsc::UnboundedSender<BridgeEvent>,
    accept: bool,
    script: Vec<BridgeEvent>,
    requests: Vec<String>,
}

impl ScriptedBroker {
    fn new(accept: bool, script: Vec<BridgeEvent>) -> (Self, mpsc::UnboundedReceiver<BridgeEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let broker = Self {
            events,
            accept,
            script,
            requests: Vec::new(),
        };
        (broker, rx)
    }
}

impl PubSubClient for ScriptedBroker {
    fn connect(&mut self) -> Result<(), BridgeError> {
        self.requests.push("connect".to_string());
        let event = if self.accept {
            BridgeEvent::Connected
        } else {
            BridgeEvent::ConnectFailed {
                reason: "connection refused".to_string(),
            }
        };
        self.events.send(event).map_err(|_| BridgeError::ChannelClosed)
    }

    fn subscribe(&mut self, topic: &str) -> Result<(), BridgeError> {
        self.requests.push(format!("subscribe:{}", topic));
        for event in self.script.drain(..) {
            self.events.send(event).map_err(|_| BridgeError::ChannelClosed)?;
        }
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), BridgeError> {
        self.requests.push("disconnect".to_string());
        self.events
            .send(BridgeEvent::ConnectionLost {
                code: loss_code::CLEAN_CLOSE,
                reason: "client disconnected".to_string(),
            })
            .map_err(|_| BridgeError::ChannelClosed)
    }
}

fn reading(temperature: f64, comfort: &str, device: &str) -> BridgeEvent {
    BridgeEvent::Message {
        topic: "esp32/dht11/data".to_string(),
        payload: format!(
            r#"{{"device_id":"{}","temperatura":{},"umidade":55.55,"indice_calor":{},"status_conforto":"{}","timestamp":42}}"#,
            device, temperature, temperature, comfort
        )
        .into_bytes(),
    }
}

#[tokio::test]
async fn test_readings_until_connection_lost() {
    let script = vec![
        reading(27.25, "Quente", "sensor_animais_01"),
        BridgeEvent::Message {
            topic: "esp32/dht11/data".to_string(),
            payload: b"{broken".to_vec(),
        },
        reading(24.04, "Confortavel", "sensor_animais_01"),
        BridgeEvent::ConnectionLost {
            code: loss_code::IO,
            reason: "connection reset by peer".to_string(),
        },
    ];
    let (broker, mut events) = ScriptedBroker::new(true, script);
    let mut bridge = DashboardBridge::new(broker, PageModel::new(), "esp32/dht11/data");

    run_bridge(&mut bridge, &mut events, future::pending())
        .await
        .unwrap();

    let page = bridge.view();
    assert_eq!(bridge.state(), ConnectionState::Lost);
    assert_eq!(page.text(Slot::ConnectionStatus), "Connection Lost");
    assert_eq!(page.text(Slot::Temperature), "24.0 °C");
    assert_eq!(page.text(Slot::Humidity), "55.6 %");
    assert_eq!(page.text(Slot::ComfortStatus), "Confortavel");
    assert_eq!(
        page.classes(Slot::StatusCard),
        ["status-card", "status-confortavel"]
    );
    assert_eq!(
        bridge.client().requests,
        ["connect", "subscribe:esp32/dht11/data"]
    );
}

#[tokio::test]
async fn test_refused_connection_is_terminal() {
    let (broker, mut events) = ScriptedBroker::new(false, Vec::new());
    let mut bridge = DashboardBridge::new(broker, PageModel::new(), "esp32/dht11/data");

    run_bridge(&mut bridge, &mut events, future::pending())
        .await
        .unwrap();

    assert_eq!(bridge.state(), ConnectionState::Failed);
    assert_eq!(bridge.view().text(Slot::ConnectionStatus), "Connection Failed");
    assert_eq!(bridge.view().text(Slot::Temperature), "");
    assert_eq!(bridge.client().requests, ["connect"]);
}

#[tokio::test]
async fn test_shutdown_closes_cleanly() {
    let (broker, mut events) = ScriptedBroker::new(true, vec![reading(19.0, "Confortavel", "a")]);
    let mut bridge = DashboardBridge::new(broker, PageModel::new(), "esp32/dht11/data");

    let shutdown = tokio::time::sleep(Duration::from_millis(50));
    run_bridge(&mut bridge, &mut events, shutdown).await.unwrap();

    assert_eq!(bridge.state(), ConnectionState::Disconnected);
    // The clean close does not replace the connected status
    assert_eq!(bridge.view().text(Slot::ConnectionStatus), "Connected");
    assert_eq!(bridge.view().text(Slot::Temperature), "19.0 °C");
    assert_eq!(bridge.client().requests.last().map(String::as_str), Some("disconnect"));
}

#[tokio::test]
async fn test_closed_channel_is_reported() {
    let (broker, mut events) = ScriptedBroker::new(true, Vec::new());
    let mut bridge = DashboardBridge::new(broker, PageModel::new(), "esp32/dht11/data");
    events.close();

    let result = run_bridge(&mut bridge, &mut events, future::pending()).await;

    // The scripted broker cannot even deliver its connect notification
    assert!(result.is_err());
    assert_eq!(bridge.state(), ConnectionState::Failed);
}
