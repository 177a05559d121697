use anyhow::{bail, Context};
use clap::Parser;
use comfort_dashboard::bridge::ConnectionState;
use comfort_dashboard::mqtt::{mqtt_options, MqttTransport};
use comfort_dashboard::view::RenderMode;
use comfort_dashboard::{run_bridge, DashboardBridge, DashboardConfig, TerminalView, TransportKind};
use log::{error, info};
use std::io::{self, IsTerminal};
use tokio::signal;

#[derive(Parser, Debug)]
#[command(name = "comfort-dashboard")]
#[command(about = "Live dashboard for temperature, humidity and comfort readings published over MQTT")]
struct Args {
    /// MQTT broker host (default: $MQTT_BROKER_HOST or localhost)
    #[arg(long)]
    host: Option<String>,

    /// MQTT broker port (default: $MQTT_BROKER_PORT or 9001)
    #[arg(short, long)]
    port: Option<u16>,

    /// WebSocket endpoint path
    #[arg(long)]
    ws_path: Option<String>,

    /// Topic the readings are published to
    #[arg(short, long)]
    topic: Option<String>,

    /// Client ID (if not provided, generates a random one)
    #[arg(long)]
    client_id: Option<String>,

    /// Broker transport
    #[arg(long, value_enum)]
    transport: Option<TransportKind>,

    /// strftime pattern of the last update time
    #[arg(long)]
    timestamp_format: Option<String>,

    /// Print one line per update instead of redrawing the screen (implied when stdout is not a terminal)
    #[arg(long)]
    plain: bool,
}

impl Args {
    /// Layer command line values over `config`
    fn apply(self, mut config: DashboardConfig) -> DashboardConfig {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(ws_path) = self.ws_path {
            config.ws_path = ws_path;
        }
        if let Some(topic) = self.topic {
            config.topic = topic;
        }
        if let Some(client_id) = self.client_id.filter(|id| !id.trim().is_empty()) {
            config.client_id = client_id;
        }
        if let Some(transport) = self.transport {
            config.transport = transport;
        }
        if let Some(format) = self.timestamp_format {
            config.timestamp_format = format;
        }
        config
    }
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for ctrl-c signal: {}", e);
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mode = if args.plain || !io::stdout().is_terminal() {
        RenderMode::Plain
    } else {
        RenderMode::Screen
    };
    let config = args.apply(DashboardConfig::from_env());

    info!("🚀 Starting comfort dashboard with client ID: {}", config.client_id);
    match config.transport {
        TransportKind::WebSocket => info!("🌐 MQTT broker: {}", config.websocket_url()),
        TransportKind::Tcp => info!("🌐 MQTT broker: {}", config.broker_address()),
    }
    info!("📡 Topic: {}", config.topic);

    let (transport, mut events) = MqttTransport::new(mqtt_options(&config));
    let view = TerminalView::stdout(mode);
    let mut bridge = DashboardBridge::new(transport, view, config.topic.clone())
        .with_timestamp_format(&config.timestamp_format)
        .context("invalid --timestamp-format")?;

    run_bridge(&mut bridge, &mut events, shutdown_signal())
        .await
        .context("dashboard stopped unexpectedly")?;

    match bridge.state() {
        ConnectionState::Failed => bail!("could not connect to {}", config.broker_address()),
        ConnectionState::Lost => bail!("lost connection to {}", config.broker_address()),
        _ => {
            info!("✅ Graceful shutdown completed");
            Ok(())
        }
    }
}
