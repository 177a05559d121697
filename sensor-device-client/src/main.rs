use clap::Parser;
use comfort_protocol::{heat_index, ComfortStatus, Reading, DEFAULT_TCP_PORT, READINGS_TOPIC};
use log::{debug, error, info, warn};
use rand::Rng;
use rumqttc::{AsyncClient, Event, EventLoop, Incoming, MqttOptions, QoS};
use std::time::{Duration, Instant};
use tokio::signal;
use tokio::sync::{broadcast, watch};
use tokio::time::{interval, MissedTickBehavior};

mod dht11;


use dht11::{SensorSample, SimulatedDht11};

#[derive(Parser)]
#[command(name = "comfort-sensor-device")]
#[command(about = "A desktop MQTT device client that simulates a DHT11 climate sensor node")]
struct Args {
    /// Device ID (if not provided, generates a random one)
    #[arg(short, long)]
    device_id: Option<String>,

    /// MQTT broker host
    #[arg(long, default_value = "localhost")]
    host: String,

    /// MQTT broker port
    #[arg(long, default_value_t = DEFAULT_TCP_PORT)]
    port: u16,

    /// Topic readings are published to
    #[arg(short, long, default_value = READINGS_TOPIC)]
    topic: String,

    /// Seconds between two readings
    #[arg(short, long, default_value_t = 10)]
    interval: u64,

    /// Initial simulated temperature in °C
    #[arg(long, default_value_t = 24.0)]
    temperature: f64,

    /// Initial simulated relative humidity in %
    #[arg(long, default_value_t = 60.0)]
    humidity: f64,

    /// Probability that a sensor read fails its checksum
    #[arg(long, default_value_t = 0.05)]
    failure_rate: f64,
}

fn generate_device_id() -> String {
    let suffix: u32 = rand::thread_rng().gen();
    format!("sensor-{:08x}", suffix)
}

/// Round to the one decimal the firmware publishes
fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Derive the published reading from one sensor sample
fn build_reading(device_id: &str, sample: SensorSample, uptime_secs: u64) -> Reading {
    let temperature = round_tenth(sample.temperature);
    let humidity = round_tenth(sample.humidity);

    Reading {
        temperature,
        humidity,
        heat_index: round_tenth(heat_index(temperature, humidity)),
        comfort_status: ComfortStatus::from_temperature(temperature)
            .label()
            .to_string(),
        device_id: device_id.to_string(),
        timestamp: Some(uptime_secs),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let device_id = args.device_id.unwrap_or_else(generate_device_id);

    info!("🚀 Starting sensor device client with ID: {}", device_id);
    info!("🌐 MQTT broker: {}:{}", args.host, args.port);
    info!("📡 Publishing to {} every {}s", args.topic, args.interval);

    let sensor = SimulatedDht11::new(
        SensorSample {
            temperature: args.temperature,
            humidity: args.humidity,
        },
        args.failure_rate,
    );

    // Create shutdown signal channel
    let (shutdown_tx, mut shutdown_rx) = broadcast::channel(1);
    let (connected_tx, connected_rx) = watch::channel(false);

    // Configure MQTT client
    let mut mqttoptions = MqttOptions::new(&device_id, &args.host, args.port);
    mqttoptions.set_keep_alive(Duration::from_secs(30));
    mqttoptions.set_clean_session(true);

    let (client, eventloop) = AsyncClient::new(mqttoptions, 10);

    tokio::spawn(run_publisher(
        device_id.clone(),
        args.topic.clone(),
        Duration::from_secs(args.interval.max(1)),
        sensor,
        client.clone(),
        connected_rx,
        shutdown_tx.subscribe(),
    ));

    // Spawn signal handler task
    let cleanup_client = client.clone();
    let shutdown_tx_signal = shutdown_tx.clone();
    tokio::spawn(async move {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for ctrl-c signal: {}", e);
            return;
        }

        info!("🛑 Received CTRL+C, initiating graceful shutdown...");
        if let Err(e) = cleanup_client.disconnect().await {
            warn!("Failed to request disconnect: {}", e);
        }

        // Give some time for the disconnect to be sent
        tokio::time::sleep(Duration::from_millis(100)).await;

        if let Err(e) = shutdown_tx_signal.send(()) {
            error!("Failed to send shutdown signal: {}", e);
        }
    });

    tokio::select! {
        () = run_event_loop(eventloop, connected_tx) => {}
        _ = shutdown_rx.recv() => {
            info!("✅ Graceful shutdown completed");
        }
    }

    Ok(())
}

/// Keep the broker connection alive and report whether it is usable
async fn run_event_loop(mut eventloop: EventLoop, connected_tx: watch::Sender<bool>) {
    info!("Attempting to connect to MQTT broker...");

    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Incoming::ConnAck(_))) => {
                info!("✅ Connected to MQTT broker successfully");
                connected_tx.send_replace(true);
            }
            Ok(Event::Incoming(Incoming::PubAck(ack))) => {
                debug!("Reading {} acknowledged", ack.pkid);
            }
            Ok(_) => {
                // Handle other events silently
            }
            Err(e) => {
                connected_tx.send_replace(false);
                error!("❌ MQTT connection error: {:?}", e);
                info!("🔄 Reconnecting in 5 seconds...");
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
        }
    }
}

/// Read the sensor on every tick and publish the derived reading
async fn run_publisher(
    device_id: String,
    topic: String,
    period: Duration,
    mut sensor: SimulatedDht11,
    client: AsyncClient,
    connected_rx: watch::Receiver<bool>,
    mut shutdown_rx: broadcast::Receiver<()>,
) {
    let started = Instant::now();
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if !*connected_rx.borrow() {
                    debug!("Not connected yet, skipping reading");
                    continue;
                }

                let sample = match sensor.read() {
                    Ok(sample) => sample,
                    Err(e) => {
                        error!("❌ Sensor read failed: {}", e);
                        continue;
                    }
                };

                let reading = build_reading(&device_id, sample, started.elapsed().as_secs());
                info!(
                    "🌡️ Temp: {:.1}C, Humidity: {:.1}%, Heat index: {:.1}C, Status: {}",
                    reading.temperature, reading.humidity, reading.heat_index, reading.comfort_status
                );

                match reading.to_payload() {
                    Ok(payload) => {
                        if let Err(e) = client.publish(&topic, QoS::AtLeastOnce, false, payload).await {
                            warn!("Failed to publish reading: {}", e);
                        }
                    }
                    Err(e) => error!("❌ Failed to serialize reading: {}", e),
                }
            }
            _ = shutdown_rx.recv() => {
                info!("👋 Sensor {} stopping", device_id);
                break;
            }
        }
    }
}
