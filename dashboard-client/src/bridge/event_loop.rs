use log::{info, warn};
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};

use super::bridge_types::BridgeError;
use super::dashboard_bridge::DashboardBridge;
use crate::mqtt::mqtt_types::{BridgeEvent, PubSubClient};
use crate::view::DashboardView;

/// How long to wait for the close notification after a shutdown request
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Connect the bridge and feed it events until the connection is over.
///
/// Events are handled one at a time in arrival order. When `shutdown`
/// completes the bridge asks its client for a clean close and keeps
/// handling events for at most [`SHUTDOWN_GRACE`].
pub async fn run_bridge<C, V, S>(
    bridge: &mut DashboardBridge<C, V>,
    events: &mut mpsc::UnboundedReceiver<BridgeEvent>,
    shutdown: S,
) -> Result<(), BridgeError>
where
    C: PubSubClient,
    V: DashboardView,
    S: Future<Output = ()>,
{
    bridge.connect()?;

    tokio::pin!(shutdown);
    let mut deadline: Option<Instant> = None;

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else {
                    return if deadline.is_some() {
                        Ok(())
                    } else {
                        Err(BridgeError::ChannelClosed)
                    };
                };
                if bridge.handle_event(event).is_break() {
                    return Ok(());
                }
            }
            () = &mut shutdown, if deadline.is_none() => {
                info!("🛑 Shutdown requested");
                if let Err(e) = bridge.disconnect() {
                    warn!("⚠️ Could not request a clean close: {}", e);
                    return Ok(());
                }
                deadline = Some(Instant::now() + SHUTDOWN_GRACE);
            }
            () = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                warn!("⚠️ No close confirmation from the broker, stopping anyway");
                return Ok(());
            }
        }
    }
}
