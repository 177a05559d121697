pub mod bridge_types;
pub mod dashboard_bridge;
pub mod event_loop;
pub mod format;


pub use bridge_types::*;
pub use dashboard_bridge::DashboardBridge;
pub use event_loop::run_bridge;
