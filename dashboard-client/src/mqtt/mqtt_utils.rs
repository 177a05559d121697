/// Prefix of the per-run random client identifier
pub const CLIENT_ID_PREFIX: &str = "dashboard_client";

/// Generate a random MQTT client ID to avoid collisions between dashboards
///
/// Format: {prefix}_{8 hex digits}
pub fn generate_client_id(prefix: &str) -> String {
    format!("{}_{:08x}", prefix, rand::random::<u32>())
}

/// Check whether `topic` is matched by the subscription `filter`.
///
/// Supports the MQTT single level (`+`) and multi level (`#`) wildcards.
pub fn topic_matches(filter: &str, topic: &str) -> bool {
    let mut filter_levels = filter.split('/');
    let mut topic_levels = topic.split('/');

    loop {
        match (filter_levels.next(), topic_levels.next()) {
            (Some("#"), _) => return true,
            (Some("+"), Some(_)) => {}
            (Some(f), Some(t)) if f == t => {}
            (None, None) => return true,
            _ => return false,
        }
    }
}
