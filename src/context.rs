//! Immutable per-run context derived from the command line.

/// CLI-derived values threaded through resolution and the provider call.
///
/// Built once at startup and passed by reference; entries never mutate it.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Prefix every composite alarm name starts with.
    pub alarm_prefix: String,
    /// Global namespace override; takes precedence over entry namespaces.
    pub namespace: Option<String>,
    /// Notification-target override; replaces per-entry action lists.
    pub topic: Option<String>,
    /// AWS region the alarms are created in.
    pub region: String,
}
