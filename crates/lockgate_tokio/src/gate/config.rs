/// Default gate name used in log fields.
pub const DEFAULT_GATE_NAME: &str = "root-window";

/// Default capacity of the transition broadcast.
pub const DEFAULT_TRANSITION_BUFFER: usize = 32;

/// Static gate settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
    /// Identifies the protected window in logs.
    pub name: String,
    /// Broadcast capacity; lagging subscribers lose the oldest transitions.
    pub transition_buffer: usize,
}

impl GateConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_GATE_NAME.to_string(),
            transition_buffer: DEFAULT_TRANSITION_BUFFER,
        }
    }
}
