use serde::Deserialize;
use std::time::Duration;

/// Engine settings. Every field has a default, so `{}` is a valid config.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SimulatorConfig {
    /// How long the `firing` flag stays set after a transition deposits.
    pub firing_pulse_ms: u64,
    /// Allow more than one arc between the same source and target.
    pub allow_parallel_arcs: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        SimulatorConfig {
            firing_pulse_ms: 150,
            allow_parallel_arcs: false,
        }
    }
}

impl SimulatorConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn firing_pulse(&self) -> Duration {
        Duration::from_millis(self.firing_pulse_ms)
    }
}
