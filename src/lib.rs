mod config;
mod document;
mod enablement;
mod error;
mod model;
mod pulse;
mod scheduler;
mod simulator;
mod snapshot;

pub use config::SimulatorConfig;
pub use document::{export as export_net, parse as parse_net};
pub use enablement::{is_enabled, required_tokens, shortfalls};
pub use error::{DocumentError, EngineError};
pub use model::{
    Arc, ArcData, ArcPatch, FiringState, LabelPosition, Net, Node, NodeKind, NodePatch, Place,
    PlaceData, PlacePatch, Position, SimulationEvent, TokenTransfer, Transition, TransitionData,
    TransitionPatch,
};
pub use simulator::Simulator;

use anyhow::Context;
use log::warn;
use std::time::Duration;

// Conditionally include the wasm module only when targeting wasm32
cfg_if::cfg_if! {
    if #[cfg(all(target_arch = "wasm32", feature = "wasm"))] {
        pub mod wasm;
    }
}

/// The presentation-layer boundary, no wasm specifics here.
///
/// Every operation reports success as a `bool` (or `Option`) and logs the
/// reason for a rejection instead of returning it.
#[derive(Debug, Default)]
pub struct CoreSimulator {
    simulator: Simulator,
}

impl CoreSimulator {
    pub fn new() -> Self {
        CoreSimulator::default()
    }

    pub fn with_config(config: SimulatorConfig) -> Self {
        CoreSimulator {
            simulator: Simulator::with_config(config),
        }
    }

    /// Builds a simulator whose net comes from a model document.
    pub fn from_document(json: &str) -> anyhow::Result<Self> {
        let net = document::parse(json).context("Failed to load model document")?;
        let mut simulator = Simulator::new();
        simulator.load(net);
        Ok(CoreSimulator { simulator })
    }

    pub fn simulator(&self) -> &Simulator {
        &self.simulator
    }

    pub fn simulator_mut(&mut self) -> &mut Simulator {
        &mut self.simulator
    }

    pub fn net(&self) -> &Net {
        self.simulator.net()
    }

    pub fn get_current_time(&self) -> u64 {
        self.simulator.get_current_time()
    }

    pub fn get_enabled_transitions(&self) -> Vec<String> {
        self.simulator.get_enabled_transitions()
    }

    pub fn is_initial_state_saved(&self) -> bool {
        self.simulator.has_initial_state()
    }

    pub fn create_node(&mut self, kind: NodeKind, position: Position) -> Option<String> {
        self.simulator
            .create_node(kind, position)
            .map_err(|e| warn!("Rejected operation: {}", e))
            .ok()
    }

    pub fn delete_node(&mut self, id: &str) -> bool {
        report(self.simulator.delete_node(id))
    }

    pub fn update_node_data(&mut self, id: &str, patch: NodePatch) -> bool {
        report(self.simulator.update_node_data(id, patch))
    }

    /// Applies a partial node update given as JSON, e.g. `{"tokens": 3}`.
    /// The fields are read according to the kind of the node.
    pub fn update_node_data_json(&mut self, id: &str, json: &str) -> bool {
        let patch = match self.simulator.net().kind_of(id) {
            Some(NodeKind::Place) => serde_json::from_str(json).map(NodePatch::Place),
            Some(NodeKind::Transition) => serde_json::from_str(json).map(NodePatch::Transition),
            None => {
                warn!("Rejected node update: node {:?} does not exist", id);
                return false;
            }
        };
        match patch {
            Ok(patch) => self.update_node_data(id, patch),
            Err(e) => {
                warn!("Rejected node update for {}: {}", id, e);
                false
            }
        }
    }

    pub fn set_node_position(&mut self, id: &str, position: Position) -> bool {
        report(self.simulator.set_node_position(id, position))
    }

    pub fn create_arc(&mut self, source: &str, target: &str) -> Option<String> {
        self.simulator
            .create_arc(source, target)
            .map_err(|e| warn!("Rejected operation: {}", e))
            .ok()
    }

    pub fn update_arc_data(&mut self, id: &str, patch: ArcPatch) -> bool {
        report(self.simulator.update_arc_data(id, patch))
    }

    /// Applies a partial arc update given as JSON, e.g. `{"weight": 2}`.
    pub fn update_arc_data_json(&mut self, id: &str, json: &str) -> bool {
        match serde_json::from_str::<ArcPatch>(json) {
            Ok(patch) => self.update_arc_data(id, patch),
            Err(e) => {
                warn!("Rejected arc update for {}: {}", id, e);
                false
            }
        }
    }

    pub fn delete_arc(&mut self, id: &str) -> bool {
        report(self.simulator.delete_arc(id))
    }

    pub fn start_transition(&mut self, transition_id: &str) -> bool {
        report(self.simulator.start_transition(transition_id))
    }

    pub fn advance_clock(&mut self) -> usize {
        self.simulator.advance_clock()
    }

    pub fn advance_clock_by(&mut self, ticks: u64) -> usize {
        self.simulator.advance_clock_by(ticks)
    }

    pub fn reset_clock(&mut self) {
        self.simulator.reset_clock()
    }

    pub fn expire_pulses(&mut self, elapsed_ms: u64) -> Vec<String> {
        self.simulator
            .expire_pulses(Duration::from_millis(elapsed_ms))
    }

    pub fn drain_events(&mut self) -> Vec<SimulationEvent> {
        self.simulator.drain_events()
    }

    pub fn save_initial_state(&mut self) -> bool {
        self.simulator.save_initial_state()
    }

    pub fn reset_to_initial_state(&mut self) -> bool {
        report(self.simulator.reset_to_initial_state())
    }

    pub fn reset_canvas(&mut self) {
        self.simulator.reset_canvas()
    }

    /// The model document, or `None` if it could not be encoded.
    pub fn export_model(&self) -> Option<String> {
        self.simulator
            .export_model()
            .map_err(|e| warn!("Export failed: {}", e))
            .ok()
    }

    pub fn import_model(&mut self, json: &str) -> bool {
        match self.simulator.import_model(json) {
            Ok(()) => true,
            Err(e) => {
                warn!("Import failed: {}", e);
                false
            }
        }
    }
}

fn report<T>(result: Result<T, EngineError>) -> bool {
    match result {
        Ok(_) => true,
        Err(e) => {
            warn!("Rejected operation: {}", e);
            false
        }
    }
}
