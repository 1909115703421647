use crate::config::SimulatorConfig;
use crate::document;
use crate::enablement;
use crate::error::{DocumentError, EngineError};
use crate::model::{
    Arc, ArcData, ArcPatch, FiringState, LabelPosition, Net, Node, NodeKind, NodePatch, Place,
    PlaceData, Position, SimulationEvent, TokenTransfer, Transition, TransitionData,
    DEFAULT_ARC_TYPE,
};
use crate::pulse::PulseQueue;
use crate::scheduler;
use crate::snapshot::SnapshotStore;
use itertools::Itertools;
use log::{debug, info, warn};
use std::time::Duration;

/// Single-threaded execution engine for a timed Place/Transition net.
///
/// Every mutator validates first and only then changes the net, and ends with a
/// single settle step: one scheduler pass followed by one `canFire` re-evaluation.
#[derive(Debug)]
pub struct Simulator {
    net: Net,
    current_time: u64,
    config: SimulatorConfig,
    next_node_id: u64,
    snapshot: SnapshotStore,
    pulses: PulseQueue,
    events: Vec<SimulationEvent>,
}

impl Default for Simulator {
    fn default() -> Self {
        Simulator::new()
    }
}

impl Simulator {
    pub fn new() -> Self {
        Simulator::with_config(SimulatorConfig::default())
    }

    pub fn with_config(config: SimulatorConfig) -> Self {
        Simulator {
            net: Net::default(),
            current_time: 0,
            pulses: PulseQueue::new(config.firing_pulse()),
            config,
            next_node_id: 0,
            snapshot: SnapshotStore::new(),
            events: Vec::new(),
        }
    }

    // --- Queries ---

    pub fn net(&self) -> &Net {
        &self.net
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Current value of the discrete clock, in ticks.
    pub fn get_current_time(&self) -> u64 {
        self.current_time
    }

    pub fn is_enabled(&self, transition_id: &str) -> bool {
        enablement::is_enabled(&self.net, transition_id)
    }

    pub fn transition_state(&self, transition_id: &str) -> Option<FiringState> {
        self.net
            .find_transition(transition_id)
            .map(|t| t.data.state())
    }

    /// Transitions a `start_transition` call would currently accept, in node order.
    pub fn get_enabled_transitions(&self) -> Vec<String> {
        self.net
            .transitions()
            .filter(|t| !t.data.tokens_removed && self.is_enabled(&t.id))
            .map(|t| t.id.clone())
            .collect()
    }

    pub fn get_marking(&self, place_id: &str) -> Option<u64> {
        self.net.tokens(place_id)
    }

    pub fn get_all_markings(&self) -> Vec<(String, u64)> {
        self.net.marking()
    }

    pub fn has_initial_state(&self) -> bool {
        self.snapshot.is_saved()
    }

    pub fn has_pending_pulse(&self, transition_id: &str) -> bool {
        self.pulses.is_pending(transition_id)
    }

    pub fn pending_pulse_count(&self) -> usize {
        self.pulses.len()
    }

    /// Earliest clock value at which a waiting transition will deposit.
    pub fn next_completion_time(&self) -> Option<u64> {
        scheduler::next_due_time(&self.net)
    }

    /// Takes every event emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<SimulationEvent> {
        std::mem::take(&mut self.events)
    }

    // --- Editing ---

    /// Adds a node with default data and returns its id.
    pub fn create_node(&mut self, kind: NodeKind, position: Position) -> Result<String, EngineError> {
        let id = self.allocate_node_id(kind)?;
        let node = match kind {
            NodeKind::Place => Node::Place(Place {
                id: id.clone(),
                position,
                data: PlaceData {
                    tokens: 0,
                    label: Some(String::new()),
                    label_position: LabelPosition::Top,
                    number: 0,
                },
            }),
            NodeKind::Transition => Node::Transition(Transition {
                id: id.clone(),
                position,
                data: TransitionData {
                    label: Some(String::new()),
                    ..TransitionData::default()
                },
            }),
        };
        debug!("Created {:?} {}", kind, id);
        self.net.nodes.push(node);
        self.net.renumber();
        self.settle();
        Ok(id)
    }

    fn allocate_node_id(&mut self, kind: NodeKind) -> Result<String, EngineError> {
        let prefix = match kind {
            NodeKind::Place => "position",
            NodeKind::Transition => "transition",
        };
        loop {
            let counter = self.next_node_id;
            self.next_node_id = counter.checked_add(1).ok_or(EngineError::IdsExhausted)?;
            let id = format!("{}-{}", prefix, counter);
            if !self.net.contains_node(&id) {
                return Ok(id);
            }
        }
    }

    /// Removes a node and every arc touching it. Tokens already withdrawn by a
    /// waiting transition are discarded with it.
    pub fn delete_node(&mut self, id: &str) -> Result<Node, EngineError> {
        let node = self
            .net
            .remove_node(id)
            .ok_or_else(|| EngineError::UnknownNode(id.to_string()))?;
        if let Node::Transition(transition) = &node {
            self.pulses.cancel(id);
            if transition.data.is_committed() {
                warn!("Deleted transition {} while it was waiting to deposit", id);
            }
        }
        debug!("Deleted {:?} {}", node.kind(), id);
        self.net.renumber();
        self.settle();
        Ok(node)
    }

    pub fn update_node_data(&mut self, id: &str, patch: NodePatch) -> Result<(), EngineError> {
        let node = self
            .net
            .node_mut(id)
            .ok_or_else(|| EngineError::UnknownNode(id.to_string()))?;
        match (node, patch) {
            (Node::Place(place), NodePatch::Place(patch)) => place.data.apply(patch),
            (Node::Transition(transition), NodePatch::Transition(patch)) => {
                transition.data.apply(patch)
            }
            (node, patch) => {
                return Err(EngineError::KindMismatch {
                    id: id.to_string(),
                    expected: patch.kind(),
                    actual: node.kind(),
                })
            }
        }
        self.settle();
        Ok(())
    }

    pub fn set_node_position(&mut self, id: &str, position: Position) -> Result<(), EngineError> {
        self.net
            .node_mut(id)
            .ok_or_else(|| EngineError::UnknownNode(id.to_string()))?
            .set_position(position);
        Ok(())
    }

    /// Connects a place to a transition or a transition to a place with weight 1.
    pub fn create_arc(&mut self, source: &str, target: &str) -> Result<String, EngineError> {
        let source_kind = self
            .net
            .kind_of(source)
            .ok_or_else(|| EngineError::UnknownNode(source.to_string()))?;
        let target_kind = self
            .net
            .kind_of(target)
            .ok_or_else(|| EngineError::UnknownNode(target.to_string()))?;
        if source_kind == target_kind {
            return Err(EngineError::SameKindArc {
                source_kind,
                target_kind,
            });
        }
        let parallel = self
            .net
            .arcs
            .iter()
            .any(|a| a.source == source && a.target == target);
        if parallel && !self.config.allow_parallel_arcs {
            return Err(EngineError::DuplicateArc {
                from: source.to_string(),
                to: target.to_string(),
            });
        }

        let base = format!("arc-{}-{}", source, target);
        let mut id = base.clone();
        let mut suffix = 1;
        while self.net.find_arc(&id).is_some() {
            id = format!("{}-{}", base, suffix);
            suffix += 1;
        }
        self.net.arcs.push(Arc {
            id: id.clone(),
            source: source.to_string(),
            target: target.to_string(),
            arc_type: DEFAULT_ARC_TYPE.to_string(),
            data: ArcData {
                label: Some(String::new()),
                ..ArcData::default()
            },
        });
        debug!("Created arc {}", id);
        self.settle();
        Ok(id)
    }

    pub fn update_arc_data(&mut self, id: &str, patch: ArcPatch) -> Result<(), EngineError> {
        self.net
            .find_arc_mut(id)
            .ok_or_else(|| EngineError::UnknownArc(id.to_string()))?
            .data
            .apply(patch);
        self.settle();
        Ok(())
    }

    pub fn delete_arc(&mut self, id: &str) -> Result<Arc, EngineError> {
        let index = self
            .net
            .arcs
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| EngineError::UnknownArc(id.to_string()))?;
        let arc = self.net.arcs.remove(index);
        debug!("Deleted arc {}", id);
        self.settle();
        Ok(arc)
    }

    // --- Firing ---

    /// Withdraws the input tokens of an enabled transition. With no delay the
    /// outputs are deposited before returning; otherwise the transition waits
    /// for the clock. Returns the state the transition ends up in.
    pub fn start_transition(&mut self, transition_id: &str) -> Result<FiringState, EngineError> {
        let transition = match self.net.node(transition_id) {
            Some(Node::Transition(transition)) => transition,
            Some(Node::Place(_)) => {
                return Err(EngineError::KindMismatch {
                    id: transition_id.to_string(),
                    expected: NodeKind::Transition,
                    actual: NodeKind::Place,
                })
            }
            None => return Err(EngineError::UnknownNode(transition_id.to_string())),
        };
        if transition.data.tokens_removed {
            return Err(EngineError::AlreadyWaiting(transition_id.to_string()));
        }
        let delay = transition.data.delay;
        let consumed = match enablement::required_tokens(&self.net, transition_id) {
            Some(required) if self.is_enabled(transition_id) => required,
            _ => {
                let missing = enablement::shortfalls(&self.net, transition_id)
                    .into_iter()
                    .map(|(place, held, required)| format!("{} has {}/{}", place, held, required))
                    .join(", ");
                warn!("Transition {} is not enabled: {}", transition_id, missing);
                return Err(EngineError::NotEnabled(transition_id.to_string()));
            }
        };

        // --- Consume Tokens ---
        for transfer in &consumed {
            if let Some(place) = self.net.find_place_mut(&transfer.place_id) {
                place.data.tokens -= transfer.tokens;
                debug!("  Consuming {} from place {}", transfer.tokens, transfer.place_id);
            }
        }
        if let Some(transition) = self.net.find_transition_mut(transition_id) {
            transition.data.tokens_removed = true;
            transition.data.waiting = true;
            transition.data.activation_time = Some(self.current_time);
        }
        info!(
            "Started transition {} at time {} (delay {})",
            transition_id, self.current_time, delay
        );
        self.events.push(SimulationEvent::TransitionStarted {
            transition_id: transition_id.to_string(),
            simulation_time: self.current_time,
            consumed,
        });

        if delay == 0 {
            self.complete_transition(transition_id);
        }
        self.settle();
        Ok(self
            .transition_state(transition_id)
            .unwrap_or(FiringState::Idle))
    }

    // Deposits the outputs of a waiting transition. Only the scheduler and the
    // zero-delay path of `start_transition` call this.
    fn complete_transition(&mut self, transition_id: &str) {
        // --- Produce Tokens ---
        let produced = produced_tokens(&self.net, transition_id);
        for transfer in &produced {
            if let Some(place) = self.net.find_place_mut(&transfer.place_id) {
                place.data.tokens = place.data.tokens.saturating_add(transfer.tokens);
                debug!("  Producing {} into place {}", transfer.tokens, transfer.place_id);
            }
        }
        if let Some(transition) = self.net.find_transition_mut(transition_id) {
            transition.data.firing = true;
            transition.data.waiting = false;
            transition.data.activation_time = None;
            transition.data.tokens_removed = false;
        }
        self.pulses.schedule(transition_id);
        info!(
            "Completed transition {} at time {}",
            transition_id, self.current_time
        );
        self.events.push(SimulationEvent::TransitionCompleted {
            transition_id: transition_id.to_string(),
            simulation_time: self.current_time,
            produced,
        });
    }

    // Completes every transition whose wait has elapsed. Returns how many completed.
    fn run_scheduler(&mut self) -> usize {
        let due = scheduler::due_transitions(&self.net, self.current_time);
        if !due.is_empty() {
            debug!(
                "Scheduler at time {} completing: {}",
                self.current_time,
                due.iter().join(", ")
            );
        }
        for transition_id in &due {
            self.complete_transition(transition_id);
        }
        due.len()
    }

    // Recomputes `canFire` for every transition not committed to a deposit,
    // writing only values that changed.
    fn reevaluate(&mut self) {
        let changes: Vec<(String, bool)> = self
            .net
            .transitions()
            .filter(|t| !t.data.is_committed())
            .filter_map(|t| {
                let enabled = enablement::is_enabled(&self.net, &t.id);
                (enabled != t.data.can_fire).then(|| (t.id.clone(), enabled))
            })
            .collect();
        for (transition_id, enabled) in changes {
            if let Some(transition) = self.net.find_transition_mut(&transition_id) {
                transition.data.can_fire = enabled;
            }
        }
    }

    fn settle(&mut self) -> usize {
        let completed = self.run_scheduler();
        self.reevaluate();
        completed
    }

    // --- Clock ---

    /// Advances the clock by one tick. Returns how many transitions completed.
    pub fn advance_clock(&mut self) -> usize {
        self.advance_clock_by(1)
    }

    pub fn advance_clock_by(&mut self, ticks: u64) -> usize {
        self.current_time = self.current_time.saturating_add(ticks);
        debug!("Clock advanced to {}", self.current_time);
        self.settle()
    }

    /// Sets the clock back to 0. Waiting transitions keep their activation time.
    pub fn reset_clock(&mut self) {
        self.current_time = 0;
        self.settle();
    }

    /// Real time has passed on the host; clears `firing` on expired pulses.
    pub fn expire_pulses(&mut self, elapsed: Duration) -> Vec<String> {
        if self.pulses.is_empty() {
            return Vec::new();
        }
        let expired = self.pulses.advance(elapsed);
        for transition_id in &expired {
            if let Some(transition) = self.net.find_transition_mut(transition_id) {
                transition.data.firing = false;
            }
            self.events.push(SimulationEvent::PulseExpired {
                transition_id: transition_id.clone(),
            });
        }
        expired
    }

    // --- Snapshots ---

    /// Saves the current net as the initial state. Always succeeds.
    pub fn save_initial_state(&mut self) -> bool {
        self.snapshot.save(&self.net);
        info!("Saved initial state ({} nodes)", self.net.nodes.len());
        true
    }

    /// Replaces the net with the saved initial state and resets the clock to 0.
    pub fn reset_to_initial_state(&mut self) -> Result<(), EngineError> {
        let net = self.snapshot.restore().ok_or(EngineError::NoSnapshot)?;
        self.install(net);
        self.current_time = 0;
        self.settle();
        info!("Restored initial state");
        Ok(())
    }

    /// Empties the net, forgets the saved state and resets ids and the clock.
    pub fn reset_canvas(&mut self) {
        self.net = Net::default();
        self.next_node_id = 0;
        self.current_time = 0;
        self.snapshot.invalidate();
        self.pulses.clear();
        self.events.clear();
        info!("Canvas reset");
    }

    // Swaps in a whole net and restarts pulses for any `firing` flag it carries.
    fn install(&mut self, net: Net) {
        self.net = net;
        self.pulses.clear();
        let firing: Vec<String> = self
            .net
            .transitions()
            .filter(|t| t.data.firing)
            .map(|t| t.id.clone())
            .collect();
        for transition_id in &firing {
            self.pulses.schedule(transition_id);
        }
    }

    // --- Import / Export ---

    pub fn export_model(&self) -> Result<String, DocumentError> {
        document::export(&self.net)
    }

    /// Replaces the net with a parsed document. On failure the current net is kept.
    pub fn import_model(&mut self, json: &str) -> Result<(), DocumentError> {
        let net = document::parse(json)?;
        self.load(net);
        Ok(())
    }

    // Makes a parsed net live, keeping the clock and the saved state.
    pub(crate) fn load(&mut self, mut net: Net) {
        net.renumber();
        // `document::parse` rejects nets whose counter would not fit
        self.next_node_id = document::next_node_counter(&net).unwrap_or(u64::MAX);
        self.install(net);
        self.settle();
    }
}

fn produced_tokens(net: &Net, transition_id: &str) -> Vec<TokenTransfer> {
    let mut produced: Vec<TokenTransfer> = Vec::new();
    for arc in net.output_arcs(transition_id) {
        match produced.iter_mut().find(|t| t.place_id == arc.target) {
            Some(transfer) => transfer.tokens = transfer.tokens.saturating_add(arc.data.weight),
            None => produced.push(TokenTransfer {
                place_id: arc.target.clone(),
                tokens: arc.data.weight,
            }),
        }
    }
    produced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PlacePatch, TransitionPatch};

    struct Chain {
        sim: Simulator,
        input: String,
        output: String,
        transition: String,
    }

    // input(tokens) --weight--> transition(delay) --1--> output
    fn chain(tokens: u64, weight: i64, delay: u64) -> Chain {
        let mut sim = Simulator::new();
        let input = sim.create_node(NodeKind::Place, Position::new(0.0, 0.0)).unwrap();
        let transition = sim.create_node(NodeKind::Transition, Position::new(100.0, 0.0)).unwrap();
        let output = sim.create_node(NodeKind::Place, Position::new(200.0, 0.0)).unwrap();
        let in_arc = sim.create_arc(&input, &transition).unwrap();
        sim.create_arc(&transition, &output).unwrap();
        sim.update_arc_data(
            &in_arc,
            ArcPatch {
                weight: Some(weight),
                ..ArcPatch::default()
            },
        )
        .unwrap();
        sim.update_node_data(
            &input,
            NodePatch::Place(PlacePatch {
                tokens: Some(tokens),
                ..PlacePatch::default()
            }),
        )
        .unwrap();
        sim.update_node_data(
            &transition,
            NodePatch::Transition(TransitionPatch {
                delay: Some(delay),
                ..TransitionPatch::default()
            }),
        )
        .unwrap();
        Chain {
            sim,
            input,
            output,
            transition,
        }
    }

    #[test]
    fn ids_follow_a_shared_counter() {
        let mut sim = Simulator::new();
        assert_eq!(sim.create_node(NodeKind::Place, Position::default()).unwrap(), "position-0");
        assert_eq!(sim.create_node(NodeKind::Transition, Position::default()).unwrap(), "transition-1");
        assert_eq!(sim.create_node(NodeKind::Place, Position::default()).unwrap(), "position-2");
    }

    #[test]
    fn can_fire_tracks_the_marking() {
        let mut c = chain(0, 2, 0);
        assert_eq!(c.sim.transition_state(&c.transition), Some(FiringState::Idle));
        c.sim
            .update_node_data(
                &c.input,
                NodePatch::Place(PlacePatch {
                    tokens: Some(2),
                    ..PlacePatch::default()
                }),
            )
            .unwrap();
        assert_eq!(c.sim.transition_state(&c.transition), Some(FiringState::Enabled));
        assert_eq!(c.sim.get_enabled_transitions(), vec![c.transition.clone()]);
    }

    #[test]
    fn zero_delay_fires_through() {
        let mut c = chain(3, 2, 0);
        let state = c.sim.start_transition(&c.transition).unwrap();
        assert_eq!(state, FiringState::Fired);
        assert_eq!(c.sim.get_marking(&c.input), Some(1));
        assert_eq!(c.sim.get_marking(&c.output), Some(1));
        let data = &c.sim.net().find_transition(&c.transition).unwrap().data;
        assert!(!data.waiting && !data.tokens_removed && data.firing);
        assert!(!data.can_fire);
    }

    #[test]
    fn waiting_transition_cannot_restart() {
        let mut c = chain(4, 1, 2);
        assert_eq!(c.sim.start_transition(&c.transition), Ok(FiringState::Waiting));
        assert_eq!(
            c.sim.start_transition(&c.transition),
            Err(EngineError::AlreadyWaiting(c.transition.clone()))
        );
        assert_eq!(c.sim.get_marking(&c.input), Some(3));
        assert!(c.sim.get_enabled_transitions().is_empty());
    }

    #[test]
    fn committed_transition_ignores_input_changes() {
        let mut c = chain(1, 1, 5);
        c.sim.start_transition(&c.transition).unwrap();
        let before = c.sim.net().find_transition(&c.transition).unwrap().data.clone();
        c.sim
            .update_node_data(
                &c.input,
                NodePatch::Place(PlacePatch {
                    tokens: Some(10),
                    ..PlacePatch::default()
                }),
            )
            .unwrap();
        let after = &c.sim.net().find_transition(&c.transition).unwrap().data;
        assert_eq!(&before, after);
    }

    #[test]
    fn rejected_operations_leave_the_net_alone() {
        let mut c = chain(1, 1, 0);
        let before = c.sim.net().clone();
        assert!(matches!(
            c.sim.create_arc(&c.input, &c.output),
            Err(EngineError::SameKindArc { .. })
        ));
        assert!(matches!(
            c.sim.create_arc(&c.input, &c.transition),
            Err(EngineError::DuplicateArc { .. })
        ));
        assert!(matches!(
            c.sim.start_transition(&c.input),
            Err(EngineError::KindMismatch { .. })
        ));
        assert_eq!(
            c.sim.start_transition("transition-42"),
            Err(EngineError::UnknownNode("transition-42".to_string()))
        );
        assert!(matches!(
            c.sim.update_node_data(
                &c.transition,
                NodePatch::Place(PlacePatch::default())
            ),
            Err(EngineError::KindMismatch { .. })
        ));
        assert_eq!(c.sim.delete_arc("nope"), Err(EngineError::UnknownArc("nope".to_string())));
        assert_eq!(c.sim.net(), &before);
    }

    #[test]
    fn parallel_arcs_need_config_and_aggregate() {
        let mut sim = Simulator::with_config(SimulatorConfig {
            allow_parallel_arcs: true,
            ..SimulatorConfig::default()
        });
        let p = sim.create_node(NodeKind::Place, Position::default()).unwrap();
        let t = sim.create_node(NodeKind::Transition, Position::default()).unwrap();
        let first = sim.create_arc(&p, &t).unwrap();
        let second = sim.create_arc(&p, &t).unwrap();
        assert_ne!(first, second);
        sim.update_node_data(
            &p,
            NodePatch::Place(PlacePatch {
                tokens: Some(1),
                ..PlacePatch::default()
            }),
        )
        .unwrap();
        // Two arcs of weight 1 need two tokens in total
        assert!(!sim.is_enabled(&t));
        assert!(sim.start_transition(&t).is_err());
        assert_eq!(sim.get_marking(&p), Some(1));
    }

    #[test]
    fn exhausted_counter_rejects_new_nodes() {
        let mut sim = Simulator::new();
        let text = format!(
            r#"{{"nodes": [{{"id": "position-{}", "type": "position"}}], "edges": []}}"#,
            u64::MAX - 1
        );
        sim.import_model(&text).unwrap();
        assert_eq!(
            sim.create_node(NodeKind::Transition, Position::default()),
            Err(EngineError::IdsExhausted)
        );
        assert_eq!(sim.net().nodes.len(), 1);
    }

    #[test]
    fn huge_parallel_weights_saturate_deposits() {
        let mut sim = Simulator::new();
        let text = format!(
            r#"{{"nodes": [
                {{"id": "transition-0", "type": "transition"}},
                {{"id": "position-1", "type": "position", "data": {{"tokens": 1}}}}
            ], "edges": [
                {{"id": "a", "source": "transition-0", "target": "position-1", "data": {{"weight": {max}}}}},
                {{"id": "b", "source": "transition-0", "target": "position-1", "data": {{"weight": {max}}}}}
            ]}}"#,
            max = i64::MAX
        );
        sim.import_model(&text).unwrap();
        assert_eq!(sim.start_transition("transition-0"), Ok(FiringState::Fired));
        assert_eq!(sim.get_marking("position-1"), Some(u64::MAX));
    }

    #[test]
    fn pulse_clears_firing_flag() {
        let mut c = chain(1, 1, 0);
        c.sim.start_transition(&c.transition).unwrap();
        assert!(c.sim.has_pending_pulse(&c.transition));
        assert!(c.sim.expire_pulses(Duration::from_millis(149)).is_empty());
        assert_eq!(c.sim.expire_pulses(Duration::from_millis(1)), vec![c.transition.clone()]);
        let data = &c.sim.net().find_transition(&c.transition).unwrap().data;
        assert!(!data.firing);
    }

    #[test]
    fn events_describe_both_phases() {
        let mut c = chain(2, 2, 1);
        c.sim.drain_events();
        c.sim.start_transition(&c.transition).unwrap();
        c.sim.advance_clock();
        let events = c.sim.drain_events();
        assert_eq!(
            events,
            vec![
                SimulationEvent::TransitionStarted {
                    transition_id: c.transition.clone(),
                    simulation_time: 0,
                    consumed: vec![TokenTransfer {
                        place_id: c.input.clone(),
                        tokens: 2
                    }],
                },
                SimulationEvent::TransitionCompleted {
                    transition_id: c.transition.clone(),
                    simulation_time: 1,
                    produced: vec![TokenTransfer {
                        place_id: c.output.clone(),
                        tokens: 1
                    }],
                },
            ]
        );
        assert!(c.sim.drain_events().is_empty());
    }

    #[test]
    fn deleting_waiting_transition_drops_its_tokens() {
        let mut c = chain(1, 1, 3);
        c.sim.start_transition(&c.transition).unwrap();
        c.sim.delete_node(&c.transition).unwrap();
        assert!(c.sim.net().arcs.is_empty());
        c.sim.advance_clock_by(10);
        assert_eq!(c.sim.get_marking(&c.input), Some(0));
        assert_eq!(c.sim.get_marking(&c.output), Some(0));
    }

    #[test]
    fn next_completion_time_reports_earliest_deposit() {
        let mut c = chain(1, 1, 4);
        assert_eq!(c.sim.next_completion_time(), None);
        c.sim.advance_clock_by(2);
        c.sim.start_transition(&c.transition).unwrap();
        assert_eq!(c.sim.next_completion_time(), Some(6));
        assert_eq!(c.sim.pending_pulse_count(), 0);
        c.sim.advance_clock_by(4);
        assert_eq!(c.sim.next_completion_time(), None);
        assert_eq!(c.sim.pending_pulse_count(), 1);
    }

    #[test]
    fn shortening_delay_completes_on_next_settle() {
        let mut c = chain(1, 1, 10);
        c.sim.start_transition(&c.transition).unwrap();
        c.sim.advance_clock_by(2);
        c.sim
            .update_node_data(
                &c.transition,
                NodePatch::Transition(TransitionPatch {
                    delay: Some(1),
                    ..TransitionPatch::default()
                }),
            )
            .unwrap();
        assert_eq!(c.sim.get_marking(&c.output), Some(1));
    }
}
