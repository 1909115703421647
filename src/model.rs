use serde::{de, Deserialize, Deserializer, Serialize};

// --- Core Petri Net Structure ---

/// The whole net, in the shape of the import/export document.
/// Node order is significant: it drives display numbering and scheduler order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Net {
    pub nodes: Vec<Node>,
    #[serde(rename = "edges")]
    pub arcs: Vec<Arc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    #[serde(rename = "position")]
    Place,
    #[serde(rename = "transition")]
    Transition,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum Node {
    #[serde(rename = "position")]
    Place(Place),
    #[serde(rename = "transition")]
    Transition(Transition),
}

// --- Components ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Place {
    pub id: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub data: PlaceData,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PlaceData {
    #[serde(default)]
    pub tokens: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub label_position: LabelPosition,
    #[serde(default)]
    pub number: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Transition {
    pub id: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub data: TransitionData,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TransitionData {
    #[serde(default)]
    pub firing: bool,
    #[serde(default)]
    pub can_fire: bool,
    #[serde(default)]
    pub waiting: bool,
    #[serde(default)]
    pub delay: u64, // Clock ticks between withdrawal and deposit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation_time: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub label_position: LabelPosition,
    #[serde(default)]
    pub number: usize,
    // Older documents predate this field
    #[serde(default)]
    pub tokens_removed: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Arc {
    pub id: String,
    pub source: String, // ID of source node (Place or Transition)
    pub target: String, // ID of target node (Place or Transition)
    #[serde(rename = "type", default = "default_arc_type")]
    pub arc_type: String,
    #[serde(default)]
    pub data: ArcData,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArcData {
    #[serde(default = "default_weight", deserialize_with = "deserialize_weight")]
    pub weight: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub label_position: LabelPosition,
}

impl Default for ArcData {
    fn default() -> Self {
        ArcData {
            weight: default_weight(),
            label: None,
            label_position: LabelPosition::default(),
        }
    }
}

pub const DEFAULT_ARC_TYPE: &str = "petri";

fn default_arc_type() -> String {
    DEFAULT_ARC_TYPE.to_string()
}

fn default_weight() -> u64 {
    1
}

/// Arc weights below 1 are raised to 1.
pub fn normalize_weight(weight: i64) -> u64 {
    if weight < 1 {
        1
    } else {
        weight as u64
    }
}

// Any JSON number with no fractional part, e.g. `2`, `2.0` or `-1`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawWeight {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
}

fn deserialize_weight<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let weight = match Option::<RawWeight>::deserialize(deserializer)? {
        None => default_weight(),
        Some(RawWeight::Unsigned(weight)) => weight.max(1),
        Some(RawWeight::Signed(weight)) => normalize_weight(weight),
        Some(RawWeight::Float(weight)) if weight.fract() == 0.0 => {
            // `as` saturates at the bounds of u64
            (weight as u64).max(1)
        }
        Some(RawWeight::Float(weight)) => {
            return Err(de::Error::custom(format!(
                "arc weight must be a whole number, got {}",
                weight
            )))
        }
    };
    Ok(weight)
}

// --- Geometry ---

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LabelPosition {
    #[default]
    Top,
    Right,
    Bottom,
    Left,
}

// --- Execution State ---

/// Lifecycle of a transition, derived from its flags.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FiringState {
    Idle,
    Enabled,
    Waiting,
    Fired,
}

impl TransitionData {
    /// Tokens are withdrawn and the deposit is still pending.
    pub fn is_committed(&self) -> bool {
        self.waiting && self.tokens_removed
    }

    pub fn state(&self) -> FiringState {
        if self.is_committed() {
            FiringState::Waiting
        } else if self.firing {
            FiringState::Fired
        } else if self.can_fire {
            FiringState::Enabled
        } else {
            FiringState::Idle
        }
    }

    /// Clock value at which a committed transition may deposit.
    pub fn due_time(&self) -> Option<u64> {
        if !self.is_committed() {
            return None;
        }
        self.activation_time.map(|t| t.saturating_add(self.delay))
    }
}

// --- Partial Updates ---

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlacePatch {
    pub tokens: Option<u64>,
    pub label: Option<String>,
    pub label_position: Option<LabelPosition>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransitionPatch {
    pub delay: Option<u64>,
    pub label: Option<String>,
    pub label_position: Option<LabelPosition>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodePatch {
    Place(PlacePatch),
    Transition(TransitionPatch),
}

impl NodePatch {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodePatch::Place(_) => NodeKind::Place,
            NodePatch::Transition(_) => NodeKind::Transition,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArcPatch {
    pub weight: Option<i64>,
    pub label: Option<String>,
    pub label_position: Option<LabelPosition>,
}

impl PlaceData {
    pub fn apply(&mut self, patch: PlacePatch) {
        if let Some(tokens) = patch.tokens {
            self.tokens = tokens;
        }
        if let Some(label) = patch.label {
            self.label = Some(label);
        }
        if let Some(label_position) = patch.label_position {
            self.label_position = label_position;
        }
    }
}

impl TransitionData {
    pub fn apply(&mut self, patch: TransitionPatch) {
        if let Some(delay) = patch.delay {
            self.delay = delay;
        }
        if let Some(label) = patch.label {
            self.label = Some(label);
        }
        if let Some(label_position) = patch.label_position {
            self.label_position = label_position;
        }
    }
}

impl ArcData {
    pub fn apply(&mut self, patch: ArcPatch) {
        if let Some(weight) = patch.weight {
            self.weight = normalize_weight(weight);
        }
        if let Some(label) = patch.label {
            self.label = Some(label);
        }
        if let Some(label_position) = patch.label_position {
            self.label_position = label_position;
        }
    }
}

// --- Event Data Structure ---

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TokenTransfer {
    pub place_id: String,
    pub tokens: u64,
}

/// Emitted by the simulator for the presentation layer to animate from.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SimulationEvent {
    TransitionStarted {
        transition_id: String,
        simulation_time: u64,
        consumed: Vec<TokenTransfer>,
    },
    TransitionCompleted {
        transition_id: String,
        simulation_time: u64,
        produced: Vec<TokenTransfer>,
    },
    PulseExpired {
        transition_id: String,
    },
}

// --- Helper Functions ---

impl Node {
    pub fn id(&self) -> &str {
        match self {
            Node::Place(place) => &place.id,
            Node::Transition(transition) => &transition.id,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Place(_) => NodeKind::Place,
            Node::Transition(_) => NodeKind::Transition,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Node::Place(place) => place.position,
            Node::Transition(transition) => transition.position,
        }
    }

    pub fn set_position(&mut self, position: Position) {
        match self {
            Node::Place(place) => place.position = position,
            Node::Transition(transition) => transition.position = position,
        }
    }
}

impl Net {
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id() == id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id() == id)
    }

    pub fn kind_of(&self, id: &str) -> Option<NodeKind> {
        self.node(id).map(Node::kind)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    pub fn places(&self) -> impl Iterator<Item = &Place> {
        self.nodes.iter().filter_map(|n| match n {
            Node::Place(place) => Some(place),
            Node::Transition(_) => None,
        })
    }

    pub fn transitions(&self) -> impl Iterator<Item = &Transition> {
        self.nodes.iter().filter_map(|n| match n {
            Node::Transition(transition) => Some(transition),
            Node::Place(_) => None,
        })
    }

    pub fn transitions_mut(&mut self) -> impl Iterator<Item = &mut Transition> {
        self.nodes.iter_mut().filter_map(|n| match n {
            Node::Transition(transition) => Some(transition),
            Node::Place(_) => None,
        })
    }

    pub fn find_place(&self, id: &str) -> Option<&Place> {
        self.places().find(|p| p.id == id)
    }

    pub fn find_place_mut(&mut self, id: &str) -> Option<&mut Place> {
        self.nodes.iter_mut().find_map(|n| match n {
            Node::Place(place) if place.id == id => Some(place),
            _ => None,
        })
    }

    pub fn find_transition(&self, id: &str) -> Option<&Transition> {
        self.transitions().find(|t| t.id == id)
    }

    pub fn find_transition_mut(&mut self, id: &str) -> Option<&mut Transition> {
        self.transitions_mut().find(|t| t.id == id)
    }

    pub fn find_arc(&self, id: &str) -> Option<&Arc> {
        self.arcs.iter().find(|a| a.id == id)
    }

    pub fn find_arc_mut(&mut self, id: &str) -> Option<&mut Arc> {
        self.arcs.iter_mut().find(|a| a.id == id)
    }

    /// Arcs from a place into the given transition.
    pub fn input_arcs<'a>(&'a self, transition_id: &'a str) -> impl Iterator<Item = &'a Arc> {
        self.arcs.iter().filter(move |a| {
            a.target == transition_id && self.kind_of(&a.source) == Some(NodeKind::Place)
        })
    }

    /// Arcs from the given transition into a place.
    pub fn output_arcs<'a>(&'a self, transition_id: &'a str) -> impl Iterator<Item = &'a Arc> {
        self.arcs.iter().filter(move |a| {
            a.source == transition_id && self.kind_of(&a.target) == Some(NodeKind::Place)
        })
    }

    /// Removes a node together with every arc touching it.
    pub fn remove_node(&mut self, id: &str) -> Option<Node> {
        let index = self.nodes.iter().position(|n| n.id() == id)?;
        let node = self.nodes.remove(index);
        self.arcs.retain(|a| a.source != id && a.target != id);
        Some(node)
    }

    /// Reassigns dense zero-based numbers, places and transitions counted separately.
    pub fn renumber(&mut self) {
        let mut place_index = 0;
        let mut transition_index = 0;
        for node in &mut self.nodes {
            match node {
                Node::Place(place) => {
                    place.data.number = place_index;
                    place_index += 1;
                }
                Node::Transition(transition) => {
                    transition.data.number = transition_index;
                    transition_index += 1;
                }
            }
        }
    }

    /// Token count of every place, in node order.
    pub fn marking(&self) -> Vec<(String, u64)> {
        self.places().map(|p| (p.id.clone(), p.data.tokens)).collect()
    }

    pub fn tokens(&self, place_id: &str) -> Option<u64> {
        self.find_place(place_id).map(|p| p.data.tokens)
    }
}
