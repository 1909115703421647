use wasm_bindgen::prelude::*;
use crate::{CoreSimulator, NodeKind, Position, SimulatorConfig};
use js_sys::Function;
use serde_wasm_bindgen::to_value;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

macro_rules! console_log {
    ($($t:tt)*) => (log(&format_args!($($t)*).to_string()))
}

fn parse_kind(kind: &str) -> Result<NodeKind, JsValue> {
    match kind {
        "position" => Ok(NodeKind::Place),
        "transition" => Ok(NodeKind::Transition),
        other => Err(JsValue::from_str(&format!("Unknown node type: {}", other))),
    }
}

#[wasm_bindgen]
pub struct WasmSimulator {
    simulator: CoreSimulator,
    event_listener: Option<Function>,
}

impl WasmSimulator {
    // Forwards pending simulation events to the listener, if any.
    fn flush_events(&mut self) {
        let events = self.simulator.drain_events();
        let Some(listener) = &self.event_listener else {
            return;
        };
        for event in events {
            match to_value(&event) {
                Ok(event_js) => {
                    listener.call1(&JsValue::NULL, &event_js).ok();
                }
                Err(e) => console_log!("Serialization error: {}", e),
            }
        }
    }
}

#[wasm_bindgen]
impl WasmSimulator {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<WasmSimulator, JsValue> {
        let config = match config_json {
            Some(json) => SimulatorConfig::from_json(&json)
                .map_err(|e| JsValue::from_str(&format!("Configuration error: {}", e)))?,
            None => SimulatorConfig::default(),
        };
        Ok(WasmSimulator {
            simulator: CoreSimulator::with_config(config),
            event_listener: None,
        })
    }

    #[wasm_bindgen(js_name = setEventListener)]
    pub fn set_event_listener(&mut self, listener: Function) {
        self.event_listener = Some(listener);
    }

    /// The whole net as a JS object in the document shape.
    #[wasm_bindgen(js_name = getNet)]
    pub fn get_net(&self) -> Result<JsValue, JsValue> {
        to_value(self.simulator.net())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    #[wasm_bindgen(js_name = getCurrentTime)]
    pub fn get_current_time(&self) -> f64 {
        self.simulator.get_current_time() as f64
    }

    #[wasm_bindgen(js_name = isInitialStateSaved)]
    pub fn is_initial_state_saved(&self) -> bool {
        self.simulator.is_initial_state_saved()
    }

    #[wasm_bindgen(js_name = createNode)]
    pub fn create_node(&mut self, kind: &str, x: f64, y: f64) -> Result<String, JsValue> {
        let kind = parse_kind(kind)?;
        self.simulator
            .create_node(kind, Position::new(x, y))
            .ok_or_else(|| JsValue::from_str("Node ids are exhausted"))
    }

    #[wasm_bindgen(js_name = deleteNode)]
    pub fn delete_node(&mut self, id: &str) -> bool {
        let deleted = self.simulator.delete_node(id);
        self.flush_events();
        deleted
    }

    #[wasm_bindgen(js_name = updateNodeData)]
    pub fn update_node_data(&mut self, id: &str, patch_json: &str) -> bool {
        let updated = self.simulator.update_node_data_json(id, patch_json);
        self.flush_events();
        updated
    }

    #[wasm_bindgen(js_name = setNodePosition)]
    pub fn set_node_position(&mut self, id: &str, x: f64, y: f64) -> bool {
        self.simulator.set_node_position(id, Position::new(x, y))
    }

    #[wasm_bindgen(js_name = createArc)]
    pub fn create_arc(&mut self, source: &str, target: &str) -> Option<String> {
        let id = self.simulator.create_arc(source, target);
        self.flush_events();
        id
    }

    #[wasm_bindgen(js_name = updateArcData)]
    pub fn update_arc_data(&mut self, id: &str, patch_json: &str) -> bool {
        let updated = self.simulator.update_arc_data_json(id, patch_json);
        self.flush_events();
        updated
    }

    #[wasm_bindgen(js_name = deleteArc)]
    pub fn delete_arc(&mut self, id: &str) -> bool {
        let deleted = self.simulator.delete_arc(id);
        self.flush_events();
        deleted
    }

    #[wasm_bindgen(js_name = startTransition)]
    pub fn start_transition(&mut self, id: &str) -> bool {
        let started = self.simulator.start_transition(id);
        self.flush_events();
        started
    }

    #[wasm_bindgen(js_name = advanceClock)]
    pub fn advance_clock(&mut self) -> u32 {
        let completed = self.simulator.advance_clock();
        self.flush_events();
        completed as u32
    }

    #[wasm_bindgen(js_name = resetClock)]
    pub fn reset_clock(&mut self) {
        self.simulator.reset_clock();
        self.flush_events();
    }

    /// Called from a JS timer with the milliseconds since the previous call.
    #[wasm_bindgen(js_name = expirePulses)]
    pub fn expire_pulses(&mut self, elapsed_ms: u32) {
        self.simulator.expire_pulses(u64::from(elapsed_ms));
        self.flush_events();
    }

    #[wasm_bindgen(js_name = saveInitialState)]
    pub fn save_initial_state(&mut self) -> bool {
        self.simulator.save_initial_state()
    }

    #[wasm_bindgen(js_name = resetToInitialState)]
    pub fn reset_to_initial_state(&mut self) -> bool {
        let restored = self.simulator.reset_to_initial_state();
        self.flush_events();
        restored
    }

    #[wasm_bindgen(js_name = resetCanvas)]
    pub fn reset_canvas(&mut self) {
        self.simulator.reset_canvas()
    }

    #[wasm_bindgen(js_name = exportModel)]
    pub fn export_model(&self) -> Option<String> {
        self.simulator.export_model()
    }

    #[wasm_bindgen(js_name = importModel)]
    pub fn import_model(&mut self, json: &str) -> bool {
        let imported = self.simulator.import_model(json);
        self.flush_events();
        imported
    }
}
