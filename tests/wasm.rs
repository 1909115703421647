#![cfg(all(target_arch = "wasm32", feature = "wasm"))]

use tpnsim::wasm::WasmSimulator;
use wasm_bindgen_test::*;

#[wasm_bindgen_test]
fn fires_through_the_bindings() {
    let mut sim = WasmSimulator::new(None).unwrap();
    let place = sim.create_node("position", 0.0, 0.0).unwrap();
    let transition = sim.create_node("transition", 50.0, 0.0).unwrap();
    let output = sim.create_node("position", 100.0, 0.0).unwrap();
    assert!(sim.create_arc(&place, &transition).is_some());
    assert!(sim.create_arc(&transition, &output).is_some());
    assert!(sim.update_node_data(&place, r#"{"tokens": 1}"#));
    assert!(sim.update_node_data(&transition, r#"{"delay": 1}"#));

    assert!(sim.start_transition(&transition));
    assert_eq!(sim.advance_clock(), 1);
    assert!(!sim.start_transition(&transition));
    assert!(sim.create_node("cloud", 0.0, 0.0).is_err());

    let exported = sim.export_model().unwrap();
    assert!(sim.import_model(&exported));
}
