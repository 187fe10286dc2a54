use riverbus::{
    design::primitive::{PortIndex, WireKind},
    format::design::{FormatError, JsonDesign},
    river::selection::WireSelection,
};

mod common;

#[test]
fn test_load_bus() {
    let design = common::load_design_and_assert("tests/fixtures/bus.json");

    assert_eq!(design.nodes().count(), 5);
    assert_eq!(design.wires().count(), 4);
    assert!(design.wires().all(|wire| design.is_unrouted(wire)));

    let top = design.nodename_node("top").unwrap();
    let n2 = design.wirename_wire("n2").unwrap();
    let (_, to) = design.wire_ends(n2).unwrap();
    assert_eq!(to, PortIndex::new(top, 2));
    assert_eq!(design.port_layers(to), vec![0, 1]);
}

#[test]
fn test_route_and_save_bus() {
    let mut design = common::load_design_and_assert("tests/fixtures/bus.json");

    let plan = riverbus::river::route(&design, &WireSelection::new()).unwrap();
    assert_eq!(plan.routes().len(), 3);
    assert_eq!(plan.height(), 100.0);

    plan.apply(&mut design).unwrap();

    assert_eq!(design.nodes().count(), 4);
    assert!(design.nodename_node("via0").is_none());
    assert!(design
        .wires()
        .all(|wire| design.wire_weight(wire).unwrap().kind == WireKind::Layer(0)));

    let saved = JsonDesign::from_design(&design).unwrap();
    assert_eq!(saved.file().wires.len(), 3);
    assert!(saved
        .file()
        .wires
        .iter()
        .all(|wire| wire.layer.as_deref() == Some("metal1") && wire.to.port.is_some()));

    let mut bytes = vec![];
    saved.write(&mut bytes).unwrap();

    let reloaded = JsonDesign::load(&bytes[..]).unwrap().make_design().unwrap();
    assert_eq!(reloaded.nodes().count(), 4);
    assert_eq!(reloaded.wires().count(), 3);
    assert!(reloaded.wires().all(|wire| !reloaded.is_unrouted(wire)));
}

#[test]
fn test_unknown_node() {
    let json = r#"{
        "layers": [{ "name": "metal1", "width": 2.0, "spacing": 2.0 }],
        "nodes": [{ "type": "pin", "name": "a", "pos": { "x": 0.0, "y": 0.0 }, "kind": "universal" }],
        "wires": [{ "name": "w", "from": { "node": "a" }, "to": { "node": "b" } }]
    }"#;

    let result = JsonDesign::load(json.as_bytes()).unwrap().make_design();

    assert!(matches!(result, Err(FormatError::UnknownNode(name)) if name == "b"));
}

#[test]
fn test_unknown_layer() {
    let json = r#"{
        "layers": [{ "name": "metal1", "width": 2.0, "spacing": 2.0 }],
        "nodes": [{ "type": "pin", "name": "a", "pos": { "x": 0.0, "y": 0.0 }, "kind": { "layer": "poly" } }]
    }"#;

    let result = JsonDesign::load(json.as_bytes()).unwrap().make_design();

    assert!(matches!(result, Err(FormatError::UnknownLayer(name)) if name == "poly"));
}
