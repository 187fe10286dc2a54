use geo::point;
use riverbus::{
    design::{
        primitive::{NodeIndex, PinKind, PinWeight, PortIndex, WireKind},
        rules::AccessRules,
        Design, DesignError,
    },
    graph::GetPetgraphIndex,
};

mod common;

#[test]
fn test_names_are_unique() {
    let mut design = Design::new(common::rules(2.0, 2.0));
    common::pin(&mut design, "a", 0.0, 0.0);

    let result = design.add_pin(
        PinWeight {
            pos: point! {x: 1.0, y: 1.0},
            kind: PinKind::Layer(0),
            exported: false,
        },
        Some("a".to_string()),
    );

    assert_eq!(result, Err(DesignError::NameTaken("a".to_string())));
}

#[test]
fn test_node_index_dispatches_to_petgraph_index() {
    let mut design = Design::new(common::rules(2.0, 2.0));
    let a = common::pin(&mut design, "a", 0.0, 0.0);
    let pad = common::instance(&mut design, "pad", 0.0, 10.0, &[(0.0, 0.0)]);

    assert_eq!(NodeIndex::from(a).petgraph_index(), a.petgraph_index());
    assert_eq!(NodeIndex::from(pad).petgraph_index(), pad.petgraph_index());
    assert_ne!(a.petgraph_index(), pad.petgraph_index());
}

#[test]
fn test_wire_to_missing_port() {
    let mut design = Design::new(common::rules(2.0, 2.0));
    let a = common::pin(&mut design, "a", 0.0, 0.0);
    let pad = common::instance(&mut design, "pad", 0.0, 10.0, &[(0.0, 0.0)]);
    let missing = PortIndex::new(pad, 1);

    let result = design.add_wire(a.into(), missing, WireKind::Unrouted, 0.0, None);

    assert_eq!(result, Err(DesignError::NoSuchPort(missing)));
}

#[test]
fn test_remove_node_removes_its_wires() {
    let mut design = Design::new(common::rules(2.0, 2.0));
    let a = common::pin(&mut design, "a", 0.0, 0.0);
    let b = common::pin(&mut design, "b", 0.0, 10.0);
    let c = common::pin(&mut design, "c", 0.0, 20.0);
    common::unrouted(&mut design, "ab", a, b);
    common::unrouted(&mut design, "bc", b, c);

    design.remove_node(b.into());

    assert_eq!(design.wires().count(), 0);
    assert!(design.nodename_node("b").is_none());
    assert!(design.wirename_wire("ab").is_none());
    assert_eq!(design.node_degree(a.into()), 0);
}

#[test]
fn test_instance_ports_move_with_it() {
    let mut design = Design::new(common::rules(2.0, 2.0));
    let pad = common::instance(&mut design, "pad", 5.0, 5.0, &[(1.0, 0.0), (0.0, 2.0)]);

    design.move_node(pad.into(), point! {x: 10.0, y: -5.0});

    assert_eq!(
        design.port_pos(PortIndex::new(pad, 0)),
        Some(point! {x: 16.0, y: 0.0})
    );
    assert_eq!(
        design.port_pos(PortIndex::new(pad, 1)),
        Some(point! {x: 15.0, y: 2.0})
    );
}

#[test]
fn test_port_layers() {
    let mut design = Design::new(common::rules(2.0, 2.0));
    let universal = design
        .add_pin(
            PinWeight {
                pos: point! {x: 0.0, y: 0.0},
                kind: PinKind::Universal,
                exported: false,
            },
            None,
        )
        .unwrap();
    let layered = common::pin(&mut design, "layered", 1.0, 0.0);

    assert_eq!(design.port_layers(universal.into()), vec![0, 1]);
    assert_eq!(design.port_layers(layered.into()), vec![0]);
    assert!(design.is_pass_through(NodeIndex::from(universal)));
    assert!(!design.is_pass_through(NodeIndex::from(layered)));
}

#[test]
fn test_rules() {
    let rules = common::rules(2.0, -1.0);

    assert_eq!(rules.layer_count(), 2);
    assert_eq!(rules.layer("metal2"), Some(1));
    assert_eq!(rules.layername(0), Some("metal1"));
    assert_eq!(rules.wire_width(0), 2.0);
    assert_eq!(rules.spacing(0), -1.0);
    assert_eq!(rules.spacing(7), -1.0);
}
