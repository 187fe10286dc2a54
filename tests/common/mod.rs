use geo::point;
use riverbus::{
    design::{
        primitive::{
            InstanceIndex, InstanceWeight, PinIndex, PinKind, PinWeight, PortIndex, PortWeight,
            WireIndex, WireKind,
        },
        rules::{DesignRules, LayerRule},
        Design,
    },
    format::design::JsonDesign,
    river::ChannelPlan,
};

pub fn rules(width: f64, spacing: f64) -> DesignRules {
    DesignRules::new(vec![
        LayerRule {
            name: "metal1".to_string(),
            width,
            spacing,
        },
        LayerRule {
            name: "metal2".to_string(),
            width: 3.0,
            spacing: 3.0,
        },
    ])
}

pub fn pin(design: &mut Design<DesignRules>, name: &str, x: f64, y: f64) -> PinIndex {
    design
        .add_pin(
            PinWeight {
                pos: point! {x: x, y: y},
                kind: PinKind::Layer(0),
                exported: false,
            },
            Some(name.to_string()),
        )
        .unwrap()
}

pub fn instance(
    design: &mut Design<DesignRules>,
    name: &str,
    x: f64,
    y: f64,
    offsets: &[(f64, f64)],
) -> InstanceIndex {
    design
        .add_instance(
            InstanceWeight {
                cell: "pad".to_string(),
                pos: point! {x: x, y: y},
                ports: offsets
                    .iter()
                    .enumerate()
                    .map(|(i, (dx, dy))| PortWeight {
                        name: format!("p{}", i),
                        offset: point! {x: *dx, y: *dy},
                        layers: vec![0],
                    })
                    .collect(),
            },
            Some(name.to_string()),
        )
        .unwrap()
}

pub fn unrouted(
    design: &mut Design<DesignRules>,
    name: &str,
    from: impl Into<PortIndex>,
    to: impl Into<PortIndex>,
) -> WireIndex {
    design
        .add_wire(
            from.into(),
            to.into(),
            WireKind::Unrouted,
            0.0,
            Some(name.to_string()),
        )
        .unwrap()
}

/// Builds a design with one unrouted wire between each pair of points.
pub fn design_with_wires(
    width: f64,
    spacing: f64,
    pairs: &[((f64, f64), (f64, f64))],
) -> Design<DesignRules> {
    let mut design = Design::new(rules(width, spacing));

    for (i, ((fx, fy), (tx, ty))) in pairs.iter().enumerate() {
        let from = pin(&mut design, &format!("a{}", i), *fx, *fy);
        let to = pin(&mut design, &format!("b{}", i), *tx, *ty);
        unrouted(&mut design, &format!("w{}", i), from, to);
    }

    design
}

pub fn load_design_and_assert(filename: &str) -> Design<DesignRules> {
    let json = JsonDesign::load_from_file(filename).unwrap();
    json.make_design().unwrap()
}

/// Asserts that wherever two neighbouring paths run side by side, they are
/// at least `pitch` apart.
pub fn assert_adjacent_spacing(plan: &ChannelPlan, pitch: f64) {
    for pair in plan.routes().windows(2) {
        for a in pair[0].path.points.windows(2) {
            for b in pair[1].path.points.windows(2) {
                let (a0, a1, b0, b1) = (a[0].pos, a[1].pos, b[0].pos, b[1].pos);

                if a0.y() == a1.y() && b0.y() == b1.y() {
                    let overlap = a0.x().max(a1.x()).min(b0.x().max(b1.x()))
                        - a0.x().min(a1.x()).max(b0.x().min(b1.x()));
                    if overlap > 0.0 {
                        dbg!(a0, a1, b0, b1);
                        assert!((a0.y() - b0.y()).abs() >= pitch - 1e-9);
                    }
                }

                if a0.x() == a1.x() && b0.x() == b1.x() {
                    let overlap = a0.y().max(a1.y()).min(b0.y().max(b1.y()))
                        - a0.y().min(a1.y()).max(b0.y().min(b1.y()));
                    if overlap > 0.0 {
                        dbg!(a0, a1, b0, b1);
                        assert!((a0.x() - b0.x()).abs() >= pitch - 1e-9);
                    }
                }
            }
        }
    }
}

/// Asserts that every path is orthogonal and starts and ends on the
/// terminals of its connection.
pub fn assert_paths_reach_terminals(plan: &ChannelPlan) {
    for route in plan.routes() {
        let points = &route.path.points;

        for pair in points.windows(2) {
            assert!(pair[0].pos.x() == pair[1].pos.x() || pair[0].pos.y() == pair[1].pos.y());
        }

        assert!(points.len() >= 2);
        assert_eq!(points[0].pos, route.connection.from.pos);
        assert_eq!(points[points.len() - 1].pos, route.connection.to.pos);
    }
}
