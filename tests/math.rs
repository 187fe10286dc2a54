use geo::point;
use riverbus::{
    math::{points_approx_eq, Axis, Transform},
    river::{
        orientation::{self, Confidence, CoordinateTally},
        RouteError,
    },
};

#[test]
fn test_transform_round_trip() {
    let points = [
        point! {x: 0.0, y: 0.0},
        point! {x: 3.5, y: -7.25},
        point! {x: -120.0, y: 45.0},
    ];

    for flip_x in [false, true] {
        for flip_y in [false, true] {
            for swap_axes in [false, true] {
                let transform = Transform::new(flip_x, flip_y, swap_axes);
                let inverse = transform.inverse();

                for p in points {
                    assert!(points_approx_eq(inverse.apply(transform.apply(p)), p));
                    assert!(points_approx_eq(transform.apply(inverse.apply(p)), p));
                }
            }
        }
    }
}

#[test]
fn test_canonical_transform_orients_channel() {
    for axis in [Axis::X, Axis::Y] {
        for across_ascending in [false, true] {
            for along_ascending in [false, true] {
                let transform = Transform::canonical(axis, across_ascending, along_ascending);

                let from = point! {x: 0.0, y: 0.0};
                let to = axis.point_at(if across_ascending { 10.0 } else { -10.0 });
                assert!(transform.apply(to).y() > transform.apply(from).y());

                let next = axis
                    .other()
                    .point_at(if along_ascending { 10.0 } else { -10.0 });
                assert!(transform.apply(next).x() > transform.apply(from).x());
            }
        }
    }
}

#[test]
fn test_rail_to_across() {
    let transform = Transform::canonical(Axis::X, false, true);
    assert_eq!(transform.rail_to_across(Axis::X, 40.0), -40.0);

    let transform = Transform::canonical(Axis::Y, true, true);
    assert_eq!(transform.rail_to_across(Axis::Y, 40.0), 40.0);
}

fn tally(coords: &[f64]) -> CoordinateTally {
    let mut tally = CoordinateTally::new();
    for coord in coords {
        tally.vote(*coord);
    }
    tally
}

#[test]
fn test_two_rails() {
    let x = tally(&[0.0, 0.0, 10.0, 10.0, 20.0, 20.0]);
    let y = tally(&[0.0, 100.0, 0.0, 100.0, 0.0, 100.0]);

    let orientation = orientation::resolve(&x, &y, 3).unwrap();

    assert_eq!(orientation.axis, Axis::Y);
    assert_eq!(orientation.from_rail, 0.0);
    assert_eq!(orientation.to_rail, 100.0);
    assert_eq!(orientation.confidence, Confidence::TwoRails);
}

#[test]
fn test_rails_ordered_regardless_of_votes() {
    let x = tally(&[0.0, 0.0, 10.0, 10.0, 20.0, 20.0]);
    let y = tally(&[100.0, 0.0, 100.0, 0.0, 100.0, 0.0]);

    let orientation = orientation::resolve(&x, &y, 3).unwrap();

    assert_eq!(orientation.from_rail, 0.0);
    assert_eq!(orientation.to_rail, 100.0);
}

#[test]
fn test_single_line() {
    let x = tally(&[0.0, 10.0, 20.0, 30.0]);
    let y = tally(&[0.0, 0.0, 0.0, 0.0]);

    let orientation = orientation::resolve(&x, &y, 2).unwrap();

    assert_eq!(orientation.axis, Axis::Y);
    assert_eq!(orientation.from_rail, 0.0);
    assert_eq!(orientation.to_rail, 0.0);
    assert_eq!(orientation.confidence, Confidence::SingleLine);
}

#[test]
fn test_fallback() {
    let x = tally(&[10.0, 10.0, 20.0, 20.0, 30.0, 25.0]);
    let y = tally(&[0.0, 100.0, 0.0, 100.0, 50.0, 100.0]);

    let orientation = orientation::resolve(&x, &y, 3).unwrap();

    assert_eq!(orientation.axis, Axis::Y);
    assert_eq!(orientation.from_rail, 0.0);
    assert_eq!(orientation.to_rail, 100.0);
    assert_eq!(orientation.confidence, Confidence::Fallback);
}

#[test]
fn test_vote_order_does_not_matter() {
    let coords_x = [10.0, 10.0, 20.0, 20.0, 30.0, 25.0];
    let coords_y = [0.0, 100.0, 0.0, 100.0, 50.0, 100.0];
    let mut reversed_x = coords_x;
    let mut reversed_y = coords_y;
    reversed_x.reverse();
    reversed_y.reverse();

    assert_eq!(
        orientation::resolve(&tally(&coords_x), &tally(&coords_y), 3),
        orientation::resolve(&tally(&reversed_x), &tally(&reversed_y), 3)
    );
}

#[test]
fn test_ambiguous_orientation() {
    let x = tally(&[0.0]);
    let y = tally(&[0.0]);

    assert_eq!(
        orientation::resolve(&x, &y, 1),
        Err(RouteError::AmbiguousOrientation)
    );
}
