use log::{debug, warn};

use crate::{math::Axis, river::RouteError};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vote {
    pub coord: f64,
    pub total: usize,
}

/// Votes per coordinate value of one axis, kept in first-seen order so that
/// ties always resolve towards the coordinate seen first.
#[derive(Debug, Default, Clone)]
pub struct CoordinateTally {
    votes: Vec<Vote>,
}

impl CoordinateTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vote(&mut self, coord: f64) {
        match self.votes.iter_mut().find(|vote| vote.coord == coord) {
            Some(vote) => vote.total += 1,
            None => self.votes.push(Vote { coord, total: 1 }),
        }
    }

    pub fn votes(&self) -> &[Vote] {
        &self.votes
    }

    fn largest_index(&self) -> Option<usize> {
        let mut largest: Option<usize> = None;

        for (i, vote) in self.votes.iter().enumerate() {
            match largest {
                Some(l) if self.votes[l].total >= vote.total => (),
                _ => largest = Some(i),
            }
        }

        largest
    }

    pub fn largest(&self) -> Option<Vote> {
        self.largest_index().map(|i| self.votes[i])
    }

    /// The most voted coordinate other than [`Self::largest`].
    pub fn next_largest(&self) -> Option<Vote> {
        let largest = self.largest_index()?;
        let mut next: Option<usize> = None;

        for (i, vote) in self.votes.iter().enumerate() {
            if i == largest {
                continue;
            }

            match next {
                Some(n) if self.votes[n].total >= vote.total => (),
                _ => next = Some(i),
            }
        }

        next.map(|i| self.votes[i])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    /// Two coordinates each collected exactly one vote per connection.
    TwoRails,
    /// Both ends of every connection lie on one line.
    SingleLine,
    /// Neither held; the best available guess was taken.
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    pub axis: Axis,
    pub from_rail: f64,
    pub to_rail: f64,
    pub confidence: Confidence,
}

/// Decides along which axis the rails lie and at which coordinates, from the
/// votes of all `total` connections' terminals.
pub fn resolve(
    x_tally: &CoordinateTally,
    y_tally: &CoordinateTally,
    total: usize,
) -> Result<Orientation, RouteError> {
    let lx = x_tally.largest();
    let ly = y_tally.largest();
    let nlx = x_tally.next_largest();
    let nly = y_tally.next_largest();
    let votes = |vote: Option<Vote>| vote.map_or(0, |v| v.total);

    let (axis, from, to, confidence) = match (lx, nlx, ly, nly) {
        (Some(l), Some(n), ..) if l.total == total && n.total == total => {
            (Axis::X, l, n, Confidence::TwoRails)
        }
        (.., Some(l), Some(n)) if l.total == total && n.total == total => {
            (Axis::Y, l, n, Confidence::TwoRails)
        }
        (Some(l), ..) if l.total == 2 * total => (Axis::X, l, l, Confidence::SingleLine),
        (_, _, Some(l), _) if l.total == 2 * total => (Axis::Y, l, l, Confidence::SingleLine),
        _ => {
            let (axis, from, to) = if votes(lx) >= total {
                (Axis::X, lx, if votes(lx) > total { lx } else { nlx })
            } else if votes(ly) >= total {
                (Axis::Y, ly, if votes(ly) > total { ly } else { nly })
            } else if votes(ly) + votes(nly) >= votes(lx) + votes(nlx) {
                (Axis::Y, ly, nly)
            } else {
                (Axis::X, lx, nlx)
            };

            let (Some(from), Some(to)) = (from, to) else {
                return Err(RouteError::AmbiguousOrientation);
            };

            warn!(
                "terminals do not lie on two parallel lines, guessing rails {} and {} across {:?}",
                from.coord, to.coord, axis
            );
            (axis, from, to, Confidence::Fallback)
        }
    };

    let (from_rail, to_rail) = if to.coord < from.coord {
        (to.coord, from.coord)
    } else {
        (from.coord, to.coord)
    };

    debug!(
        "rails at {} and {} on {:?} ({:?})",
        from_rail, to_rail, axis, confidence
    );

    Ok(Orientation {
        axis,
        from_rail,
        to_rail,
        confidence,
    })
}
