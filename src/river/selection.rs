use std::collections::HashSet;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::design::{primitive::WireIndex, rules::AccessRules, Design};

/// Wires picked for routing, by name. An empty selection stands for every
/// unrouted wire of the design.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireSelection {
    wires: HashSet<String>,
}

impl WireSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_select_all() -> Self {
        Self::default()
    }

    pub fn select(&mut self, wirename: impl Into<String>) {
        self.wires.insert(wirename.into());
    }

    pub fn deselect(&mut self, wirename: &str) {
        self.wires.remove(wirename);
    }

    pub fn contains(&self, wirename: &str) -> bool {
        self.wires.contains(wirename)
    }

    pub fn is_empty(&self) -> bool {
        self.wires.is_empty()
    }

    /// Unrouted wires of `design` this selection stands for, in design order.
    pub fn resolve<R: AccessRules>(&self, design: &Design<R>) -> Vec<WireIndex> {
        if self.wires.is_empty() {
            return design.wires().filter(|w| design.is_unrouted(*w)).collect();
        }

        for wirename in &self.wires {
            if design.wirename_wire(wirename).is_none() {
                warn!("selected wire {} does not exist, skipping", wirename);
            }
        }

        design
            .wires()
            .filter(|wire| {
                design.is_unrouted(*wire)
                    && design
                        .wirename(*wire)
                        .is_some_and(|name| self.wires.contains(name))
            })
            .collect()
    }
}

impl<S: Into<String>> FromIterator<S> for WireSelection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            wires: iter.into_iter().map(Into::into).collect(),
        }
    }
}
