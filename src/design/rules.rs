use bimap::BiHashMap;
use serde::{Deserialize, Serialize};

/// Technology queries the router needs: default wire width and the minimum
/// spacing that keeps neighbouring wires of a layer design-rule clean.
pub trait AccessRules {
    fn layer_count(&self) -> usize;
    fn wire_width(&self, layer: usize) -> f64;
    fn spacing(&self, layer: usize) -> f64;
    fn layername(&self, layer: usize) -> Option<&str>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerRule {
    pub name: String,
    pub width: f64,
    /// Negative when the technology does not know.
    pub spacing: f64,
}

#[derive(Debug, Clone)]
pub struct DesignRules {
    layers: Vec<LayerRule>,
    // layer <-> layername
    layer_layername: BiHashMap<usize, String>,
}

impl DesignRules {
    pub fn new(layers: Vec<LayerRule>) -> Self {
        let layer_layername = BiHashMap::from_iter(
            layers
                .iter()
                .enumerate()
                .map(|(layer, rule)| (layer, rule.name.clone())),
        );

        Self {
            layers,
            layer_layername,
        }
    }

    pub fn layers(&self) -> &[LayerRule] {
        &self.layers
    }

    pub fn layer(&self, layername: &str) -> Option<usize> {
        self.layer_layername.get_by_right(layername).copied()
    }
}

impl AccessRules for DesignRules {
    fn layer_count(&self) -> usize {
        self.layers.len()
    }

    fn wire_width(&self, layer: usize) -> f64 {
        self.layers.get(layer).map_or(0.0, |rule| rule.width)
    }

    fn spacing(&self, layer: usize) -> f64 {
        self.layers.get(layer).map_or(-1.0, |rule| rule.spacing)
    }

    fn layername(&self, layer: usize) -> Option<&str> {
        self.layer_layername.get_by_left(&layer).map(|s| s.as_str())
    }
}
