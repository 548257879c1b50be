//! LayerSet - the ordered layers of one editing session.

use super::layer::{default_pitch_for, PatternLayer};
use super::pattern_string::parse_pattern;
use tracing::debug;

/// Ordered collection of layers with at most one selected layer.
///
/// Grows by append, shrinks only by `clear`, edited in place by index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayerSet {
    layers: Vec<PatternLayer>,
    selected: Option<usize>,
}

impl LayerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from existing layers, nothing selected
    pub fn from_layers(layers: Vec<PatternLayer>) -> Self {
        Self {
            layers,
            selected: None,
        }
    }

    /// Append a layer as-is and return its index
    pub fn push(&mut self, layer: PatternLayer) -> usize {
        self.layers.push(layer);
        self.layers.len() - 1
    }

    /// Append a layer parsed from pattern text, with the default pitch for
    /// its position (36 + index) and default velocity.
    pub fn add_layer(&mut self, pattern: &str, rotation: f64, label: &str) -> usize {
        let index = self.layers.len();
        let layer = PatternLayer::new(parse_pattern(pattern))
            .with_rotation(rotation)
            .with_pitch(default_pitch_for(index) as i64)
            .with_label(label);
        debug!(index, pattern = %layer.pattern_string(), "layer added");
        self.push(layer)
    }

    /// Remove every layer and reset the selection
    pub fn clear(&mut self) {
        self.layers.clear();
        self.selected = None;
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn layers(&self) -> &[PatternLayer] {
        &self.layers
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PatternLayer> {
        self.layers.iter()
    }

    pub fn get(&self, index: usize) -> Option<&PatternLayer> {
        self.layers.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut PatternLayer> {
        self.layers.get_mut(index)
    }

    /// Select an existing layer. Returns false (and keeps the old
    /// selection) when the index is out of range.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.layers.len() {
            self.selected = Some(index);
            true
        } else {
            false
        }
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Index of the selected layer, if it still exists
    pub fn selected(&self) -> Option<usize> {
        self.selected.filter(|&i| i < self.layers.len())
    }

    pub fn selected_layer(&self) -> Option<&PatternLayer> {
        self.selected().and_then(|i| self.layers.get(i))
    }

    /// Layer at `index`, or the selected layer when `index` is None
    pub fn layer_or_selected(&self, index: Option<usize>) -> Option<&PatternLayer> {
        match index {
            Some(i) => self.get(i),
            None => self.selected_layer(),
        }
    }

    /// Reverse one layer. Out-of-range indices are ignored.
    pub fn reverse_layer(&mut self, index: usize) -> bool {
        match self.layers.get_mut(index) {
            Some(layer) => {
                layer.reverse();
                true
            }
            None => false,
        }
    }

    pub fn reverse_all(&mut self) {
        for layer in &mut self.layers {
            layer.reverse();
        }
    }

    /// Reverse the selected layer, or every layer when nothing is selected
    pub fn reverse_selected_or_all(&mut self) {
        match self.selected() {
            Some(i) => {
                self.reverse_layer(i);
            }
            None => self.reverse_all(),
        }
    }
}

impl<'a> IntoIterator for &'a LayerSet {
    type Item = &'a PatternLayer;
    type IntoIter = std::slice::Iter<'a, PatternLayer>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_layers() -> LayerSet {
        let mut set = LayerSet::new();
        set.add_layer("1000", 0.0, "Kick");
        set.add_layer("101", 0.0, "Snare");
        set
    }

    #[test]
    fn test_add_layer_assigns_default_pitch() {
        let set = two_layers();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(0).unwrap().pitch(), 36);
        assert_eq!(set.get(1).unwrap().pitch(), 37);
        assert_eq!(set.get(1).unwrap().velocity(), 100);
        assert_eq!(set.get(1).unwrap().label(), "Snare");
    }

    #[test]
    fn test_select_rejects_missing_layer() {
        let mut set = two_layers();
        assert!(set.select(1));
        assert!(!set.select(5));
        assert_eq!(set.selected(), Some(1));
    }

    #[test]
    fn test_clear_resets_selection() {
        let mut set = two_layers();
        set.select(0);
        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.selected(), None);
    }

    #[test]
    fn test_reverse_selected_or_all() {
        let mut set = two_layers();
        set.reverse_selected_or_all();
        assert_eq!(set.get(0).unwrap().pattern_string(), "0001");
        assert_eq!(set.get(1).unwrap().pattern_string(), "101");

        set.select(0);
        set.reverse_selected_or_all();
        assert_eq!(set.get(0).unwrap().pattern_string(), "1000");
    }

    #[test]
    fn test_reverse_out_of_range_is_ignored() {
        let mut set = two_layers();
        let before = set.clone();
        assert!(!set.reverse_layer(9));
        assert_eq!(set, before);
    }

    #[test]
    fn test_layer_or_selected() {
        let mut set = two_layers();
        assert!(set.layer_or_selected(None).is_none());
        set.select(1);
        assert_eq!(set.layer_or_selected(None).unwrap().label(), "Snare");
        assert_eq!(set.layer_or_selected(Some(0)).unwrap().label(), "Kick");
    }
}
