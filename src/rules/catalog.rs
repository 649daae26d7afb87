//! Central storage for the mental model hierarchy

use crate::core::error::{Result, VolitionError};
use crate::core::types::LayerRef;
use crate::rules::decision_option::DecisionOption;
use crate::rules::layer_config::DecisionOptionLayerConfiguration;
use std::collections::BTreeMap;

/// One layer's policy and decision options
#[derive(Debug, Clone, Default)]
pub struct LayerEntry {
    pub configuration: DecisionOptionLayerConfiguration,
    pub options: Vec<DecisionOption>,
}

/// All decision option layers, keyed by hierarchy position.
///
/// The key encodes the set/layer tree with stable integers, so iteration is
/// always (set, layer) ascending regardless of insertion order.
#[derive(Debug, Clone, Default)]
pub struct DecisionOptionCatalog {
    layers: BTreeMap<LayerRef, LayerEntry>,
}

impl DecisionOptionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a layer's configuration, creating the layer if absent
    pub fn insert_layer(
        &mut self,
        layer: LayerRef,
        configuration: DecisionOptionLayerConfiguration,
    ) {
        self.layers.entry(layer).or_default().configuration = configuration;
    }

    /// Adds an option to its layer, enforcing the option-count ceiling
    pub fn insert_option(&mut self, option: DecisionOption) -> Result<()> {
        let entry = self.layers.entry(option.layer).or_default();
        if entry.options.len() as u32 >= entry.configuration.max_number_of_decision_options {
            return Err(VolitionError::InvalidConfiguration(format!(
                "layer MM{}-{} exceeds its ceiling of {} decision options",
                option.layer.set,
                option.layer.layer,
                entry.configuration.max_number_of_decision_options
            )));
        }
        entry.options.push(option);
        Ok(())
    }

    pub fn configuration(&self, layer: LayerRef) -> Option<&DecisionOptionLayerConfiguration> {
        self.layers.get(&layer).map(|entry| &entry.configuration)
    }

    /// Options of one layer, in insertion order
    pub fn options(&self, layer: LayerRef) -> &[DecisionOption] {
        self.layers
            .get(&layer)
            .map(|entry| entry.options.as_slice())
            .unwrap_or(&[])
    }

    /// All options in (set, layer) order, insertion order within a layer
    pub fn all_options(&self) -> impl Iterator<Item = &DecisionOption> {
        self.layers.values().flat_map(|entry| entry.options.iter())
    }

    /// Looks an option up by its computed id
    pub fn option_by_id(&self, id: &str) -> Option<&DecisionOption> {
        self.all_options().find(|option| option.id() == id)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layers(&self) -> impl Iterator<Item = (LayerRef, &LayerEntry)> {
        self.layers.iter().map(|(layer, entry)| (*layer, entry))
    }
}
