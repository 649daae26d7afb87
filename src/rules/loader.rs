//! Load decision option catalogs from JSON configuration.
//!
//! Loading is all-or-nothing: any malformed operator token, relationship
//! sign, interval or duplicate position fails the whole document, so a
//! simulation never starts on invalid configuration.

use crate::core::error::{Result, VolitionError};
use crate::core::types::{LayerRef, Value};
use crate::rules::antecedent::{AntecedentOperator, AntecedentPart};
use crate::rules::catalog::DecisionOptionCatalog;
use crate::rules::consequent::Consequent;
use crate::rules::decision_option::DecisionOption;
use crate::rules::layer_config::DecisionOptionLayerConfiguration;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCatalog {
    mental_models: Vec<RawMentalModel>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMentalModel {
    set: u32,
    layers: Vec<RawLayer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLayer {
    layer: u32,
    #[serde(default)]
    configuration: DecisionOptionLayerConfiguration,
    #[serde(default)]
    decision_options: Vec<RawDecisionOption>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDecisionOption {
    position: u32,
    #[serde(default)]
    antecedent: Vec<RawAntecedentPart>,
    consequent: Consequent,
    #[serde(default)]
    is_modifiable: bool,
    #[serde(default = "default_participants")]
    required_participants: u32,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default)]
    auto_generated: bool,
}

fn default_participants() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAntecedentPart {
    param: String,
    // Token, validated during conversion
    operator: String,
    value: Value,
}

/// Parse a catalog from JSON text, failing on any configuration defect
pub fn parse_catalog(json: &str) -> Result<DecisionOptionCatalog> {
    let raw: RawCatalog = serde_json::from_str(json)?;
    build_catalog(raw)
}

/// Load a catalog from a JSON file
pub fn load_catalog(path: &Path) -> Result<DecisionOptionCatalog> {
    let content = fs::read_to_string(path)?;
    let catalog = parse_catalog(&content)?;
    tracing::debug!(
        layers = catalog.layer_count(),
        path = %path.display(),
        "loaded decision option catalog"
    );
    Ok(catalog)
}

fn build_catalog(raw: RawCatalog) -> Result<DecisionOptionCatalog> {
    let mut catalog = DecisionOptionCatalog::new();

    for mental_model in raw.mental_models {
        for raw_layer in mental_model.layers {
            let layer = LayerRef::new(mental_model.set, raw_layer.layer);
            raw_layer.configuration.validate()?;
            catalog.insert_layer(layer, raw_layer.configuration);

            let mut seen_positions = Vec::new();
            for raw_option in raw_layer.decision_options {
                if seen_positions.contains(&raw_option.position) {
                    return Err(VolitionError::InvalidConfiguration(format!(
                        "duplicate decision option position {} in layer MM{}-{}",
                        raw_option.position, layer.set, layer.layer
                    )));
                }
                seen_positions.push(raw_option.position);
                catalog.insert_option(convert_option(layer, raw_option)?)?;
            }
        }
    }

    Ok(catalog)
}

fn convert_option(layer: LayerRef, raw: RawDecisionOption) -> Result<DecisionOption> {
    let antecedent = raw
        .antecedent
        .into_iter()
        .map(convert_antecedent)
        .collect::<Result<Vec<_>>>()?;

    let mut option = DecisionOption::new(layer, raw.position, antecedent, raw.consequent);
    option.is_modifiable = raw.is_modifiable;
    option.required_participants = raw.required_participants;
    option.scope = raw.scope;
    option.auto_generated = raw.auto_generated;
    Ok(option)
}

fn convert_antecedent(raw: RawAntecedentPart) -> Result<AntecedentPart> {
    let operator = AntecedentOperator::from_token(&raw.operator)?;
    Ok(AntecedentPart {
        param: raw.param,
        operator,
        value: raw.value,
    })
}
