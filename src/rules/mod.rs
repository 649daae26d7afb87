//! Decision option rules: conditions, effects, layers and their configuration

pub mod antecedent;
pub mod catalog;
pub mod consequent;
pub mod decision_option;
pub mod layer_config;
pub mod loader;
