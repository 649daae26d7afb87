use thiserror::Error;

#[derive(Error, Debug)]
pub enum VolitionError {
    #[error("Unknown variable '{variable}' for agent {agent}")]
    UnknownVariable { agent: String, variable: String },

    #[error("Type mismatch for variable '{variable}': expected {expected}, found {found}")]
    TypeMismatch {
        variable: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Unknown antecedent operator '{0}'. See configuration.")]
    UnknownOperator(String),

    #[error("Unknown consequent relationship sign '{0}'. See configuration.")]
    UnknownRelationshipSign(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, VolitionError>;
