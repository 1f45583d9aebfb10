// Errors raised while building models from attribute payloads.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("{entity} is missing required field '{field}'")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;
