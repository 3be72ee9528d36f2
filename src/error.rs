//! Errors raised while assembling a model.

use thiserror::Error;

use crate::value::VarId;

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum EncodingError {
    #[error("Select {name} must have at least one value")]
    EmptyDomain { name: String },

    #[error("Duplicate value {value} in variable {name}")]
    DuplicateValue { name: String, value: String },

    #[error("Value missing in variable {name}. Expected to find {value} in [{domain}]")]
    ValueMissing {
        name: String,
        value: String,
        domain: String,
    },

    #[error("Variable {id} is already registered")]
    AlreadyRegistered { id: VarId },

    #[error("Variable {id} is not registered")]
    NotRegistered { id: VarId },
}

pub type Result<T, E = EncodingError> = std::result::Result<T, E>;
