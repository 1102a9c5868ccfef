use thiserror::Error;

mod ids;
mod metadata;

pub use ids::*;
pub use metadata::*;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid page ID: {0}")]
    InvalidId(String),

    #[error("Empty required field: {0}")]
    EmptyField(&'static str),
}
