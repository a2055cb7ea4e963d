//! Core error types.

use thiserror::Error;

/// Errors raised while compiling or executing a request.
#[derive(Debug, Error)]
pub enum Error {
    /// The resource path names an entity set the schema does not declare.
    #[error("unknown entity set '{name}'")]
    UnknownEntitySet { name: String },

    /// No entity of the set has the requested key.
    #[error("no entity in '{entity_set}' with key '{key}'")]
    EntityNotFound { entity_set: String, key: String },

    /// A field, relation or selected name does not exist on the entity set.
    #[error("unknown property '{property}' on entity set '{entity_set}'")]
    UnknownProperty { entity_set: String, property: String },

    /// A property path crosses more than one relationship.
    #[error("property path '{path}' crosses more than one relationship")]
    UnsupportedTraversalDepth { path: String },

    /// Schema registration failed.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    /// A record does not conform to its entity set.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Literal conversion failed.
    #[error("protocol error: {0}")]
    Protocol(#[from] odata_proto::Error),
}

impl Error {
    /// Create an unknown property error.
    pub fn unknown_property(entity_set: &str, property: impl Into<String>) -> Self {
        Error::UnknownProperty {
            entity_set: entity_set.to_string(),
            property: property.into(),
        }
    }
}
