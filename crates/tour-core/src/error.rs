//! Error types for tour definitions

/// Reasons a tour definition cannot become a tour
#[derive(Debug, thiserror::Error)]
pub enum TourError {
    /// Definition has an empty id
    #[error("tour id is empty")]
    EmptyId,

    /// Definition has an empty label
    #[error("tour {id} has an empty label")]
    EmptyLabel { id: String },

    /// Definition has no steps
    #[error("tour {id} has no steps")]
    NoSteps { id: String },

    /// A step lacks target or content
    #[error("tour {id}: step {index} needs a target and content")]
    MalformedStep { id: String, index: usize },

    /// Raw definition could not be decoded
    #[error("invalid tour definition: {0}")]
    InvalidDefinition(#[from] serde_json::Error),
}
