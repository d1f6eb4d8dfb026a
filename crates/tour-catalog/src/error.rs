//! Error types for the tour catalog

use tour_core::TourError;

/// Catalog failures
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Definition could not become a tour
    #[error("invalid tour: {0}")]
    InvalidTour(#[from] TourError),

    /// Another tour already uses the id
    #[error("tour already registered: {0}")]
    DuplicateTour(String),

    /// The surface went away before it became ready
    #[error("catalog closed before the surface was ready")]
    Closed,
}

impl CatalogError {
    /// Whether the error comes from the definition itself
    #[inline]
    #[must_use]
    pub fn is_definition_error(&self) -> bool {
        matches!(self, Self::InvalidTour(_) | Self::DuplicateTour(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_error_display() {
        let err = CatalogError::DuplicateTour("a".to_string());
        assert!(err.to_string().contains("already registered"));
        assert!(err.is_definition_error());
        assert!(!CatalogError::Closed.is_definition_error());
    }

    #[test]
    fn catalog_error_from_tour_error() {
        let err: CatalogError = TourError::EmptyId.into();
        assert!(matches!(err, CatalogError::InvalidTour(TourError::EmptyId)));
    }
}
