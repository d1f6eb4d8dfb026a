//! Declarative tour definitions
//!
//! A [`TourDefinition`] is the plain record found in document metadata or
//! handed to a catalog. It is not namespaced and owned by nobody.

use crate::error::TourError;
use crate::options::TourOptions;
use crate::step::Step;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Plain description of a tour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourDefinition {
    /// Identifier, unique among its siblings
    pub id: String,

    /// Display name
    pub label: String,

    /// Ordered steps
    #[serde(default)]
    pub steps: Vec<Step>,

    /// Renderer preferences
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<TourOptions>,

    /// Icon name shown next to the label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Ordering hint; lower ranks come first
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<i32>,
}

impl TourDefinition {
    /// Create definition with id and label
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            steps: Vec::new(),
            options: None,
            icon: None,
            rank: None,
        }
    }

    /// With steps
    #[inline]
    #[must_use]
    pub fn with_steps(mut self, steps: Vec<Step>) -> Self {
        self.steps = steps;
        self
    }

    /// With options
    #[inline]
    #[must_use]
    pub fn with_options(mut self, options: TourOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// With icon
    #[inline]
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// With rank
    #[inline]
    #[must_use]
    pub fn with_rank(mut self, rank: i32) -> Self {
        self.rank = Some(rank);
        self
    }

    /// Decode one raw metadata entry
    ///
    /// # Errors
    /// Returns `TourError::InvalidDefinition` if the value has the wrong shape
    pub fn from_value(value: JsonValue) -> Result<Self, TourError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Check that the definition can be turned into a tour
    ///
    /// # Errors
    /// - `TourError::EmptyId` / `TourError::EmptyLabel` for blank identity
    /// - `TourError::NoSteps` if there is nothing to show
    /// - `TourError::MalformedStep` for the first step without target or content
    pub fn validate(&self) -> Result<(), TourError> {
        if self.id.trim().is_empty() {
            return Err(TourError::EmptyId);
        }
        if self.label.trim().is_empty() {
            return Err(TourError::EmptyLabel {
                id: self.id.clone(),
            });
        }
        if self.steps.is_empty() {
            return Err(TourError::NoSteps {
                id: self.id.clone(),
            });
        }
        if let Some(index) = self.steps.iter().position(|s| !s.is_well_formed()) {
            return Err(TourError::MalformedStep {
                id: self.id.clone(),
                index,
            });
        }
        Ok(())
    }
}
