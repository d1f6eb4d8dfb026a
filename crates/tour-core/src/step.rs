//! Tour steps
//!
//! A [`Step`] anchors one point of interest on the editing surface.

use serde::{Deserialize, Serialize};

/// Where a step's tooltip is drawn relative to its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Placement {
    /// Above the target
    Top,
    /// Above, aligned to the start edge
    TopStart,
    /// Above, aligned to the end edge
    TopEnd,
    /// Below the target
    #[default]
    Bottom,
    /// Below, aligned to the start edge
    BottomStart,
    /// Below, aligned to the end edge
    BottomEnd,
    /// Left of the target
    Left,
    /// Left, aligned to the start edge
    LeftStart,
    /// Left, aligned to the end edge
    LeftEnd,
    /// Right of the target
    Right,
    /// Right, aligned to the start edge
    RightStart,
    /// Right, aligned to the end edge
    RightEnd,
    /// Let the renderer choose
    Auto,
    /// Centered on screen, ignoring the target
    Center,
}

/// One step of a tour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// Selector or anchor of the element to highlight
    pub target: String,

    /// Body text
    pub content: String,

    /// Optional heading
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Optional placement hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement: Option<Placement>,

    /// Open the tooltip directly instead of showing a beacon first
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_beacon: Option<bool>,
}

impl Step {
    /// Create step with target and content
    #[inline]
    #[must_use]
    pub fn new(target: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            content: content.into(),
            title: None,
            placement: None,
            disable_beacon: None,
        }
    }

    /// With title
    #[inline]
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// With placement
    #[inline]
    #[must_use]
    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = Some(placement);
        self
    }

    /// Without beacon
    #[inline]
    #[must_use]
    pub fn without_beacon(mut self) -> Self {
        self.disable_beacon = Some(true);
        self
    }

    /// A step needs both a target and some content to be shown
    #[inline]
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        !self.target.trim().is_empty() && !self.content.trim().is_empty()
    }

    /// Neither target nor content carries anything
    #[inline]
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.target.trim().is_empty() && self.content.trim().is_empty()
    }
}
