//! Tour display options
//!
//! [`TourOptions`] groups renderer preferences into a fixed set of
//! sub-records. Updates are merged field by field: a set leaf in the update
//! replaces the old leaf, an unset leaf keeps it. CSS blocks merge per key.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// Field-by-field merge of a partial update into `self`
pub trait Merge {
    /// Merge `other` into `self`; values set in `other` win
    fn merge(&mut self, other: Self);
}

macro_rules! merge_leaves {
    ($dst:ident, $src:ident; $($field:ident),+ $(,)?) => {
        $(
            if $src.$field.is_some() {
                $dst.$field = $src.$field;
            }
        )+
    };
}

macro_rules! merge_groups {
    ($dst:ident, $src:ident; $($field:ident),+ $(,)?) => {
        $( $dst.$field.merge($src.$field); )+
    };
}

/// Behaviour flags of a running tour
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BehaviorOptions {
    /// Advance with "next" instead of closing after each step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continuous: Option<bool>,
    /// Ignore the escape key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_close_on_esc: Option<bool>,
    /// Hide the dimming overlay
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_overlay: Option<bool>,
    /// Clicking the overlay does not close the tour
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_overlay_close: Option<bool>,
    /// Do not scroll to targets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_scrolling: Option<bool>,
    /// Hide the "back" button
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_back_button: Option<bool>,
    /// Show "n of m" progress
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_progress: Option<bool>,
    /// Show the "skip" button
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_skip_button: Option<bool>,
    /// Let clicks through the spotlight
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spotlight_clicks: Option<bool>,
    /// Pixels kept above a target when scrolling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll_offset: Option<u32>,
    /// Pixels of padding around the spotlight
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spotlight_padding: Option<u32>,
}

impl Merge for BehaviorOptions {
    fn merge(&mut self, other: Self) {
        merge_leaves!(self, other;
            continuous,
            disable_close_on_esc,
            disable_overlay,
            disable_overlay_close,
            disable_scrolling,
            hide_back_button,
            show_progress,
            show_skip_button,
            spotlight_clicks,
            scroll_offset,
            spotlight_padding,
        );
    }
}

/// Theme values shared by every tooltip
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleOptions {
    /// Tooltip arrow colour
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrow_color: Option<String>,
    /// Tooltip background colour
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// Beacon diameter in pixels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beacon_size: Option<u32>,
    /// Overlay colour
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay_color: Option<String>,
    /// Accent colour for buttons and beacon
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    /// Spotlight shadow
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spotlight_shadow: Option<String>,
    /// Text colour
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    /// Tooltip width in pixels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Stacking order of the tour layer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,
}

impl Merge for StyleOptions {
    fn merge(&mut self, other: Self) {
        merge_leaves!(self, other;
            arrow_color,
            background_color,
            beacon_size,
            overlay_color,
            primary_color,
            spotlight_shadow,
            text_color,
            width,
            z_index,
        );
    }
}

/// Free-form CSS properties for one tooltip part
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CssBlock(pub BTreeMap<String, JsonValue>);

impl CssBlock {
    /// Set one property
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Look up one property
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.0.get(key)
    }

    /// Whether no property is set
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Merge for CssBlock {
    fn merge(&mut self, other: Self) {
        self.0.extend(other.0);
    }
}

/// Styles of each tooltip part
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TourStyles {
    /// Shared theme values
    pub options: StyleOptions,
    #[serde(skip_serializing_if = "CssBlock::is_empty")]
    pub tooltip: CssBlock,
    #[serde(skip_serializing_if = "CssBlock::is_empty")]
    pub tooltip_container: CssBlock,
    #[serde(skip_serializing_if = "CssBlock::is_empty")]
    pub tooltip_title: CssBlock,
    #[serde(skip_serializing_if = "CssBlock::is_empty")]
    pub tooltip_content: CssBlock,
    #[serde(skip_serializing_if = "CssBlock::is_empty")]
    pub button_next: CssBlock,
    #[serde(skip_serializing_if = "CssBlock::is_empty")]
    pub button_back: CssBlock,
    #[serde(skip_serializing_if = "CssBlock::is_empty")]
    pub button_skip: CssBlock,
    #[serde(skip_serializing_if = "CssBlock::is_empty")]
    pub button_close: CssBlock,
    #[serde(skip_serializing_if = "CssBlock::is_empty")]
    pub spotlight: CssBlock,
    #[serde(skip_serializing_if = "CssBlock::is_empty")]
    pub overlay: CssBlock,
    #[serde(skip_serializing_if = "CssBlock::is_empty")]
    pub beacon: CssBlock,
}

impl Merge for TourStyles {
    fn merge(&mut self, other: Self) {
        merge_groups!(self, other;
            options,
            tooltip,
            tooltip_container,
            tooltip_title,
            tooltip_content,
            button_next,
            button_back,
            button_skip,
            button_close,
            spotlight,
            overlay,
            beacon,
        );
    }
}

/// Button labels
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocaleOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub back: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<String>,
}

impl Merge for LocaleOptions {
    fn merge(&mut self, other: Self) {
        merge_leaves!(self, other; back, close, last, next, skip);
    }
}

/// All renderer preferences of a tour
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TourOptions {
    /// Behaviour flags
    pub behavior: BehaviorOptions,
    /// Styles
    pub styles: TourStyles,
    /// Button labels
    pub locale: LocaleOptions,
}

impl TourOptions {
    /// Options applied to every new tour before its own options
    #[must_use]
    pub fn defaults() -> Self {
        let mut options = Self::default();
        options.behavior.continuous = Some(true);
        options.behavior.show_progress = Some(true);
        options.behavior.show_skip_button = Some(true);
        options.styles.options.z_index = Some(10_000);
        options
    }

    /// Merge by value
    #[inline]
    #[must_use]
    pub fn merged(mut self, other: Self) -> Self {
        self.merge(other);
        self
    }
}

impl Merge for TourOptions {
    fn merge(&mut self, other: Self) {
        merge_groups!(self, other; behavior, styles, locale);
    }
}
