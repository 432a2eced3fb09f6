//! # FlexKit Style
//!
//! The resolved style model consumed by the FlexKit layout engine.
//!
//! ## Design Goals
//!
//! 1. **Resolved values only**: every property is a scalar or a closed enum,
//!    resolved by the style collaborator before layout ever sees it. The
//!    layout core never parses CSS text and never compares property strings.
//! 2. **Closed enums per axis**: direction, wrap, justify and align are
//!    tagged variants, resolved once, never re-parsed.
//! 3. **Sanitized numerics**: negative, NaN or infinite inputs clamp to the
//!    nearest valid value so layout always terminates with some geometry.

use tracing::debug;

/// A resolved length value.
///
/// Font-relative units (em/rem) are resolved to pixels by the style
/// collaborator before reaching layout, so they do not appear here.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Length {
    /// Pixels.
    Px(f32),
    /// Percentage of the containing size.
    Percent(f32),
    /// Automatic (unset).
    #[default]
    Auto,
}

impl Length {
    /// Whether this length is `auto`.
    pub fn is_auto(self) -> bool {
        matches!(self, Length::Auto)
    }

    /// Resolve against a container size. `Auto` resolves to `None`;
    /// everything else resolves to a sanitized, non-negative pixel value.
    pub fn resolve(self, container_size: f32) -> Option<f32> {
        match self {
            Length::Px(px) => Some(sanitize_px(px)),
            Length::Percent(pct) => Some(sanitize_px(pct / 100.0 * container_size)),
            Length::Auto => None,
        }
    }

    /// Resolve against a container size, falling back to a default for `Auto`.
    pub fn resolve_or(self, container_size: f32, default: f32) -> f32 {
        self.resolve(container_size).unwrap_or(default)
    }
}

/// Clamp a pixel quantity to a valid non-negative finite value.
///
/// Layout must always terminate with some geometry, so invalid numeric
/// input (negative sizes, NaN, negative gap) clamps to zero instead of
/// propagating an error.
pub fn sanitize_px(value: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        if value != 0.0 {
            debug!(value, "clamping invalid length to zero");
        }
        0.0
    }
}

/// Clamp a flex factor (grow/shrink) to a valid non-negative finite value.
pub fn sanitize_factor(value: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Drop an aspect ratio that is not a positive finite number.
pub fn sanitize_ratio(value: Option<f32>) -> Option<f32> {
    match value {
        Some(r) if r.is_finite() && r > 0.0 => Some(r),
        Some(r) => {
            debug!(ratio = r, "dropping invalid aspect ratio");
            None
        }
        None => None,
    }
}

/// Flex direction property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlexDirection {
    #[default]
    Row,
    RowReverse,
    Column,
    ColumnReverse,
}

impl FlexDirection {
    /// Check if this direction is reversed.
    pub fn is_reverse(self) -> bool {
        matches!(
            self,
            FlexDirection::RowReverse | FlexDirection::ColumnReverse
        )
    }

    /// Check if this is a row direction.
    pub fn is_row(self) -> bool {
        matches!(self, FlexDirection::Row | FlexDirection::RowReverse)
    }

    /// Check if this is a column direction.
    pub fn is_column(self) -> bool {
        !self.is_row()
    }
}

/// Flex wrap property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlexWrap {
    #[default]
    NoWrap,
    Wrap,
    WrapReverse,
}

/// Justify content property (main axis distribution).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JustifyContent {
    #[default]
    FlexStart,
    FlexEnd,
    Center,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
}

/// Align items property (cross axis alignment for all items in a line).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignItems {
    #[default]
    Stretch,
    FlexStart,
    FlexEnd,
    Center,
    Baseline,
}

/// Align content property (cross axis distribution of lines).
///
/// `Stretch` carries the equal-division behavior: free cross space is
/// divided equally among lines. The default packs content-sized lines from
/// the cross start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignContent {
    #[default]
    FlexStart,
    FlexEnd,
    Center,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
    Stretch,
}

/// Align self property (per-item override of align-items).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignSelf {
    #[default]
    Auto,
    FlexStart,
    FlexEnd,
    Center,
    Baseline,
    Stretch,
}

impl AlignSelf {
    /// Resolve against the container's align-items. `Auto` defers to the
    /// container; everything else maps to the matching alignment.
    pub fn resolve(self, align_items: AlignItems) -> AlignItems {
        match self {
            AlignSelf::Auto => align_items,
            AlignSelf::FlexStart => AlignItems::FlexStart,
            AlignSelf::FlexEnd => AlignItems::FlexEnd,
            AlignSelf::Center => AlignItems::Center,
            AlignSelf::Baseline => AlignItems::Baseline,
            AlignSelf::Stretch => AlignItems::Stretch,
        }
    }
}

/// Flex basis property.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FlexBasis {
    /// Use the item's main size property (width or height).
    #[default]
    Auto,
    /// Size from the item's content, ignoring the main size property.
    Content,
    /// Explicit length in pixels.
    Length(f32),
    /// Percentage of the container's main size.
    Percent(f32),
}

/// Position property values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    #[default]
    Static,
    Relative,
    Absolute,
    Fixed,
}

impl Position {
    /// Out-of-flow boxes are skipped by the flex algorithm entirely.
    pub fn is_out_of_flow(self) -> bool {
        matches!(self, Position::Absolute | Position::Fixed)
    }
}

/// Visibility property values.
///
/// Hidden boxes are excluded from flow but remain in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

/// Reading direction tag.
///
/// Stored for collaborators; the layout core does not perform bidi-aware
/// axis flipping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadingDirection {
    #[default]
    Ltr,
    Rtl,
}

/// Resolved style for a box.
///
/// Container properties (direction, wrap, justify, align, gap) apply when
/// the box lays out children; item properties (grow, shrink, basis, order,
/// align-self, margins) apply when the box is laid out by its parent.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedStyle {
    // Box model
    pub position: Position,
    pub visibility: Visibility,
    pub direction: ReadingDirection,
    pub width: Length,
    pub height: Length,
    pub min_width: Length,
    pub min_height: Length,
    pub max_width: Length,
    pub max_height: Length,

    // Margin
    pub margin_top: Length,
    pub margin_right: Length,
    pub margin_bottom: Length,
    pub margin_left: Length,

    // Container properties
    pub flex_direction: FlexDirection,
    pub flex_wrap: FlexWrap,
    pub justify_content: JustifyContent,
    pub align_items: AlignItems,
    pub align_content: AlignContent,
    pub row_gap: Length,
    pub column_gap: Length,

    // Item properties
    pub flex_grow: f32,
    pub flex_shrink: f32,
    pub flex_basis: FlexBasis,
    pub order: i32,
    pub align_self: AlignSelf,
    pub aspect_ratio: Option<f32>,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            position: Position::default(),
            visibility: Visibility::default(),
            direction: ReadingDirection::default(),
            width: Length::Auto,
            height: Length::Auto,
            min_width: Length::Auto,
            min_height: Length::Auto,
            max_width: Length::Auto,
            max_height: Length::Auto,
            margin_top: Length::Px(0.0),
            margin_right: Length::Px(0.0),
            margin_bottom: Length::Px(0.0),
            margin_left: Length::Px(0.0),
            flex_direction: FlexDirection::default(),
            flex_wrap: FlexWrap::default(),
            justify_content: JustifyContent::default(),
            align_items: AlignItems::default(),
            align_content: AlignContent::default(),
            row_gap: Length::Px(0.0),
            column_gap: Length::Px(0.0),
            flex_grow: 0.0,
            flex_shrink: 1.0,
            flex_basis: FlexBasis::default(),
            order: 0,
            align_self: AlignSelf::default(),
            aspect_ratio: None,
        }
    }
}

impl ComputedStyle {
    /// Create a style with initial values.
    pub fn new() -> Self {
        Self::default()
    }

    /// The gap along the main axis for the given flex direction.
    pub fn main_gap(&self, direction: FlexDirection, container_main: f32) -> f32 {
        let gap = if direction.is_row() {
            self.column_gap
        } else {
            self.row_gap
        };
        gap.resolve_or(container_main, 0.0)
    }

    /// The gap across lines for the given flex direction.
    pub fn cross_gap(&self, direction: FlexDirection, container_cross: f32) -> f32 {
        let gap = if direction.is_row() {
            self.row_gap
        } else {
            self.column_gap
        };
        gap.resolve_or(container_cross, 0.0)
    }

    /// Set both gaps at once (the `gap` shorthand).
    pub fn set_gap(&mut self, gap: Length) {
        self.row_gap = gap;
        self.column_gap = gap;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_resolve() {
        assert_eq!(Length::Px(40.0).resolve(800.0), Some(40.0));
        assert_eq!(Length::Percent(50.0).resolve(800.0), Some(400.0));
        assert_eq!(Length::Auto.resolve(800.0), None);
        assert_eq!(Length::Auto.resolve_or(800.0, 7.0), 7.0);
    }

    #[test]
    fn test_sanitize_px_clamps_invalid() {
        assert_eq!(sanitize_px(-10.0), 0.0);
        assert_eq!(sanitize_px(f32::NAN), 0.0);
        assert_eq!(sanitize_px(f32::INFINITY), 0.0);
        assert_eq!(sanitize_px(12.5), 12.5);
    }

    #[test]
    fn test_sanitize_factor() {
        assert_eq!(sanitize_factor(-1.0), 0.0);
        assert_eq!(sanitize_factor(f32::NAN), 0.0);
        assert_eq!(sanitize_factor(2.0), 2.0);
    }

    #[test]
    fn test_sanitize_ratio() {
        assert_eq!(sanitize_ratio(Some(1.5)), Some(1.5));
        assert_eq!(sanitize_ratio(Some(0.0)), None);
        assert_eq!(sanitize_ratio(Some(-2.0)), None);
        assert_eq!(sanitize_ratio(Some(f32::NAN)), None);
        assert_eq!(sanitize_ratio(None), None);
    }

    #[test]
    fn test_flex_direction_properties() {
        assert!(FlexDirection::Row.is_row());
        assert!(FlexDirection::RowReverse.is_row());
        assert!(FlexDirection::Column.is_column());
        assert!(FlexDirection::RowReverse.is_reverse());
        assert!(!FlexDirection::Row.is_reverse());
    }

    #[test]
    fn test_align_self_resolve() {
        assert_eq!(
            AlignSelf::Auto.resolve(AlignItems::Center),
            AlignItems::Center
        );
        assert_eq!(
            AlignSelf::FlexEnd.resolve(AlignItems::Center),
            AlignItems::FlexEnd
        );
        assert_eq!(
            AlignSelf::Stretch.resolve(AlignItems::FlexStart),
            AlignItems::Stretch
        );
    }

    #[test]
    fn test_position_out_of_flow() {
        assert!(Position::Absolute.is_out_of_flow());
        assert!(Position::Fixed.is_out_of_flow());
        assert!(!Position::Static.is_out_of_flow());
        assert!(!Position::Relative.is_out_of_flow());
    }

    #[test]
    fn test_gap_selection() {
        let mut style = ComputedStyle::new();
        style.row_gap = Length::Px(4.0);
        style.column_gap = Length::Px(9.0);

        assert_eq!(style.main_gap(FlexDirection::Row, 100.0), 9.0);
        assert_eq!(style.main_gap(FlexDirection::Column, 100.0), 4.0);
        assert_eq!(style.cross_gap(FlexDirection::Row, 100.0), 4.0);
        assert_eq!(style.cross_gap(FlexDirection::ColumnReverse, 100.0), 9.0);
    }

    #[test]
    fn test_default_style() {
        let style = ComputedStyle::new();
        assert_eq!(style.flex_grow, 0.0);
        assert_eq!(style.flex_shrink, 1.0);
        assert!(style.width.is_auto());
        assert_eq!(style.order, 0);
    }
}
