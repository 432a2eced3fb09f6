//! The measurement capability for leaf content.
//!
//! Layout never shapes text or decodes images itself; any leaf whose size
//! is not explicitly fixed is sized through a [`Measure`] implementation
//! supplied by the caller. From layout's point of view a measurer is a pure
//! function returning non-negative sizes.

use flexkit_style::{sanitize_px, ComputedStyle};

use crate::geometry::Size;
use crate::tree::SourceId;

/// What the layout engine knows about the box being measured.
#[derive(Debug)]
pub struct MeasureRequest<'a> {
    /// Text content, for text leaves.
    pub text: Option<&'a str>,
    /// The box's resolved style.
    pub style: &'a ComputedStyle,
    /// Opaque back-reference to the external style/DOM node, if any.
    pub source: Option<SourceId>,
}

/// Measurement capability for leaves without an explicit size.
///
/// `available` carries the space offered by the container on each axis;
/// an unconstrained axis is `f32::INFINITY`. Implementations must be pure
/// and return non-negative, finite sizes.
pub trait Measure {
    fn measure(&self, request: &MeasureRequest<'_>, available: Size) -> Size;
}

/// Text measurement from an average-character-width approximation.
///
/// A production engine would shape text through a real shaper behind this
/// trait; the heuristic keeps the engine usable without one. Typical Latin
/// fonts average about 0.5em per character.
#[derive(Debug, Clone, Copy)]
pub struct HeuristicTextMeasure {
    pub font_size: f32,
}

impl HeuristicTextMeasure {
    pub fn new(font_size: f32) -> Self {
        Self {
            font_size: sanitize_px(font_size),
        }
    }
}

impl Default for HeuristicTextMeasure {
    fn default() -> Self {
        Self::new(16.0)
    }
}

impl Measure for HeuristicTextMeasure {
    fn measure(&self, request: &MeasureRequest<'_>, _available: Size) -> Size {
        match request.text {
            Some(text) => {
                let avg_char_width = self.font_size * 0.5;
                let width = text.chars().count() as f32 * avg_char_width;
                // ascent 0.8em + descent 0.2em
                Size::new(width, self.font_size)
            }
            None => Size::zero(),
        }
    }
}

/// A measurer returning a constant size.
///
/// Serves image-like leaves with known intrinsic dimensions, and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedMeasure {
    pub size: Size,
}

impl FixedMeasure {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Size::new(sanitize_px(width), sanitize_px(height)),
        }
    }
}

impl Measure for FixedMeasure {
    fn measure(&self, _request: &MeasureRequest<'_>, _available: Size) -> Size {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heuristic_text_measure() {
        let measure = HeuristicTextMeasure::default();
        let style = ComputedStyle::new();
        let request = MeasureRequest {
            text: Some("hello"),
            style: &style,
            source: None,
        };
        let size = measure.measure(&request, Size::new(f32::INFINITY, f32::INFINITY));
        assert_eq!(size.width, 5.0 * 8.0);
        assert_eq!(size.height, 16.0);
    }

    #[test]
    fn test_heuristic_without_text() {
        let measure = HeuristicTextMeasure::default();
        let style = ComputedStyle::new();
        let request = MeasureRequest {
            text: None,
            style: &style,
            source: None,
        };
        assert_eq!(
            measure.measure(&request, Size::zero()),
            Size::zero()
        );
    }

    #[test]
    fn test_fixed_measure_sanitizes() {
        let measure = FixedMeasure::new(-4.0, 30.0);
        let style = ComputedStyle::new();
        let request = MeasureRequest {
            text: None,
            style: &style,
            source: None,
        };
        let size = measure.measure(&request, Size::zero());
        assert_eq!(size, Size::new(0.0, 30.0));
    }
}
