//! Conversions between original-image, display and normalized space
//!
//! Display values are kept as exact floats. Rounding to whole pixels only
//! happens on the way back into original space, in [`to_original`] and the
//! scalar helpers next to it, so repeated open/save cycles do not drift.

use super::{DisplaySpace, NormalizedSpace, OriginalSpace, Point, Rect, Size, Space};

// =============================================================================
// Scale
// =============================================================================

/// Per-axis factor from original-image pixels to display pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub x: f64,
    pub y: f64,
}

impl Default for Scale {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Scale {
    pub const IDENTITY: Scale = Scale { x: 1.0, y: 1.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Scale that maps an image of `original` size onto `display` size.
    ///
    /// A degenerate axis on either side falls back to 1.0 for that axis so
    /// later divisions stay finite.
    pub fn between(original: Size<OriginalSpace>, display: Size<DisplaySpace>) -> Self {
        let axis = |d: f64, o: f64| {
            if o > 0.0 && d > 0.0 && d.is_finite() {
                d / o
            } else {
                1.0
            }
        };
        Self {
            x: axis(display.width, original.width),
            y: axis(display.height, original.height),
        }
    }

    /// Factor applied to stroke widths. Using the smaller axis keeps strokes
    /// from bulging when the image is stretched unevenly.
    pub fn stroke(&self) -> f64 {
        self.x.min(self.y)
    }

    /// Factor applied to font sizes
    pub fn text(&self) -> f64 {
        self.y
    }
}

// =============================================================================
// Rectangles
// =============================================================================

/// Project an original-space rectangle into display space
pub fn to_display(rect: &Rect<OriginalSpace>, scale: Scale) -> Rect<DisplaySpace> {
    Rect::new(
        rect.x * scale.x,
        rect.y * scale.y,
        rect.width * scale.x,
        rect.height * scale.y,
    )
}

/// Project a display-space rectangle back into original space.
///
/// The result is rounded to whole pixels and clamped with
/// [`clamp_to_image`], so it is never empty and never leaves the image.
pub fn to_original(
    rect: &Rect<DisplaySpace>,
    scale: Scale,
    image: Size<OriginalSpace>,
) -> Rect<OriginalSpace> {
    let unscaled = Rect::new(
        (rect.x / scale.x).round(),
        (rect.y / scale.y).round(),
        (rect.width / scale.x).round(),
        (rect.height / scale.y).round(),
    );
    clamp_to_image(&unscaled, image)
}

/// Clamp an original-space rectangle into the image.
///
/// Position lands in `[0, dim - 1]` and size in `[1, dim - position]`, so a
/// degenerate input still yields a 1x1 rectangle inside the image.
pub fn clamp_to_image(rect: &Rect<OriginalSpace>, image: Size<OriginalSpace>) -> Rect<OriginalSpace> {
    let (x, width) = clamp_axis(rect.x, rect.width, image.width);
    let (y, height) = clamp_axis(rect.y, rect.height, image.height);
    Rect::new(x, y, width, height)
}

fn clamp_axis(pos: f64, len: f64, dim: f64) -> (f64, f64) {
    let max_pos = (dim - 1.0).max(0.0);
    let pos = if pos.is_finite() { pos.clamp(0.0, max_pos) } else { 0.0 };
    let len = if len.is_finite() { len } else { 1.0 };
    let len = len.min(dim - pos).max(1.0);
    (pos, len)
}

pub fn point_to_display(p: Point<OriginalSpace>, scale: Scale) -> Point<DisplaySpace> {
    Point::new(p.x * scale.x, p.y * scale.y)
}

pub fn point_to_original(p: Point<DisplaySpace>, scale: Scale) -> Point<OriginalSpace> {
    Point::new(p.x / scale.x, p.y / scale.y)
}

// =============================================================================
// Scalars
// =============================================================================

pub fn font_to_display(size: f64, scale: Scale) -> f64 {
    size * scale.text()
}

/// Rounded, never below 1
pub fn font_to_original(size: f64, scale: Scale) -> f64 {
    (size / scale.text()).round().max(1.0)
}

pub fn stroke_to_display(width: f64, scale: Scale) -> f64 {
    width * scale.stroke()
}

/// Rounded, never below 1
pub fn stroke_to_original(width: f64, scale: Scale) -> f64 {
    (width / scale.stroke()).round().max(1.0)
}

// =============================================================================
// Normalized space
// =============================================================================

/// Express a rectangle as fractions of the image it lives on
pub fn to_normalized<S: Space>(rect: &Rect<S>, image: Size<S>) -> Rect<NormalizedSpace> {
    let w = if image.width > 0.0 { image.width } else { 1.0 };
    let h = if image.height > 0.0 { image.height } else { 1.0 };
    Rect::new(rect.x / w, rect.y / h, rect.width / w, rect.height / h)
}

/// Resolve a normalized rectangle against a concrete image size
pub fn from_normalized<S: Space>(rect: &Rect<NormalizedSpace>, image: Size<S>) -> Rect<S> {
    Rect::new(
        rect.x * image.width,
        rect.y * image.height,
        rect.width * image.width,
        rect.height * image.height,
    )
}
