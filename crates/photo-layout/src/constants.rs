//! Shared constants for page layout, annotation editing and export
//!
//! This module centralizes magic numbers used across the editor geometry,
//! the crop engine and PDF output.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f32 = 72.0 / 25.4;

/// Convert millimeters to points
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

// =============================================================================
// Editor Geometry
// =============================================================================

/// Smallest width/height of an annotation during interactive resize (display px)
pub const MIN_ANNOTATION_SIZE_PX: f64 = 20.0;

/// Gap kept between a dragged annotation and the image edge (display px)
pub const ANNOTATION_EDGE_MARGIN_PX: f64 = 5.0;

/// Smallest crop selection accepted, per axis (display px)
pub const MIN_CROP_SIZE_PX: f64 = 20.0;

/// New shapes start at this fraction of the displayed image, per axis
pub const NEW_SHAPE_FRACTION: f64 = 0.3;

/// Upper bound for the initial size of a new shape (display px)
pub const NEW_SHAPE_MAX_PX: f64 = 150.0;

/// Placeholder content for text annotations added without text
pub const TEXT_PLACEHOLDER: &str = "Double-click to edit";

// =============================================================================
// Text
// =============================================================================

/// Baseline-to-baseline distance as a multiple of the font size
pub const LINE_HEIGHT_FACTOR: f64 = 1.2;

/// Approximate character width ratio for Helvetica
pub const HELVETICA_CHAR_WIDTH_RATIO: f64 = 0.5;

// =============================================================================
// Crop Output
// =============================================================================

/// JPEG quality used when re-encoding a cropped photo
pub const CROP_JPEG_QUALITY: u8 = 90;

// =============================================================================
// Pages
// =============================================================================

/// Default number of pages shown together in the paginated viewer
pub const DEFAULT_PAGES_PER_SECTION: usize = 10;

/// Version string written into project documents
pub const PROJECT_VERSION: &str = "1.1.0";

// =============================================================================
// Export
// =============================================================================

/// Height reserved at the top of every exported page for the title (points)
pub const TITLE_BAND_PT: f32 = 36.0;

/// Share of a `*text` cell given to the text box below the photo
pub const TEXT_AREA_FRACTION: f32 = 0.25;

/// Gap between slots on an exported page (points)
pub const SLOT_GAP_PT: f32 = 8.0;

/// Vertical offset for page numbers from the bottom edge (points)
pub const PAGE_NUMBER_OFFSET: f32 = 14.0;

/// Font size for page numbers (points)
pub const PAGE_NUMBER_FONT_SIZE: f32 = 9.0;

/// Control point factor for approximating circles with Bezier curves.
/// 4 * (sqrt(2) - 1) / 3
pub const BEZIER_CIRCLE_FACTOR: f32 = 0.552_284_8;

/// Length of an arrow head relative to the stroke width
pub const ARROW_HEAD_FACTOR: f32 = 4.0;
