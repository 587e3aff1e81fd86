//! Shared constants for page geometry
//!
//! All lengths are in points unless the name says otherwise. User-facing
//! sizes are usually given in millimetres and converted at the edges.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f32 = 72.0 / 25.4; // ≈ 2.83465

/// Points per inch
pub const POINTS_PER_INCH: f32 = 72.0;

/// The BookJs renderer treats a point as a device pixel, so every length it
/// receives must be divided by this factor.
pub const ENGINE_UNIT_CORRECTION: f32 = 0.75;

/// Convert millimeters to points
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

/// Convert points to millimeters
#[inline]
pub fn pt_to_mm(pt: f32) -> f32 {
    pt / POINTS_PER_MM
}

/// Convert inches to points
#[inline]
pub fn in_to_pt(inches: f32) -> f32 {
    inches * POINTS_PER_INCH
}

// =============================================================================
// Default Margins
// =============================================================================

/// Fixed part of the default top, bottom and side margins
pub const BASE_MARGIN: f32 = 22.0;

/// Share of the shorter page side added to the default margins
pub const PROPORTIONAL_MARGIN: f32 = 0.04;

/// Fixed part of the default gutter
pub const BASE_GUTTER: f32 = 15.0;

/// Share of the page width added to the default gutter
pub const PROPORTIONAL_GUTTER: f32 = 0.011;

// =============================================================================
// Columns
// =============================================================================

/// Narrowest column allowed when the column count is worked out automatically
pub const MIN_COLUMN_WIDTH: f32 = 110.0 * POINTS_PER_MM;

// =============================================================================
// Page Numbers
// =============================================================================

/// Font size of the footer page numbers (points)
pub const PAGE_NUMBER_SIZE: f32 = 11.0;

/// Fraction of the page number size the number baseline sits below the
/// bottom margin
pub const PAGE_NUMBER_DROP: f32 = 0.6;

// =============================================================================
// Page Stylesheet
// =============================================================================

/// Height of the running header band above the contents box
pub const HEADER_HEIGHT: f32 = 0.4 * POINTS_PER_INCH;

/// Height of the footer band below the contents box
pub const FOOTER_HEIGHT: f32 = 0.4 * POINTS_PER_INCH;

/// Images may use at most this share of the contents width
pub const IMAGE_MAX_WIDTH_RATIO: f32 = 0.9;

/// Images may use at most this share of the contents height
pub const IMAGE_MAX_HEIGHT_RATIO: f32 = 0.8;

// =============================================================================
// External Tools
// =============================================================================

/// Largest document the paginator can number in one run
pub const DEFAULT_MAX_PAGES_PER_JOB: usize = 3000;

/// Slack allowed between a requested and a produced page box (points)
pub const MEDIA_TOLERANCE: f32 = 1.0;
