//! Size-proportional defaults for margins, gutter and columns
//!
//! These are ad hoc but stable: changing them moves every book that relies
//! on the defaults.

use crate::constants::*;
use crate::types::PageSize;

/// Default top, bottom and side margin
pub fn default_margin(size: PageSize) -> f32 {
    BASE_MARGIN + PROPORTIONAL_MARGIN * size.shorter_side()
}

/// Default binding gutter
pub fn default_gutter(size: PageSize) -> f32 {
    BASE_GUTTER + PROPORTIONAL_GUTTER * size.width
}

/// Space between columns when none is given
pub fn default_column_margin(default_margin: f32, columns: u32) -> f32 {
    default_margin * 2.0 / (5.0 + columns as f32)
}

/// How many columns of at least `min_column_width` fit across `width`.
/// Never less than one.
pub fn auto_columns(width: f32, min_column_width: f32) -> u32 {
    ((width / min_column_width).floor() as u32).max(1)
}
