//! Structured pagination settings for the BookJs renderer

use super::PageGeometry;
use crate::constants::{ENGINE_UNIT_CORRECTION, POINTS_PER_INCH, POINTS_PER_MM};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length unit the renderer is told to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    #[default]
    In,
    Cm,
    Mm,
    Pt,
}

impl LengthUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            LengthUnit::In => "in",
            LengthUnit::Cm => "cm",
            LengthUnit::Mm => "mm",
            LengthUnit::Pt => "pt",
        }
    }

    pub fn points_per_unit(self) -> f32 {
        match self {
            LengthUnit::In => POINTS_PER_INCH,
            LengthUnit::Cm => POINTS_PER_MM * 10.0,
            LengthUnit::Mm => POINTS_PER_MM,
            LengthUnit::Pt => 1.0,
        }
    }

    /// Convert points to the value the renderer needs. The renderer reads
    /// points as device pixels, hence the correction.
    pub fn from_points(self, pt: f32) -> f32 {
        pt / self.points_per_unit() / ENGINE_UNIT_CORRECTION
    }

    /// Inverse of [`LengthUnit::from_points`]
    pub fn to_points(self, value: f32) -> f32 {
        value * ENGINE_UNIT_CORRECTION * self.points_per_unit()
    }
}

/// Page box and margins in renderer units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaginationConfig {
    pub length_unit: LengthUnit,
    pub page_width: f32,
    pub page_height: f32,
    pub outer_margin: f32,
    pub inner_margin: f32,
    pub contents_top_margin: f32,
    pub contents_bottom_margin: f32,
}

impl fmt::Display for PaginationConfig {
    /// `key:value` pairs joined by commas, as passed to `-page-config`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lengthUnit:'{}',pageWidth:{},pageHeight:{},outerMargin:{},innerMargin:{},\
             contentsTopMargin:{},contentsBottomMargin:{}",
            self.length_unit.as_str(),
            self.page_width,
            self.page_height,
            self.outer_margin,
            self.inner_margin,
            self.contents_top_margin,
            self.contents_bottom_margin
        )
    }
}

impl PageGeometry {
    pub fn pagination_config(&self, unit: LengthUnit) -> PaginationConfig {
        let convert = |pt| unit.from_points(pt);
        PaginationConfig {
            length_unit: unit,
            page_width: convert(self.size.width),
            page_height: convert(self.size.height),
            outer_margin: convert(self.side_margin),
            inner_margin: convert(self.gutter),
            contents_top_margin: convert(self.top_margin),
            contents_bottom_margin: convert(self.bottom_margin),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inch_conversion_includes_correction() {
        // 54pt is 0.75in, which the renderer must be told is 1in
        assert!((LengthUnit::In.from_points(54.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_round_trip() {
        for unit in [LengthUnit::In, LengthUnit::Cm, LengthUnit::Mm, LengthUnit::Pt] {
            for pt in [0.0, 1.0, 36.5, 419.53, 2383.94] {
                let back = unit.to_points(unit.from_points(pt));
                assert!((back - pt).abs() < 1e-3, "{unit:?} {pt} -> {back}");
            }
        }
    }
}
