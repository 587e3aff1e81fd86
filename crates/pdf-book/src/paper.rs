//! Paper stock catalog and the smallest-containing-paper search
//!
//! The renderers only print onto standard paper, so a custom page size is
//! laid out in the middle of the smallest stock that holds it and trimmed
//! later.

use crate::constants::pt_to_mm;
use crate::types::*;
use std::sync::LazyLock;

/// A named standard paper size, in points, portrait
#[derive(Debug, Clone, PartialEq)]
pub struct PaperStock {
    pub name: String,
    pub width: f32,
    pub height: f32,
}

impl PaperStock {
    pub fn new(name: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
        }
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    pub fn contains(&self, width: f32, height: f32) -> bool {
        self.width >= width && self.height >= height
    }

    /// Paper name in the form the n-up imposer expects (`a4paper`)
    pub fn imposer_name(&self) -> String {
        format!("{}paper", self.name.to_lowercase())
    }
}

/// Where a page sits on its paper stock
#[derive(Debug, Clone, PartialEq)]
pub struct PaperFit {
    pub stock: PaperStock,
    /// Half the horizontal slack between page and stock
    pub margin_x: f32,
    /// Half the vertical slack between page and stock
    pub margin_y: f32,
}

/// Ordered list of paper stocks.
///
/// The search returns the first stock that fits, so the catalog must be
/// ordered by area: the first fit is then also the tightest.
#[derive(Debug, Clone, PartialEq)]
pub struct PaperCatalog {
    stocks: Vec<PaperStock>,
}

static STANDARD: LazyLock<PaperCatalog> = LazyLock::new(|| PaperCatalog {
    stocks: vec![
        PaperStock::new("A6", 297.64, 419.53),
        PaperStock::new("A5", 419.53, 595.28),
        PaperStock::new("B5", 498.90, 708.66),
        PaperStock::new("Letter", 612.0, 792.0),
        PaperStock::new("A4", 595.28, 841.89),
        PaperStock::new("B4", 708.66, 1000.63),
        PaperStock::new("A3", 841.89, 1190.55),
        PaperStock::new("B3", 1000.63, 1417.32),
        PaperStock::new("A2", 1190.55, 1683.78),
        PaperStock::new("A1", 1683.78, 2383.94),
        PaperStock::new("A0", 2383.94, 3370.39),
    ],
});

impl PaperCatalog {
    /// Build a catalog, rejecting stocks listed out of area order
    pub fn new(stocks: Vec<PaperStock>) -> Result<Self> {
        if stocks.is_empty() {
            return Err(BookError::Config("paper catalog is empty".to_string()));
        }
        for pair in stocks.windows(2) {
            if pair[1].area() < pair[0].area() {
                return Err(BookError::Config(format!(
                    "paper catalog out of order: {} is smaller than {} but listed after it",
                    pair[1].name, pair[0].name
                )));
            }
        }
        if let Some(bad) = stocks.iter().find(|s| !(s.width > 0.0 && s.height > 0.0)) {
            return Err(BookError::Config(format!(
                "paper stock {} has no area",
                bad.name
            )));
        }
        Ok(Self { stocks })
    }

    /// The built-in ISO A/B and US Letter catalog
    pub fn standard() -> &'static PaperCatalog {
        &STANDARD
    }

    pub fn stocks(&self) -> &[PaperStock] {
        &self.stocks
    }

    pub fn get(&self, name: &str) -> Option<&PaperStock> {
        self.stocks
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }

    /// Find the first stock holding a `width` x `height` page (points) and
    /// the offsets that centre the page on it.
    pub fn find_containing_paper(&self, width: f32, height: f32) -> Result<PaperFit> {
        self.stocks
            .iter()
            .find(|stock| stock.contains(width, height))
            .map(|stock| PaperFit {
                stock: stock.clone(),
                margin_x: (stock.width - width) * 0.5,
                margin_y: (stock.height - height) * 0.5,
            })
            .ok_or(BookError::NoFittingPaper {
                width_mm: pt_to_mm(width),
                height_mm: pt_to_mm(height),
            })
    }
}

/// Search the standard catalog
pub fn find_containing_paper(width: f32, height: f32) -> Result<PaperFit> {
    PaperCatalog::standard().find_containing_paper(width, height)
}
