//! PDF postprocessing - reshaping, numbering and finishing rendered books
//!
//! Every operation is an external tool run on files:
//! 1. Reshape pages to the final page box and shift the gutter
//! 2. Tile single-column renders across the page
//! 3. Number pages, splitting jobs the paginator cannot take in one go
//! 4. Rotate, add a barcode page, read back the outline

mod barcode;
mod columns;
mod documents;
mod numbering;
mod outline;
mod reshape;

pub use barcode::is_isbn;
pub use documents::parse_page_count;
pub use numbering::{NumberingOptions, Section, plan_sections};
pub use outline::parse_outline_dump;
pub use reshape::ReshapeOptions;

use crate::command::Toolchain;
use crate::geometry::PageGeometry;

/// Geometry-dependent operations on rendered PDFs
pub struct Postprocessor<'a, R> {
    geometry: &'a PageGeometry,
    tools: Toolchain<'a, R>,
}

impl<'a, R> Postprocessor<'a, R> {
    pub fn new(geometry: &'a PageGeometry, tools: Toolchain<'a, R>) -> Self {
        Self { geometry, tools }
    }

    pub fn geometry(&self) -> &PageGeometry {
        self.geometry
    }

    pub fn tools(&self) -> Toolchain<'a, R> {
        self.tools
    }
}

/// `true`/`false` the way the pdfedit script reads them
fn script_bool(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}
