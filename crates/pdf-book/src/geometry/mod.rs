//! Page geometry: margins, gutter, columns and page number placement
//! derived from a page size and the caller's overrides.
//!
//! All values are in points. The geometry is computed once per render
//! request and never changes afterwards; the renderer-facing projections
//! (browser margins, pagination config, page stylesheet) are read off it.

mod defaults;
mod pagination;
mod stylesheet;

pub use defaults::*;
pub use pagination::*;
pub use stylesheet::*;

use crate::constants::*;
use crate::job::JobContext;
use crate::options::{Columns, PageOptions};
use crate::paper::{PaperCatalog, PaperFit};
use crate::render::Engine;
use crate::types::*;

/// Margins handed to a browser-style renderer, in millimetres, with the
/// paper clip offsets already added
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrowserMargins {
    pub top: f32,
    pub outer: f32,
    pub bottom: f32,
    pub inner: f32,
}

impl BrowserMargins {
    /// Top, right, bottom, left
    pub fn as_array(&self) -> [f32; 4] {
        [self.top, self.outer, self.bottom, self.inner]
    }
}

/// Widths used to render one column of a multi-column page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnLayout {
    /// Page width minus both side margins and the gutter
    pub printable_width: f32,
    pub column_width: f32,
    /// Width of the narrow page a single column is rendered onto
    pub page_width: f32,
    /// Side margin of that narrow page
    pub side_margin: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageGeometry {
    pub size: PageSize,
    /// Paper stock the page is printed on, with centring offsets
    pub paper: PaperFit,
    pub top_margin: f32,
    pub bottom_margin: f32,
    pub side_margin: f32,
    pub gutter: f32,
    pub columns: u32,
    pub column_margin: f32,
    /// Distance of the page number baseline above the page bottom
    pub number_bottom: f32,
    /// Distance of the page number from the outer edge
    pub number_margin: f32,
    pub browser_margins: BrowserMargins,
    pub grey_scale: bool,
    pub engine: Engine,
    pub printer_target: String,
}

impl PageGeometry {
    /// Derive the geometry using the standard paper catalog
    pub fn new(size: PageSize, options: &PageOptions) -> Result<Self> {
        Self::with_catalog(size, options, PaperCatalog::standard())
    }

    pub fn with_catalog(
        size: PageSize,
        options: &PageOptions,
        catalog: &PaperCatalog,
    ) -> Result<Self> {
        options.validate()?;
        let paper = catalog.find_containing_paper(size.width, size.height)?;

        let margin = default_margin(size);
        let top_margin = options.top_margin.unwrap_or(margin);
        let bottom_margin = options.bottom_margin.unwrap_or(margin);
        let side_margin = options.side_margin.unwrap_or(margin);
        let gutter = options.gutter.unwrap_or_else(|| default_gutter(size));

        let columns = match options.columns {
            Columns::Fixed(n) => n,
            Columns::Auto => auto_columns(size.width, MIN_COLUMN_WIDTH),
        };
        let column_margin = options
            .column_margin
            .unwrap_or_else(|| default_column_margin(margin, columns));

        let clip_x = paper.margin_x;
        let clip_y = paper.margin_y;
        let browser_margins = BrowserMargins {
            top: pt_to_mm(top_margin + clip_y),
            outer: pt_to_mm(side_margin + clip_x + 0.5 * gutter),
            bottom: pt_to_mm(bottom_margin + clip_y + 0.5 * PAGE_NUMBER_SIZE),
            inner: pt_to_mm(side_margin + clip_x + 0.5 * gutter),
        };

        let printer_target = options
            .printer_target
            .clone()
            .unwrap_or_else(|| format!("pdfbook_{}", paper.stock.name));

        let geometry = Self {
            size,
            paper,
            top_margin,
            bottom_margin,
            side_margin,
            gutter,
            columns,
            column_margin,
            number_bottom: bottom_margin - PAGE_NUMBER_DROP * PAGE_NUMBER_SIZE,
            number_margin: side_margin,
            browser_margins,
            grey_scale: options.grey_scale,
            engine: options.engine,
            printer_target,
        };
        geometry.check_content_area()?;
        Ok(geometry)
    }

    fn check_content_area(&self) -> Result<()> {
        if self.top_margin + self.bottom_margin >= self.size.height {
            return Err(BookError::Config(format!(
                "top and bottom margins ({} + {}) leave no room on a {}pt high page",
                self.top_margin, self.bottom_margin, self.size.height
            )));
        }
        if 2.0 * self.side_margin + self.gutter >= self.size.width {
            return Err(BookError::Config(format!(
                "side margins and gutter ({} x 2 + {}) leave no room on a {}pt wide page",
                self.side_margin, self.gutter, self.size.width
            )));
        }
        if self.columns > 1 && self.column_layout().column_width <= 0.0 {
            return Err(BookError::Config(format!(
                "{} columns with {}pt between them do not fit",
                self.columns, self.column_margin
            )));
        }
        Ok(())
    }

    pub fn paper_name(&self) -> &str {
        &self.paper.stock.name
    }

    /// Width available for text between the side margins and gutter
    pub fn printable_width(&self) -> f32 {
        self.size.width - 2.0 * self.side_margin - self.gutter
    }

    pub fn column_layout(&self) -> ColumnLayout {
        let printable_width = self.printable_width();
        let columns = self.columns.max(1) as f32;
        let column_width =
            (printable_width - (columns - 1.0) * self.column_margin) / columns;
        ColumnLayout {
            printable_width,
            column_width,
            page_width: column_width + self.column_margin,
            side_margin: self.column_margin * 0.5,
        }
    }

    /// Geometry of the narrow single-column page used to render one column
    /// of a multi-column book
    pub fn column_geometry(&self) -> Result<PageGeometry> {
        let layout = self.column_layout();
        let size = PageSize::new(layout.page_width, self.size.height)?;
        let options = PageOptions {
            top_margin: Some(self.top_margin),
            bottom_margin: Some(self.bottom_margin),
            side_margin: Some(layout.side_margin),
            gutter: Some(0.0),
            columns: Columns::Fixed(1),
            column_margin: None,
            grey_scale: self.grey_scale,
            engine: self.engine,
            printer_target: Some(self.printer_target.clone()),
        };
        PageGeometry::new(size, &options)
    }

    /// Log every derived value when the job asks for geometry traces
    pub fn trace(&self, ctx: &JobContext) {
        if !ctx.trace_geometry() {
            return;
        }
        log::debug!(
            "{ctx} geometry: {}x{}pt on {} (clip {}, {})",
            self.size.width,
            self.size.height,
            self.paper.stock.name,
            self.paper.margin_x,
            self.paper.margin_y
        );
        log::debug!(
            "{ctx} margins: top {} bottom {} side {} gutter {}",
            self.top_margin,
            self.bottom_margin,
            self.side_margin,
            self.gutter
        );
        log::debug!(
            "{ctx} columns: {} (margin {}), page number at {} from bottom, {} from side",
            self.columns,
            self.column_margin,
            self.number_bottom,
            self.number_margin
        );
        log::debug!("{ctx} browser margins (mm): {:?}", self.browser_margins);
    }
}
