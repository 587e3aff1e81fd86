//! Page stylesheet for HTML-paginating renderers

use super::PageGeometry;
use crate::constants::*;

/// Left and right offsets of the page contents
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SideOffsets {
    pub left: f32,
    pub right: f32,
}

/// Book-style margins: the gutter sits on the binding side, which is the
/// left of odd pages and the right of even pages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MirroredMargins {
    pub odd: SideOffsets,
    pub even: SideOffsets,
}

impl PageGeometry {
    pub fn mirrored_margins(&self) -> MirroredMargins {
        MirroredMargins {
            odd: SideOffsets {
                left: self.gutter,
                right: self.side_margin,
            },
            even: SideOffsets {
                left: self.side_margin,
                right: self.gutter,
            },
        }
    }

    /// Width of the contents box
    pub fn contents_width(&self) -> f32 {
        self.size.width - self.side_margin - self.gutter
    }

    /// Height of the contents box, between the header and footer bands
    pub fn contents_height(&self) -> f32 {
        self.size.height - self.contents_top() - self.contents_bottom()
    }

    fn contents_top(&self) -> f32 {
        self.top_margin + HEADER_HEIGHT
    }

    fn contents_bottom(&self) -> f32 {
        self.bottom_margin + FOOTER_HEIGHT
    }

    /// Stylesheet sizing the page box, the contents box, the mirrored
    /// margins and the largest image allowed
    pub fn page_stylesheet(&self) -> String {
        let margins = self.mirrored_margins();
        let mut css = String::new();

        css.push_str(&format!(
            "
.page {{
    width:  {:.6}pt;
    height: {:.6}pt;
}}
",
            self.size.width, self.size.height
        ));

        css.push_str(&format!(
            "
.contents {{
    height: {:.6}pt;  /* page-height - top - bottom */
    top:    {:.6}pt;  /* top-margin + header.height */
    bottom: {:.6}pt;  /* bottom-margin + footer.height */
}}
",
            self.contents_height(),
            self.contents_top(),
            self.contents_bottom()
        ));

        css.push_str(&format!(
            "
.pagenumber {{
    bottom: {:.6}pt;  /* bottom-margin */
}}

.header {{
    top: {:.6}pt;     /* top-margin */
}}
",
            self.bottom_margin, self.top_margin
        ));

        css.push_str(&format!(
            "
.page:nth-child(odd) .contents, .page:nth-child(odd) .pagenumber, .page:nth-child(odd) .header {{
    left:  {:.6}pt;
    right: {:.6}pt;
}}

.page:nth-child(even) .contents, .page:nth-child(even) .pagenumber, .page:nth-child(even) .header {{
    left:  {:.6}pt;
    right: {:.6}pt;
}}
",
            margins.odd.left, margins.odd.right, margins.even.left, margins.even.right
        ));

        css.push_str(&format!(
            "
img {{
    max-width:  {:.6}pt;
    max-height: {:.6}pt;
}}
",
            self.contents_width() * IMAGE_MAX_WIDTH_RATIO,
            self.contents_height() * IMAGE_MAX_HEIGHT_RATIO
        ));

        css
    }
}
