//! ISBN barcode pages

use super::Postprocessor;
use crate::command::{CommandRunner, ToolCommand};
use crate::constants::MEDIA_TOLERANCE;
use crate::inspect;
use crate::types::*;
use std::path::Path;

/// Loose ISBN shape check: 9, 10, 12 or 13 characters once hyphens are
/// removed, all digits except the last, which may also be `X` or `*`.
pub fn is_isbn(s: &str) -> bool {
    let compact: Vec<char> = s.trim().chars().filter(|&c| c != '-').collect();
    let Some((last, body)) = compact.split_last() else {
        return false;
    };
    matches!(compact.len(), 9 | 10 | 12 | 13)
        && body.iter().all(char::is_ascii_digit)
        && (last.is_ascii_digit() || matches!(*last, 'X' | 'x' | '*'))
}

impl<R: CommandRunner> Postprocessor<'_, R> {
    /// The barcode renderer and the PostScript converter it pipes into
    pub fn barcode_commands(
        &self,
        isbn: &str,
        pdf: &Path,
        corner: Corner,
    ) -> (ToolCommand, ToolCommand) {
        let g = self.geometry;
        let (width, height) = (g.size.width, g.size.height);
        let position = format!(
            "{},{width},{height},{},{}",
            corner.code(),
            g.side_margin,
            g.bottom_margin
        );

        let bookland = ToolCommand::new(&self.tools.config.bookland)
            .args(["--position", position.as_str()])
            .arg(isbn);
        let ps2pdf = ToolCommand::new(&self.tools.config.ps2pdf)
            .arg("-dFIXEDMEDIA")
            .arg(format!("-dDEVICEWIDTHPOINTS={width}"))
            .arg(format!("-dDEVICEHEIGHTPOINTS={height}"))
            .arg("-")
            .arg(pdf);
        (bookland, ps2pdf)
    }

    /// Write a single blank page of the book's size to `pdf`, with an ISBN
    /// barcode in `corner` inset by the side and bottom margins.
    ///
    /// The new page's media box is checked against the page size.
    pub async fn make_barcode_pdf(&self, isbn: &str, pdf: &Path, corner: Corner) -> Result<()> {
        if !is_isbn(isbn) {
            return Err(BookError::Config(format!("{isbn:?} is not an ISBN")));
        }
        let (bookland, ps2pdf) = self.barcode_commands(isbn, pdf, corner);
        self.tools.run_piped(&bookland, &ps2pdf).await?;

        let expected = (self.geometry.size.width, self.geometry.size.height);
        let found = inspect::page_size(pdf).await?;
        if (found.0 - expected.0).abs() > MEDIA_TOLERANCE
            || (found.1 - expected.1).abs() > MEDIA_TOLERANCE
        {
            return Err(BookError::MediaMismatch {
                path: pdf.to_path_buf(),
                expected,
                found,
            });
        }
        Ok(())
    }
}
