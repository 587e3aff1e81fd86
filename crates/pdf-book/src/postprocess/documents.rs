//! Whole-document operations: counting, joining, slicing and turning PDFs

use crate::command::{CommandRunner, ToolCommand, Toolchain};
use crate::types::*;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static RE_PAGES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*Pages:\s*(\d+)\s*$").expect("valid pages regex"));

/// Read the page count from a `pdfinfo` dump
pub fn parse_page_count(info: &str) -> Option<usize> {
    RE_PAGES
        .captures(info)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

impl<R: CommandRunner> Toolchain<'_, R> {
    /// How many pages in the PDF?
    pub async fn count_pages(&self, pdf: &Path) -> Result<usize> {
        let cmd = ToolCommand::new(&self.config.pdfinfo).arg(pdf);
        let output = self.run(&cmd).await?;
        parse_page_count(&output.stdout).ok_or_else(|| BookError::ToolOutput {
            command: cmd.to_string(),
            message: "no \"Pages:\" line".to_string(),
        })
    }

    /// Join `pdfs` in order into `destination`, skipping `None` entries
    pub async fn concat(&self, destination: &Path, pdfs: &[Option<&Path>]) -> Result<()> {
        let inputs: Vec<&Path> = pdfs.iter().flatten().copied().collect();
        if inputs.is_empty() {
            return Err(BookError::Config("no PDFs to concatenate".to_string()));
        }
        let cmd = ToolCommand::new(&self.config.pdftk)
            .args(inputs)
            .args(["cat", "output"])
            .arg(destination);
        self.run(&cmd).await?;
        Ok(())
    }

    /// Copy the pages in `range` (pdftk syntax, e.g. `1-200` or `401-end`)
    /// of `pdf` into `output`
    pub async fn extract_pages(&self, pdf: &Path, range: &str, output: &Path) -> Result<()> {
        let cmd = ToolCommand::new(&self.config.pdftk)
            .arg(pdf)
            .args(["cat", range, "output"])
            .arg(output);
        self.run(&cmd).await?;
        Ok(())
    }

    pub async fn rotate(&self, pdf_in: &Path, pdf_out: &Path, mode: RotateMode) -> Result<()> {
        self.extract_pages(pdf_in, mode.page_range(), pdf_out).await
    }
}
