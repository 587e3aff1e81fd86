//! Page numbering, split into sections when the document is longer than the
//! paginator can take in one run

use super::Postprocessor;
use super::reshape::path_arg;
use crate::command::{CommandRunner, ToolCommand};
use crate::types::*;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberingOptions {
    pub style: NumberStyle,
    pub direction: Direction,
    /// Number printed on the first page
    pub number_start: u32,
}

impl Default for NumberingOptions {
    fn default() -> Self {
        Self {
            style: NumberStyle::Latin,
            direction: Direction::Ltr,
            number_start: 1,
        }
    }
}

/// A run of pages numbered in one paginator job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    /// First page, 1-based
    pub first: usize,
    /// Last page, `None` for "to the end of the document"
    pub last: Option<usize>,
    /// Number printed on the section's first page
    pub number_start: u32,
}

impl Section {
    /// Page range in pdftk syntax
    pub fn range(&self) -> String {
        match self.last {
            Some(last) => format!("{}-{}", self.first, last),
            None => format!("{}-end", self.first),
        }
    }

    /// Last page, given the document length
    pub fn last_page(&self, pages: usize) -> usize {
        self.last.unwrap_or(pages)
    }
}

/// Even section length for `sections` sections; even lengths keep every
/// section starting on a recto page
fn section_size(pages: usize, sections: usize) -> usize {
    ((pages / sections + 2) & !1).max(2)
}

/// Split `pages` pages into sections of at most `limit` pages.
///
/// Sections have an even length except the last, which always runs to the
/// end of the document. Each section's `number_start` continues where the
/// previous one stopped. Limits below 2 are treated as 2.
pub fn plan_sections(pages: usize, limit: usize, number_start: u32) -> Vec<Section> {
    let limit = limit.max(2);
    if pages <= limit {
        return vec![Section {
            first: 1,
            last: None,
            number_start,
        }];
    }

    let mut sections = pages.div_ceil(limit);
    // The last section may take one page more than the others
    while section_size(pages, sections) + 1 > limit && sections < pages {
        sections += 1;
    }
    let size = section_size(pages, sections);

    let mut plan = Vec::with_capacity(sections);
    let mut first = 1;
    while first <= pages {
        let last = first + size - 1;
        let number_start = number_start + (first - 1) as u32;
        // A lone trailing page joins the last section when that still fits
        if last >= pages || (last + 1 == pages && size < limit) {
            plan.push(Section {
                first,
                last: None,
                number_start,
            });
            break;
        }
        plan.push(Section {
            first,
            last: Some(last),
            number_start,
        });
        first = last + 1;
    }
    plan
}

impl<R: CommandRunner> Postprocessor<'_, R> {
    pub fn number_command(&self, pdf: &Path, options: &NumberingOptions) -> ToolCommand {
        let geometry = self.geometry;
        ToolCommand::new(&self.tools.config.pdfedit)
            .arg("-s")
            .arg(&self.tools.config.pdfedit_script)
            .arg("operation=page_numbers")
            .arg(format!("dir={}", options.direction))
            .arg(path_arg("filename", pdf))
            .arg(path_arg("output_filename", pdf))
            .arg(format!("number_start={}", options.number_start))
            .arg(format!("number_style={}", options.style.as_str()))
            .arg(format!("number_bottom={}", geometry.number_bottom))
            .arg(format!("number_margin={}", geometry.number_margin))
    }

    /// Number the pages of `pdf` in place.
    ///
    /// `pages` is the page count if already known; otherwise it is read
    /// from the PDF. Documents longer than the paginator limit are cut into
    /// sections, numbered one by one and joined back into `pdf`. Any failed
    /// section fails the whole job.
    pub async fn number(
        &self,
        pdf: &Path,
        pages: Option<usize>,
        options: &NumberingOptions,
    ) -> Result<Vec<Section>> {
        self.tools.config.validate()?;
        let ctx = self.tools.ctx;
        let pages = match pages {
            Some(pages) => pages,
            None => self.tools.count_pages(pdf).await?,
        };
        let limit = self.tools.config.max_pages_per_job;
        let plan = plan_sections(pages, limit, options.number_start);

        if let [only] = plan.as_slice() {
            self.tools.run(&self.number_command(pdf, options)).await?;
            return Ok(vec![*only]);
        }

        log::info!(
            "{ctx} numbering {pages} pages in {} sections of up to {limit}",
            plan.len()
        );

        let mut section_files = Vec::with_capacity(plan.len());
        for section in &plan {
            let section_pdf = section_path(pdf, section, pages);
            self.tools
                .extract_pages(pdf, &section.range(), &section_pdf)
                .await?;
            let section_options = NumberingOptions {
                number_start: section.number_start,
                ..*options
            };
            self.tools
                .run(&self.number_command(&section_pdf, &section_options))
                .await?;
            section_files.push(section_pdf);
        }

        let inputs: Vec<Option<&Path>> = section_files.iter().map(|p| Some(p.as_path())).collect();
        self.tools.concat(pdf, &inputs).await?;

        for file in &section_files {
            if let Err(e) = tokio::fs::remove_file(file).await {
                log::warn!("{ctx} could not remove section {}: {e}", file.display());
            }
        }

        Ok(plan)
    }
}

/// `book.pdf` -> `book-201-400.pdf`
fn section_path(pdf: &Path, section: &Section, pages: usize) -> PathBuf {
    let stem = pdf.file_stem().unwrap_or_default().to_string_lossy();
    pdf.with_file_name(format!(
        "{stem}-{}-{}.pdf",
        section.first,
        section.last_page(pages)
    ))
}
