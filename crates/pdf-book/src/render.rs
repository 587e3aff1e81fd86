//! HTML to PDF rendering
//!
//! Each [`Engine`] builds its own command line from the page geometry.
//! Multi-column books are rendered one column wide onto a narrow page and
//! then tiled across the real page, since none of the engines can lay out
//! several columns per physical page.

use crate::command::{CommandRunner, ToolCommand, Toolchain};
use crate::geometry::{LengthUnit, PageGeometry};
use crate::postprocess::{Postprocessor, ReshapeOptions};
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tempfile::NamedTempFile;

/// Rendering backends. Their command syntaxes have nothing in common.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// wkhtmltopdf: paper name plus browser margins
    #[default]
    Webkit,
    /// Firefox printing through a preconfigured printer
    Gecko,
    /// BookJs renderer: structured pagination config plus page stylesheet
    BookJs,
}

impl FromStr for Engine {
    type Err = BookError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "webkit" => Ok(Engine::Webkit),
            "gecko" => Ok(Engine::Gecko),
            "bookjs" => Ok(Engine::BookJs),
            other => Err(BookError::Config(format!("unknown engine {other:?}"))),
        }
    }
}

/// Caller choices for one render
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderOptions {
    /// Extra CSS applied on top of the book's own styles
    pub custom_css: Option<String>,
    /// Ask the engine to build a PDF outline from the headings
    pub outline: bool,
    /// Cover page rendered before the contents
    pub cover: Option<PathBuf>,
    /// Unit for the BookJs pagination config
    pub length_unit: LengthUnit,
}

/// One HTML document to turn into one raw PDF
#[derive(Debug, Clone, PartialEq)]
pub struct RenderJob {
    pub html: PathBuf,
    pub output: PathBuf,
    pub options: RenderOptions,
}

impl Engine {
    /// Stylesheet text the engine should be given, if any
    pub fn stylesheet(self, geometry: &PageGeometry, options: &RenderOptions) -> Option<String> {
        match self {
            Engine::Webkit => options.custom_css.clone(),
            Engine::Gecko => None,
            Engine::BookJs => {
                let mut css = geometry.page_stylesheet();
                if let Some(custom) = &options.custom_css {
                    css.push('\n');
                    css.push_str(custom);
                }
                Some(css)
            }
        }
    }

    /// Build the render command. `stylesheet` is the file holding
    /// [`Engine::stylesheet`] when that returned some text.
    pub fn command<R>(
        self,
        tools: &Toolchain<'_, R>,
        geometry: &PageGeometry,
        html: &Path,
        pdf: &Path,
        options: &RenderOptions,
        stylesheet: Option<&Path>,
    ) -> ToolCommand {
        match self {
            Engine::Webkit => {
                let [top, right, bottom, left] =
                    geometry.browser_margins.as_array().map(|m| m.to_string());
                let mut cmd = ToolCommand::new(&tools.config.wkhtmltopdf)
                    .args(["-q", "-s", geometry.paper_name()])
                    .args(["-T", top.as_str(), "-R", right.as_str()])
                    .args(["-B", bottom.as_str(), "-L", left.as_str()])
                    .args(["-d", "100"]);
                if options.outline {
                    cmd = cmd.arg("--outline");
                }
                if geometry.grey_scale {
                    cmd = cmd.arg("-g");
                }
                if let Some(css) = stylesheet {
                    cmd = cmd.arg("--user-style-sheet").arg(css);
                }
                cmd = cmd.args(&tools.config.wkhtmltopdf_extra_args);
                if let Some(cover) = &options.cover {
                    cmd = cmd.arg("cover").arg(cover);
                }
                cmd.arg(html).arg(pdf)
            }
            Engine::Gecko => ToolCommand::new(&tools.config.firefox)
                .args(["-P", "pdfprint", "-print"])
                .arg(html)
                .args(["-printprinter", geometry.printer_target.as_str()]),
            Engine::BookJs => {
                let config = geometry.pagination_config(options.length_unit);
                let mut cmd = ToolCommand::new(&tools.config.renderer)
                    .args(["-platform", "xcb", "-output"])
                    .arg(pdf)
                    .arg("-page-config")
                    .arg(config.to_string());
                if let Some(css) = stylesheet {
                    cmd = cmd.arg("-custom-css").arg(css);
                }
                cmd.arg(html)
            }
        }
    }
}

/// Renders HTML documents at one page geometry
pub struct Renderer<'a, R> {
    geometry: &'a PageGeometry,
    tools: Toolchain<'a, R>,
}

impl<'a, R: CommandRunner> Renderer<'a, R> {
    pub fn new(geometry: &'a PageGeometry, tools: Toolchain<'a, R>) -> Self {
        Self { geometry, tools }
    }

    pub async fn render_job(&self, job: &RenderJob) -> Result<()> {
        self.render(&job.html, &job.output, &job.options).await
    }

    /// Render `html` into `pdf`
    pub async fn render(&self, html: &Path, pdf: &Path, options: &RenderOptions) -> Result<()> {
        self.geometry.trace(self.tools.ctx);
        if self.geometry.columns <= 1 {
            self.render_single(html, pdf, options).await
        } else {
            self.render_columns(html, pdf, options).await
        }
    }

    async fn render_single(&self, html: &Path, pdf: &Path, options: &RenderOptions) -> Result<()> {
        let ctx = self.tools.ctx;
        let engine = self.geometry.engine;

        if engine == Engine::Gecko && (options.custom_css.is_some() || options.cover.is_some()) {
            log::warn!("{ctx} the gecko engine ignores custom CSS and cover pages");
        }

        // Removed on drop, whichever way the render ends
        let stylesheet = engine
            .stylesheet(self.geometry, options)
            .map(|css| write_stylesheet(&css))
            .transpose()?;

        let cmd = engine.command(
            &self.tools,
            self.geometry,
            html,
            pdf,
            options,
            stylesheet.as_ref().map(NamedTempFile::path),
        );
        let result = self.tools.run(&cmd).await.map(|_| ());

        if let Some(file) = stylesheet {
            let path = file.path().to_owned();
            if let Err(e) = file.close() {
                log::warn!("{ctx} could not remove stylesheet {}: {e}", path.display());
            }
        }
        result
    }

    async fn render_columns(&self, html: &Path, pdf: &Path, options: &RenderOptions) -> Result<()> {
        let ctx = self.tools.ctx;
        let layout = self.geometry.column_layout();
        if ctx.trace_geometry() {
            log::debug!("{ctx} making {} columns with {:?}", self.geometry.columns, layout);
        }

        let column_geometry = self.geometry.column_geometry()?;
        let column_pdf = single_column_path(pdf);

        let column_renderer = Renderer::new(&column_geometry, self.tools);
        Box::pin(column_renderer.render(html, &column_pdf, options)).await?;

        Postprocessor::new(&column_geometry, self.tools)
            .reshape(&column_pdf, &ReshapeOptions::default())
            .await?;
        Postprocessor::new(self.geometry, self.tools)
            .impose_columns(&column_pdf, pdf)
            .await
    }
}

/// `book.pdf` -> `book-single-column.pdf`
pub fn single_column_path(pdf: &Path) -> PathBuf {
    let stem = pdf.file_stem().unwrap_or_default().to_string_lossy();
    pdf.with_file_name(format!("{stem}-single-column.pdf"))
}

fn write_stylesheet(css: &str) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("renderer-")
        .suffix(".css")
        .tempfile()?;
    file.write_all(css.as_bytes())?;
    file.flush()?;
    Ok(file)
}
