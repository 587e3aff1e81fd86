mod logger;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand, ValueEnum};
use logger::CliLogger;
use pdf_book::{
    BookSize, Columns, Direction, Engine, JobContext, NumberingOptions, PageGeometry, PageOptions,
    Pipeline, Postprocessor, PostprocessStep, ProcessRunner, RenderOptions, Renderer,
    ReshapeOptions, ToolConfig, Toolchain,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pdfbook", about = "Print-ready PDF books from HTML", version)]
struct Cli {
    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Append log lines to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// JSON file with the locations of the external tools
    #[arg(long, global = true)]
    tools: Option<PathBuf>,

    /// Job id used to tag log lines
    #[arg(long, global = true, default_value = "pdfbook")]
    job_id: String,

    /// Log every derived geometry value
    #[arg(long, global = true)]
    trace_geometry: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the named book sizes, smallest first
    Sizes,

    /// Show the geometry derived for a page size
    Geometry {
        #[command(flatten)]
        page: PageArgs,

        /// Also print the page stylesheet
        #[arg(long)]
        css: bool,

        /// Unit for the pagination config
        #[arg(long, default_value = "in", value_enum)]
        unit: UnitArg,
    },

    /// Render HTML into a raw PDF
    Render {
        html: PathBuf,
        output: PathBuf,

        #[command(flatten)]
        page: PageArgs,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Fit pages to the page box and shift the gutter, in place
    Reshape {
        pdf: PathBuf,

        #[command(flatten)]
        page: PageArgs,

        /// Right-to-left text
        #[arg(long)]
        rtl: bool,

        #[arg(long)]
        centre_start: bool,

        #[arg(long)]
        centre_end: bool,

        /// Don't pad to an even page count
        #[arg(long)]
        odd_pages: bool,
    },

    /// Number pages in place
    Number {
        pdf: PathBuf,

        #[command(flatten)]
        page: PageArgs,

        #[arg(long, default_value = "latin", value_enum)]
        style: StyleArg,

        /// Number on the first page
        #[arg(long, default_value = "1")]
        start: u32,

        /// Page count, if known
        #[arg(long)]
        pages: Option<usize>,

        #[arg(long)]
        rtl: bool,
    },

    /// Tile a single-column PDF across full pages
    Columns {
        column_pdf: PathBuf,
        output: PathBuf,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Write a turned copy of a PDF
    Rotate {
        input: PathBuf,
        output: PathBuf,

        /// Turn every page 180 degrees instead of reversing the order
        #[arg(long)]
        upside_down: bool,
    },

    /// Make a blank page with an ISBN barcode
    Barcode {
        isbn: String,
        output: PathBuf,

        #[command(flatten)]
        page: PageArgs,

        #[arg(long, default_value = "bottom-right", value_enum)]
        corner: CornerArg,
    },

    /// Print a PDF's table of contents
    Outline {
        pdf: PathBuf,

        /// Deepest bookmark level to show
        #[arg(long, default_value = "1")]
        level: u32,
    },

    /// Print a PDF's page count
    Pages { pdf: PathBuf },

    /// Join PDFs in order
    Concat {
        output: PathBuf,

        #[arg(required = true, num_args = 1..)]
        inputs: Vec<PathBuf>,
    },

    /// Render and finish a whole book
    Book {
        html: PathBuf,
        output: PathBuf,

        #[command(flatten)]
        page: PageArgs,

        #[command(flatten)]
        render: RenderArgs,

        /// Book identifier; its language suffix picks the text direction
        #[arg(long)]
        book: Option<String>,

        #[arg(long, default_value = "latin", value_enum)]
        style: StyleArg,

        /// Append an ISBN barcode page
        #[arg(long)]
        isbn: Option<String>,

        /// Print the outline down to this level after numbering
        #[arg(long)]
        outline_level: Option<u32>,
    },
}

/// Page size and layout overrides shared by the geometry-aware commands
#[derive(Args)]
struct PageArgs {
    /// Named book size (see `pdfbook sizes`)
    #[arg(long, default_value = "A5")]
    size: String,

    /// Custom size in millimetres, e.g. 148x210
    #[arg(long)]
    custom_size: Option<String>,

    /// JSON page options; flags below override it
    #[arg(long)]
    options: Option<PathBuf>,

    /// Top margin in points
    #[arg(long)]
    top_margin: Option<f32>,

    /// Bottom margin in points
    #[arg(long)]
    bottom_margin: Option<f32>,

    /// Side margin in points
    #[arg(long)]
    side_margin: Option<f32>,

    /// Gutter in points
    #[arg(long)]
    gutter: Option<f32>,

    /// Column count or "auto"
    #[arg(long)]
    columns: Option<Columns>,

    /// Space between columns in points
    #[arg(long)]
    column_margin: Option<f32>,

    #[arg(long)]
    grey_scale: bool,

    /// webkit, gecko or bookjs
    #[arg(long)]
    engine: Option<Engine>,

    /// Printer settings name for the gecko engine
    #[arg(long)]
    printer_target: Option<String>,
}

#[derive(Args)]
struct RenderArgs {
    /// Extra stylesheet
    #[arg(long)]
    css: Option<PathBuf>,

    /// Build a PDF outline from the headings
    #[arg(long)]
    outline: bool,

    /// Cover page HTML
    #[arg(long)]
    cover: Option<PathBuf>,

    /// Unit for the bookjs pagination config
    #[arg(long, default_value = "in", value_enum)]
    unit: UnitArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum StyleArg {
    Latin,
    Roman,
    Arabic,
    Farsi,
    Devanagari,
    None,
}

#[derive(Clone, Copy, ValueEnum)]
enum CornerArg {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

#[derive(Clone, Copy, ValueEnum)]
enum UnitArg {
    In,
    Cm,
    Mm,
    Pt,
}

impl From<StyleArg> for pdf_book::NumberStyle {
    fn from(arg: StyleArg) -> Self {
        match arg {
            StyleArg::Latin => Self::Latin,
            StyleArg::Roman => Self::Roman,
            StyleArg::Arabic => Self::Arabic,
            StyleArg::Farsi => Self::Farsi,
            StyleArg::Devanagari => Self::Devanagari,
            StyleArg::None => Self::None,
        }
    }
}

impl From<CornerArg> for pdf_book::Corner {
    fn from(arg: CornerArg) -> Self {
        match arg {
            CornerArg::TopLeft => Self::TopLeft,
            CornerArg::TopRight => Self::TopRight,
            CornerArg::BottomLeft => Self::BottomLeft,
            CornerArg::BottomRight => Self::BottomRight,
        }
    }
}

impl From<UnitArg> for pdf_book::LengthUnit {
    fn from(arg: UnitArg) -> Self {
        match arg {
            UnitArg::In => Self::In,
            UnitArg::Cm => Self::Cm,
            UnitArg::Mm => Self::Mm,
            UnitArg::Pt => Self::Pt,
        }
    }
}

impl PageArgs {
    async fn geometry(&self) -> Result<PageGeometry> {
        let size = match &self.custom_size {
            Some(text) => pdf_book::parse_mm_size(text)?,
            None => BookSize::lookup(&self.size)
                .ok_or_else(|| anyhow!("unknown book size {:?}", self.size))?
                .page_size(None)?,
        };

        let mut options = match &self.options {
            Some(path) => PageOptions::load(path)
                .await
                .with_context(|| format!("reading {}", path.display()))?,
            None => PageOptions::default(),
        };
        options.top_margin = self.top_margin.or(options.top_margin);
        options.bottom_margin = self.bottom_margin.or(options.bottom_margin);
        options.side_margin = self.side_margin.or(options.side_margin);
        options.gutter = self.gutter.or(options.gutter);
        options.column_margin = self.column_margin.or(options.column_margin);
        if let Some(columns) = self.columns {
            options.columns = columns;
        }
        if let Some(engine) = self.engine {
            options.engine = engine;
        }
        if self.printer_target.is_some() {
            options.printer_target = self.printer_target.clone();
        }
        options.grey_scale |= self.grey_scale;

        Ok(PageGeometry::new(size, &options)?)
    }
}

impl RenderArgs {
    async fn options(&self) -> Result<RenderOptions> {
        let custom_css = match &self.css {
            Some(path) => Some(
                tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("reading {}", path.display()))?,
            ),
            None => None,
        };
        Ok(RenderOptions {
            custom_css,
            outline: self.outline,
            cover: self.cover.clone(),
            length_unit: self.unit.into(),
        })
    }
}

fn direction(rtl: bool) -> Direction {
    if rtl { Direction::Rtl } else { Direction::Ltr }
}

/// `book.pdf` -> `book-<suffix>.pdf`
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    path.with_file_name(format!("{stem}-{suffix}.pdf"))
}

fn print_outline(outline: &pdf_book::Outline) {
    println!("{} pages", outline.page_count);
    for entry in &outline.entries {
        let indent = "  ".repeat(entry.level.saturating_sub(1) as usize);
        println!("{indent}{} .... {}", entry.title, entry.page);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = logger::level_for(cli.verbose);
    let cli_logger = match &cli.log_file {
        Some(path) => CliLogger::file(path, level, logger::LOG_ROTATE_SIZE),
        None => CliLogger::stderr(level),
    };
    cli_logger.init()?;

    let config = match &cli.tools {
        Some(path) => ToolConfig::load(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?,
        None => ToolConfig::default(),
    };
    let ctx = JobContext::new(cli.job_id.as_str()).with_geometry_trace(cli.trace_geometry);
    let runner = ProcessRunner;
    let tools = Toolchain::new(&config, &runner, &ctx);

    match cli.command {
        Commands::Sizes => {
            for size in pdf_book::size_list() {
                println!("{}", size.label());
            }
        }

        Commands::Geometry { page, css, unit } => {
            let g = page.geometry().await?;
            let layout = g.column_layout();
            println!(
                "Page: {}pt x {}pt on {}",
                g.size.width,
                g.size.height,
                g.paper_name()
            );
            println!("  Top margin: {}", g.top_margin);
            println!("  Bottom margin: {}", g.bottom_margin);
            println!("  Side margin: {}", g.side_margin);
            println!("  Gutter: {}", g.gutter);
            println!("  Columns: {} ({}pt apart)", g.columns, g.column_margin);
            if g.columns > 1 {
                println!("  Column width: {}", layout.column_width);
            }
            println!(
                "  Page number: {} from bottom, {} from side",
                g.number_bottom, g.number_margin
            );
            println!("  Browser margins (mm): {:?}", g.browser_margins.as_array());
            println!("  Pagination: {}", g.pagination_config(unit.into()));
            if css {
                println!("{}", g.page_stylesheet());
            }
        }

        Commands::Render {
            html,
            output,
            page,
            render,
        } => {
            let geometry = page.geometry().await?;
            let options = render.options().await?;
            Renderer::new(&geometry, tools)
                .render(&html, &output, &options)
                .await?;
            println!("Rendered → {}", output.display());
        }

        Commands::Reshape {
            pdf,
            page,
            rtl,
            centre_start,
            centre_end,
            odd_pages,
        } => {
            let geometry = page.geometry().await?;
            let options = ReshapeOptions {
                direction: direction(rtl),
                centre_start,
                centre_end,
                even_pages: !odd_pages,
            };
            Postprocessor::new(&geometry, tools)
                .reshape(&pdf, &options)
                .await?;
        }

        Commands::Number {
            pdf,
            page,
            style,
            start,
            pages,
            rtl,
        } => {
            let geometry = page.geometry().await?;
            let options = NumberingOptions {
                style: style.into(),
                direction: direction(rtl),
                number_start: start,
            };
            let sections = Postprocessor::new(&geometry, tools)
                .number(&pdf, pages, &options)
                .await?;
            for section in sections {
                println!("  pages {} from {}", section.range(), section.number_start);
            }
        }

        Commands::Columns {
            column_pdf,
            output,
            page,
        } => {
            let geometry = page.geometry().await?;
            Postprocessor::new(&geometry, tools)
                .impose_columns(&column_pdf, &output)
                .await?;
            println!("Imposed {} columns → {}", geometry.columns, output.display());
        }

        Commands::Rotate {
            input,
            output,
            upside_down,
        } => {
            let mode = if upside_down {
                pdf_book::RotateMode::UpsideDown
            } else {
                pdf_book::RotateMode::ReverseOrder
            };
            tools.rotate(&input, &output, mode).await?;
        }

        Commands::Barcode {
            isbn,
            output,
            page,
            corner,
        } => {
            let geometry = page.geometry().await?;
            Postprocessor::new(&geometry, tools)
                .make_barcode_pdf(&isbn, &output, corner.into())
                .await?;
            println!("Barcode → {}", output.display());
        }

        Commands::Outline { pdf, level } => {
            let outline = tools.parse_outline(&pdf, level).await?;
            print_outline(&outline);
        }

        Commands::Pages { pdf } => {
            println!("{}", tools.count_pages(&pdf).await?);
        }

        Commands::Concat { output, inputs } => {
            let parts: Vec<Option<&Path>> = inputs.iter().map(|p| Some(p.as_path())).collect();
            tools.concat(&output, &parts).await?;
        }

        Commands::Book {
            html,
            output,
            page,
            render,
            book,
            style,
            isbn,
            outline_level,
        } => {
            let geometry = page.geometry().await?;
            let options = render.options().await?;
            let dir = book.as_deref().map(Direction::guess).unwrap_or_default();
            log::info!("{ctx} text direction {dir}");

            let raw = sibling(&output, "raw");
            Renderer::new(&geometry, tools)
                .render(&html, &raw, &options)
                .await?;

            let mut steps = vec![
                PostprocessStep::Reshape(ReshapeOptions {
                    direction: dir,
                    centre_end: true,
                    ..Default::default()
                }),
                PostprocessStep::Number {
                    pages: None,
                    options: NumberingOptions {
                        style: style.into(),
                        direction: dir,
                        number_start: 1,
                    },
                },
            ];
            if let Some(level_threshold) = outline_level {
                steps.push(PostprocessStep::ExtractOutline { level_threshold });
            }
            if let Some(isbn) = isbn {
                steps.push(PostprocessStep::Barcode {
                    isbn,
                    output: sibling(&output, "barcode"),
                    corner: pdf_book::Corner::default(),
                });
            }

            let mut pipeline = Pipeline::new(Postprocessor::new(&geometry, tools), &raw);
            pipeline.run(&steps).await?;
            let state = pipeline.into_state();

            match &state.barcode {
                Some(barcode) => {
                    tools
                        .concat(&output, &[Some(state.working.as_path()), Some(barcode.as_path())])
                        .await?;
                }
                None => tokio::fs::rename(&state.working, &output).await?,
            }
            if let Some(outline) = &state.outline {
                print_outline(outline);
            }
            println!("Book → {}", output.display());
        }
    }

    Ok(())
}
