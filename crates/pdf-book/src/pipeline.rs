//! Ordered postprocessing with a record of what has been done
//!
//! Each step reads the current working PDF and either rewrites it in place
//! or moves the working path on to a new file. [`PipelineState`] remembers
//! which steps ran so a bad sequence is refused before any tool is spawned.

use crate::command::CommandRunner;
use crate::postprocess::{NumberingOptions, Postprocessor, ReshapeOptions, Section};
use crate::types::*;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub enum PostprocessStep {
    /// Fit pages to the page box and shift the gutter, in place
    Reshape(ReshapeOptions),
    /// Number pages in place; `pages` skips counting when already known
    Number {
        pages: Option<usize>,
        options: NumberingOptions,
    },
    /// Tile the working single-column PDF onto full pages in `output`
    ImposeColumns { output: PathBuf },
    /// Write a turned copy of the working PDF to `output`
    Rotate { output: PathBuf, mode: RotateMode },
    /// Write a barcode page to `output`; the working PDF is untouched
    Barcode {
        isbn: String,
        output: PathBuf,
        corner: Corner,
    },
    /// Read the working PDF's bookmarks
    ExtractOutline { level_threshold: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    Reshape,
    Number,
    ImposeColumns,
    Rotate,
    Barcode,
    ExtractOutline,
}

impl StepKind {
    /// Steps that make no sense twice on the same document
    pub fn is_one_shot(self) -> bool {
        matches!(
            self,
            StepKind::Reshape | StepKind::Number | StepKind::ImposeColumns | StepKind::Barcode
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StepKind::Reshape => "reshape",
            StepKind::Number => "number",
            StepKind::ImposeColumns => "impose-columns",
            StepKind::Rotate => "rotate",
            StepKind::Barcode => "barcode",
            StepKind::ExtractOutline => "outline",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PostprocessStep {
    pub fn kind(&self) -> StepKind {
        match self {
            PostprocessStep::Reshape(_) => StepKind::Reshape,
            PostprocessStep::Number { .. } => StepKind::Number,
            PostprocessStep::ImposeColumns { .. } => StepKind::ImposeColumns,
            PostprocessStep::Rotate { .. } => StepKind::Rotate,
            PostprocessStep::Barcode { .. } => StepKind::Barcode,
            PostprocessStep::ExtractOutline { .. } => StepKind::ExtractOutline,
        }
    }
}

/// What the pipeline has done so far
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineState {
    /// The PDF the next step works on
    pub working: PathBuf,
    /// Steps applied, in order
    pub applied: Vec<StepKind>,
    /// Barcode page, once made
    pub barcode: Option<PathBuf>,
    pub outline: Option<Outline>,
    /// How the last numbering run was split
    pub sections: Vec<Section>,
}

impl PipelineState {
    pub fn new(working: impl Into<PathBuf>) -> Self {
        Self {
            working: working.into(),
            applied: Vec::new(),
            barcode: None,
            outline: None,
            sections: Vec::new(),
        }
    }

    pub fn has_applied(&self, kind: StepKind) -> bool {
        self.applied.contains(&kind)
    }
}

pub struct Pipeline<'a, R> {
    post: Postprocessor<'a, R>,
    state: PipelineState,
}

impl<'a, R: CommandRunner> Pipeline<'a, R> {
    pub fn new(post: Postprocessor<'a, R>, pdf: impl Into<PathBuf>) -> Self {
        Self {
            post,
            state: PipelineState::new(pdf),
        }
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    pub fn into_state(self) -> PipelineState {
        self.state
    }

    pub fn working(&self) -> &Path {
        &self.state.working
    }

    /// Refuse a step that cannot follow what has already been applied
    pub fn check(&self, step: &PostprocessStep) -> Result<()> {
        let kind = step.kind();
        if kind.is_one_shot() && self.state.has_applied(kind) {
            return Err(BookError::Config(format!("{kind} has already been applied")));
        }
        if matches!(kind, StepKind::Reshape | StepKind::ImposeColumns)
            && self.state.has_applied(StepKind::Number)
        {
            return Err(BookError::Config(format!(
                "{kind} would move page numbers that are already placed"
            )));
        }
        Ok(())
    }

    /// Apply one step to the working PDF
    pub async fn apply(&mut self, step: &PostprocessStep) -> Result<()> {
        self.check(step)?;
        let ctx = self.post.tools().ctx;
        let kind = step.kind();
        log::info!("{ctx} {kind} on {}", self.state.working.display());

        match step {
            PostprocessStep::Reshape(options) => {
                self.post.reshape(&self.state.working, options).await?;
            }
            PostprocessStep::Number { pages, options } => {
                self.state.sections = self
                    .post
                    .number(&self.state.working, *pages, options)
                    .await?;
            }
            PostprocessStep::ImposeColumns { output } => {
                self.post
                    .impose_columns(&self.state.working, output)
                    .await?;
                self.state.working = output.clone();
            }
            PostprocessStep::Rotate { output, mode } => {
                self.post
                    .tools()
                    .rotate(&self.state.working, output, *mode)
                    .await?;
                self.state.working = output.clone();
            }
            PostprocessStep::Barcode {
                isbn,
                output,
                corner,
            } => {
                self.post.make_barcode_pdf(isbn, output, *corner).await?;
                self.state.barcode = Some(output.clone());
            }
            PostprocessStep::ExtractOutline { level_threshold } => {
                let outline = self
                    .post
                    .tools()
                    .parse_outline(&self.state.working, *level_threshold)
                    .await?;
                self.state.outline = Some(outline);
            }
        }

        self.state.applied.push(kind);
        Ok(())
    }

    /// Apply `steps` in order, stopping at the first failure
    pub async fn run(&mut self, steps: &[PostprocessStep]) -> Result<()> {
        for step in steps {
            self.apply(step).await?;
        }
        Ok(())
    }
}
