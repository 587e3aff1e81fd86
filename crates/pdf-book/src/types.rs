use crate::constants::{mm_to_pt, pt_to_mm};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookError {
    #[error("page sized {width_mm:.2}mm x {height_mm:.2}mm won't fit on any paper")]
    NoFittingPaper { width_mm: f32, height_mm: f32 },
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("`{command}` exited with {status}: {stderr}")]
    ToolFailed {
        command: String,
        status: String,
        stderr: String,
    },
    #[error("unexpected output from `{command}`: {message}")]
    ToolOutput { command: String, message: String },
    #[error("{path}: page is {found:?}pt, expected {expected:?}pt")]
    MediaMismatch {
        path: PathBuf,
        expected: (f32, f32),
        found: (f32, f32),
    },
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, BookError>;

/// Physical page size in points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    pub fn new(width: f32, height: f32) -> Result<Self> {
        if !(width > 0.0 && height > 0.0) || !width.is_finite() || !height.is_finite() {
            return Err(BookError::Config(format!(
                "page size must be positive, got {width} x {height}"
            )));
        }
        Ok(Self { width, height })
    }

    pub fn from_mm(width_mm: f32, height_mm: f32) -> Result<Self> {
        Self::new(mm_to_pt(width_mm), mm_to_pt(height_mm))
    }

    pub fn dimensions_mm(self) -> (f32, f32) {
        (pt_to_mm(self.width), pt_to_mm(self.height))
    }

    pub fn shorter_side(self) -> f32 {
        self.width.min(self.height)
    }

    pub fn area(self) -> f32 {
        self.width * self.height
    }
}

/// Reading direction of the book text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

/// Languages written right to left
const RTL_LANGUAGES: &[&str] = &["ar", "dv", "fa", "he", "ku", "ps", "ur", "yi"];

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Ltr => "LTR",
            Direction::Rtl => "RTL",
        }
    }

    pub fn for_language(lang: &str) -> Self {
        let lang = lang.split(['-', '_']).next().unwrap_or(lang);
        if RTL_LANGUAGES.contains(&lang.to_ascii_lowercase().as_str()) {
            Direction::Rtl
        } else {
            Direction::Ltr
        }
    }

    /// Guess the direction from a book identifier such as `Manual_fa`,
    /// whose suffix after the last underscore names the language.
    pub fn guess(book: &str) -> Self {
        match book.rsplit_once('_') {
            Some((_, lang)) => Self::for_language(lang),
            None => Direction::Ltr,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Page number style understood by the paginator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberStyle {
    #[default]
    Latin,
    Roman,
    Arabic,
    Farsi,
    Devanagari,
    None,
}

impl NumberStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            NumberStyle::Latin => "latin",
            NumberStyle::Roman => "roman",
            NumberStyle::Arabic => "arabic",
            NumberStyle::Farsi => "farsi",
            NumberStyle::Devanagari => "devanagari",
            NumberStyle::None => "none",
        }
    }
}

/// Page corner for the ISBN barcode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
}

impl Corner {
    pub fn code(self) -> &'static str {
        match self {
            Corner::TopLeft => "tl",
            Corner::TopRight => "tr",
            Corner::BottomLeft => "bl",
            Corner::BottomRight => "br",
        }
    }
}

/// How a finished document is turned around
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RotateMode {
    /// Last page first
    #[default]
    ReverseOrder,
    /// Every page turned 180°, order kept
    UpsideDown,
}

impl RotateMode {
    /// Page range for the page-range extractor
    pub fn page_range(self) -> &'static str {
        match self {
            RotateMode::ReverseOrder => "end-1",
            RotateMode::UpsideDown => "1-endD",
        }
    }
}

/// One table-of-contents entry read from a PDF's bookmarks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    pub title: String,
    pub level: u32,
    pub page: u32,
}

/// Result of dumping and filtering a PDF outline
#[derive(Debug, Clone, PartialEq)]
pub struct Outline {
    /// Entries at or above the level threshold, in document order
    pub entries: Vec<OutlineEntry>,
    /// The dump text as produced by the collaborator
    pub raw: String,
    /// Total page count reported in the dump
    pub page_count: usize,
}
