pub mod command;
pub mod constants;
pub mod geometry;
pub mod inspect;
mod job;
mod options;
mod paper;
pub mod pipeline;
pub mod postprocess;
pub mod render;
mod sizes;
mod types;

pub use command::{CommandOutput, CommandRunner, ProcessRunner, ToolCommand, Toolchain};
pub use geometry::{BrowserMargins, ColumnLayout, LengthUnit, PageGeometry, PaginationConfig};
pub use inspect::{load_pdf, page_size, page_sizes};
pub use job::JobContext;
pub use options::*;
pub use paper::*;
pub use pipeline::{Pipeline, PipelineState, PostprocessStep, StepKind};
pub use postprocess::{
    NumberingOptions, Postprocessor, ReshapeOptions, Section, is_isbn, parse_outline_dump,
    parse_page_count, plan_sections,
};
pub use render::{Engine, RenderJob, RenderOptions, Renderer, single_column_path};
pub use sizes::*;
pub use types::*;
