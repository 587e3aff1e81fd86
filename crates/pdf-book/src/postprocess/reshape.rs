use super::{Postprocessor, script_bool};
use crate::command::{CommandRunner, ToolCommand};
use crate::types::*;
use std::path::Path;

/// How a rendered PDF is fitted to its final page box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReshapeOptions {
    /// Right-to-left books shift the gutter the other way
    pub direction: Direction,
    /// Centre the first page vertically
    pub centre_start: bool,
    /// Centre the last page vertically
    pub centre_end: bool,
    /// Pad to an even page count
    pub even_pages: bool,
}

impl Default for ReshapeOptions {
    fn default() -> Self {
        Self {
            direction: Direction::Ltr,
            centre_start: false,
            centre_end: false,
            even_pages: true,
        }
    }
}

impl<R: CommandRunner> Postprocessor<'_, R> {
    pub fn reshape_command(&self, pdf: &Path, options: &ReshapeOptions) -> ToolCommand {
        let geometry = self.geometry;

        let mut ops = String::from("resize");
        if geometry.gutter != 0.0 {
            ops.push_str(",shift");
        }
        if options.even_pages {
            ops.push_str(",even_pages");
        }

        let offset = match options.direction {
            Direction::Ltr => geometry.gutter,
            Direction::Rtl => -geometry.gutter,
        };

        ToolCommand::new(&self.tools.config.pdfedit)
            .arg("-s")
            .arg(&self.tools.config.pdfedit_script)
            .arg(format!("dir={}", options.direction))
            .arg(path_arg("filename", pdf))
            .arg(path_arg("output_filename", pdf))
            .arg(format!("operation={ops}"))
            .arg(format!("width={}", geometry.size.width))
            .arg(format!("height={}", geometry.size.height))
            .arg(format!("offset={offset}"))
            .arg(format!("centre_start={}", script_bool(options.centre_start)))
            .arg(format!("centre_end={}", script_bool(options.centre_end)))
    }

    /// Resize the pages of `pdf` to the page box and shift them by the
    /// gutter, in place. Run once, before numbering.
    pub async fn reshape(&self, pdf: &Path, options: &ReshapeOptions) -> Result<()> {
        self.tools.run(&self.reshape_command(pdf, options)).await?;
        Ok(())
    }
}

/// `key=path` argument for the pdfedit script
pub(super) fn path_arg(key: &str, path: &Path) -> std::ffi::OsString {
    let mut arg = std::ffi::OsString::from(format!("{key}="));
    arg.push(path);
    arg
}
