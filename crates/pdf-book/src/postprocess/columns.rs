use super::Postprocessor;
use crate::command::{CommandRunner, ToolCommand};
use crate::types::*;
use std::path::Path;

impl<R: CommandRunner> Postprocessor<'_, R> {
    pub fn impose_columns_command(&self, column_pdf: &Path, pdf: &Path) -> ToolCommand {
        let geometry = self.geometry;
        ToolCommand::new(&self.tools.config.pdfnup)
            .arg("--nup")
            .arg(format!("{}x1", geometry.columns.max(1)))
            .arg("--paper")
            .arg(geometry.paper.stock.imposer_name())
            .arg("--outfile")
            .arg(pdf)
            .args(["--offset", "0 0"])
            .args(["--noautoscale", "true"])
            .args(["--orient", "portrait"])
            .arg(column_pdf)
    }

    /// Tile the pages of a single-column render `columns` across onto the
    /// paper, writing `pdf`. The column pages must already have the exact
    /// column width; nothing is scaled.
    pub async fn impose_columns(&self, column_pdf: &Path, pdf: &Path) -> Result<()> {
        if self.tools.ctx.trace_geometry() {
            log::debug!(
                "{} imposing {} columns on {}",
                self.tools.ctx,
                self.geometry.columns,
                self.geometry.paper_name()
            );
        }
        self.tools
            .run(&self.impose_columns_command(column_pdf, pdf))
            .await?;
        Ok(())
    }
}
