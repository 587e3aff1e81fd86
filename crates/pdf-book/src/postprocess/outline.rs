//! Reading a PDF's bookmarks back from a `dump_data` listing
//!
//! The listing is one `Key: value` per line. A few document fields come
//! first, including `NumberOfPages`, then one triple per bookmark:
//!
//! ```text
//! BookmarkTitle: 2. What is sound?
//! BookmarkLevel: 1
//! BookmarkPageNumber: 3
//! ```

use crate::command::{CommandRunner, ToolCommand, Toolchain};
use crate::types::*;
use std::iter::Peekable;
use std::path::Path;
use std::str::FromStr;

/// Split a dump line into key and value; `None` for lines with no colon
fn field(line: &str) -> Option<(&str, &str)> {
    line.split_once(':').map(|(k, v)| (k.trim(), v.trim()))
}

/// Take the next line if it holds `key`, parsing its value
fn take<'a, I, T>(lines: &mut Peekable<I>, key: &str) -> Option<T>
where
    I: Iterator<Item = &'a str>,
    T: FromStr,
{
    let line = lines.next_if(|line| field(line).is_some_and(|(k, _)| k == key))?;
    let (_, value) = field(line)?;
    match value.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("bad {key} value in outline dump: {line:?}");
            None
        }
    }
}

/// Parse a bookmark dump, keeping entries at `level_threshold` or shallower.
///
/// Returns the entries in document order and the page count. Broken
/// bookmark entries are logged and skipped; a dump with no page count is an
/// error.
pub fn parse_outline_dump(dump: &str, level_threshold: u32) -> Result<(Vec<OutlineEntry>, usize)> {
    let mut lines = dump
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .peekable();

    let mut page_count = None;
    for line in lines.by_ref() {
        match field(line) {
            Some(("NumberOfPages", value)) => match value.parse() {
                Ok(pages) => {
                    page_count = Some(pages);
                    break;
                }
                Err(_) => log::warn!("bad page count in outline dump: {line:?}"),
            },
            Some(_) => {}
            None => log::debug!("trouble with outline line {line:?}"),
        }
    }
    let page_count = page_count.ok_or_else(|| BookError::ToolOutput {
        command: "dump_data".to_string(),
        message: "no NumberOfPages field".to_string(),
    })?;

    let mut entries = Vec::new();
    while let Some(line) = lines.next() {
        let title = match field(line) {
            Some(("BookmarkTitle", title)) => title,
            Some(_) => continue,
            None => {
                log::debug!("trouble with outline line {line:?}");
                continue;
            }
        };
        let level: Option<u32> = take(&mut lines, "BookmarkLevel");
        let page: Option<u32> = take(&mut lines, "BookmarkPageNumber");
        match (level, page) {
            (Some(level), Some(page)) if level <= level_threshold => entries.push(OutlineEntry {
                title: title.to_string(),
                level,
                page,
            }),
            (Some(_), Some(_)) => {}
            _ => log::warn!("skipping incomplete bookmark {title:?}"),
        }
    }

    Ok((entries, page_count))
}

impl<R: CommandRunner> Toolchain<'_, R> {
    /// Dump the bookmarks of `pdf` and keep those at `level_threshold` or
    /// shallower
    pub async fn parse_outline(&self, pdf: &Path, level_threshold: u32) -> Result<Outline> {
        let cmd = ToolCommand::new(&self.config.pdftk).arg(pdf).arg("dump_data");
        let output = self.run(&cmd).await?;
        let (entries, page_count) =
            parse_outline_dump(&output.stdout, level_threshold).map_err(|e| match e {
                BookError::ToolOutput { message, .. } => BookError::ToolOutput {
                    command: cmd.to_string(),
                    message,
                },
                other => other,
            })?;
        log::debug!(
            "{} outline of {}: {} entries, {page_count} pages",
            self.ctx,
            pdf.display(),
            entries.len()
        );
        Ok(Outline {
            entries,
            raw: output.stdout,
            page_count,
        })
    }
}
