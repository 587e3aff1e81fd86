mod common;

use common::*;
use pdf_book::*;
use std::path::Path;

const DUMP: &str = "InfoBegin
InfoKey: Producer
InfoValue: wkhtmltopdf
PdfID0: 5e3b3c7f1a
PdfID1: 5e3b3c7f1a
NumberOfPages: 42
BookmarkBegin
BookmarkTitle: 1. Introduction
BookmarkLevel: 1
BookmarkPageNumber: 3
BookmarkBegin
BookmarkTitle: 1.1 Background
BookmarkLevel: 2
BookmarkPageNumber: 4
BookmarkBegin
BookmarkTitle: 2. What is sound?
BookmarkLevel: 1
BookmarkPageNumber: 9
";

#[tokio::test]
async fn test_parse_outline_filters_by_level() {
    let config = ToolConfig::default();
    let runner = FakeRunner::with_handler(|_| CommandOutput::ok(DUMP));
    let ctx = JobContext::new("outline");
    let tools = Toolchain::new(&config, &runner, &ctx);

    let outline = tools.parse_outline(Path::new("book.pdf"), 1).await.unwrap();

    assert_eq!(runner.calls(), ["pdftk book.pdf dump_data"]);
    assert_eq!(outline.page_count, 42);
    assert_eq!(outline.raw, DUMP);
    assert_eq!(
        outline.entries,
        [
            OutlineEntry {
                title: "1. Introduction".to_string(),
                level: 1,
                page: 3
            },
            OutlineEntry {
                title: "2. What is sound?".to_string(),
                level: 1,
                page: 9
            },
        ]
    );
}

#[tokio::test]
async fn test_outline_without_page_count() {
    let config = ToolConfig::default();
    let runner = FakeRunner::with_handler(|_| CommandOutput::ok("InfoKey: Producer\n"));
    let ctx = JobContext::default();
    let tools = Toolchain::new(&config, &runner, &ctx);

    match tools.parse_outline(Path::new("book.pdf"), 1).await {
        Err(BookError::ToolOutput { command, .. }) => {
            assert_eq!(command, "pdftk book.pdf dump_data");
        }
        other => panic!("Expected ToolOutput, got {:?}", other),
    }
}

#[test]
fn test_truncated_bookmark_is_skipped() {
    let dump = "NumberOfPages: 5\nBookmarkTitle: Lost\nBookmarkLevel: 1\n\
                BookmarkTitle: Kept\nBookmarkLevel: 1\nBookmarkPageNumber: 2\n";
    let (entries, pages) = parse_outline_dump(dump, 2).unwrap();
    assert_eq!(pages, 5);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].title, "Kept");
}
