mod common;

use common::a5_geometry;
use pdf_book::constants::*;
use pdf_book::*;

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

#[test]
fn test_defaults_follow_page_size() {
    let g = a5_geometry(&PageOptions::default());
    let margin = BASE_MARGIN + PROPORTIONAL_MARGIN * 419.53;
    let gutter = BASE_GUTTER + PROPORTIONAL_GUTTER * 419.53;

    assert!(close(g.top_margin, margin));
    assert!(close(g.bottom_margin, margin));
    assert!(close(g.side_margin, margin));
    assert!(close(g.gutter, gutter));
    assert_eq!(g.columns, 1);
    assert!(close(g.column_margin, 2.0 * margin / 6.0));
    assert_eq!(g.paper_name(), "A5");
    assert_eq!(g.engine, Engine::Webkit);
    assert_eq!(g.printer_target, "pdfbook_A5");
}

#[test]
fn test_overrides_replace_defaults() {
    let options = PageOptions {
        top_margin: Some(50.0),
        side_margin: Some(30.0),
        gutter: Some(0.0),
        grey_scale: true,
        ..Default::default()
    };
    let g = a5_geometry(&options);
    assert_eq!(g.top_margin, 50.0);
    assert_eq!(g.side_margin, 30.0);
    assert_eq!(g.gutter, 0.0);
    assert!(g.grey_scale);
    // Bottom margin still defaults
    assert!(close(g.bottom_margin, BASE_MARGIN + PROPORTIONAL_MARGIN * 419.53));
}

#[test]
fn test_browser_margins_include_clip_and_number_band() {
    let size = PageSize::new(400.0, 580.0).unwrap();
    let options = PageOptions {
        top_margin: Some(40.0),
        bottom_margin: Some(40.0),
        side_margin: Some(30.0),
        gutter: Some(20.0),
        ..Default::default()
    };
    let g = PageGeometry::new(size, &options).unwrap();
    let clip_x = (419.53 - 400.0) / 2.0;
    let clip_y = (595.28 - 580.0) / 2.0;

    let m = g.browser_margins;
    assert!(close(m.top, pt_to_mm(40.0 + clip_y)));
    assert!(close(m.bottom, pt_to_mm(40.0 + clip_y + 0.5 * PAGE_NUMBER_SIZE)));
    assert!(close(m.outer, pt_to_mm(30.0 + clip_x + 10.0)));
    assert_eq!(m.outer, m.inner);
    assert_eq!(m.as_array(), [m.top, m.outer, m.bottom, m.inner]);
}

#[test]
fn test_auto_columns_on_wide_page() {
    let options = PageOptions {
        columns: Columns::Auto,
        ..Default::default()
    };
    let a3 = PageSize::new(841.89, 1190.55).unwrap();
    let g = PageGeometry::new(a3, &options).unwrap();
    assert_eq!(g.columns, (841.89 / MIN_COLUMN_WIDTH).floor() as u32);
    assert_eq!(g.columns, 2);

    let a5 = a5_geometry(&options);
    assert_eq!(a5.columns, 1);
}

#[test]
fn test_columns_fill_printable_width() {
    let a3 = PageSize::new(841.89, 1190.55).unwrap();
    for columns in 1..=4 {
        let options = PageOptions {
            columns: Columns::Fixed(columns),
            ..Default::default()
        };
        let g = PageGeometry::new(a3, &options).unwrap();
        let layout = g.column_layout();
        let total = columns as f32 * layout.column_width
            + (columns as f32 - 1.0) * g.column_margin;
        assert!(close(total, layout.printable_width), "{columns} columns");
        assert!(close(layout.page_width, layout.column_width + g.column_margin));
    }
}

#[test]
fn test_column_geometry_is_one_narrow_column() {
    let a3 = PageSize::new(841.89, 1190.55).unwrap();
    let options = PageOptions {
        columns: Columns::Fixed(3),
        ..Default::default()
    };
    let g = PageGeometry::new(a3, &options).unwrap();
    let layout = g.column_layout();
    let column = g.column_geometry().unwrap();

    assert_eq!(column.columns, 1);
    assert_eq!(column.gutter, 0.0);
    assert!(close(column.size.width, layout.page_width));
    assert_eq!(column.size.height, g.size.height);
    assert!(close(column.side_margin, g.column_margin / 2.0));
    assert_eq!(column.top_margin, g.top_margin);
}

#[test]
fn test_margins_leaving_no_content_are_rejected() {
    let tall = PageOptions {
        top_margin: Some(300.0),
        bottom_margin: Some(300.0),
        ..Default::default()
    };
    let size = BookSize::lookup("A5").unwrap().page_size(None).unwrap();
    assert!(matches!(
        PageGeometry::new(size, &tall),
        Err(BookError::Config(_))
    ));

    let wide = PageOptions {
        side_margin: Some(200.0),
        ..Default::default()
    };
    assert!(matches!(
        PageGeometry::new(size, &wide),
        Err(BookError::Config(_))
    ));

    let crowded = PageOptions {
        columns: Columns::Fixed(6),
        column_margin: Some(80.0),
        ..Default::default()
    };
    assert!(matches!(
        PageGeometry::new(size, &crowded),
        Err(BookError::Config(_))
    ));
}

#[test]
fn test_negative_override_is_rejected() {
    let options = PageOptions {
        gutter: Some(-1.0),
        ..Default::default()
    };
    let size = BookSize::lookup("A5").unwrap().page_size(None).unwrap();
    assert!(PageGeometry::new(size, &options).is_err());
}

#[test]
fn test_page_too_big_for_any_paper() {
    let size = PageSize::new(4000.0, 4000.0).unwrap();
    assert!(matches!(
        PageGeometry::new(size, &PageOptions::default()),
        Err(BookError::NoFittingPaper { .. })
    ));
}

#[test]
fn test_pagination_config_in_inches() {
    let options = PageOptions {
        top_margin: Some(54.0),
        bottom_margin: Some(54.0),
        side_margin: Some(27.0),
        gutter: Some(13.5),
        ..Default::default()
    };
    let size = PageSize::new(432.0, 540.0).unwrap();
    let g = PageGeometry::new(size, &options).unwrap();
    let config = g.pagination_config(LengthUnit::In);

    assert!(close(config.page_width, 8.0));
    assert!(close(config.page_height, 10.0));
    assert!(close(config.outer_margin, 0.5));
    assert!(close(config.inner_margin, 0.25));
    assert!(close(config.contents_top_margin, 1.0));

    let text = config.to_string();
    assert!(text.starts_with("lengthUnit:'in',pageWidth:8"));
    assert!(text.contains("contentsBottomMargin:1"));
}

#[test]
fn test_page_stylesheet_mirrors_margins() {
    let options = PageOptions {
        side_margin: Some(30.0),
        gutter: Some(20.0),
        ..Default::default()
    };
    let g = a5_geometry(&options);
    let margins = g.mirrored_margins();
    assert_eq!(margins.odd.left, 20.0);
    assert_eq!(margins.odd.right, 30.0);
    assert_eq!(margins.even.left, 30.0);
    assert_eq!(margins.even.right, 20.0);

    let css = g.page_stylesheet();
    assert!(css.contains(".page:nth-child(odd)"));
    assert!(css.contains(".page:nth-child(even)"));
    assert!(css.contains(&format!("width:  {:.6}pt", g.size.width)));
    assert!(css.contains(&format!(
        "max-width:  {:.6}pt",
        g.contents_width() * IMAGE_MAX_WIDTH_RATIO
    )));
    assert!(close(
        g.contents_height(),
        g.size.height - g.top_margin - g.bottom_margin - HEADER_HEIGHT - FOOTER_HEIGHT
    ));
}

#[test]
fn test_page_stylesheet_has_every_block_in_order() {
    let g = a5_geometry(&PageOptions::default());
    let css = g.page_stylesheet();
    let blocks = [
        ".page {",
        ".contents {",
        ".pagenumber {",
        ".header {",
        ".page:nth-child(odd)",
        ".page:nth-child(even)",
        "img {",
    ];
    let positions: Vec<usize> = blocks
        .iter()
        .map(|b| css.find(b).unwrap_or_else(|| panic!("missing {b}")))
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert!(css.contains(&format!("bottom: {:.6}pt;  /* bottom-margin */", g.bottom_margin)));
    assert_eq!(css.matches('{').count(), css.matches('}').count());
}

#[test]
fn test_size_list_sorted_by_area() {
    let sizes = size_list();
    assert_eq!(sizes[0].name, "custom");
    let areas: Vec<f32> = sizes[1..]
        .iter()
        .map(|s| s.size.unwrap().area())
        .collect();
    assert!(areas.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(BookSize::lookup("a5").unwrap().label(), "A5 (148mm x 210mm)");
}

#[test]
fn test_custom_size_needs_dimensions() {
    let custom = BookSize::lookup("custom").unwrap();
    assert!(custom.page_size(None).is_err());
    let size = custom.page_size(Some((100.0, 150.0))).unwrap();
    assert!(close(size.width, mm_to_pt(100.0)));
    assert!(close(parse_mm_size("100x150").unwrap().height, size.height));
}
