//! Named book trim sizes offered to users

use crate::constants::pt_to_mm;
use crate::types::*;

/// A named trim size. `size` is `None` for the custom entry, whose
/// dimensions come from the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BookSize {
    pub name: &'static str,
    pub size: Option<PageSize>,
}

const fn inches(width: f32, height: f32) -> Option<PageSize> {
    Some(PageSize {
        width: width * 72.0,
        height: height * 72.0,
    })
}

pub const BOOK_SIZES: &[BookSize] = &[
    BookSize {
        name: "custom",
        size: None,
    },
    BookSize {
        name: "A5",
        size: Some(PageSize {
            width: 419.53,
            height: 595.28,
        }),
    },
    BookSize {
        name: "A4",
        size: Some(PageSize {
            width: 595.28,
            height: 841.89,
        }),
    },
    BookSize {
        name: "POCKET",
        size: inches(4.25, 6.875),
    },
    BookSize {
        name: "USTRADE",
        size: inches(6.0, 9.0),
    },
    BookSize {
        name: "ROYAL",
        size: inches(6.139, 9.21),
    },
    BookSize {
        name: "COMICBOOK",
        size: inches(6.625, 10.25),
    },
    BookSize {
        name: "CROWNQUARTO",
        size: inches(7.444, 9.681),
    },
    BookSize {
        name: "SQUARE7.5",
        size: inches(7.5, 7.5),
    },
    BookSize {
        name: "SQUARE8.5",
        size: inches(8.5, 8.5),
    },
    BookSize {
        name: "LANDSCAPE9x7",
        size: inches(9.0, 7.0),
    },
    BookSize {
        name: "USLETTER",
        size: inches(8.5, 11.0),
    },
];

impl BookSize {
    pub fn lookup(name: &str) -> Option<BookSize> {
        BOOK_SIZES
            .iter()
            .copied()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }

    /// Resolve to a page size, using `custom_mm` for the custom entry
    pub fn page_size(self, custom_mm: Option<(f32, f32)>) -> Result<PageSize> {
        match (self.size, custom_mm) {
            (Some(size), _) => Ok(size),
            (None, Some((w, h))) => PageSize::from_mm(w, h),
            (None, None) => Err(BookError::Config(
                "custom book size requires a page width and height".to_string(),
            )),
        }
    }

    fn area(self) -> f32 {
        self.size.map(PageSize::area).unwrap_or(0.0)
    }

    /// Display label, e.g. `A5 (148mm x 210mm)`
    pub fn label(self) -> String {
        match self.size {
            Some(size) => {
                let (w, h) = size.dimensions_mm();
                format!("{} ({}mm x {}mm)", self.name, w as u32, h as u32)
            }
            None => self.name.to_string(),
        }
    }
}

/// All sizes ordered by increasing area, custom first
pub fn size_list() -> Vec<BookSize> {
    let mut sizes = BOOK_SIZES.to_vec();
    sizes.sort_by(|a, b| a.area().total_cmp(&b.area()).then(a.name.cmp(b.name)));
    sizes
}

/// Parse `WIDTHxHEIGHT` in millimetres, e.g. `148x210`
pub fn parse_mm_size(text: &str) -> Result<PageSize> {
    let (w, h) = text
        .split_once(['x', 'X'])
        .ok_or_else(|| BookError::Config(format!("expected WIDTHxHEIGHT, got {text:?}")))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f32>()
            .map_err(|e| BookError::Config(format!("bad length {v:?}: {e}")))
    };
    PageSize::from_mm(parse(w)?, parse(h)?)
}
