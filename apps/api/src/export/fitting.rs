//! Page geometry: how a bitmap is placed on A4.
//!
//! The bitmap always spans the full page width. Its height follows from the aspect
//! ratio; when that overflows the page, the policy decides between cropping to the
//! rows that fit and slicing into consecutive pages. Bitmaps are never distorted.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Points per millimetre.
pub const MM_TO_PT: f64 = 72.0 / 25.4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width_mm: f64,
    pub height_mm: f64,
}

impl PageSize {
    pub const A4: PageSize = PageSize {
        width_mm: 210.0,
        height_mm: 297.0,
    };

    pub fn width_pt(&self) -> f64 {
        self.width_mm * MM_TO_PT
    }

    pub fn height_pt(&self) -> f64 {
        self.height_mm * MM_TO_PT
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Keep the first page worth of rows.
    #[default]
    Crop,
    /// Continue on further pages.
    Paginate,
}

impl FromStr for OverflowPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "crop" => Ok(OverflowPolicy::Crop),
            "paginate" => Ok(OverflowPolicy::Paginate),
            other => Err(format!("unknown overflow policy '{other}' (expected crop or paginate)")),
        }
    }
}

/// One page's worth of bitmap: the source rows to take and the size they occupy on
/// the page, anchored at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub width_mm: f64,
    pub height_mm: f64,
    pub source_top: u32,
    pub source_height: u32,
}

impl Placement {
    pub fn is_cropped(&self, bitmap_height: u32) -> bool {
        self.source_top + self.source_height < bitmap_height
    }
}

/// Bitmap rows that fill one full page height at full page width.
fn rows_per_page(bitmap: (u32, u32), page: PageSize) -> u32 {
    let (w, _) = bitmap;
    let rows = (f64::from(w) * page.height_mm / page.width_mm).floor() as u32;
    rows.max(1)
}

/// First-page placement. Scaled height is `page width / (w / h)`; when it exceeds the
/// page, the placed height is clamped and the source is cropped to match.
pub fn fit_to_page(bitmap: (u32, u32), page: PageSize) -> Placement {
    let (w, h) = bitmap;
    let aspect = f64::from(w) / f64::from(h);
    let scaled_height = page.width_mm / aspect;

    if scaled_height <= page.height_mm {
        return Placement {
            width_mm: page.width_mm,
            height_mm: scaled_height,
            source_top: 0,
            source_height: h,
        };
    }

    Placement {
        width_mm: page.width_mm,
        height_mm: page.height_mm,
        source_top: 0,
        source_height: rows_per_page(bitmap, page).min(h),
    }
}

/// Placements for every page the policy produces. Always at least one.
pub fn layout_pages(bitmap: (u32, u32), page: PageSize, policy: OverflowPolicy) -> Vec<Placement> {
    let first = fit_to_page(bitmap, page);
    if policy == OverflowPolicy::Crop || !first.is_cropped(bitmap.1) {
        return vec![first];
    }

    let (w, h) = bitmap;
    let step = rows_per_page(bitmap, page);
    let mm_per_row = page.width_mm / f64::from(w);
    let mut pages = Vec::new();
    let mut top = 0;
    while top < h {
        let rows = step.min(h - top);
        pages.push(Placement {
            width_mm: page.width_mm,
            height_mm: f64::from(rows) * mm_per_row,
            source_top: top,
            source_height: rows,
        });
        top += rows;
    }
    pages
}
