//! Page geometry for PDF export
//!
//! All values are PDF points with the origin at the bottom-left corner of
//! the page.

use crate::constants::{SLOT_GAP_PT, TEXT_AREA_FRACTION, TITLE_BAND_PT, mm_to_pt};
use crate::options::ExportOptions;
use crate::pages::Layout;

/// Rectangle on a PDF page
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PdfRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PdfRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Split off the top `height` points; returns `(top, rest)`
    fn split_top(&self, height: f32) -> (PdfRect, PdfRect) {
        let height = height.min(self.height);
        (
            PdfRect::new(self.x, self.top() - height, self.width, height),
            PdfRect::new(self.x, self.y, self.width, self.height - height),
        )
    }

    /// `n` equal rows from top to bottom with `gap` between them
    fn rows(&self, n: usize, gap: f32) -> Vec<PdfRect> {
        let h = (self.height - gap * (n as f32 - 1.0)) / n as f32;
        (0..n)
            .map(|i| {
                let y = self.top() - (i as f32 + 1.0) * h - i as f32 * gap;
                PdfRect::new(self.x, y, self.width, h)
            })
            .collect()
    }

    /// `n` equal columns from left to right with `gap` between them
    fn columns(&self, n: usize, gap: f32) -> Vec<PdfRect> {
        let w = (self.width - gap * (n as f32 - 1.0)) / n as f32;
        (0..n)
            .map(|i| PdfRect::new(self.x + i as f32 * (w + gap), self.y, w, self.height))
            .collect()
    }
}

/// One photo slot on a page and its optional text box below
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotCell {
    pub photo: PdfRect,
    pub text: Option<PdfRect>,
}

/// Where everything goes on one exported page
#[derive(Debug, Clone, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    /// Area inside the margins
    pub content: PdfRect,
    pub title: Option<PdfRect>,
    pub slots: Vec<SlotCell>,
}

impl PageGeometry {
    /// Geometry of a page with `layout`, reserving a title band when
    /// `has_title` is set
    pub fn new(options: &ExportOptions, layout: Layout, has_title: bool) -> Self {
        let (w_mm, h_mm) = options.page_size_mm();
        let (width, height) = (mm_to_pt(w_mm), mm_to_pt(h_mm));
        let margin = mm_to_pt(options.margins.margin_mm());
        let content = PdfRect::new(margin, margin, width - 2.0 * margin, height - 2.0 * margin);

        let (title, body) = if has_title {
            let (band, rest) = content.split_top(TITLE_BAND_PT);
            (Some(band), rest)
        } else {
            (None, content)
        };

        Self {
            width,
            height,
            content,
            title,
            slots: slot_cells(layout, &body),
        }
    }
}

/// Slot grid of `layout` inside `area`, in reading order
pub fn slot_cells(layout: Layout, area: &PdfRect) -> Vec<SlotCell> {
    let photo_only = |rect: PdfRect| SlotCell {
        photo: rect,
        text: None,
    };
    let with_text = |rect: PdfRect| {
        let text_height = rect.height * TEXT_AREA_FRACTION;
        let (photo, text) = rect.split_top(rect.height - text_height);
        SlotCell {
            photo,
            text: Some(text),
        }
    };

    match layout {
        Layout::One => vec![photo_only(*area)],
        Layout::Two => area.rows(2, SLOT_GAP_PT).into_iter().map(photo_only).collect(),
        Layout::Four => area
            .rows(2, SLOT_GAP_PT)
            .iter()
            .flat_map(|row| row.columns(2, SLOT_GAP_PT))
            .map(photo_only)
            .collect(),
        Layout::OneText => vec![with_text(*area)],
        Layout::TwoText => area.rows(2, SLOT_GAP_PT).into_iter().map(with_text).collect(),
    }
}

/// Rotation snapped to a quarter turn, in `[0, 360)`
pub fn quarter_turns(degrees: i32) -> i32 {
    let degrees = degrees.rem_euclid(360);
    (((degrees as f32 / 90.0).round() as i32) * 90) % 360
}

/// Placement of an image inside a slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageFit {
    /// Center of the placed image
    pub center: (f32, f32),
    /// Points per image pixel
    pub scale: f32,
    /// Clockwise rotation in degrees, a multiple of 90
    pub rotation: i32,
}

/// Fit an image of `width` x `height` pixels into `cell`, preserving its
/// aspect ratio after rotating it clockwise by `rotation` degrees
pub fn fit_image(width: f32, height: f32, rotation: i32, cell: &PdfRect) -> ImageFit {
    let rotation = quarter_turns(rotation);
    let (w, h) = if rotation % 180 == 0 {
        (width, height)
    } else {
        (height, width)
    };
    let scale = if w > 0.0 && h > 0.0 {
        (cell.width / w).min(cell.height / h)
    } else {
        0.0
    };
    ImageFit {
        center: cell.center(),
        scale,
        rotation,
    }
}
