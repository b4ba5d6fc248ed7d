//! Content stream generation for exported pages
//!
//! Every function returns PDF content stream operators as text, wrapped in
//! `q`/`Q` so graphics state never leaks between elements.

use super::geometry::{ImageFit, PdfRect};
use crate::annotation::{Annotation, AnnotationKind, ShapeKind, TRANSPARENT};
use crate::constants::{
    ARROW_HEAD_FACTOR, BEZIER_CIRCLE_FACTOR, HELVETICA_CHAR_WIDTH_RATIO, LINE_HEIGHT_FACTOR,
    PAGE_NUMBER_FONT_SIZE, PAGE_NUMBER_OFFSET,
};
use crate::geometry::OriginalSpace;
use crate::text::{CharWidthMeasure, Direction, TextMeasure, layout_text_block, wrap_text};

/// Resource name of the shared Helvetica font
pub const FONT_NAME: &str = "F1";

/// Placeholder frame color (gray)
const PLACEHOLDER_GRAY: f32 = 0.6;
const PLACEHOLDER_LINE_WIDTH: f32 = 0.75;

// =============================================================================
// Colors and strings
// =============================================================================

/// Parse a CSS-style color into RGB components in `[0, 1]`.
///
/// Accepts `#rgb`, `#rrggbb`, `rgb(r, g, b)` and a few common names.
/// Returns `None` for `transparent` and anything unrecognized.
pub fn parse_color(color: &str) -> Option<(f32, f32, f32)> {
    let color = color.trim().to_ascii_lowercase();
    if let Some(hex) = color.strip_prefix('#') {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| v as f32 / 255.0);
        return match hex.len() {
            3 => {
                let expanded: String = hex.chars().flat_map(|c| [c, c]).collect();
                Some((
                    channel(&expanded[0..2])?,
                    channel(&expanded[2..4])?,
                    channel(&expanded[4..6])?,
                ))
            }
            6 => Some((channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
            _ => None,
        };
    }
    if let Some(args) = color
        .strip_prefix("rgb(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        let parts: Vec<f32> = args
            .split(',')
            .filter_map(|p| p.trim().parse::<f32>().ok())
            .collect();
        return match parts.as_slice() {
            [r, g, b] => Some((r / 255.0, g / 255.0, b / 255.0)),
            _ => None,
        };
    }
    match color.as_str() {
        "black" => Some((0.0, 0.0, 0.0)),
        "white" => Some((1.0, 1.0, 1.0)),
        "red" => Some((1.0, 0.0, 0.0)),
        "green" => Some((0.0, 0.5, 0.0)),
        "blue" => Some((0.0, 0.0, 1.0)),
        "yellow" => Some((1.0, 1.0, 0.0)),
        "orange" => Some((1.0, 0.647, 0.0)),
        "gray" | "grey" => Some((0.5, 0.5, 0.5)),
        _ => None,
    }
}

/// PDF literal string for the standard Helvetica encoding.
///
/// Characters outside Latin-1 cannot be shown with a standard font and are
/// replaced by `?`.
pub fn pdf_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('(');
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            '\u{a0}'..='\u{ff}' => out.push_str(&format!("\\{:03o}", c as u32)),
            _ => out.push('?'),
        }
    }
    out.push(')');
    out
}

fn stroke_color(color: &str) -> String {
    let (r, g, b) = parse_color(color).unwrap_or((0.0, 0.0, 0.0));
    format!("{:.3} {:.3} {:.3} RG\n", r, g, b)
}

fn fill_color(color: &str) -> String {
    let (r, g, b) = parse_color(color).unwrap_or((0.0, 0.0, 0.0));
    format!("{:.3} {:.3} {:.3} rg\n", r, g, b)
}

// =============================================================================
// Photos
// =============================================================================

/// Place image XObject `name` with its annotations.
///
/// The image frame is `width` x `height` original pixels. Inside it the
/// y axis points down, so annotation coordinates are used unchanged.
pub fn image_ops(
    name: &str,
    fit: &ImageFit,
    width: f32,
    height: f32,
    annotations: &[Annotation<OriginalSpace>],
    direction: Direction,
) -> String {
    let mut ops = String::new();
    ops.push_str("q\n");
    ops.push_str(&format!(
        "1 0 0 1 {:.3} {:.3} cm\n",
        fit.center.0, fit.center.1
    ));

    // Clockwise quarter turn: [cos -sin sin cos]
    let (cos, sin) = match fit.rotation {
        90 => (0, 1),
        180 => (-1, 0),
        270 => (0, -1),
        _ => (1, 0),
    };
    if fit.rotation != 0 {
        ops.push_str(&format!("{} {} {} {} 0 0 cm\n", cos, -sin, sin, cos));
    }

    let k = fit.scale;
    ops.push_str(&format!(
        "{:.5} 0 0 {:.5} {:.3} {:.3} cm\n",
        k,
        -k,
        -width * k / 2.0,
        height * k / 2.0
    ));
    ops.push_str(&format!(
        "q {:.3} 0 0 {:.3} 0 {:.3} cm /{} Do Q\n",
        width, -height, height, name
    ));

    for annotation in annotations {
        ops.push_str(&annotation_ops(annotation, direction));
    }

    ops.push_str("Q\n");
    ops
}

/// Draw one annotation in a y-down pixel frame
pub fn annotation_ops(annotation: &Annotation<OriginalSpace>, direction: Direction) -> String {
    let rect = &annotation.rect;
    let (x, y) = (rect.x as f32, rect.y as f32);
    let (w, h) = (rect.width as f32, rect.height as f32);

    let mut ops = String::from("q\n");
    match &annotation.kind {
        AnnotationKind::Text { text, size, .. } => {
            ops.push_str(&fill_color(&annotation.color));
            let measure = CharWidthMeasure::helvetica(*size);
            for line in layout_text_block(text, rect, *size, direction, &measure) {
                let start = match direction {
                    Direction::Rtl => line.x - measure.measure(&line.text),
                    Direction::Ltr => line.x,
                };
                // Flip the text matrix back so glyphs stay upright
                ops.push_str(&format!(
                    "BT /{} {:.2} Tf 1 0 0 -1 {:.3} {:.3} Tm {} Tj ET\n",
                    FONT_NAME,
                    size,
                    start,
                    line.baseline,
                    pdf_string(&line.text)
                ));
            }
        }
        AnnotationKind::Shape {
            shape,
            width_value,
            fill,
        } => {
            let filled = !fill.is_empty() && fill != TRANSPARENT;
            ops.push_str(&stroke_color(&annotation.color));
            ops.push_str(&format!("{:.3} w\n", width_value));
            if filled {
                ops.push_str(&fill_color(fill));
            }
            let paint = if filled { "B" } else { "S" };

            match shape {
                ShapeKind::Rectangle => {
                    ops.push_str(&format!(
                        "{:.3} {:.3} {:.3} {:.3} re {}\n",
                        x, y, w, h, paint
                    ));
                }
                ShapeKind::Circle => {
                    ops.push_str(&ellipse_path(x + w / 2.0, y + h / 2.0, w / 2.0, h / 2.0));
                    ops.push_str(paint);
                    ops.push('\n');
                }
                ShapeKind::Line => {
                    ops.push_str(&format!(
                        "{:.3} {:.3} m {:.3} {:.3} l S\n",
                        x,
                        y,
                        x + w,
                        y + h
                    ));
                }
                ShapeKind::Arrow => {
                    let stroke = *width_value as f32;
                    ops.push_str(&arrow_path(x, y, x + w, y + h, stroke));
                    ops.push_str(&fill_color(&annotation.color));
                    ops.push_str(&arrow_head(x, y, x + w, y + h, stroke));
                }
            }
        }
    }
    ops.push_str("Q\n");
    ops
}

/// Ellipse as four Bezier curves, closed but not painted
fn ellipse_path(cx: f32, cy: f32, rx: f32, ry: f32) -> String {
    let kx = rx * BEZIER_CIRCLE_FACTOR;
    let ky = ry * BEZIER_CIRCLE_FACTOR;
    let mut path = format!("{:.3} {:.3} m\n", cx + rx, cy);
    path.push_str(&format!(
        "{:.3} {:.3} {:.3} {:.3} {:.3} {:.3} c\n",
        cx + rx,
        cy + ky,
        cx + kx,
        cy + ry,
        cx,
        cy + ry
    ));
    path.push_str(&format!(
        "{:.3} {:.3} {:.3} {:.3} {:.3} {:.3} c\n",
        cx - kx,
        cy + ry,
        cx - rx,
        cy + ky,
        cx - rx,
        cy
    ));
    path.push_str(&format!(
        "{:.3} {:.3} {:.3} {:.3} {:.3} {:.3} c\n",
        cx - rx,
        cy - ky,
        cx - kx,
        cy - ry,
        cx,
        cy - ry
    ));
    path.push_str(&format!(
        "{:.3} {:.3} {:.3} {:.3} {:.3} {:.3} c h ",
        cx + kx,
        cy - ry,
        cx + rx,
        cy - ky,
        cx + rx,
        cy
    ));
    path
}

fn head_length(stroke: f32) -> f32 {
    (stroke * ARROW_HEAD_FACTOR).max(6.0)
}

/// Arrow shaft, shortened so it ends at the base of the head
fn arrow_path(x1: f32, y1: f32, x2: f32, y2: f32, stroke: f32) -> String {
    let (dx, dy) = (x2 - x1, y2 - y1);
    let len = (dx * dx + dy * dy).sqrt();
    if len <= f32::EPSILON {
        return String::new();
    }
    let shaft = (len - head_length(stroke)).max(0.0) / len;
    format!(
        "{:.3} {:.3} m {:.3} {:.3} l S\n",
        x1,
        y1,
        x1 + dx * shaft,
        y1 + dy * shaft
    )
}

/// Filled triangular head with its tip at `(x2, y2)`
fn arrow_head(x1: f32, y1: f32, x2: f32, y2: f32, stroke: f32) -> String {
    let (dx, dy) = (x2 - x1, y2 - y1);
    let len = (dx * dx + dy * dy).sqrt();
    if len <= f32::EPSILON {
        return String::new();
    }
    let (ux, uy) = (dx / len, dy / len);
    let head = head_length(stroke);
    let (bx, by) = (x2 - ux * head, y2 - uy * head);
    let (nx, ny) = (-uy * head / 2.0, ux * head / 2.0);
    format!(
        "{:.3} {:.3} m {:.3} {:.3} l {:.3} {:.3} l h f\n",
        x2,
        y2,
        bx + nx,
        by + ny,
        bx - nx,
        by - ny
    )
}

/// Dashed frame marking an empty slot
pub fn placeholder_ops(rect: &PdfRect) -> String {
    format!(
        "q {g} {g} {g} RG {lw} w [4 3] 0 d {:.3} {:.3} {:.3} {:.3} re S Q\n",
        rect.x,
        rect.y,
        rect.width,
        rect.height,
        g = PLACEHOLDER_GRAY,
        lw = PLACEHOLDER_LINE_WIDTH
    )
}

// =============================================================================
// Page text
// =============================================================================

fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * HELVETICA_CHAR_WIDTH_RATIO as f32
}

/// Title centered in its band
pub fn title_ops(title: &str, band: &PdfRect, size: f32) -> String {
    let (cx, cy) = band.center();
    let x = cx - text_width(title, size) / 2.0;
    let y = cy - size * 0.35;
    format!(
        "q 0 0 0 rg BT /{} {:.2} Tf {:.3} {:.3} Td {} Tj ET Q\n",
        FONT_NAME,
        size,
        x,
        y,
        pdf_string(title)
    )
}

/// Wrapped text filling `rect` from the top; lines that do not fit are cut
pub fn text_box_ops(text: &str, rect: &PdfRect, size: f32, direction: Direction) -> String {
    let measure = CharWidthMeasure::helvetica(size as f64);
    let line_height = size * LINE_HEIGHT_FACTOR as f32;

    let mut ops = String::from("q 0 0 0 rg\n");
    for (i, line) in wrap_text(text, rect.width as f64, &measure).iter().enumerate() {
        let baseline = rect.top() - size - i as f32 * line_height;
        if baseline < rect.y {
            break;
        }
        let width = measure.measure(line) as f32;
        let x = match direction {
            Direction::Rtl => rect.right() - width,
            Direction::Ltr => rect.x,
        };
        ops.push_str(&format!(
            "BT /{} {:.2} Tf {:.3} {:.3} Td {} Tj ET\n",
            FONT_NAME,
            size,
            x,
            baseline,
            pdf_string(line)
        ));
    }
    ops.push_str("Q\n");
    ops
}

/// Page number centered at the bottom of the page
pub fn page_number_ops(number: u32, page_width: f32) -> String {
    let text = number.to_string();
    let x = page_width / 2.0 - text_width(&text, PAGE_NUMBER_FONT_SIZE) / 2.0;
    format!(
        "q 0 0 0 rg BT /{} {} Tf {:.3} {} Td ({}) Tj ET Q\n",
        FONT_NAME, PAGE_NUMBER_FONT_SIZE, x, PAGE_NUMBER_OFFSET, text
    )
}
