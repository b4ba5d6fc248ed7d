//! Pointer-driven geometry for annotations inside the editor
//!
//! All rectangles here are in display space with the origin at the top-left
//! corner of the displayed image, so the image occupies `[0, w] x [0, h]`.

use crate::constants::*;
use crate::geometry::*;
use crate::text::Direction;

/// Position for an annotation being dragged.
///
/// `grab` is the pointer offset from the annotation's top-left corner at
/// the moment the drag started. The result keeps a small margin from every
/// image edge; a rectangle too large for that is pinned to the margin.
pub fn drag_annotation(
    rect: &Rect<DisplaySpace>,
    pointer: Point<DisplaySpace>,
    grab: (f64, f64),
    image: Size<DisplaySpace>,
) -> Rect<DisplaySpace> {
    let margin = ANNOTATION_EDGE_MARGIN_PX;
    let x = (pointer.x - grab.0)
        .min(image.width - rect.width - margin)
        .max(margin);
    let y = (pointer.y - grab.1)
        .min(image.height - rect.height - margin)
        .max(margin);
    Rect::new(x, y, rect.width, rect.height)
}

/// Rectangle after dragging `handle` by `delta` from where the resize started.
///
/// The edge opposite to the handle stays put. Width and height never drop
/// below the minimum annotation size, and the result is pulled back inside
/// the image (less the edge margin).
pub fn resize_annotation(
    start: &Rect<DisplaySpace>,
    handle: ResizeHandle,
    delta: (f64, f64),
    image: Size<DisplaySpace>,
) -> Rect<DisplaySpace> {
    let (dx, dy) = delta;
    let min = MIN_ANNOTATION_SIZE_PX;
    let margin = ANNOTATION_EDGE_MARGIN_PX;
    let mut rect = *start;

    if handle.moves_left() {
        rect.x = (start.x + dx).min(start.right() - min).max(margin);
        rect.width = start.right() - rect.x;
    }
    if handle.moves_right() {
        rect.width = (start.width + dx)
            .min(image.width - start.x - margin)
            .max(min);
    }
    if handle.moves_top() {
        rect.y = (start.y + dy).min(start.bottom() - min).max(margin);
        rect.height = start.bottom() - rect.y;
    }
    if handle.moves_bottom() {
        rect.height = (start.height + dy)
            .min(image.height - start.y - margin)
            .max(min);
    }
    rect
}

/// Initial rectangle for a new shape: 30% of the image per axis, capped,
/// centered on the image
pub fn default_shape_rect(image: Size<DisplaySpace>) -> Rect<DisplaySpace> {
    let width = (image.width * NEW_SHAPE_FRACTION).min(NEW_SHAPE_MAX_PX);
    let height = (image.height * NEW_SHAPE_FRACTION).min(NEW_SHAPE_MAX_PX);
    Rect::new(
        image.width / 2.0 - width / 2.0,
        image.height / 2.0 - height / 2.0,
        width,
        height,
    )
}

/// Place a freshly measured text box relative to `anchor`.
///
/// Right-to-left text ends at the anchor; left-to-right text is centered on
/// it. Both are vertically centered.
pub fn place_new_text(
    anchor: Point<DisplaySpace>,
    measured: Size<DisplaySpace>,
    direction: Direction,
) -> Rect<DisplaySpace> {
    let x = match direction {
        Direction::Rtl => anchor.x - measured.width,
        Direction::Ltr => anchor.x - measured.width / 2.0,
    };
    Rect::new(
        x,
        anchor.y - measured.height / 2.0,
        measured.width,
        measured.height,
    )
}
