//! Interactive crop selection and crop application
//!
//! The selection lives in display space, relative to the top-left corner of
//! the displayed image. Applying it converts the selection to original-image
//! pixels, asks the raster backend for the cropped image and rewrites the
//! photo's annotations into the new image's coordinate system. Annotations
//! that no longer touch the crop are dropped.

use crate::annotation::Annotation;
use crate::constants::MIN_CROP_SIZE_PX;
use crate::geometry::*;
use crate::project::Photo;
use crate::raster::{PixelRegion, RasterBackend};
use crate::types::*;
use std::fmt;

/// Why an apply request was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropRejection {
    /// Selection smaller than the minimum on some axis
    TooSmall,
    /// No crop session or no selection
    NothingSelected,
}

impl fmt::Display for CropRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CropRejection::TooSmall => f.write_str("area too small"),
            CropRejection::NothingSelected => f.write_str("nothing selected"),
        }
    }
}

/// Summary of a finished crop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropOutcome {
    /// Crop rectangle in the pixels of the image before cropping
    pub crop: Rect<OriginalSpace>,
    /// Size of the new image
    pub size: Size<OriginalSpace>,
    pub kept: usize,
    pub dropped: usize,
}

/// Notifications for the UI layer, drained with [`CropEngine::take_events`]
#[derive(Debug, Clone, PartialEq)]
pub enum CropEvent {
    Activated,
    RectangleChanged(Rect<DisplaySpace>),
    Applied(CropOutcome),
    Cancelled,
    Rejected(CropRejection),
}

/// Pointer interaction in progress on the selection
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CropInteraction {
    /// A new selection is being dragged out from `anchor`
    Drawing { anchor: Point<DisplaySpace> },
    /// The selection follows the pointer; `grab` is the pointer offset from
    /// its top-left corner
    Moving { grab: (f64, f64) },
    /// One of the eight handles is being dragged
    Resizing {
        handle: ResizeHandle,
        origin: Point<DisplaySpace>,
        start: Rect<DisplaySpace>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum CropState {
    Idle,
    Active {
        selection: Option<Rect<DisplaySpace>>,
        interaction: Option<CropInteraction>,
    },
    Applying,
}

/// Crop session state machine: `Idle -> Active -> Applying -> Idle`
#[derive(Debug, Clone)]
pub struct CropEngine {
    state: CropState,
    image: Size<DisplaySpace>,
    events: Vec<CropEvent>,
}

impl Default for CropEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CropEngine {
    pub fn new() -> Self {
        Self {
            state: CropState::Idle,
            image: Size::default(),
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> &CropState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, CropState::Active { .. })
    }

    pub fn selection(&self) -> Option<Rect<DisplaySpace>> {
        match self.state {
            CropState::Active { selection, .. } => selection,
            _ => None,
        }
    }

    pub fn interaction(&self) -> Option<CropInteraction> {
        match self.state {
            CropState::Active { interaction, .. } => interaction,
            _ => None,
        }
    }

    /// Displayed size of the image being cropped
    pub fn image_size(&self) -> Size<DisplaySpace> {
        self.image
    }

    pub fn take_events(&mut self) -> Vec<CropEvent> {
        std::mem::take(&mut self.events)
    }

    /// Start a crop session over an image displayed at `image` size.
    /// Restarting discards any previous selection.
    pub fn activate(&mut self, image: Size<DisplaySpace>) {
        self.image = image;
        self.state = CropState::Active {
            selection: None,
            interaction: None,
        };
        self.events.push(CropEvent::Activated);
    }

    /// Leave the session without touching the photo
    pub fn cancel(&mut self) {
        if self.is_active() {
            self.state = CropState::Idle;
            self.events.push(CropEvent::Cancelled);
        }
    }

    /// Replace the selection directly, clamped into the image
    pub fn set_selection(&mut self, rect: Rect<DisplaySpace>) {
        let Some(clamped) = rect.intersection(&self.image.bounds()) else {
            return;
        };
        if let CropState::Active { selection, .. } = &mut self.state {
            *selection = Some(clamped);
            self.events.push(CropEvent::RectangleChanged(clamped));
        }
    }

    /// Pointer pressed. Inside the selection this starts a move; elsewhere
    /// on the image it starts drawing a new selection. Returns whether the
    /// press was taken.
    pub fn pointer_down(&mut self, p: Point<DisplaySpace>) -> bool {
        let bounds = self.image.bounds();
        let CropState::Active {
            selection,
            interaction,
        } = &mut self.state
        else {
            return false;
        };

        if let Some(sel) = selection.filter(|s| s.contains_point(p)) {
            *interaction = Some(CropInteraction::Moving {
                grab: p.delta_from(sel.origin()),
            });
            return true;
        }
        if !bounds.contains_point(p) {
            return false;
        }

        let rect = Rect::new(p.x, p.y, 0.0, 0.0);
        *selection = Some(rect);
        *interaction = Some(CropInteraction::Drawing { anchor: p });
        self.events.push(CropEvent::RectangleChanged(rect));
        true
    }

    /// Pointer pressed on a resize handle of the current selection
    pub fn begin_resize(&mut self, handle: ResizeHandle, p: Point<DisplaySpace>) -> bool {
        if let CropState::Active {
            selection: Some(start),
            interaction,
        } = &mut self.state
        {
            *interaction = Some(CropInteraction::Resizing {
                handle,
                origin: p,
                start: *start,
            });
            true
        } else {
            false
        }
    }

    /// Pointer moved; updates the selection for the current interaction
    pub fn pointer_move(&mut self, p: Point<DisplaySpace>) {
        let image = self.image;
        let CropState::Active {
            selection: Some(selection),
            interaction: Some(interaction),
        } = &mut self.state
        else {
            return;
        };

        let updated = match *interaction {
            CropInteraction::Drawing { anchor } => {
                let end = Point::new(p.x.clamp(0.0, image.width), p.y.clamp(0.0, image.height));
                Rect::from_corners(anchor, end)
            }
            CropInteraction::Moving { grab } => {
                let moved = Rect::new(p.x - grab.0, p.y - grab.1, selection.width, selection.height);
                moved.moved_inside(&image.bounds())
            }
            CropInteraction::Resizing {
                handle,
                origin,
                start,
            } => resize_selection(&start, handle, p.delta_from(origin), image),
        };

        *selection = updated;
        self.events.push(CropEvent::RectangleChanged(updated));
    }

    /// Pointer released. A selection below the minimum size is discarded.
    pub fn pointer_up(&mut self) {
        let CropState::Active {
            selection,
            interaction,
        } = &mut self.state
        else {
            return;
        };
        if interaction.take().is_none() {
            return;
        }
        if selection.is_some_and(|s| is_too_small(&s)) {
            *selection = None;
            self.events.push(CropEvent::Rejected(CropRejection::TooSmall));
        }
    }

    /// The selection if it can be applied
    pub fn validate(&self) -> Result<Rect<DisplaySpace>> {
        match self.selection() {
            None => Err(LayoutError::NothingSelected),
            Some(s) if is_too_small(&s) => Err(LayoutError::CropTooSmall {
                width: s.width,
                height: s.height,
                min: MIN_CROP_SIZE_PX,
            }),
            Some(s) => Ok(s),
        }
    }

    /// Crop `photo` to the current selection.
    ///
    /// Validation failures leave the session active and emit a rejection.
    /// Decode or raster failures also return the session to active with the
    /// selection intact; in every failure case the photo is unchanged.
    pub async fn apply<B: RasterBackend>(
        &mut self,
        photo: &mut Photo,
        backend: &B,
    ) -> Result<CropOutcome> {
        let selection = match self.validate() {
            Ok(s) => s,
            Err(e) => {
                let reason = match e {
                    LayoutError::CropTooSmall { .. } => CropRejection::TooSmall,
                    _ => CropRejection::NothingSelected,
                };
                log::debug!("Crop rejected: {}", reason);
                self.events.push(CropEvent::Rejected(reason));
                return Err(e);
            }
        };

        let original = match photo.original_size() {
            Some(size) => size,
            None => backend.decode(&photo.src).await?,
        };
        let scale = Scale::between(original, self.image);
        let crop = to_original(&selection, scale, original);

        let applying = ApplyGuard::enter(&mut self.state, selection);
        let cropped = match backend.crop(&photo.src, PixelRegion::from_rect(&crop)).await {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Crop of photo {} failed: {}", photo.id, e);
                return Err(e);
            }
        };
        applying.finish();

        let before = photo.annotations.len();
        let annotations = crop_annotations(&photo.annotations, &crop, cropped.size);
        let outcome = CropOutcome {
            crop,
            size: cropped.size,
            kept: annotations.len(),
            dropped: before - annotations.len(),
        };

        photo.src = cropped.src;
        photo.set_original_size(cropped.size);
        photo.annotations = annotations;
        photo.display_size = None;

        log::info!(
            "Cropped photo {} to {}x{} ({} annotation(s) kept, {} dropped)",
            photo.id,
            outcome.size.width,
            outcome.size.height,
            outcome.kept,
            outcome.dropped
        );
        self.events.push(CropEvent::Applied(outcome));
        Ok(outcome)
    }
}

/// Holds the engine in `Applying` while the raster call runs. Unless
/// finished, dropping it (a failed call or a cancelled future) returns the
/// engine to `Active` with the selection it started from.
struct ApplyGuard<'a> {
    state: &'a mut CropState,
    selection: Rect<DisplaySpace>,
    finished: bool,
}

impl<'a> ApplyGuard<'a> {
    fn enter(state: &'a mut CropState, selection: Rect<DisplaySpace>) -> Self {
        *state = CropState::Applying;
        Self {
            state,
            selection,
            finished: false,
        }
    }

    fn finish(mut self) {
        self.finished = true;
        *self.state = CropState::Idle;
    }
}

impl Drop for ApplyGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            *self.state = CropState::Active {
                selection: Some(self.selection),
                interaction: None,
            };
        }
    }
}

fn is_too_small(rect: &Rect<DisplaySpace>) -> bool {
    rect.width < MIN_CROP_SIZE_PX || rect.height < MIN_CROP_SIZE_PX
}

/// Selection after dragging `handle` by `delta`.
///
/// A moving edge stops at the image border and at the minimum distance from
/// the opposite edge, which never moves.
pub fn resize_selection(
    start: &Rect<DisplaySpace>,
    handle: ResizeHandle,
    delta: (f64, f64),
    image: Size<DisplaySpace>,
) -> Rect<DisplaySpace> {
    let (dx, dy) = delta;
    let min = MIN_CROP_SIZE_PX;
    let mut rect = *start;

    if handle.moves_left() {
        rect.x = (start.x + dx).min(start.right() - min).max(0.0);
        rect.width = start.right() - rect.x;
    }
    if handle.moves_right() {
        rect.width = (start.width + dx).min(image.width - start.x).max(min);
    }
    if handle.moves_top() {
        rect.y = (start.y + dy).min(start.bottom() - min).max(0.0);
        rect.height = start.bottom() - rect.y;
    }
    if handle.moves_bottom() {
        rect.height = (start.height + dy).min(image.height - start.y).max(min);
    }
    rect
}

/// Rewrite annotations for an image cropped to `crop`.
///
/// Annotations with no overlap with `crop` are dropped. The rest are moved
/// so the crop's corner becomes the origin and clamped into the new image.
/// Cropping does not resample, so font sizes and stroke widths carry over.
pub fn crop_annotations(
    annotations: &[Annotation<OriginalSpace>],
    crop: &Rect<OriginalSpace>,
    new_size: Size<OriginalSpace>,
) -> Vec<Annotation<OriginalSpace>> {
    annotations
        .iter()
        .filter(|a| a.rect.intersects(crop))
        .map(|a| Annotation {
            rect: clamp_to_image(&a.rect.translated(-crop.x, -crop.y), new_size),
            ..a.clone()
        })
        .collect()
}
