//! Editing one photo's annotations at a given display size
//!
//! An [`EditSession`] owns a copy of the photo and keeps its annotations in
//! display space while the user works on them. Nothing is written back to
//! the photo until [`EditSession::commit`] projects them into original space.

use crate::annotation::*;
use crate::constants::LINE_HEIGHT_FACTOR;
use crate::crop::{CropEngine, CropOutcome};
use crate::geometry::*;
use crate::project::{Photo, Project};
use crate::raster::RasterBackend;
use crate::text::{Direction, TextMeasure};
use crate::types::*;

#[derive(Debug, Clone)]
pub struct EditSession {
    photo: Photo,
    image: Size<OriginalSpace>,
    display: Size<DisplaySpace>,
    scale: Scale,
    store: AnnotationStore<DisplaySpace>,
    active: Option<AnnotationId>,
}

impl EditSession {
    /// Open `photo` for editing, decoding it first if its pixel size is not
    /// recorded yet
    pub async fn open<B: RasterBackend>(
        mut photo: Photo,
        backend: &B,
        display: Size<DisplaySpace>,
    ) -> Result<Self> {
        let image = match photo.original_size() {
            Some(size) => size,
            None => {
                let size = backend.decode(&photo.src).await?;
                photo.set_original_size(size);
                size
            }
        };
        Ok(Self::open_with_size(photo, image, display))
    }

    /// Open `photo` whose decoded size is already known
    pub fn open_with_size(
        mut photo: Photo,
        image: Size<OriginalSpace>,
        display: Size<DisplaySpace>,
    ) -> Self {
        photo.set_original_size(image);
        let mut session = Self {
            photo,
            image,
            display,
            scale: Scale::IDENTITY,
            store: AnnotationStore::new(),
            active: None,
        };
        session.project_from_photo(display);
        session
    }

    fn project_from_photo(&mut self, display: Size<DisplaySpace>) {
        self.display = display;
        self.scale = Scale::between(self.image, display);
        self.photo.display_size = Some(display);
        let scale = self.scale;
        self.store = AnnotationStore::from_annotations(
            self.photo
                .annotations
                .iter()
                .map(|a| a.to_display(scale))
                .collect(),
        );
        self.active = None;
        log::debug!(
            "Editing photo {} at {:.3}x{:.3} ({} annotation(s))",
            self.photo.id,
            scale.x,
            scale.y,
            self.store.len()
        );
    }

    pub fn photo(&self) -> &Photo {
        &self.photo
    }

    pub fn image_size(&self) -> Size<OriginalSpace> {
        self.image
    }

    pub fn display_size(&self) -> Size<DisplaySpace> {
        self.display
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub fn store(&self) -> &AnnotationStore<DisplaySpace> {
        &self.store
    }

    /// Live annotations in display space
    pub fn annotations(&self) -> &[Annotation<DisplaySpace>] {
        self.store.list()
    }

    pub fn take_changes(&mut self) -> Vec<AnnotationChange> {
        self.store.take_changes()
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn active(&self) -> Option<&AnnotationId> {
        self.active.as_ref()
    }

    /// Make `id` the active annotation, or clear the selection with `None`
    pub fn select(&mut self, id: Option<&AnnotationId>) -> Result<()> {
        match id {
            Some(id) if !self.store.contains(id) => Err(LayoutError::NotFound {
                kind: "Annotation",
                id: id.to_string(),
            }),
            _ => {
                self.active = id.cloned();
                Ok(())
            }
        }
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Add an annotation and make it active
    pub fn add(&mut self, new: NewAnnotation<DisplaySpace>) -> AnnotationId {
        let id = self.store.add(new).id.clone();
        self.active = Some(id.clone());
        id
    }

    /// Add a shape at the default size in the middle of the image
    pub fn add_shape(
        &mut self,
        shape: ShapeKind,
        width_value: f64,
        fill: Option<String>,
        color: impl Into<String>,
    ) -> AnnotationId {
        let rect = default_shape_rect(self.display);
        self.add(NewAnnotation::shape(rect, shape, width_value, fill, color))
    }

    /// Add a text box sized to its content and placed at `anchor`
    #[allow(clippy::too_many_arguments)]
    pub fn add_text(
        &mut self,
        anchor: Point<DisplaySpace>,
        text: impl Into<String>,
        size: f64,
        font: impl Into<String>,
        color: impl Into<String>,
        direction: Direction,
        measure: &impl TextMeasure,
    ) -> AnnotationId {
        let mut new = NewAnnotation::text(Rect::default(), text, size, font, color);
        if let AnnotationKind::Text { text, .. } = &new.kind {
            let lines: Vec<&str> = text.split('\n').collect();
            let width = lines
                .iter()
                .map(|l| measure.measure(l))
                .fold(0.0_f64, f64::max);
            let height = lines.len() as f64 * size * LINE_HEIGHT_FACTOR;
            // New boxes always start on the image
            let bounds = self.display.bounds();
            let measured = Size::new(width.min(bounds.width), height.min(bounds.height));
            new.rect = place_new_text(anchor, measured, direction).moved_inside(&bounds);
        }
        self.add(new)
    }

    pub fn update(
        &mut self,
        id: &AnnotationId,
        patch: AnnotationPatch<DisplaySpace>,
    ) -> Result<&Annotation<DisplaySpace>> {
        self.store.update(id, patch)
    }

    /// Remove an annotation; removing the active one clears the selection
    pub fn remove(&mut self, id: &AnnotationId) -> Option<Annotation<DisplaySpace>> {
        let removed = self.store.remove(id)?;
        if self.active.as_ref() == Some(id) {
            self.active = None;
        }
        Some(removed)
    }

    /// Move an annotation with the pointer; `grab` is the pointer offset
    /// from its top-left corner when the drag began
    pub fn drag(
        &mut self,
        id: &AnnotationId,
        pointer: Point<DisplaySpace>,
        grab: (f64, f64),
    ) -> Result<Rect<DisplaySpace>> {
        let current = self.rect_of(id)?;
        let rect = drag_annotation(&current, pointer, grab, self.display);
        self.store.update(id, AnnotationPatch::rect(rect))?;
        Ok(rect)
    }

    /// Resize from `start`, the rectangle when the resize began
    pub fn resize(
        &mut self,
        id: &AnnotationId,
        handle: ResizeHandle,
        start: &Rect<DisplaySpace>,
        delta: (f64, f64),
    ) -> Result<Rect<DisplaySpace>> {
        self.rect_of(id)?;
        let rect = resize_annotation(start, handle, delta, self.display);
        self.store.update(id, AnnotationPatch::rect(rect))?;
        Ok(rect)
    }

    fn rect_of(&self, id: &AnnotationId) -> Result<Rect<DisplaySpace>> {
        self.store
            .get(id)
            .map(|a| a.rect)
            .ok_or_else(|| LayoutError::NotFound {
                kind: "Annotation",
                id: id.to_string(),
            })
    }

    /// The displayed image changed size; rescale every live annotation.
    ///
    /// Display values are rescaled directly so no rounding is introduced.
    pub fn resize_viewport(&mut self, display: Size<DisplaySpace>) {
        let old = self.scale;
        let new = Scale::between(self.image, display);
        let (fx, fy) = (new.x / old.x, new.y / old.y);
        let (ft, fs) = (new.text() / old.text(), new.stroke() / old.stroke());

        self.store.rescale_all(|a| {
            a.rect = Rect::new(
                a.rect.x * fx,
                a.rect.y * fy,
                a.rect.width * fx,
                a.rect.height * fy,
            );
            a.kind = a.kind.map_scalars(|size| size * ft, |width| width * fs);
        });

        self.display = display;
        self.scale = new;
        self.photo.display_size = Some(display);
    }

    // =========================================================================
    // Saving
    // =========================================================================

    /// Live annotations projected into original space
    pub fn commit(&self) -> Vec<Annotation<OriginalSpace>> {
        self.store
            .list()
            .iter()
            .map(|a| a.to_original(self.scale, self.image))
            .collect()
    }

    /// Copy of the photo with the committed annotations
    pub fn committed_photo(&self) -> Photo {
        Photo {
            annotations: self.commit(),
            ..self.photo.clone()
        }
    }

    pub fn into_photo(mut self) -> Photo {
        self.photo.annotations = self.commit();
        self.photo
    }

    /// Write the committed photo back into `project`
    pub fn save_into(&self, project: &mut Project) -> Result<()> {
        project.update_photo(self.committed_photo())?;
        log::info!(
            "Saved {} annotation(s) on photo {}",
            self.store.len(),
            self.photo.id
        );
        Ok(())
    }

    // =========================================================================
    // Cropping
    // =========================================================================

    /// Start cropping the image as currently displayed
    pub fn begin_crop(&self, engine: &mut CropEngine) {
        engine.activate(self.display);
    }

    /// Commit pending edits, crop the photo and reopen on the cropped image
    /// displayed at `display`.
    ///
    /// On failure the session keeps editing the uncropped image.
    pub async fn apply_crop<B: RasterBackend>(
        &mut self,
        engine: &mut CropEngine,
        backend: &B,
        display: Size<DisplaySpace>,
    ) -> Result<CropOutcome> {
        self.photo.annotations = self.commit();
        let outcome = engine.apply(&mut self.photo, backend).await?;
        self.image = outcome.size;
        self.project_from_photo(display);
        Ok(outcome)
    }
}
