//! Working state of a photo-layout project
//!
//! [`Project`] owns the flat photo list and the id- and page-keyed side
//! tables. Pages are derived on demand with [`Project::pages`]; every
//! structural operation edits the list and the maps, and the next call to
//! `pages` reflects it.

mod document;
mod io;
mod photo;
mod search;
mod structure;

pub use document::*;
pub use photo::*;
pub use search::*;
pub use structure::*;

use crate::pages::*;
use crate::types::*;
use std::collections::{BTreeMap, BTreeSet};

/// A page as seen by a renderer
#[derive(Debug, Clone, PartialEq)]
pub struct PageView<'a> {
    pub slice: PageSlice,
    pub photos: &'a [Photo],
    pub title: Option<&'a str>,
    /// Text under each photo; only filled for text layouts
    pub texts: Vec<&'a str>,
}

impl PageView<'_> {
    pub fn page_index(&self) -> usize {
        self.slice.page_index
    }

    pub fn layout(&self) -> Layout {
        self.slice.layout
    }

    pub fn empty_slots(&self) -> usize {
        self.slice.empty_slots()
    }
}

/// Photos, annotations and page configuration of one project
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    photos: Vec<Photo>,
    photo_texts: BTreeMap<PhotoId, String>,
    saved_titles: BTreeMap<usize, String>,
    rotations: BTreeMap<PhotoId, i32>,
    page_layouts: BTreeMap<usize, Layout>,
    layout: Layout,
    global_title: String,
    start_page_number: u32,
    sections: Sections,
}

impl Default for Project {
    fn default() -> Self {
        Self::new()
    }
}

impl Project {
    pub fn new() -> Self {
        Self::with_sections(Sections::default())
    }

    pub fn with_sections(sections: Sections) -> Self {
        Self {
            photos: Vec::new(),
            photo_texts: BTreeMap::new(),
            saved_titles: BTreeMap::new(),
            rotations: BTreeMap::new(),
            page_layouts: BTreeMap::new(),
            layout: Layout::default(),
            global_title: String::new(),
            start_page_number: 1,
            sections,
        }
    }

    // =========================================================================
    // Pages
    // =========================================================================

    /// Current page partition
    pub fn distribution(&self) -> Vec<PageSlice> {
        distribute(self.photos.len(), &self.page_layouts, self.layout)
    }

    pub fn total_pages(&self) -> usize {
        self.distribution().len()
    }

    /// Pages with their photos, titles and slot texts
    pub fn pages(&self) -> Vec<PageView<'_>> {
        self.distribution()
            .into_iter()
            .map(|slice| self.page_view(slice))
            .collect()
    }

    pub fn page(&self, page_index: usize) -> Option<PageView<'_>> {
        self.distribution()
            .into_iter()
            .nth(page_index)
            .map(|slice| self.page_view(slice))
    }

    fn page_view(&self, slice: PageSlice) -> PageView<'_> {
        let photos = &self.photos[slice.range()];
        let texts = if slice.layout.has_text() {
            photos.iter().map(|p| self.photo_text(&p.id)).collect()
        } else {
            Vec::new()
        };
        PageView {
            slice,
            photos,
            title: self.title(slice.page_index),
            texts,
        }
    }

    pub fn sections(&self) -> &Sections {
        &self.sections
    }

    pub fn sections_mut(&mut self) -> &mut Sections {
        &mut self.sections
    }

    pub fn total_sections(&self) -> usize {
        self.sections.total(self.total_pages())
    }

    /// Pages of the current section
    pub fn visible_pages(&self) -> Vec<PageView<'_>> {
        let range = self.sections.page_range(self.total_pages());
        self.pages()
            .into_iter()
            .skip(range.start)
            .take(range.len())
            .collect()
    }

    // =========================================================================
    // Photos
    // =========================================================================

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn photo(&self, id: &PhotoId) -> Option<&Photo> {
        self.photos.iter().find(|p| &p.id == id)
    }

    pub fn photo_index(&self, id: &PhotoId) -> Option<usize> {
        self.photos.iter().position(|p| &p.id == id)
    }

    pub fn add_photos(&mut self, photos: impl IntoIterator<Item = Photo>) {
        let before = self.photos.len();
        self.photos.extend(photos);
        log::info!("Added {} photo(s)", self.photos.len() - before);
    }

    /// Insert a batch at `index` (clamped to the list), ordered by name
    pub fn insert_photos_at(&mut self, index: usize, mut photos: Vec<Photo>) {
        photos.sort_by_key(|p| p.sort_key());
        let index = index.min(self.photos.len());
        log::info!("Inserting {} photo(s) at {}", photos.len(), index);
        self.photos.splice(index..index, photos);
    }

    /// Remove a photo together with its text and rotation
    pub fn delete_photo(&mut self, id: &PhotoId) -> Result<Photo> {
        let index = self
            .photo_index(id)
            .ok_or_else(|| LayoutError::photo_not_found(id.as_str()))?;
        self.photo_texts.remove(id);
        self.rotations.remove(id);
        let removed = self.photos.remove(index);
        self.sections.clamp(self.total_pages());
        Ok(removed)
    }

    pub fn move_photo(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.photos.len();
        if from >= len || to >= len {
            return Err(LayoutError::NotFound {
                kind: "Photo position",
                id: from.max(to).to_string(),
            });
        }
        if from != to {
            let photo = self.photos.remove(from);
            self.photos.insert(to, photo);
        }
        Ok(())
    }

    /// Stable sort of the whole photo list. Photos without a file date or
    /// size keep their relative order after the ones that have one.
    pub fn sort_photos(&mut self, key: SortKey) {
        match key {
            SortKey::Name => self.photos.sort_by_key(|p| p.sort_key()),
            SortKey::Date => self
                .photos
                .sort_by_key(|p| (p.last_modified.is_none(), p.last_modified)),
            SortKey::Size => self
                .photos
                .sort_by_key(|p| (p.file_size.is_none(), p.file_size)),
        }
        log::info!("Sorted {} photo(s) by {:?}", self.photos.len(), key);
    }

    /// Remove every photo in `ids` with its text and rotation; returns how
    /// many were removed. Unknown ids are ignored.
    pub fn delete_photos(&mut self, ids: &BTreeSet<PhotoId>) -> usize {
        let before = self.photos.len();
        self.photos.retain(|p| !ids.contains(&p.id));
        for id in ids {
            self.photo_texts.remove(id);
            self.rotations.remove(id);
        }
        let removed = before - self.photos.len();
        self.sections.clamp(self.total_pages());
        log::info!("Deleted {} photo(s)", removed);
        removed
    }

    /// Rotate every photo in `ids` by `degrees`; returns how many turned
    pub fn rotate_photos(&mut self, ids: &BTreeSet<PhotoId>, degrees: i32) -> usize {
        let targets: Vec<PhotoId> = self
            .photos
            .iter()
            .filter(|p| ids.contains(&p.id))
            .map(|p| p.id.clone())
            .collect();
        for id in &targets {
            // Only known ids are collected
            let _ = self.rotate_photo(id, degrees);
        }
        log::info!("Rotated {} photo(s) by {}°", targets.len(), degrees);
        targets.len()
    }

    /// Insert a copy right after each photo in `ids`, carrying its text
    /// and rotation. Returns the ids of the copies in list order.
    pub fn duplicate_photos(&mut self, ids: &BTreeSet<PhotoId>) -> Vec<PhotoId> {
        let mut photos = Vec::with_capacity(self.photos.len());
        let mut copies = Vec::new();
        for photo in std::mem::take(&mut self.photos) {
            let copy = ids.contains(&photo.id).then(|| photo.duplicate());
            if let Some(copy) = &copy {
                if let Some(text) = self.photo_texts.get(&photo.id).cloned() {
                    self.photo_texts.insert(copy.id.clone(), text);
                }
                if let Some(rotation) = self.rotations.get(&photo.id).copied() {
                    self.rotations.insert(copy.id.clone(), rotation);
                }
                copies.push(copy.id.clone());
            }
            photos.push(photo);
            photos.extend(copy);
        }
        self.photos = photos;
        log::info!("Duplicated {} photo(s)", copies.len());
        copies
    }

    /// Put a new image into an existing slot. Text and rotation stay;
    /// annotations belonged to the old image and are dropped.
    pub fn replace_photo(
        &mut self,
        id: &PhotoId,
        src: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<&Photo> {
        let photo = self.photo_mut(id)?;
        let name = name.into();
        photo.src = src.into();
        photo.file_name = name.clone();
        photo.name = name;
        photo.is_empty = false;
        photo.annotations.clear();
        photo.original_width = None;
        photo.original_height = None;
        photo.last_modified = None;
        photo.file_size = None;
        photo.display_size = None;
        Ok(&*photo)
    }

    /// Store an edited photo back under its id
    pub fn update_photo(&mut self, photo: Photo) -> Result<()> {
        let slot = self.photo_mut(&photo.id)?;
        *slot = photo;
        Ok(())
    }

    pub(crate) fn photo_mut(&mut self, id: &PhotoId) -> Result<&mut Photo> {
        self.photos
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| LayoutError::photo_not_found(id.as_str()))
    }

    /// Drop every photo and all page-keyed state. The global layout and
    /// title are settings and survive.
    pub fn clear_all(&mut self) {
        log::info!("Clearing {} photo(s)", self.photos.len());
        self.photos.clear();
        self.photo_texts.clear();
        self.saved_titles.clear();
        self.rotations.clear();
        self.page_layouts.clear();
        self.sections.reset();
    }

    // =========================================================================
    // Side tables
    // =========================================================================

    /// Text shown below a photo in text layouts; empty text removes it
    pub fn set_photo_text(&mut self, id: &PhotoId, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            self.photo_texts.remove(id);
        } else {
            self.photo_texts.insert(id.clone(), text);
        }
    }

    pub fn photo_text(&self, id: &PhotoId) -> &str {
        self.photo_texts.get(id).map(String::as_str).unwrap_or("")
    }

    pub fn photo_texts(&self) -> &BTreeMap<PhotoId, String> {
        &self.photo_texts
    }

    /// Add `degrees` to the photo's rotation and return the new total,
    /// kept in `[0, 360)`
    pub fn rotate_photo(&mut self, id: &PhotoId, degrees: i32) -> Result<i32> {
        if self.photo(id).is_none() {
            return Err(LayoutError::photo_not_found(id.as_str()));
        }
        let total = self.rotations.entry(id.clone()).or_insert(0);
        *total = (total.rem_euclid(360) + degrees.rem_euclid(360)) % 360;
        let total = *total;
        if total == 0 {
            self.rotations.remove(id);
        }
        Ok(total)
    }

    pub fn rotation(&self, id: &PhotoId) -> i32 {
        self.rotations.get(id).copied().unwrap_or(0)
    }

    pub fn rotations(&self) -> &BTreeMap<PhotoId, i32> {
        &self.rotations
    }

    /// Set a page title. Surrounding whitespace is trimmed and an empty
    /// title removes the entry.
    pub fn set_title(&mut self, page_index: usize, title: &str) {
        let title = title.trim();
        if title.is_empty() {
            self.saved_titles.remove(&page_index);
        } else {
            self.saved_titles.insert(page_index, title.to_string());
        }
    }

    pub fn title(&self, page_index: usize) -> Option<&str> {
        self.saved_titles.get(&page_index).map(String::as_str)
    }

    pub fn saved_titles(&self) -> &BTreeMap<usize, String> {
        &self.saved_titles
    }

    // =========================================================================
    // Layout settings
    // =========================================================================

    /// Override (or with `None`, reset) the layout of one page
    pub fn set_page_layout(&mut self, page_index: usize, layout: Option<Layout>) {
        match layout {
            Some(l) => {
                log::info!("Page {} layout set to {}", page_index + 1, l);
                self.page_layouts.insert(page_index, l);
            }
            None => {
                self.page_layouts.remove(&page_index);
            }
        }
        self.sections.clamp(self.total_pages());
    }

    pub fn page_layouts(&self) -> &BTreeMap<usize, Layout> {
        &self.page_layouts
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn set_global_layout(&mut self, layout: Layout) {
        self.layout = layout;
        self.sections.clamp(self.total_pages());
    }

    pub fn global_title(&self) -> &str {
        &self.global_title
    }

    pub fn set_global_title(&mut self, title: impl Into<String>) {
        self.global_title = title.into();
    }

    /// Copy the global title onto every page, replacing page titles.
    /// An empty global title clears them all.
    pub fn apply_global_title(&mut self) {
        let title = self.global_title.clone();
        for page_index in 0..self.total_pages() {
            self.set_title(page_index, &title);
        }
    }

    pub fn start_page_number(&self) -> u32 {
        self.start_page_number
    }

    /// Number printed on the first page; values below 1 become 1
    pub fn set_start_page_number(&mut self, number: u32) {
        self.start_page_number = number.max(1);
    }
}
