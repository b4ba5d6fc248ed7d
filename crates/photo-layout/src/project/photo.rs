use crate::annotation::Annotation;
use crate::geometry::{DisplaySpace, OriginalSpace, Size};
use crate::types::PhotoId;
use serde::{Deserialize, Serialize};

/// A photo in the project, or an empty placeholder reserving a slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: PhotoId,
    /// Image reference: a `data:` URL or a file path. Empty for placeholders.
    #[serde(default)]
    pub src: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub is_empty: bool,
    /// Always in original-image space outside of an edit session
    #[serde(default)]
    pub annotations: Vec<Annotation<OriginalSpace>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_height: Option<f64>,
    /// Modification time of the source file, in milliseconds since the epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<i64>,
    /// Size of the source file in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    /// Last rendered size; never persisted
    #[serde(skip)]
    pub display_size: Option<Size<DisplaySpace>>,
}

impl Photo {
    pub fn new(src: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: PhotoId::new(),
            src: src.into(),
            file_name: name.clone(),
            name,
            is_empty: false,
            annotations: Vec::new(),
            original_width: None,
            original_height: None,
            last_modified: None,
            file_size: None,
            display_size: None,
        }
    }

    /// Empty slot; `slot` is the 1-based position used in its name
    pub fn placeholder(slot: usize) -> Self {
        let mut photo = Self::new("", "");
        photo.make_placeholder(slot);
        photo
    }

    /// Record source file details used for sorting
    pub fn with_file_info(mut self, last_modified: Option<i64>, file_size: Option<u64>) -> Self {
        self.last_modified = last_modified;
        self.file_size = file_size;
        self
    }

    /// Record decoded pixel dimensions
    pub fn with_size(mut self, size: Size<OriginalSpace>) -> Self {
        self.set_original_size(size);
        self
    }

    /// Pixel dimensions, when known
    pub fn original_size(&self) -> Option<Size<OriginalSpace>> {
        match (self.original_width, self.original_height) {
            (Some(w), Some(h)) => Some(Size::new(w, h)),
            _ => None,
        }
    }

    pub fn set_original_size(&mut self, size: Size<OriginalSpace>) {
        self.original_width = Some(size.width);
        self.original_height = Some(size.height);
    }

    /// Copy with a fresh id
    pub fn duplicate(&self) -> Self {
        Self {
            id: PhotoId::new(),
            ..self.clone()
        }
    }

    /// Turn this entry into an empty slot, keeping its id
    pub(crate) fn make_placeholder(&mut self, slot: usize) {
        let name = format!("Empty Slot {}", slot);
        self.src.clear();
        self.file_name = name.clone();
        self.name = name;
        self.is_empty = true;
        self.annotations.clear();
        self.original_width = None;
        self.original_height = None;
        self.last_modified = None;
        self.file_size = None;
        self.display_size = None;
    }

    /// Key used when ordering photos by name
    pub(crate) fn sort_key(&self) -> String {
        let name = if self.name.is_empty() {
            &self.file_name
        } else {
            &self.name
        };
        name.to_lowercase()
    }
}

/// Order for [`Project::sort_photos`](super::Project::sort_photos)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Case-insensitive display name
    #[default]
    Name,
    /// File modification time, oldest first
    Date,
    /// File size, smallest first
    Size,
}
