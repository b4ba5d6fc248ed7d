//! The persisted project document
//!
//! Field names are the compatibility surface shared with other tools that
//! read and write project files, so they stay camelCase and page-keyed maps
//! keep their numeric string keys.

use super::{Photo, Project};
use crate::constants::PROJECT_VERSION;
use crate::pages::{Layout, Sections};
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn default_start_page() -> u32 {
    1
}

fn default_layout() -> String {
    Layout::default().as_str().to_string()
}

/// Serializable snapshot of a [`Project`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDocument {
    pub version: String,
    pub photos: Vec<Photo>,
    #[serde(default)]
    pub photo_texts: BTreeMap<PhotoId, String>,
    #[serde(default)]
    pub saved_titles: BTreeMap<usize, String>,
    #[serde(default)]
    pub rotations: BTreeMap<PhotoId, i32>,
    /// Kept as raw names so unknown layouts can fall back instead of failing
    #[serde(default)]
    pub page_layouts: BTreeMap<usize, String>,
    /// Global layout name
    #[serde(default = "default_layout")]
    pub layout: String,
    #[serde(default)]
    pub global_title: String,
    #[serde(default = "default_start_page")]
    pub custom_start_page_number: u32,
}

impl ProjectDocument {
    /// Parse a document, checking the required fields before anything else
    /// so a malformed file is rejected as a whole.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| LayoutError::InvalidProject(format!("not valid JSON: {}", e)))?;

        let version_ok = value
            .get("version")
            .is_some_and(|v| v.as_str().is_some_and(|s| !s.is_empty()));
        if !version_ok {
            return Err(LayoutError::InvalidProject("missing version".to_string()));
        }
        if !value.get("photos").is_some_and(|p| p.is_array()) {
            return Err(LayoutError::InvalidProject("missing photos".to_string()));
        }

        serde_json::from_value(value).map_err(|e| LayoutError::InvalidProject(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| LayoutError::InvalidProject(format!("Failed to serialize project: {}", e)))
    }
}

impl Project {
    /// Snapshot the working state
    pub fn to_document(&self) -> ProjectDocument {
        ProjectDocument {
            version: PROJECT_VERSION.to_string(),
            photos: self.photos.clone(),
            photo_texts: self.photo_texts.clone(),
            saved_titles: self.saved_titles.clone(),
            rotations: self.rotations.clone(),
            page_layouts: self
                .page_layouts
                .iter()
                .map(|(k, v)| (*k, v.as_str().to_string()))
                .collect(),
            layout: self.layout.as_str().to_string(),
            global_title: self.global_title.clone(),
            custom_start_page_number: self.start_page_number,
        }
    }

    /// Build a project from a document. Unknown layout names fall back to
    /// the global layout.
    pub fn from_document(doc: ProjectDocument, sections: Sections) -> Self {
        if doc.version != PROJECT_VERSION {
            log::debug!(
                "Loading project version {} (current {})",
                doc.version,
                PROJECT_VERSION
            );
        }

        let layout = doc.layout.parse().unwrap_or_else(|_| {
            log::warn!("Unknown global layout '{}', using {}", doc.layout, Layout::default());
            Layout::default()
        });

        let page_layouts = doc
            .page_layouts
            .into_iter()
            .filter_map(|(page, name)| match name.parse::<Layout>() {
                Ok(l) => Some((page, l)),
                Err(_) => {
                    log::warn!(
                        "Unknown layout '{}' on page {}, using global layout {}",
                        name,
                        page + 1,
                        layout
                    );
                    None
                }
            })
            .collect();

        let mut project = Project::with_sections(sections);
        project.photos = doc.photos;
        project.photo_texts = doc.photo_texts;
        project.saved_titles = doc.saved_titles;
        project.rotations = doc
            .rotations
            .into_iter()
            .map(|(id, degrees)| (id, degrees.rem_euclid(360)))
            .filter(|(_, degrees)| *degrees != 0)
            .collect();
        project.page_layouts = page_layouts;
        project.layout = layout;
        project.global_title = doc.global_title;
        project.start_page_number = doc.custom_start_page_number.max(1);
        project.sections.reset();
        project
    }

    pub fn to_json(&self) -> Result<String> {
        self.to_document().to_json()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::from_document(
            ProjectDocument::from_json(json)?,
            Sections::default(),
        ))
    }

    /// Replace all working state with the document in `json`.
    ///
    /// Nothing changes when the document is rejected. On success the view
    /// returns to the first section; the section size is kept.
    pub fn replace_from_json(&mut self, json: &str) -> Result<()> {
        let doc = ProjectDocument::from_json(json)?;
        let sections = Sections::new(self.sections.pages_per_section());
        *self = Self::from_document(doc, sections);
        log::info!("Loaded project with {} photo(s)", self.photos.len());
        Ok(())
    }
}
