use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Invalid page number: {0}")]
    InvalidPageNumber(String),
    #[error("The selected area is too small ({width:.0}x{height:.0}, minimum {min:.0}x{min:.0})")]
    CropTooSmall { width: f64, height: f64, min: f64 },
    #[error("Nothing selected to crop")]
    NothingSelected,
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
    #[error("Could not load image: {0}")]
    Decode(String),
    #[error("Invalid project file: {0}")]
    InvalidProject(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("No pages to export")]
    NoPages,
}

pub type Result<T> = std::result::Result<T, LayoutError>;

/// Broad failure category, used by callers to decide how to present an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed user input; nothing was changed
    Validation,
    /// A referenced id or index does not exist
    NotFound,
    /// An image could not be read or decoded
    Decode,
    /// A project document could not be read
    Serialization,
    /// Filesystem, encoder or runtime failure
    Io,
}

impl LayoutError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LayoutError::InvalidPageNumber(_)
            | LayoutError::CropTooSmall { .. }
            | LayoutError::NothingSelected
            | LayoutError::InvalidLayout(_)
            | LayoutError::Config(_) => ErrorKind::Validation,
            LayoutError::NotFound { .. } | LayoutError::NoPages => ErrorKind::NotFound,
            LayoutError::Decode(_) => ErrorKind::Decode,
            LayoutError::InvalidProject(_) => ErrorKind::Serialization,
            LayoutError::Io(_)
            | LayoutError::Image(_)
            | LayoutError::Pdf(_)
            | LayoutError::TaskJoin(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn photo_not_found(id: impl Into<String>) -> Self {
        LayoutError::NotFound {
            kind: "Photo",
            id: id.into(),
        }
    }

    pub(crate) fn page_not_found(page_index: usize) -> Self {
        LayoutError::NotFound {
            kind: "Page",
            id: (page_index + 1).to_string(),
        }
    }
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Fresh random identifier
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(
    /// Stable identifier of a photo or placeholder slot
    PhotoId
);

string_id!(
    /// Identifier of an annotation, unique within its photo
    AnnotationId
);

/// Paper orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    /// Portrait: height > width
    #[default]
    Portrait,
    /// Landscape: width > height
    Landscape,
}

/// Paper sizes offered for export and print
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PaperSize {
    #[default]
    A4,
    Letter,
    Legal,
    Custom { width_mm: f32, height_mm: f32 },
}

impl PaperSize {
    /// Get base dimensions (always portrait: width < height for standard sizes)
    pub fn dimensions_mm(self) -> (f32, f32) {
        match self {
            PaperSize::A4 => (210.0, 297.0),
            PaperSize::Letter => (215.9, 279.4),
            PaperSize::Legal => (215.9, 355.6),
            PaperSize::Custom {
                width_mm,
                height_mm,
            } => (width_mm, height_mm),
        }
    }

    /// Get dimensions with orientation applied
    pub fn dimensions_with_orientation(self, orientation: Orientation) -> (f32, f32) {
        let (w, h) = self.dimensions_mm();
        match orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }
}

/// Page margin presets for export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarginPreset {
    #[default]
    Default,
    None,
    Narrow,
    Wide,
}

impl MarginPreset {
    /// Uniform margin on every side of the page
    pub fn margin_mm(self) -> f32 {
        match self {
            MarginPreset::Default => 10.0,
            MarginPreset::None => 0.0,
            MarginPreset::Narrow => 5.0,
            MarginPreset::Wide => 20.0,
        }
    }
}

mod serde_impls {
    use super::*;

    impl Serialize for PaperSize {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            use serde::ser::SerializeStruct;
            match self {
                PaperSize::A4 => serializer.serialize_str("A4"),
                PaperSize::Letter => serializer.serialize_str("Letter"),
                PaperSize::Legal => serializer.serialize_str("Legal"),
                PaperSize::Custom {
                    width_mm,
                    height_mm,
                } => {
                    let mut s = serializer.serialize_struct("Custom", 2)?;
                    s.serialize_field("width_mm", width_mm)?;
                    s.serialize_field("height_mm", height_mm)?;
                    s.end()
                }
            }
        }
    }

    impl<'de> Deserialize<'de> for PaperSize {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            use serde::de::{self, MapAccess, Visitor};
            use std::fmt;

            struct PaperSizeVisitor;

            impl<'de> Visitor<'de> for PaperSizeVisitor {
                type Value = PaperSize;

                fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                    formatter.write_str("a paper size")
                }

                fn visit_str<E>(self, value: &str) -> std::result::Result<PaperSize, E>
                where
                    E: de::Error,
                {
                    match value.to_ascii_lowercase().as_str() {
                        "a4" => Ok(PaperSize::A4),
                        "letter" => Ok(PaperSize::Letter),
                        "legal" => Ok(PaperSize::Legal),
                        _ => Err(de::Error::unknown_variant(
                            value,
                            &["A4", "Letter", "Legal", "Custom"],
                        )),
                    }
                }

                fn visit_map<M>(self, mut map: M) -> std::result::Result<PaperSize, M::Error>
                where
                    M: MapAccess<'de>,
                {
                    let mut width_mm = None;
                    let mut height_mm = None;

                    while let Some(key) = map.next_key::<String>()? {
                        match key.as_str() {
                            "width_mm" => width_mm = Some(map.next_value()?),
                            "height_mm" => height_mm = Some(map.next_value()?),
                            _ => {
                                let _: serde::de::IgnoredAny = map.next_value()?;
                            }
                        }
                    }

                    match (width_mm, height_mm) {
                        (Some(w), Some(h)) => Ok(PaperSize::Custom {
                            width_mm: w,
                            height_mm: h,
                        }),
                        _ => Err(de::Error::missing_field("width_mm or height_mm")),
                    }
                }
            }

            deserializer.deserialize_any(PaperSizeVisitor)
        }
    }
}
