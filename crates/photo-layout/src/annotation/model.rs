use crate::constants::TEXT_PLACEHOLDER;
use crate::geometry::*;
use crate::types::AnnotationId;
use serde::{Deserialize, Serialize};

/// Outline drawn by a shape annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Rectangle,
    Circle,
    Line,
    Arrow,
}

/// Fill value meaning "no fill"
pub const TRANSPARENT: &str = "transparent";

/// Content specific to each annotation type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AnnotationKind {
    Text {
        text: String,
        /// Font size, in the same unit as the annotation rectangle
        #[serde(deserialize_with = "serde_impls::lenient_f64")]
        size: f64,
        font: String,
    },
    Shape {
        shape: ShapeKind,
        /// Stroke width, in the same unit as the annotation rectangle
        #[serde(rename = "widthValue", deserialize_with = "serde_impls::lenient_f64")]
        width_value: f64,
        /// `"transparent"` or a color
        fill: String,
    },
}

/// A text or shape overlay on a photo, expressed in coordinate space `S`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Annotation<S: Space> {
    pub id: AnnotationId,
    #[serde(flatten)]
    pub rect: Rect<S>,
    pub color: String,
    /// Stored but not applied when drawing
    #[serde(default)]
    pub rotation: f64,
    #[serde(flatten)]
    pub kind: AnnotationKind,
}

impl<S: Space> Annotation<S> {
    pub fn is_text(&self) -> bool {
        matches!(self.kind, AnnotationKind::Text { .. })
    }

    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            AnnotationKind::Text { text, .. } => Some(text),
            AnnotationKind::Shape { .. } => None,
        }
    }

    pub fn shape(&self) -> Option<ShapeKind> {
        match self.kind {
            AnnotationKind::Shape { shape, .. } => Some(shape),
            AnnotationKind::Text { .. } => None,
        }
    }
}

impl Annotation<OriginalSpace> {
    /// Project into display space for editing
    pub fn to_display(&self, scale: Scale) -> Annotation<DisplaySpace> {
        Annotation {
            id: self.id.clone(),
            rect: to_display(&self.rect, scale),
            color: self.color.clone(),
            rotation: self.rotation,
            kind: self.kind.map_scalars(
                |size| font_to_display(size, scale),
                |width| stroke_to_display(width, scale),
            ),
        }
    }
}

impl Annotation<DisplaySpace> {
    /// Project back into original space, rounding and clamping into `image`
    pub fn to_original(&self, scale: Scale, image: Size<OriginalSpace>) -> Annotation<OriginalSpace> {
        Annotation {
            id: self.id.clone(),
            rect: to_original(&self.rect, scale, image),
            color: self.color.clone(),
            rotation: self.rotation,
            kind: self.kind.map_scalars(
                |size| font_to_original(size, scale),
                |width| stroke_to_original(width, scale),
            ),
        }
    }
}

impl AnnotationKind {
    /// Rewrite the font size (text) or stroke width (shape)
    pub(crate) fn map_scalars(
        &self,
        scale_font: impl FnOnce(f64) -> f64,
        scale_stroke: impl FnOnce(f64) -> f64,
    ) -> AnnotationKind {
        match self {
            AnnotationKind::Text { text, size, font } => AnnotationKind::Text {
                text: text.clone(),
                size: scale_font(*size),
                font: font.clone(),
            },
            AnnotationKind::Shape {
                shape,
                width_value,
                fill,
            } => AnnotationKind::Shape {
                shape: *shape,
                width_value: scale_stroke(*width_value),
                fill: fill.clone(),
            },
        }
    }
}

/// Input to [`AnnotationStore::add`](super::AnnotationStore::add).
/// Placement is decided by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAnnotation<S: Space> {
    pub rect: Rect<S>,
    pub color: String,
    pub kind: AnnotationKind,
}

impl<S: Space> NewAnnotation<S> {
    /// Text annotation. Empty text is replaced by the edit placeholder.
    pub fn text(
        rect: Rect<S>,
        text: impl Into<String>,
        size: f64,
        font: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        let text = text.into();
        let text = if text.trim().is_empty() {
            TEXT_PLACEHOLDER.to_string()
        } else {
            text
        };
        Self {
            rect,
            color: color.into(),
            kind: AnnotationKind::Text {
                text,
                size,
                font: font.into(),
            },
        }
    }

    pub fn shape(
        rect: Rect<S>,
        shape: ShapeKind,
        width_value: f64,
        fill: Option<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            rect,
            color: color.into(),
            kind: AnnotationKind::Shape {
                shape,
                width_value,
                fill: fill.unwrap_or_else(|| TRANSPARENT.to_string()),
            },
        }
    }

    pub(crate) fn build(self) -> Annotation<S> {
        Annotation {
            id: AnnotationId::new(),
            rect: self.rect,
            color: self.color,
            rotation: 0.0,
            kind: self.kind,
        }
    }
}

/// Partial update merged by [`AnnotationStore::update`](super::AnnotationStore::update).
///
/// Fields that do not apply to the annotation's type are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationPatch<S: Space> {
    pub rect: Option<Rect<S>>,
    pub color: Option<String>,
    pub text: Option<String>,
    pub size: Option<f64>,
    pub font: Option<String>,
    pub shape: Option<ShapeKind>,
    pub width_value: Option<f64>,
    pub fill: Option<String>,
}

impl<S: Space> AnnotationPatch<S> {
    pub fn rect(rect: Rect<S>) -> Self {
        Self {
            rect: Some(rect),
            ..Default::default()
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn apply(self, target: &mut Annotation<S>) {
        if let Some(rect) = self.rect {
            target.rect = rect;
        }
        if let Some(color) = self.color {
            target.color = color;
        }
        match &mut target.kind {
            AnnotationKind::Text { text, size, font } => {
                if let Some(t) = self.text {
                    *text = t;
                }
                if let Some(s) = self.size {
                    *size = s;
                }
                if let Some(f) = self.font {
                    *font = f;
                }
            }
            AnnotationKind::Shape {
                shape,
                width_value,
                fill,
            } => {
                if let Some(s) = self.shape {
                    *shape = s;
                }
                if let Some(w) = self.width_value {
                    *width_value = w;
                }
                if let Some(f) = self.fill {
                    *fill = f;
                }
            }
        }
    }
}

mod serde_impls {
    use serde::de::{self, Visitor};
    use std::fmt;

    /// Accept numbers written either as JSON numbers or as numeric strings
    /// ("24"), which is how form inputs hand them over.
    pub(super) fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct NumberVisitor;

        impl<'de> Visitor<'de> for NumberVisitor {
            type Value = f64;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a number or a numeric string")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<f64, E> {
                Ok(v)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<f64, E> {
                Ok(v as f64)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<f64, E> {
                Ok(v as f64)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<f64, E> {
                v.trim()
                    .parse()
                    .map_err(|_| de::Error::invalid_value(de::Unexpected::Str(v), &self))
            }
        }

        deserializer.deserialize_any(NumberVisitor)
    }
}
