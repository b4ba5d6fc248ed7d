use crate::types::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Photo and text slot configuration of a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Layout {
    /// One photo
    #[serde(rename = "1")]
    One,
    /// Two photos stacked
    #[serde(rename = "2")]
    Two,
    /// Four photos in a 2x2 grid
    #[default]
    #[serde(rename = "4")]
    Four,
    /// One photo with a text box
    #[serde(rename = "1text")]
    OneText,
    /// Two photos, each with a text box
    #[serde(rename = "2text")]
    TwoText,
}

impl Layout {
    pub const ALL: [Layout; 5] = [
        Layout::One,
        Layout::Two,
        Layout::Four,
        Layout::OneText,
        Layout::TwoText,
    ];

    /// Number of photo slots on a page with this layout
    pub fn photo_count(self) -> usize {
        match self {
            Layout::One | Layout::OneText => 1,
            Layout::Two | Layout::TwoText => 2,
            Layout::Four => 4,
        }
    }

    /// Whether each photo slot is accompanied by a text box
    pub fn has_text(self) -> bool {
        matches!(self, Layout::OneText | Layout::TwoText)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Layout::One => "1",
            Layout::Two => "2",
            Layout::Four => "4",
            Layout::OneText => "1text",
            Layout::TwoText => "2text",
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Layout {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self> {
        Layout::ALL
            .into_iter()
            .find(|l| l.as_str() == s.trim())
            .ok_or_else(|| LayoutError::InvalidLayout(s.to_string()))
    }
}

/// Slot count for a layout name, falling back to `default` for names that
/// are not recognized
pub fn photos_for_layout(layout: &str, default: Layout) -> usize {
    match layout.parse::<Layout>() {
        Ok(l) => l.photo_count(),
        Err(_) => {
            log::warn!(
                "Unknown layout '{}', using default layout {}",
                layout,
                default
            );
            default.photo_count()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_counts() {
        assert_eq!(Layout::One.photo_count(), 1);
        assert_eq!(Layout::OneText.photo_count(), 1);
        assert_eq!(Layout::Two.photo_count(), 2);
        assert_eq!(Layout::TwoText.photo_count(), 2);
        assert_eq!(Layout::Four.photo_count(), 4);
    }

    #[test]
    fn test_parse_and_fallback() {
        assert_eq!("2text".parse::<Layout>().unwrap(), Layout::TwoText);
        assert!("3".parse::<Layout>().is_err());
        assert_eq!(photos_for_layout("1text", Layout::Four), 1);
        assert_eq!(photos_for_layout("bogus", Layout::Two), 2);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Layout::OneText).unwrap();
        assert_eq!(json, "\"1text\"");
        let back: Layout = serde_json::from_str("\"4\"").unwrap();
        assert_eq!(back, Layout::Four);
    }
}
