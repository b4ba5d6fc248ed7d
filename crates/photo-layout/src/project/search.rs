//! Find and replace across page titles and slot texts
//!
//! Matching is case-insensitive and non-overlapping. Fields are visited in
//! page order: each page's title first, then the texts of the photos on it.
//! Match offsets are byte ranges into the field's current text.

use super::Project;
use crate::types::*;

/// A piece of user text that can be searched
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TextField {
    /// Title of the page with this 0-based index
    PageTitle(usize),
    /// Text shown under a photo
    PhotoText(PhotoId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMatch {
    pub field: TextField,
    pub start: usize,
    pub end: usize,
}

/// Byte ranges of every case-insensitive occurrence of `needle`
pub fn find_occurrences(haystack: &str, needle: &str) -> Vec<(usize, usize)> {
    let needle: Vec<char> = needle.chars().collect();
    let mut found = Vec::new();
    if needle.is_empty() {
        return found;
    }

    let mut from = 0;
    while from < haystack.len() {
        let rest = &haystack[from..];
        match match_len(rest, &needle) {
            Some(len) => {
                found.push((from, from + len));
                from += len;
            }
            None => from += rest.chars().next().map_or(1, char::len_utf8),
        }
    }
    found
}

/// Length in bytes of the prefix of `text` that matches `needle`
fn match_len(text: &str, needle: &[char]) -> Option<usize> {
    let mut chars = text.char_indices();
    for n in needle {
        let (_, c) = chars.next()?;
        if !c.to_lowercase().eq(n.to_lowercase()) {
            return None;
        }
    }
    Some(chars.next().map_or(text.len(), |(i, _)| i))
}

impl Project {
    fn searchable_fields(&self) -> Vec<(TextField, &str)> {
        let mut fields = Vec::new();
        for page in self.pages() {
            if let Some(title) = page.title {
                fields.push((TextField::PageTitle(page.page_index()), title));
            }
            for photo in page.photos {
                let text = self.photo_text(&photo.id);
                if !text.is_empty() {
                    fields.push((TextField::PhotoText(photo.id.clone()), text));
                }
            }
        }
        fields
    }

    pub fn field_text(&self, field: &TextField) -> Option<&str> {
        match field {
            TextField::PageTitle(page_index) => self.title(*page_index),
            TextField::PhotoText(id) => self.photo_texts.get(id).map(String::as_str),
        }
    }

    fn set_field_text(&mut self, field: &TextField, text: String) {
        match field {
            TextField::PageTitle(page_index) => self.set_title(*page_index, &text),
            TextField::PhotoText(id) => self.set_photo_text(id, text),
        }
    }

    /// Every occurrence of `query`; a blank query finds nothing
    pub fn find_text(&self, query: &str) -> Vec<TextMatch> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        self.searchable_fields()
            .into_iter()
            .flat_map(|(field, text)| {
                find_occurrences(text, query)
                    .into_iter()
                    .map(move |(start, end)| TextMatch {
                        field: field.clone(),
                        start,
                        end,
                    })
            })
            .collect()
    }

    /// Replace the text covered by one match.
    ///
    /// Fails with `NotFound` when the field no longer holds text at that
    /// range, for example after an earlier replacement shifted it.
    pub fn replace_match(&mut self, found: &TextMatch, replacement: &str) -> Result<()> {
        let text = self
            .field_text(&found.field)
            .filter(|t| t.get(found.start..found.end).is_some())
            .ok_or_else(|| LayoutError::NotFound {
                kind: "Text match",
                id: format!("{:?}@{}", found.field, found.start),
            })?;

        let mut updated = String::with_capacity(text.len() + replacement.len());
        updated.push_str(&text[..found.start]);
        updated.push_str(replacement);
        updated.push_str(&text[found.end..]);
        self.set_field_text(&found.field, updated);
        Ok(())
    }

    /// Replace every occurrence of `query`; returns the number replaced
    pub fn replace_all(&mut self, query: &str, replacement: &str) -> usize {
        if query.trim().is_empty() {
            return 0;
        }

        let mut count = 0;
        let edits: Vec<(TextField, String)> = self
            .searchable_fields()
            .into_iter()
            .filter_map(|(field, text)| {
                let found = find_occurrences(text, query);
                if found.is_empty() {
                    return None;
                }
                count += found.len();

                let mut updated = String::with_capacity(text.len());
                let mut last = 0;
                for (start, end) in found {
                    updated.push_str(&text[last..start]);
                    updated.push_str(replacement);
                    last = end;
                }
                updated.push_str(&text[last..]);
                Some((field, updated))
            })
            .collect();

        for (field, text) in edits {
            self.set_field_text(&field, text);
        }
        log::info!("Replaced {} occurrence(s) of '{}'", count, query);
        count
    }
}

/// Find state with a cursor over the matches, wrapping at both ends
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextSearch {
    query: String,
    matches: Vec<TextMatch>,
    current: Option<usize>,
}

impl TextSearch {
    /// Search `project` and put the cursor on the first match
    pub fn new(project: &Project, query: impl Into<String>) -> Self {
        let query = query.into();
        let matches = project.find_text(&query);
        let current = (!matches.is_empty()).then_some(0);
        Self {
            query,
            matches,
            current,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn matches(&self) -> &[TextMatch] {
        &self.matches
    }

    pub fn current(&self) -> Option<&TextMatch> {
        self.current.and_then(|i| self.matches.get(i))
    }

    pub fn find_next(&mut self) -> Option<&TextMatch> {
        let len = self.matches.len();
        self.current = self.current.map(|i| (i + 1) % len);
        self.current()
    }

    pub fn find_previous(&mut self) -> Option<&TextMatch> {
        let len = self.matches.len();
        self.current = self.current.map(|i| (i + len - 1) % len);
        self.current()
    }

    /// Replace the current match and search again. The cursor stays at the
    /// same position, which now holds the following match.
    pub fn replace_current(&mut self, project: &mut Project, replacement: &str) -> Result<()> {
        let Some(found) = self.current().cloned() else {
            return Ok(());
        };
        project.replace_match(&found, replacement)?;

        let position = self.current.unwrap_or(0);
        self.matches = project.find_text(&self.query);
        self.current = match self.matches.len() {
            0 => None,
            len => Some(position.min(len - 1)),
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_occurrences_ignore_case() {
        assert_eq!(find_occurrences("Cat cAT cat", "cat"), vec![(0, 3), (4, 7), (8, 11)]);
        assert_eq!(find_occurrences("aaaa", "aa"), vec![(0, 2), (2, 4)]);
        assert!(find_occurrences("dog", "cat").is_empty());
        assert!(find_occurrences("dog", "").is_empty());
    }

    #[test]
    fn test_occurrences_keep_byte_offsets() {
        let text = "Café CAFÉ";
        let found = find_occurrences(text, "café");
        assert_eq!(found, vec![(0, 5), (6, 11)]);
        assert_eq!(&text[found[1].0..found[1].1], "CAFÉ");

        assert_eq!(find_occurrences("رحلة الصيف", "الصيف"), vec![(9, 19)]);
    }
}
