//! Page-level edits: insert, duplicate and clear
//!
//! These operate on the photo list and shift the page-keyed maps
//! (`page_layouts`, `saved_titles`) so that every entry keeps pointing at the
//! same logical page after the edit.

use super::{Photo, Project};
use crate::pages::shift_keys_from;
use crate::types::*;
use std::fmt;
use std::str::FromStr;

/// Where [`Project::insert_page`] puts the new page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    Start,
    End,
    /// 1-based page number the new page will have
    At(usize),
}

impl FromStr for InsertPosition {
    type Err = LayoutError;

    /// Accepts `start`, `end` or a page number
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "start" => Ok(InsertPosition::Start),
            "end" => Ok(InsertPosition::End),
            _ => match parse_number(s)? {
                0 => Err(LayoutError::InvalidPageNumber(s.to_string())),
                n => Ok(InsertPosition::At(n)),
            },
        }
    }
}

impl InsertPosition {
    pub fn parse(s: &str) -> Result<Self> {
        s.parse()
    }
}

impl fmt::Display for InsertPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertPosition::Start => f.write_str("start"),
            InsertPosition::End => f.write_str("end"),
            InsertPosition::At(n) => write!(f, "{}", n),
        }
    }
}

/// Map Eastern Arabic (U+0660..U+0669) and Persian/Kurdish (U+06F0..U+06F9)
/// digits to ASCII; everything else is kept
pub fn western_digits(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            '\u{0660}'..='\u{0669}' => char::from(b'0' + (c as u32 - 0x0660) as u8),
            '\u{06F0}'..='\u{06F9}' => char::from(b'0' + (c as u32 - 0x06F0) as u8),
            _ => c,
        })
        .collect()
}

/// Parse a non-negative number typed by a user, in Western or Arabic digits
pub fn parse_number(input: &str) -> Result<usize> {
    let input = input.trim();
    western_digits(input)
        .parse::<usize>()
        .map_err(|_| LayoutError::InvalidPageNumber(input.to_string()))
}

/// Parse a 1-based page number typed by a user into a page index
pub fn parse_page_number(input: &str, total_pages: usize) -> Result<usize> {
    match parse_number(input)? {
        n if n >= 1 && n <= total_pages => Ok(n - 1),
        _ => Err(LayoutError::InvalidPageNumber(input.trim().to_string())),
    }
}

fn placeholders(slots: std::ops::Range<usize>) -> Vec<Photo> {
    slots.map(|i| Photo::placeholder(i + 1)).collect()
}

impl Project {
    /// Insert a page of empty slots sized for the global layout.
    ///
    /// Returns the index of the new page and scrolls the section window to
    /// it. Layout overrides and titles from the target page onward move one
    /// page later. When the new page goes after a partially filled last
    /// page, that page is padded first so the new one starts clean.
    pub fn insert_page(&mut self, position: InsertPosition) -> Result<usize> {
        let pages = self.distribution();
        let total = pages.len();

        let target = match position {
            InsertPosition::Start => 0,
            InsertPosition::End => total,
            InsertPosition::At(0) => {
                return Err(LayoutError::InvalidPageNumber("0".to_string()));
            }
            InsertPosition::At(n) if n > total + 1 => {
                return Err(LayoutError::InvalidPageNumber(n.to_string()));
            }
            InsertPosition::At(n) => n - 1,
        };

        // An empty project shows one virtual page; the inserted page replaces it.
        let target = if self.photos.is_empty() { 0 } else { target };

        let offset = if target < total && !self.photos.is_empty() {
            pages[target].start_index
        } else {
            if let Some(last) = pages.last().filter(|p| p.len > 0 && p.is_partial()) {
                let padding = placeholders(last.len..last.capacity());
                log::debug!(
                    "Padding page {} with {} empty slot(s)",
                    last.page_number(),
                    padding.len()
                );
                self.photos.extend(padding);
            }
            self.photos.len()
        };

        let count = self.layout.photo_count();
        self.photos.splice(offset..offset, placeholders(0..count));
        shift_keys_from(&mut self.page_layouts, target);
        shift_keys_from(&mut self.saved_titles, target);

        log::info!(
            "Inserted empty page {} ({} slot(s) at photo offset {})",
            target + 1,
            count,
            offset
        );
        self.sections.focus_page(target);
        Ok(target)
    }

    /// Copy a page right after itself.
    ///
    /// The copies get fresh ids and inherit text, rotation, layout and
    /// title. A partially filled last page is padded first so the copy
    /// always becomes a page of its own. Does nothing on a project without
    /// photos.
    pub fn duplicate_page(&mut self, page_index: usize) -> Result<()> {
        if self.photos.is_empty() {
            return Ok(());
        }
        let pages = self.distribution();
        let mut page = *pages
            .get(page_index)
            .ok_or_else(|| LayoutError::page_not_found(page_index))?;

        if page.is_partial() {
            let end = page.range().end;
            let padding = placeholders(page.len..page.capacity());
            log::debug!(
                "Padding page {} with {} empty slot(s)",
                page.page_number(),
                padding.len()
            );
            self.photos.splice(end..end, padding);
            page.len = page.capacity();
        }

        let mut copies = Vec::with_capacity(page.len);
        for photo in &self.photos[page.range()] {
            let copy = photo.duplicate();
            if let Some(text) = self.photo_texts.get(&photo.id).cloned() {
                self.photo_texts.insert(copy.id.clone(), text);
            }
            if let Some(rotation) = self.rotations.get(&photo.id).copied() {
                self.rotations.insert(copy.id.clone(), rotation);
            }
            copies.push(copy);
        }

        let insert_at = page.range().end;
        self.photos.splice(insert_at..insert_at, copies);

        shift_keys_from(&mut self.page_layouts, page_index + 1);
        self.page_layouts.insert(page_index + 1, page.layout);

        shift_keys_from(&mut self.saved_titles, page_index + 1);
        if let Some(title) = self.saved_titles.get(&page_index).cloned() {
            self.saved_titles.insert(page_index + 1, title);
        }

        log::info!("Duplicated page {}", page.page_number());
        Ok(())
    }

    /// Empty every slot of a page in place.
    ///
    /// Photos keep their ids and positions; their content, annotations, text
    /// and rotation are removed, as are the page's title and layout
    /// override. Does nothing on a project without photos.
    pub fn clear_page(&mut self, page_index: usize) -> Result<()> {
        if self.photos.is_empty() {
            return Ok(());
        }
        let pages = self.distribution();
        let page = *pages
            .get(page_index)
            .ok_or_else(|| LayoutError::page_not_found(page_index))?;

        for (slot, photo) in self.photos[page.range()].iter_mut().enumerate() {
            photo.make_placeholder(slot + 1);
            self.photo_texts.remove(&photo.id);
            self.rotations.remove(&photo.id);
        }
        self.saved_titles.remove(&page_index);
        self.page_layouts.remove(&page_index);

        log::info!("Cleared page {}", page.page_number());
        Ok(())
    }
}
