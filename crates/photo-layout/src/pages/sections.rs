use crate::constants::DEFAULT_PAGES_PER_SECTION;
use std::ops::Range;

/// Window of pages shown together in a paginated viewer.
/// `current` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sections {
    pages_per_section: usize,
    current: usize,
}

impl Default for Sections {
    fn default() -> Self {
        Self::new(DEFAULT_PAGES_PER_SECTION)
    }
}

impl Sections {
    pub fn new(pages_per_section: usize) -> Self {
        Self {
            pages_per_section: pages_per_section.max(1),
            current: 1,
        }
    }

    pub fn pages_per_section(&self) -> usize {
        self.pages_per_section
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Number of sections, never less than one
    pub fn total(&self, total_pages: usize) -> usize {
        total_pages.div_ceil(self.pages_per_section).max(1)
    }

    /// 0-based page indices in the current section
    pub fn page_range(&self, total_pages: usize) -> Range<usize> {
        let start = (self.current - 1) * self.pages_per_section;
        let end = (start + self.pages_per_section).min(total_pages);
        start.min(end)..end
    }

    /// Advance one section; false when already on the last one
    pub fn next(&mut self, total_pages: usize) -> bool {
        if self.current < self.total(total_pages) {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Go back one section; false when already on the first one
    pub fn prev(&mut self) -> bool {
        if self.current > 1 {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    /// Jump to 1-based `section`; false (and no change) when out of range
    pub fn go_to(&mut self, section: usize, total_pages: usize) -> bool {
        if section >= 1 && section <= self.total(total_pages) {
            self.current = section;
            true
        } else {
            false
        }
    }

    /// Pull the current section back into range after pages were removed
    pub fn clamp(&mut self, total_pages: usize) {
        self.current = self.current.clamp(1, self.total(total_pages));
    }

    pub fn reset(&mut self) {
        self.current = 1;
    }

    /// Switch to the section containing `page_index`
    pub fn focus_page(&mut self, page_index: usize) {
        self.current = page_index / self.pages_per_section + 1;
    }
}
