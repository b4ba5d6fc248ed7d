//! Partitioning of the flat photo list into pages
//!
//! Pages are never stored. They are derived from the photo count, the
//! sparse page-index to layout override map and the global layout.

use super::Layout;
use std::collections::BTreeMap;
use std::ops::Range;

/// One page of a distribution: which layout it uses and which run of the
/// photo list it shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSlice {
    /// 0-based page index
    pub page_index: usize,
    pub layout: Layout,
    /// Offset of the page's first photo in the photo list
    pub start_index: usize,
    /// Photos actually assigned (below capacity only on the last page)
    pub len: usize,
}

impl PageSlice {
    /// 1-based page number as shown to users
    pub fn page_number(&self) -> usize {
        self.page_index + 1
    }

    pub fn range(&self) -> Range<usize> {
        self.start_index..self.start_index + self.len
    }

    pub fn capacity(&self) -> usize {
        self.layout.photo_count()
    }

    pub fn is_partial(&self) -> bool {
        self.len < self.capacity()
    }

    /// Empty frames drawn after the photos. Text layouts are not padded.
    pub fn empty_slots(&self) -> usize {
        if self.layout.has_text() {
            0
        } else {
            self.capacity() - self.len
        }
    }
}

/// Layout of page `page_index`, honoring overrides
pub fn layout_for_page(
    page_index: usize,
    overrides: &BTreeMap<usize, Layout>,
    default: Layout,
) -> Layout {
    overrides.get(&page_index).copied().unwrap_or(default)
}

/// Walk `photo_count` photos into pages.
///
/// Page `i` takes as many photos as `overrides[i]` (or `default`) holds; the
/// last page may come up short. An empty list still yields one empty page
/// with the default layout.
pub fn distribute(
    photo_count: usize,
    overrides: &BTreeMap<usize, Layout>,
    default: Layout,
) -> Vec<PageSlice> {
    if photo_count == 0 {
        return vec![PageSlice {
            page_index: 0,
            layout: default,
            start_index: 0,
            len: 0,
        }];
    }

    let mut pages = Vec::new();
    let mut start = 0;
    while start < photo_count {
        let page_index = pages.len();
        let layout = layout_for_page(page_index, overrides, default);
        let len = layout.photo_count().min(photo_count - start);
        pages.push(PageSlice {
            page_index,
            layout,
            start_index: start,
            len,
        });
        start += len;
    }
    pages
}

pub fn total_pages(photo_count: usize, overrides: &BTreeMap<usize, Layout>, default: Layout) -> usize {
    distribute(photo_count, overrides, default).len()
}

/// Move every key at or after `from` one page later
pub(crate) fn shift_keys_from<V>(map: &mut BTreeMap<usize, V>, from: usize) {
    let moved = map.split_off(&from);
    map.extend(moved.into_iter().map(|(k, v)| (k + 1, v)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distribute_five_photos_layout_four() {
        let pages = distribute(5, &BTreeMap::new(), Layout::Four);
        assert_eq!(pages.len(), 2);
        assert_eq!((pages[0].start_index, pages[0].len), (0, 4));
        assert_eq!((pages[1].start_index, pages[1].len), (4, 1));
        assert_eq!(pages[1].empty_slots(), 3);
    }

    #[test]
    fn test_distribute_empty() {
        let pages = distribute(0, &BTreeMap::new(), Layout::Two);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].len, 0);
        assert_eq!(pages[0].layout, Layout::Two);
    }

    #[test]
    fn test_distribute_with_overrides() {
        let overrides = BTreeMap::from([(1, Layout::One), (2, Layout::TwoText)]);
        let pages = distribute(8, &overrides, Layout::Four);
        let shape: Vec<_> = pages.iter().map(|p| (p.layout, p.start_index, p.len)).collect();
        assert_eq!(
            shape,
            vec![
                (Layout::Four, 0, 4),
                (Layout::One, 4, 1),
                (Layout::TwoText, 5, 2),
                (Layout::Four, 7, 1),
            ]
        );
        assert_eq!(pages[2].empty_slots(), 0);
    }

    #[test]
    fn test_coverage_property() {
        for layout in Layout::ALL {
            let per_page = layout.photo_count();
            for n in 1..30 {
                let pages = distribute(n, &BTreeMap::new(), layout);
                let capacity: usize = pages.iter().map(|p| p.capacity()).sum();
                assert!(capacity >= n);
                assert!(capacity - per_page < n);
            }
        }
    }

    #[test]
    fn test_shift_keys_from() {
        let mut map = BTreeMap::from([(0, "a"), (1, "b"), (3, "c")]);
        shift_keys_from(&mut map, 1);
        assert_eq!(map, BTreeMap::from([(0, "a"), (2, "b"), (4, "c")]));
    }
}
