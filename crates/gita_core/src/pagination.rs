//! crates/gita_core/src/pagination.rs
//!
//! Slices a chapter's verses into fixed-size pages and reports how far
//! through the chapter the reader is.

use crate::domain::{Chapter, Verse};

/// Verses shown per page.
pub const PAGE_SIZE: usize = 3;

/// Number of pages needed for `verse_count` verses.
pub fn total_pages(verse_count: usize) -> usize {
    verse_count.div_ceil(PAGE_SIZE)
}

/// Returns the verses on `page` (1-based) and the chapter's page count.
/// A page outside the chapter yields no verses.
pub fn paginate(chapter: &Chapter, page: usize) -> (&[Verse], usize) {
    let total = total_pages(chapter.verses.len());
    if page == 0 {
        return (&[], total);
    }
    let start = (page - 1).saturating_mul(PAGE_SIZE);
    let end = start.saturating_add(PAGE_SIZE).min(chapter.verses.len());
    let verses = chapter.verses.get(start..end).unwrap_or(&[]);
    (verses, total)
}

/// Reading progress in percent.
///
/// No pages is 0. A single page counts as fully read once shown.
pub fn progress(page: usize, total_pages: usize) -> f64 {
    match total_pages {
        0 => 0.0,
        1 => 100.0,
        total => page.min(total) as f64 / total as f64 * 100.0,
    }
}

/// The reader's position within the loaded chapter.
///
/// `page` lies in `1..=total_pages`, except for a chapter with no verses,
/// which has no pages and sits at page 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadingProgress {
    page: usize,
    total_pages: usize,
}

impl ReadingProgress {
    pub fn new(verse_count: usize) -> Self {
        let total_pages = total_pages(verse_count);
        Self {
            page: total_pages.min(1),
            total_pages,
        }
    }

    pub fn for_chapter(chapter: &Chapter) -> Self {
        Self::new(chapter.verses.len())
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Back to page 1 with the page count of a newly loaded chapter.
    pub fn reset(&mut self, chapter: &Chapter) {
        *self = Self::for_chapter(chapter);
    }

    /// Moves to `page` if it exists; otherwise nothing changes.
    /// Returns whether the page changed.
    pub fn go_to(&mut self, page: usize) -> bool {
        if page < 1 || page > self.total_pages || page == self.page {
            return false;
        }
        self.page = page;
        true
    }

    pub fn next(&mut self) -> bool {
        self.go_to(self.page + 1)
    }

    pub fn previous(&mut self) -> bool {
        match self.page.checked_sub(1) {
            Some(page) => self.go_to(page),
            None => false,
        }
    }

    pub fn progress(&self) -> f64 {
        progress(self.page, self.total_pages)
    }

    /// The verses on the current page of `chapter`.
    pub fn visible<'a>(&self, chapter: &'a Chapter) -> &'a [Verse] {
        paginate(chapter, self.page).0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chapter_with(count: u32) -> Chapter {
        Chapter {
            chapter_number: 1,
            title: "Instruction on Self-Realization".to_string(),
            summary: "Janaka asks how liberation is attained.".to_string(),
            verses: (1..=count)
                .map(|n| Verse {
                    verse_number: n,
                    sanskrit: format!("श्लोक {}", n),
                    translation: format!("Verse {}", n),
                })
                .collect(),
        }
    }

    fn numbers(verses: &[Verse]) -> Vec<u32> {
        verses.iter().map(|v| v.verse_number).collect()
    }

    #[test]
    fn seven_verses_make_three_pages() {
        let chapter = chapter_with(7);

        let (first, total) = paginate(&chapter, 1);
        assert_eq!(total, 3);
        assert_eq!(numbers(first), vec![1, 2, 3]);
        assert_eq!(numbers(paginate(&chapter, 2).0), vec![4, 5, 6]);
        assert_eq!(numbers(paginate(&chapter, 3).0), vec![7]);
    }

    #[test]
    fn out_of_range_pages_are_empty() {
        let chapter = chapter_with(7);
        assert!(paginate(&chapter, 0).0.is_empty());
        assert!(paginate(&chapter, 4).0.is_empty());
        assert!(paginate(&chapter, usize::MAX).0.is_empty());
    }

    #[test]
    fn progress_values() {
        assert!((progress(1, 3) - 33.333).abs() < 0.01);
        assert_eq!(progress(3, 3), 100.0);
        assert_eq!(progress(1, 1), 100.0);
        assert_eq!(progress(1, 0), 0.0);
    }

    #[test]
    fn single_page_chapter_is_fully_read() {
        let state = ReadingProgress::for_chapter(&chapter_with(2));
        assert_eq!(state.total_pages(), 1);
        assert_eq!(state.progress(), 100.0);
    }

    #[test]
    fn navigation_is_clamped() {
        let mut state = ReadingProgress::for_chapter(&chapter_with(7));

        assert!(!state.go_to(0));
        assert!(!state.previous());
        assert_eq!(state.page(), 1);

        assert!(state.go_to(3));
        assert!(!state.go_to(99));
        assert!(!state.next());
        assert_eq!(state.page(), 3);

        assert!(state.previous());
        assert_eq!(state.page(), 2);
    }

    #[test]
    fn loading_a_new_chapter_resets_to_page_one() {
        let mut state = ReadingProgress::for_chapter(&chapter_with(9));
        state.go_to(3);

        state.reset(&chapter_with(4));
        assert_eq!(state.page(), 1);
        assert_eq!(state.total_pages(), 2);
    }

    #[test]
    fn chapter_without_verses_has_no_current_page() {
        let mut state = ReadingProgress::new(0);
        assert_eq!(state.page(), 0);
        assert_eq!(state.total_pages(), 0);
        assert_eq!(state.progress(), 0.0);

        assert!(!state.next());
        assert!(!state.previous());
        assert!(!state.go_to(1));
        assert_eq!(state.page(), 0);
        assert!(state.visible(&chapter_with(0)).is_empty());
    }

    #[test]
    fn visible_follows_the_current_page() {
        let chapter = chapter_with(5);
        let mut state = ReadingProgress::for_chapter(&chapter);
        state.next();
        assert_eq!(numbers(state.visible(&chapter)), vec![4, 5]);
    }
}
