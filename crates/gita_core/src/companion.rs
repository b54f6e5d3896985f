//! crates/gita_core/src/companion.rs
//!
//! Static material that accompanies each chapter: video commentary and share text.

use serde::Serialize;

const COMMENTARY_PLAYLIST: &str = "PLAQW7o4sNH26gfnPWD_5grj-6Y9fsOWLq";

const COMMENTARY_VIDEOS: [&str; 20] = [
    "pPzDLL_K5_Y",
    "g9z3yP0nB8A",
    "q8j02pS9q_M",
    "wzU4L1a-w3I",
    "Y7B_x20a-M4",
    "g4NBTwryeC8",
    "f0GjUvbu_90",
    "GvM2GzDjnRk",
    "v3-9yBtuo58",
    "GvR6gWzRuwE",
    "93fA3D-i9oE",
    "t-eR5lixhWk",
    "q3-yVlXGq-U",
    "98d5-akD6-U",
    "L2l4y_K-hX0",
    "c30B9f-C-eU",
    "yM3g-Y03nVo",
    "J3iF7-dYFPU",
    "v-b0_yZ30dI",
    "B5U_31S5j-M",
];

/// A video commentary for one chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Commentary {
    pub chapter_number: u32,
    pub video_id: &'static str,
    pub embed_url: String,
}

/// The commentary video for `chapter`, if one exists.
pub fn commentary_for(chapter: u32) -> Option<Commentary> {
    let index = usize::try_from(chapter.checked_sub(1)?).ok()?;
    let video_id = *COMMENTARY_VIDEOS.get(index)?;
    Some(Commentary {
        chapter_number: chapter,
        video_id,
        embed_url: format!(
            "https://www.youtube.com/embed/{}?list={}",
            video_id, COMMENTARY_PLAYLIST
        ),
    })
}

pub fn share_text(chapter_number: u32, title: &str) -> String {
    format!(
        "Discovering wisdom from Chapter {}: {} of the Ashtavakra Gita.",
        chapter_number, title
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TOTAL_CHAPTERS;

    #[test]
    fn every_chapter_has_commentary() {
        for chapter in 1..=TOTAL_CHAPTERS {
            assert!(commentary_for(chapter).is_some(), "chapter {}", chapter);
        }
        assert!(commentary_for(0).is_none());
        assert!(commentary_for(TOTAL_CHAPTERS + 1).is_none());
    }

    #[test]
    fn embed_url_includes_playlist() {
        let commentary = commentary_for(1).unwrap();
        assert_eq!(
            commentary.embed_url,
            "https://www.youtube.com/embed/pPzDLL_K5_Y?list=PLAQW7o4sNH26gfnPWD_5grj-6Y9fsOWLq"
        );
    }

    #[test]
    fn share_text_names_the_chapter() {
        assert_eq!(
            share_text(2, "Janaka's Joy"),
            "Discovering wisdom from Chapter 2: Janaka's Joy of the Ashtavakra Gita."
        );
    }
}
