pub mod protocol;
pub mod reading_task;
pub mod rest;
pub mod state;
pub mod ws_handler;

// Re-export the handlers the binary needs to build the web server router.
pub use rest::{
    audio_script_handler, chapter_handler, commentary_handler, page_handler, preview_handler,
    verse_explanation_handler, wisdom_handler,
};
pub use ws_handler::ws_handler;
