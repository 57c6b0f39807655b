// ABOUTME: Library module for the slidedown program.
// ABOUTME: Parses slide decks, highlights code fences and renders HTML slideshows.

// Reexport modules
pub mod config;
pub mod deck;
pub mod errors;
pub mod highlight;
pub mod html;
pub mod markup;
pub mod resources;
pub mod slide;
pub mod template;
pub mod utils;

// Reexport common types and functions
pub use config::Config;
pub use deck::{Deck, DeckOptions};
pub use errors::{Result, SlidedownError};
pub use highlight::{Highlight, HighlighterConfig, Pygmentize};
pub use html::{RenderOptions, generate_html, render_deck, write_html_to_file};
pub use resources::{Assets, ResourceFile};
pub use slide::{RenderedSlide, Slide};
