// ABOUTME: Slide record produced by the deck parser
// ABOUTME: Holds body markdown, CSS class tags and optional speaker notes

use crate::deck::{Event, scan};
use crate::errors::Result;
use crate::highlight::Highlight;
use crate::markup;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slide {
    text: String,
    classes: Vec<String>,
    notes: Option<String>,
}

impl Slide {
    /// Build a slide from raw text, pulling out a trailing `!NOTES` block.
    ///
    /// Slide marker lines in `text` are dropped; classes come from `classes`.
    pub fn new(text: &str, classes: Vec<String>) -> Self {
        let mut slide = Self {
            classes,
            ..Self::default()
        };

        for event in scan(text) {
            match event {
                Event::ContentLine(line) => slide.text.push_str(line),
                Event::NotesBlock(notes) => slide.notes = Some(notes),
                Event::SlideMarker(_) => {}
            }
        }

        slide
    }

    pub(crate) fn from_parts(text: String, classes: Vec<String>, notes: Option<String>) -> Self {
        Self {
            text,
            classes,
            notes,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn html(&self, highlighter: &dyn Highlight) -> Result<String> {
        markup::generate(&self.text, highlighter)
    }

    pub fn render(&self, highlighter: &dyn Highlight) -> Result<RenderedSlide> {
        Ok(RenderedSlide {
            html: self.html(highlighter)?,
            classes: self.classes.join(" "),
            notes: self.notes.clone(),
        })
    }
}

/// A slide after markup generation, as handed to templates.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedSlide {
    pub html: String,
    pub classes: String,
    pub notes: Option<String>,
}
