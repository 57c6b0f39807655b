// ABOUTME: Deck parser for the slidedown application
// ABOUTME: Scans raw source for !SLIDE markers and !NOTES blocks and builds ordered slides

use crate::config::DEFAULT_TITLE;
use crate::errors::Result;
use crate::highlight::Highlight;
use crate::slide::{RenderedSlide, Slide};
use log::{debug, info};
use std::cell::OnceCell;

const SLIDE_MARKER: &str = "!SLIDE";
const NOTES_MARKER: &str = "!NOTES";

/// A line-level event produced by [`scan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event<'a> {
    /// `!SLIDE` line with its class names.
    SlideMarker(Vec<String>),
    /// Everything from a `!NOTES` line up to the next marker, trimmed.
    NotesBlock(String),
    /// Any other line, line ending included.
    ContentLine(&'a str),
}

/// Split source text into marker, notes and content events in document order.
///
/// A notes block runs until the next slide marker or the end of input, so it
/// always belongs to the slide it appears in.
pub fn scan(text: &str) -> Vec<Event<'_>> {
    let mut events = Vec::new();
    let mut notes: Option<String> = None;

    for line in text.split_inclusive('\n') {
        if let Some(classes) = parse_marker(line) {
            if let Some(block) = notes.take() {
                events.push(Event::NotesBlock(block.trim().to_string()));
            }
            events.push(Event::SlideMarker(classes));
        } else if let Some(rest) = line.strip_prefix(NOTES_MARKER) {
            notes.get_or_insert_with(String::new).push_str(rest);
        } else if let Some(block) = notes.as_mut() {
            block.push_str(line);
        } else {
            events.push(Event::ContentLine(line));
        }
    }

    if let Some(block) = notes {
        events.push(Event::NotesBlock(block.trim().to_string()));
    }

    events
}

/// Recognise `!SLIDE [class ...]` where classes are lowercase ASCII words.
fn parse_marker(line: &str) -> Option<Vec<String>> {
    let rest = line.trim_end().strip_prefix(SLIDE_MARKER)?;

    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    if !rest
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_whitespace())
    {
        return None;
    }

    Some(rest.split_whitespace().map(str::to_string).collect())
}

/// Fold scanner events into slides, one per marker.
///
/// Content before the first marker gets an implicit, class-less marker, so an
/// empty document still yields a single slide.
pub fn parse_slides(raw: &str) -> Vec<Slide> {
    #[derive(Default)]
    struct Pending {
        text: String,
        classes: Vec<String>,
        notes: Option<String>,
    }

    impl Pending {
        fn finish(self) -> Slide {
            Slide::from_parts(self.text, self.classes, self.notes)
        }
    }

    let mut slides = Vec::new();
    let mut current: Option<Pending> = None;

    for event in scan(raw) {
        match event {
            Event::SlideMarker(classes) => {
                if let Some(pending) = current.take() {
                    slides.push(pending.finish());
                }
                current = Some(Pending {
                    classes,
                    ..Pending::default()
                });
            }
            Event::NotesBlock(notes) => {
                current.get_or_insert_with(Pending::default).notes = Some(notes);
            }
            Event::ContentLine(line) => {
                current
                    .get_or_insert_with(Pending::default)
                    .text
                    .push_str(line);
            }
        }
    }

    slides.push(current.unwrap_or_default().finish());
    debug!("Parsed {} slides", slides.len());
    slides
}

/// Options applied when building a [`Deck`]
#[derive(Debug, Clone)]
pub struct DeckOptions {
    pub title: String,
    pub stylesheets: Vec<String>,
}

impl Default for DeckOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            stylesheets: Vec::new(),
        }
    }
}

/// The whole parsed document.
#[derive(Debug)]
pub struct Deck {
    raw: String,
    title: String,
    stylesheets: Vec<String>,
    slides: OnceCell<Vec<Slide>>,
}

impl Deck {
    pub fn new(raw: impl Into<String>, options: DeckOptions) -> Self {
        Self {
            raw: raw.into(),
            title: options.title,
            stylesheets: options.stylesheets,
            slides: OnceCell::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Stylesheet contents, in the order they will be emitted.
    pub fn stylesheets(&self) -> &[String] {
        &self.stylesheets
    }

    pub fn slides(&self) -> &[Slide] {
        self.slides.get_or_init(|| parse_slides(&self.raw))
    }

    /// One space-joined class string per slide.
    pub fn classes(&self) -> Vec<String> {
        self.slides()
            .iter()
            .map(|slide| slide.classes().join(" "))
            .collect()
    }

    /// Render every slide in order; the first highlighter failure aborts.
    pub fn render_slides(&self, highlighter: &dyn Highlight) -> Result<Vec<RenderedSlide>> {
        info!("Rendering {} slides", self.slides().len());
        self.slides()
            .iter()
            .map(|slide| slide.render(highlighter))
            .collect()
    }
}
