// ABOUTME: Template loading and rendering for the slidedown application
// ABOUTME: Resolves bundled, local or absolute templates and binds deck state into them

use crate::config::Config;
use crate::deck::Deck;
use crate::errors::{Result, SlidedownError};
use crate::slide::RenderedSlide;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use tera::{Context, Tera};

pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/default.html");
pub const IMPORT_TEMPLATE: &str = include_str!("../templates/import.html");

const TEMPLATE_EXTENSION: &str = "html";

/// Where a template's source text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    Bundled(&'static str),
    File(PathBuf),
}

impl TemplateSource {
    /// Resolve a template name.
    ///
    /// Absolute paths are used as given, `local` looks in `cwd`, and anything
    /// else is looked up in the configured template directory before falling
    /// back to the bundled templates.
    pub fn resolve(name: &str, local: bool, cwd: &Path, config: &Config) -> Result<Self> {
        if is_absolute_path(name) {
            return Ok(Self::File(with_extension(Path::new(name))));
        }
        if local {
            return Ok(Self::File(with_extension(&cwd.join(name))));
        }
        if let Some(dir) = &config.template_dir {
            let candidate = with_extension(&dir.join(name));
            if candidate.is_file() {
                return Ok(Self::File(candidate));
            }
        }

        match name {
            "default" => Ok(Self::Bundled(DEFAULT_TEMPLATE)),
            "import" => Ok(Self::Bundled(IMPORT_TEMPLATE)),
            _ => Err(SlidedownError::TemplateNotFound(PathBuf::from(name))),
        }
    }

    pub fn load(&self) -> Result<String> {
        match self {
            Self::Bundled(source) => Ok((*source).to_string()),
            Self::File(path) => {
                debug!("Loading template from {:?}", path);
                if !path.is_file() {
                    return Err(SlidedownError::TemplateNotFound(path.clone()));
                }
                Ok(fs::read_to_string(path)?)
            }
        }
    }
}

/// A path is absolute when it equals its own normalized absolute form.
pub fn is_absolute_path(name: &str) -> bool {
    let path = Path::new(name);
    std::path::absolute(path)
        .map(|absolute| absolute == path)
        .unwrap_or(false)
}

fn with_extension(path: &Path) -> PathBuf {
    if path.extension().is_some_and(|ext| ext == TEMPLATE_EXTENSION) {
        path.to_path_buf()
    } else {
        let mut file = path.as_os_str().to_owned();
        file.push(".");
        file.push(TEMPLATE_EXTENSION);
        PathBuf::from(file)
    }
}

/// Everything a template can see.
#[derive(Debug, Default)]
pub struct Binding {
    pub title: String,
    pub slides: Vec<RenderedSlide>,
    pub classes: Vec<String>,
    pub stylesheets: Vec<String>,
    pub stylesheet_links: Vec<String>,
    pub javascripts: Vec<String>,
    pub javascript_links: Vec<String>,
}

impl Binding {
    /// Start a binding from the deck's title, classes and stylesheets.
    pub fn from_deck(deck: &Deck, slides: Vec<RenderedSlide>) -> Self {
        Self {
            title: deck.title().to_string(),
            slides,
            classes: deck.classes(),
            stylesheets: deck.stylesheets().to_vec(),
            ..Self::default()
        }
    }

    fn context(&self) -> Context {
        let mut context = Context::new();
        context.insert("title", &self.title);
        context.insert("slides", &self.slides);
        context.insert("classes", &self.classes);
        context.insert("stylesheets", &self.stylesheets);
        context.insert("stylesheet_links", &self.stylesheet_links);
        context.insert("javascripts", &self.javascripts);
        context.insert("javascript_links", &self.javascript_links);
        context
    }
}

/// Render template source text with the given binding.
pub fn render(template: &str, binding: &Binding) -> Result<String> {
    info!("Rendering template with {} slides", binding.slides.len());
    // Slide HTML is already markup, so nothing is auto-escaped
    Ok(Tera::one_off(template, &binding.context(), false)?)
}
