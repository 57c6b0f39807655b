// ABOUTME: HTML generation module for the slidedown application
// ABOUTME: Runs a source file through the deck parser, markup generator and template

use crate::config::Config;
use crate::deck::{Deck, DeckOptions};
use crate::errors::Result;
use crate::highlight::Highlight;
use crate::resources::{Assets, ResourceFile};
use crate::template::{self, Binding, TemplateSource};
use crate::utils;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// Options for a single slideshow render
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Template name, or an absolute path without extension
    pub template: String,
    /// Resolve the template relative to `working_dir`
    pub local: bool,
    /// Title override; falls back to the configured title
    pub title: Option<String>,
    /// Extra stylesheets (local paths or URLs)
    pub css: Vec<ResourceFile>,
    /// Extra scripts (local paths or URLs)
    pub js: Vec<ResourceFile>,
    /// Directory searched for `*.css` / `*.js` and local templates
    pub working_dir: PathBuf,
    /// Inline stylesheet and script contents; when false only links are bound
    pub embed_resources: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            template: "default".to_string(),
            local: false,
            title: None,
            css: Vec::new(),
            js: Vec::new(),
            working_dir: PathBuf::from("."),
            embed_resources: true,
        }
    }
}

/// Generate a complete slideshow document from a source file
pub fn generate_html(
    source_path: &Path,
    options: &RenderOptions,
    config: &Config,
    highlighter: &dyn Highlight,
) -> Result<String> {
    info!("Generating slideshow from: {:?}", source_path);

    utils::validate_file_exists(source_path)?;
    let raw = fs::read_to_string(source_path)?;

    // Resolve the template before doing any highlighting work
    let template_source =
        TemplateSource::resolve(&options.template, options.local, &options.working_dir, config)?;
    let template_text = template_source.load()?;

    let assets = Assets::discover(&options.working_dir)?.with_extra(&options.css, &options.js);
    let deck = Deck::new(
        raw,
        DeckOptions {
            title: options.title.clone().unwrap_or_else(|| config.title.clone()),
            stylesheets: if options.embed_resources {
                assets.stylesheet_contents()?
            } else {
                Vec::new()
            },
        },
    );

    render_deck(
        &deck,
        &template_text,
        &assets,
        options.embed_resources,
        highlighter,
    )
}

/// Render an already-built deck through template source text
pub fn render_deck(
    deck: &Deck,
    template_text: &str,
    assets: &Assets,
    embed_resources: bool,
    highlighter: &dyn Highlight,
) -> Result<String> {
    let slides = deck.render_slides(highlighter)?;

    let javascripts = if embed_resources {
        assets.javascript_contents()?
    } else {
        Vec::new()
    };

    let binding = Binding {
        stylesheet_links: assets.stylesheet_links(),
        javascripts,
        javascript_links: assets.javascript_links(),
        ..Binding::from_deck(deck, slides)
    };

    template::render(template_text, &binding)
}

/// Utility function to write HTML content to a file
pub fn write_html_to_file(html_content: &str, output_path: &Path) -> Result<()> {
    info!("Writing HTML to file: {:?}", output_path);

    utils::ensure_parent_directory_exists(output_path)?;
    fs::write(output_path, html_content)?;

    Ok(())
}
