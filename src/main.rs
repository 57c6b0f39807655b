// ABOUTME: Main entry point for the slidedown program.
// ABOUTME: Provides CLI interface and renders a slideshow to stdout or a file.

use clap::Parser;
use log::LevelFilter;
use std::path::{Path, PathBuf};

const USAGE: &str = "The slidedown command line interface takes a .md (Markdown) file as its only \
required argument. It will convert the file to HTML in standard out. Options:
  -t, --template [TEMPLATE] the templates bundled with slidedown. Default is -t default, which \
prints stylesheets and javascripts inline. The import template uses link and script tags. This \
can also accept an absolute path for templates outside the bundled set.
  -l, --local               load the template from the current directory";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the markdown source file
    source: Option<PathBuf>,

    /// Template name, or an absolute path to a template (without extension)
    #[arg(short, long, default_value = "default")]
    template: String,

    /// Load the template from the current directory
    #[arg(short, long)]
    local: bool,

    /// Slideshow title
    #[arg(long)]
    title: Option<String>,

    /// Extra CSS files to include (local paths or URLs)
    #[arg(long, value_delimiter = ',')]
    css: Option<Vec<String>>,

    /// Extra JavaScript files to include (local paths or URLs)
    #[arg(long, value_delimiter = ',')]
    js: Option<Vec<String>>,

    /// Mode for CSS/JS: 'embed' to embed content or 'link' to reference
    #[arg(long, default_value = "embed")]
    mode: String,

    /// Write the slideshow to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        })
        .parse_default_env()
        .init();

    let Some(source) = &cli.source else {
        println!("{}", USAGE);
        return Ok(());
    };

    let result = run(&cli, source);

    match result {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli, source: &Path) -> slidedown::Result<()> {
    let config = slidedown::Config::from_env();
    let highlighter = slidedown::Pygmentize::new(config.highlighter_config());

    let to_resources = |paths: &Option<Vec<String>>| -> Vec<slidedown::ResourceFile> {
        paths
            .as_ref()
            .map(|files| files.iter().map(|path| slidedown::ResourceFile::new(path)).collect())
            .unwrap_or_default()
    };

    let embed_resources = match cli.mode.as_str() {
        "embed" => true,
        "link" => false,
        other => {
            return Err(slidedown::SlidedownError::ValidationError(format!(
                "Unknown mode '{}', expected 'embed' or 'link'",
                other
            )));
        }
    };

    let options = slidedown::RenderOptions {
        template: cli.template.clone(),
        local: cli.local,
        title: cli.title.clone(),
        css: to_resources(&cli.css),
        js: to_resources(&cli.js),
        working_dir: std::env::current_dir()?,
        embed_resources,
    };

    let html = slidedown::generate_html(source, &options, &config, &highlighter)?;

    match &cli.output {
        Some(path) => slidedown::write_html_to_file(&html, path)?,
        None => println!("{}", html),
    }

    Ok(())
}
