// ABOUTME: Resource handling for the slidedown application
// ABOUTME: Discovers and loads stylesheets and scripts, local or remote

use crate::errors::{Result, SlidedownError};
use log::{debug, info};
use reqwest::blocking::Client;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Represents a resource file that can be either local or remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceFile {
    pub path: String,
    pub is_remote: bool,
}

impl ResourceFile {
    /// Create a new ResourceFile from a path string.
    /// The path can be either a local file path or a URL.
    pub fn new(path: &str) -> Self {
        let is_remote = path.starts_with("http://") || path.starts_with("https://");
        Self {
            path: path.to_string(),
            is_remote,
        }
    }

    /// Get the content of the resource file, fetching it when remote.
    pub fn content(&self) -> Result<String> {
        if self.is_remote {
            self.fetch_remote_content()
        } else {
            self.read_local_content()
        }
    }

    /// Fetch content from a remote URL with retry capability
    fn fetch_remote_content(&self) -> Result<String> {
        info!("Fetching remote resource: {}", self.path);

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        let mut retry_delay = 1000;
        let mut last_error = None;

        for attempt in 1..=3 {
            match client.get(&self.path).send() {
                Ok(response) if response.status().is_success() => {
                    return Ok(response.text()?);
                }
                Ok(response) => {
                    last_error = Some(SlidedownError::InvalidResourcePath(format!(
                        "{} returned HTTP {}",
                        self.path,
                        response.status()
                    )));
                }
                Err(e) => last_error = Some(SlidedownError::FetchError(e)),
            }

            if attempt < 3 {
                info!(
                    "Fetch attempt {} failed, retrying in {} ms",
                    attempt, retry_delay
                );
                std::thread::sleep(Duration::from_millis(retry_delay));
                retry_delay *= 2;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            SlidedownError::InvalidResourcePath(format!("Could not fetch {}", self.path))
        }))
    }

    fn read_local_content(&self) -> Result<String> {
        debug!("Reading local resource: {}", self.path);
        let path = Path::new(&self.path);
        if !path.exists() {
            return Err(SlidedownError::PathNotFoundError(path.to_path_buf()));
        }

        Ok(fs::read_to_string(path)?)
    }
}

/// Find `*.<extension>` files directly inside `dir`, sorted by path.
pub fn discover(dir: &Path, extension: &str) -> Result<Vec<ResourceFile>> {
    let dir = dir.to_str().ok_or_else(|| {
        SlidedownError::InvalidResourcePath(format!("Non UTF-8 directory: {:?}", dir))
    })?;
    let pattern = format!("{}/*.{}", glob::Pattern::escape(dir), extension);

    let mut paths: Vec<_> = glob::glob(&pattern)
        .map_err(|e| SlidedownError::InvalidResourcePath(format!("{}: {}", pattern, e)))?
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    Ok(paths
        .iter()
        .map(|path| ResourceFile::new(&path.to_string_lossy()))
        .collect())
}

/// Stylesheets and scripts that end up in the rendered slideshow.
#[derive(Debug, Clone, Default)]
pub struct Assets {
    pub stylesheets: Vec<ResourceFile>,
    pub javascripts: Vec<ResourceFile>,
}

impl Assets {
    /// Collect `*.css` and `*.js` files from `dir`.
    pub fn discover(dir: &Path) -> Result<Self> {
        let assets = Self {
            stylesheets: discover(dir, "css")?,
            javascripts: discover(dir, "js")?,
        };
        info!(
            "Found {} stylesheets and {} scripts in {:?}",
            assets.stylesheets.len(),
            assets.javascripts.len(),
            dir
        );
        Ok(assets)
    }

    /// Append explicitly requested resources after the discovered ones.
    pub fn with_extra(mut self, css: &[ResourceFile], js: &[ResourceFile]) -> Self {
        self.stylesheets.extend_from_slice(css);
        self.javascripts.extend_from_slice(js);
        self
    }

    pub fn stylesheet_contents(&self) -> Result<Vec<String>> {
        self.stylesheets.iter().map(ResourceFile::content).collect()
    }

    pub fn javascript_contents(&self) -> Result<Vec<String>> {
        self.javascripts.iter().map(ResourceFile::content).collect()
    }

    pub fn stylesheet_links(&self) -> Vec<String> {
        self.stylesheets.iter().map(|r| r.path.clone()).collect()
    }

    pub fn javascript_links(&self) -> Vec<String> {
        self.javascripts.iter().map(|r| r.path.clone()).collect()
    }
}
