//! Markdown pages (about, privacy, refund policy).
//!
//! Pages live in `content/pages/*.md` with YAML front matter and are
//! rendered once at startup; the file stem is the page key.
//!
//! ```markdown
//! ---
//! title: Privacy Policy
//! description: How we handle your data
//! updated_at: 2025-01-15
//! ---
//! We collect as little as we can...
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use gray_matter::{Matter, ParsedEntity, engine::YAML};
use serde::Deserialize;

/// Front matter for a page.
#[derive(Debug, Clone, Deserialize)]
pub struct PageMeta {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub updated_at: Option<NaiveDate>,
}

/// A rendered page.
#[derive(Debug, Clone)]
pub struct Page {
    pub key: String,
    pub meta: PageMeta,
    pub content_html: String,
}

/// Every page, keyed by file stem. Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct PageLibrary {
    pages: Arc<HashMap<String, Page>>,
}

impl PageLibrary {
    /// Load and render every page under `content_dir/pages`.
    ///
    /// A page that fails to parse is logged and skipped; a missing
    /// directory yields an empty library.
    ///
    /// # Errors
    ///
    /// Returns `PageError::Io` if the directory exists but cannot be read.
    pub fn load(content_dir: &Path) -> Result<Self, PageError> {
        let dir = content_dir.join("pages");
        let mut pages = HashMap::new();

        if !dir.exists() {
            tracing::warn!(dir = %dir.display(), "Pages directory does not exist");
            return Ok(Self::default());
        }

        let entries = std::fs::read_dir(&dir).map_err(|e| PageError::Io(e.to_string()))?;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "md") {
                continue;
            }
            match load_page(&path) {
                Ok(page) => {
                    tracing::info!(page = %page.key, "Loaded page");
                    pages.insert(page.key.clone(), page);
                }
                Err(e) => tracing::error!(path = %path.display(), error = %e, "Failed to load page"),
            }
        }

        Ok(Self {
            pages: Arc::new(pages),
        })
    }

    /// Build a library from in-memory Markdown sources, keyed by name.
    ///
    /// # Errors
    ///
    /// Returns `PageError::Parse` for the first source with bad front matter.
    pub fn from_sources<'a>(
        sources: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, PageError> {
        let pages = sources
            .into_iter()
            .map(|(key, source)| parse_page(key, source).map(|page| (key.to_owned(), page)))
            .collect::<Result<HashMap<_, _>, _>>()?;

        Ok(Self {
            pages: Arc::new(pages),
        })
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Page> {
        self.pages.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

fn load_page(path: &Path) -> Result<Page, PageError> {
    let source = std::fs::read_to_string(path).map_err(|e| PageError::Io(e.to_string()))?;
    let key = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| PageError::Parse("invalid filename".to_owned()))?;
    parse_page(key, &source)
}

fn parse_page(key: &str, source: &str) -> Result<Page, PageError> {
    let matter = Matter::<YAML>::new();
    let parsed: ParsedEntity<PageMeta> = matter
        .parse(source)
        .map_err(|e| PageError::Parse(format!("failed to parse front matter: {e}")))?;
    let meta = parsed
        .data
        .ok_or_else(|| PageError::Parse(format!("{key}: missing front matter")))?;

    Ok(Page {
        key: key.to_owned(),
        meta,
        content_html: lumen_core::markdown::render(&parsed.content),
    })
}

/// Page loading errors.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
}
