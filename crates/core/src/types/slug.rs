//! URL-safe identifiers for posts and projects.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Slug`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SlugError {
    #[error("slug cannot be empty")]
    Empty,
    #[error("slug must be at most {max} characters")]
    TooLong { max: usize },
    #[error("slug may only contain a-z, 0-9 and hyphens (found {0:?})")]
    InvalidChar(char),
    #[error("slug cannot start or end with a hyphen or contain two in a row")]
    MisplacedHyphen,
}

/// A URL path segment identifying a post or project.
///
/// Lowercase ASCII letters, digits and single hyphens, with no hyphen at
/// either end.
///
/// ```
/// use lumen_core::Slug;
///
/// assert_eq!(Slug::from_title("Hello World").unwrap().as_str(), "hello-world");
/// assert_eq!(Slug::from_title("  Rust & WebAssembly: 2024!  ").unwrap().as_str(), "rust-webassembly-2024");
/// assert!(Slug::from_title("!!!").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    pub const MAX_LENGTH: usize = 120;

    /// Derive slug text from a title without validating it.
    ///
    /// Every run of characters outside `[a-z0-9]` (after lowercasing) becomes
    /// one hyphen, and leading/trailing hyphens are dropped. The result may be
    /// empty when the title has no ASCII letters or digits.
    #[must_use]
    pub fn derive(title: &str) -> String {
        let mut out = String::with_capacity(title.len());
        let mut pending_hyphen = false;

        for c in title.chars().flat_map(char::to_lowercase) {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                if pending_hyphen && !out.is_empty() {
                    out.push('-');
                }
                pending_hyphen = false;
                out.push(c);
            } else {
                pending_hyphen = true;
            }
        }

        if out.len() > Self::MAX_LENGTH {
            out.truncate(Self::MAX_LENGTH);
            while out.ends_with('-') {
                out.pop();
            }
        }
        out
    }

    /// Derive and validate a slug from a title.
    ///
    /// # Errors
    ///
    /// Returns [`SlugError::Empty`] if the title has nothing slug-worthy.
    pub fn from_title(title: &str) -> Result<Self, SlugError> {
        Self::parse(&Self::derive(title))
    }

    /// Parse a slug typed by an editor.
    ///
    /// Surrounding whitespace is trimmed and ASCII letters are lowercased
    /// before validation.
    ///
    /// # Errors
    ///
    /// Returns a [`SlugError`] for the first rule the input breaks.
    pub fn parse(s: &str) -> Result<Self, SlugError> {
        let s = s.trim().to_ascii_lowercase();
        if s.is_empty() {
            return Err(SlugError::Empty);
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(SlugError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if let Some(bad) = s
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
        {
            return Err(SlugError::InvalidChar(bad));
        }
        if s.starts_with('-') || s.ends_with('-') || s.contains("--") {
            return Err(SlugError::MisplacedHyphen);
        }
        Ok(Self(s))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Slug {
    type Error = SlugError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
