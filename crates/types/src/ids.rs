//! Newtype wrappers for document identifiers
//!
//! A document carries two identifiers: the human-readable [`Sigil`] read from
//! its metadata, and the filesystem-safe [`Basename`] derived from it. Keeping
//! them as distinct types prevents a raw sigil from ever being used to build
//! an output path.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// The human-readable identifier of a document (e.g. `2 H` or `α`).
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Sigil(Arc<str>);

impl Sigil {
    /// Creates a new Sigil, trimming surrounding whitespace.
    pub fn new(sigil: impl AsRef<str>) -> Self {
        Self(sigil.as_ref().trim().into())
    }

    /// Returns the string representation of this sigil
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the sigil contains no visible characters.
    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Sigil {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Sigil {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for Sigil {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sigil {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A filesystem-safe slug derived from a [`Sigil`].
///
/// Only `[A-Za-z0-9.-]` survive; every other character is replaced by `_`
/// after transliterating non-ASCII text. Greek alpha is spelled out as
/// `alpha` because sigils such as `α` would otherwise collapse to `a`.
#[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Basename(Arc<str>);

impl Basename {
    /// Derives the basename for a sigil.
    pub fn from_sigil(sigil: &Sigil) -> Self {
        let spelled = sigil.as_str().replace('α', "alpha");
        let ascii = deunicode::deunicode(&spelled);
        let slug: String = ascii
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        Self(slug.into())
    }

    /// Returns the string representation of this basename
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&Sigil> for Basename {
    fn from(sigil: &Sigil) -> Self {
        Self::from_sigil(sigil)
    }
}

impl AsRef<str> for Basename {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Basename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
