//! Manifest parsers, one per package ecosystem.
//!
//! Every parser reduces a manifest or lockfile to a flat name-to-version
//! map. Diffing happens downstream in [`crate::dependency`] and knows
//! nothing about the file formats.

pub mod elm;
pub mod javascript;
pub mod ruby;

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

pub use elm::ElmParser;
pub use javascript::JavascriptParser;
pub use ruby::RubyParser;

/// Package name to recorded version for one file at one revision.
pub type ManifestSnapshot = BTreeMap<String, String>;

/// Structured manifest content that could not be read.
#[derive(Debug, Error)]
pub enum ManifestParseError {
    /// The content is not valid JSON, or not the expected JSON shape.
    #[error("{file}: invalid JSON: {source}")]
    Json {
        /// Manifest path.
        file: String,
        /// Underlying parser error.
        #[source]
        source: serde_json::Error,
    },
    /// A field every manifest of this kind carries is absent.
    #[error("{file}: missing `{field}`")]
    MissingField {
        /// Manifest path.
        file: String,
        /// Dotted path of the missing field.
        field: String,
    },
    /// A lockfile without any section listing resolved packages.
    #[error("{file}: no {expected} section found")]
    MissingSection {
        /// Manifest path.
        file: String,
        /// Human-readable list of the accepted section headers.
        expected: String,
    },
    /// A line inside a specs block that does not read `name (version)`.
    #[error("{file}:{line}: malformed spec `{text}`")]
    MalformedLine {
        /// Manifest path.
        file: String,
        /// 1-based line number.
        line: usize,
        /// The offending line, trimmed.
        text: String,
    },
}

impl ManifestParseError {
    pub(crate) fn json(file: &str, source: serde_json::Error) -> Self {
        Self::Json {
            file: file.to_string(),
            source,
        }
    }

    pub(crate) fn missing_field(file: &str, field: impl Into<String>) -> Self {
        Self::MissingField {
            file: file.to_string(),
            field: field.into(),
        }
    }

    /// Path of the manifest that failed to parse.
    #[must_use]
    pub fn file(&self) -> &str {
        match self {
            Self::Json { file, .. }
            | Self::MissingField { file, .. }
            | Self::MissingSection { file, .. }
            | Self::MalformedLine { file, .. } => file,
        }
    }
}

/// Turns raw manifest content into a [`ManifestSnapshot`].
///
/// Empty or whitespace-only content is a file that does not exist at the
/// revision and must parse to an empty snapshot.
pub trait ManifestParser {
    /// Parses `content`, read from `file`.
    ///
    /// # Errors
    ///
    /// Returns a [`ManifestParseError`] naming `file` when non-empty
    /// content is malformed.
    fn parse(&self, file: &str, content: &str) -> Result<ManifestSnapshot, ManifestParseError>;
}

/// Package ecosystems with a manifest we know how to diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ecosystem {
    /// `elm.json`
    Elm,
    /// `Gemfile.lock`
    Ruby,
    /// `package-lock.json`
    Javascript,
}

impl Ecosystem {
    /// All ecosystems in report order.
    pub const ALL: [Self; 3] = [Self::Elm, Self::Ruby, Self::Javascript];

    /// File name that identifies this ecosystem's manifest.
    #[must_use]
    pub fn manifest_name(self) -> &'static str {
        match self {
            Self::Elm => "elm.json",
            Self::Ruby => "Gemfile.lock",
            Self::Javascript => "package-lock.json",
        }
    }

    /// Report section title for this ecosystem's changes.
    #[must_use]
    pub fn section_title(self) -> &'static str {
        match self {
            Self::Elm => "Changed Elm Packages",
            Self::Ruby => "Changed Ruby Dependencies",
            Self::Javascript => "Changed JavaScript Dependencies",
        }
    }

    /// The parser registered for this ecosystem.
    #[must_use]
    pub fn parser(self) -> &'static dyn ManifestParser {
        match self {
            Self::Elm => &ElmParser,
            Self::Ruby => &RubyParser,
            Self::Javascript => &JavascriptParser,
        }
    }

    /// Ecosystem whose manifest lives at `path`, root-level or nested.
    ///
    /// The final path segment must equal the manifest name exactly.
    #[must_use]
    pub fn for_path(path: &str) -> Option<Self> {
        let file_name = path.rsplit('/').next().unwrap_or(path);
        Self::ALL
            .into_iter()
            .find(|eco| eco.manifest_name() == file_name)
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Elm => "elm",
            Self::Ruby => "ruby",
            Self::Javascript => "javascript",
        };
        f.write_str(name)
    }
}
