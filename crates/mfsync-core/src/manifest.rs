//! Manifest parsing and matching
//!
//! A manifest is a markdown document (usually produced by `list`) whose
//! level-3 headings name the definitions an operation should cover:
//! - headings under a "Metafield" section are `namespace.key` identifiers
//! - headings under a "Metaobject" section are metaobject types
//!
//! Everything else in the document is documentation and is ignored.

mod matcher;

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::Context;
use tracing::warn;

pub use matcher::{ManifestMatch, ManifestMatcher};

use crate::error::Result;

/// One identifier listed in a manifest
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ManifestId {
    /// A metafield definition identity
    Field {
        /// Namespace
        namespace: String,
        /// Key
        key: String,
    },
    /// A metaobject definition identity
    Object {
        /// Type string
        type_name: String,
    },
}

impl fmt::Display for ManifestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field { namespace, key } => write!(f, "metafield {namespace}.{key}"),
            Self::Object { type_name } => write!(f, "metaobject {type_name}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Fields,
    Objects,
}

/// Ordered, deduplicated set of manifest identifiers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    ids: Vec<ManifestId>,
}

impl Manifest {
    /// Parse a manifest from markdown text
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut manifest = Self::default();
        let mut seen = HashSet::new();
        let mut section = None;
        let mut in_code_block = false;

        for line in text.lines() {
            let trimmed = line.trim();

            if trimmed.starts_with("```") {
                in_code_block = !in_code_block;
                continue;
            }
            if in_code_block || !trimmed.starts_with('#') {
                continue;
            }

            let level = trimmed.chars().take_while(|c| *c == '#').count();
            let rest = &trimmed[level..];
            // `#tag` is text, not a heading
            if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
                continue;
            }
            let heading = rest.trim();

            match level {
                1 => section = None,
                2 => section = Self::section_for(heading),
                3 => {
                    let Some(current) = section else { continue };
                    let Some(id) = Self::identifier(current, heading) else {
                        warn!("Ignoring malformed manifest heading: {heading}");
                        continue;
                    };
                    if seen.insert(id.clone()) {
                        manifest.ids.push(id);
                    }
                }
                _ => {}
            }
        }

        manifest
    }

    /// Read and parse a manifest file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
        Ok(Self::parse(&text))
    }

    /// All identifiers in manifest order
    #[must_use]
    pub fn ids(&self) -> &[ManifestId] {
        &self.ids
    }

    /// Number of identifiers
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the manifest lists nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    fn section_for(heading: &str) -> Option<Section> {
        let lower = heading.to_lowercase();
        if lower.contains("metafield") {
            Some(Section::Fields)
        } else if lower.contains("metaobject") {
            Some(Section::Objects)
        } else {
            None
        }
    }

    fn identifier(section: Section, heading: &str) -> Option<ManifestId> {
        let text = heading.trim_matches('`').trim();
        if text.is_empty() {
            return None;
        }

        match section {
            Section::Fields => {
                let (namespace, key) = text.rsplit_once('.')?;
                if namespace.is_empty() || key.is_empty() {
                    return None;
                }
                Some(ManifestId::Field {
                    namespace: namespace.to_string(),
                    key: key.to_string(),
                })
            }
            Section::Objects => Some(ManifestId::Object {
                type_name: text.to_string(),
            }),
        }
    }
}
