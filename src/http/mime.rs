//! Extension to MIME type table.
//!
//! Built from the `type` lines of the config file and read-only afterwards.

use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentTypes {
    by_extension: HashMap<String, String>,
}

impl ContentTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `content_type` for files ending in `.extension`.
    ///
    /// A later registration for the same extension replaces the earlier one.
    pub fn insert(&mut self, extension: impl Into<String>, content_type: impl Into<String>) {
        self.by_extension
            .insert(extension.into(), content_type.into());
    }

    /// Content type registered for `extension`, matched exactly.
    pub fn lookup(&self, extension: &str) -> Option<&str> {
        self.by_extension.get(extension).map(String::as_str)
    }

    /// Content type for the final extension of `path`, if it has one.
    pub fn for_path(&self, path: &Path) -> Option<&str> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.lookup(ext))
    }

    pub fn len(&self) -> usize {
        self.by_extension.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_extension.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ContentTypes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut types = ContentTypes::new();
        for (ext, ct) in iter {
            types.insert(ext, ct);
        }
        types
    }
}
