//! Class index to disease name mapping.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{EirError, Result};

/// Disease names in classifier output order.
///
/// Built once at startup and shared read-only across requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSet {
    names: Vec<String>,
}

impl LabelSet {
    /// Create a label set from names in class index order.
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Load labels from a file.
    ///
    /// `.json` files hold a JSON array of names; anything else is read as
    /// one name per line, blank lines skipped.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| EirError::resource_load("labels", format!("{path:?}: {e}")))?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let labels = if is_json {
            Self::from_json(&content)
        } else {
            Ok(Self::from_lines(&content))
        }?;

        if labels.is_empty() {
            return Err(EirError::resource_load(
                "labels",
                format!("{path:?} contains no labels"),
            ));
        }

        info!(path = %path.display(), count = labels.len(), "loaded label set");
        Ok(labels)
    }

    /// Parse a JSON array of names.
    pub fn from_json(content: &str) -> Result<Self> {
        let names: Vec<String> = serde_json::from_str(content)
            .map_err(|e| EirError::resource_load("labels", e))?;
        Ok(Self::new(names))
    }

    /// Parse one name per line.
    pub fn from_lines(content: &str) -> Self {
        let names = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self::new(names)
    }

    /// Name for a class index.
    pub fn name(&self, index: usize) -> Result<&str> {
        self.names.get(index).map(String::as_str).ok_or_else(|| {
            EirError::Configuration(format!(
                "class index {index} has no label ({} labels loaded)",
                self.names.len()
            ))
        })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}
