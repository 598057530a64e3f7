//! Reserved-alias list reader.
//!
//! Plain text, one alias per line. Blank lines and `#` comments are skipped
//! and surrounding whitespace is trimmed. A missing file is an empty list.

use std::collections::BTreeSet;
use std::path::PathBuf;

use tracing::debug;

use shipwright_core::{
    application::{ports::ReservedAliasSource, ApplicationError},
    error::ShipwrightResult,
};

#[derive(Debug, Clone)]
pub struct ReservedListFile {
    path: Option<PathBuf>,
}

impl ReservedListFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// No reserved list configured.
    pub fn none() -> Self {
        Self { path: None }
    }

    pub fn parse(text: &str) -> BTreeSet<String> {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect()
    }
}

impl ReservedAliasSource for ReservedListFile {
    fn load(&self) -> ShipwrightResult<BTreeSet<String>> {
        let Some(path) = &self.path else {
            return Ok(BTreeSet::new());
        };
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let reserved = Self::parse(&text);
                debug!(path = %path.display(), count = reserved.len(), "reserved aliases loaded");
                Ok(reserved)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no reserved-alias list");
                Ok(BTreeSet::new())
            }
            Err(e) => Err(ApplicationError::FilesystemError {
                path: path.clone(),
                reason: format!("Failed to read reserved aliases: {e}"),
            }
            .into()),
        }
    }
}
