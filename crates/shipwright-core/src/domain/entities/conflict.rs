//! Conflict report produced by [`crate::domain::conflicts::detect_conflicts`].

use std::fmt;

use serde::Serialize;

/// Which rule an alias violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictKind {
    /// Claimed both as a group shortcut and as a command alias.
    MixedNamespaces,
    /// Claimed by several declarations that resolve to different targets.
    DivergentTargets,
    /// Listed in the reserved-alias list.
    Reserved,
}

/// A single conflicting alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    pub alias: String,
    pub kind: ConflictKind,
    /// Source labels (`group probe`, `command probe:map-planet`).
    pub sources: Vec<String>,
}

impl Conflict {
    /// Detail text without the alias, for tabular display.
    pub fn details(&self) -> String {
        match self.kind {
            ConflictKind::MixedNamespaces => format!(
                "used as both a group and a command: {}",
                self.sources.join(", ")
            ),
            ConflictKind::DivergentTargets => format!(
                "used in multiple contexts: {}",
                self.sources.join(", ")
            ),
            ConflictKind::Reserved if self.sources.is_empty() => {
                "reserved and cannot be used".to_string()
            }
            ConflictKind::Reserved => format!(
                "reserved and cannot be used (declared by {})",
                self.sources.join(", ")
            ),
        }
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Alias '{}' is {}", self.alias, self.details())
    }
}

/// Every conflict found in one run, in alias order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConflictReport {
    conflicts: Vec<Conflict>,
}

impl ConflictReport {
    pub fn new(conflicts: Vec<Conflict>) -> Self {
        Self { conflicts }
    }

    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conflicts.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Conflict> {
        self.conflicts.iter()
    }

    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    /// Offending alias strings, deduplicated, in report order.
    pub fn aliases(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for conflict in &self.conflicts {
            if !out.contains(&conflict.alias.as_str()) {
                out.push(&conflict.alias);
            }
        }
        out
    }

    pub fn for_alias<'a>(&'a self, alias: &'a str) -> impl Iterator<Item = &'a Conflict> + 'a {
        self.conflicts.iter().filter(move |c| c.alias == alias)
    }
}

impl fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for conflict in &self.conflicts {
            writeln!(f, "{conflict}")?;
        }
        Ok(())
    }
}
