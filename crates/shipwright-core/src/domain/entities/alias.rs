//! Resolved alias bindings and their per-alias grouping.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::value_objects::{CommandName, GroupId, SourceKind, TargetRef};

/// One invocable name claimed by one declaration in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasBinding {
    pub alias: String,
    pub kind: SourceKind,
    pub group: GroupId,
    /// `None` for group-level bindings.
    pub command: Option<CommandName>,
    pub target: TargetRef,
}

impl AliasBinding {
    pub fn for_group(package: &str, group: &GroupId) -> Self {
        Self {
            alias: group.to_string(),
            kind: SourceKind::Group,
            group: group.clone(),
            command: None,
            target: TargetRef::group_dispatcher(package, group),
        }
    }

    pub fn for_command(
        package: &str,
        group: &GroupId,
        command: &CommandName,
        alias: impl Into<String>,
    ) -> Self {
        Self {
            alias: alias.into(),
            kind: SourceKind::Command,
            group: group.clone(),
            command: Some(command.clone()),
            target: TargetRef::command_entry(package, group, command),
        }
    }

    /// Human-readable origin: `group probe` or `command probe:map-planet`.
    pub fn source_label(&self) -> String {
        match &self.command {
            Some(command) => format!("command {}:{}", self.group, command),
            None => format!("group {}", self.group),
        }
    }

    /// Python identifier the alias is imported under.
    pub fn import_ident(&self) -> String {
        format!("{}_command", self.alias.replace('-', "_"))
    }

    /// Stable ordering key: group, then command (empty for the group
    /// binding itself), then alias.
    pub fn sort_key(&self) -> (&str, &str, &str) {
        (
            self.group.as_str(),
            self.command.as_ref().map_or("", |c| c.canonical()),
            &self.alias,
        )
    }
}

/// Multimap from alias string to every binding that claims it.
///
/// Only built during conflict detection and dropped afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasSourceSet {
    entries: BTreeMap<String, Vec<AliasBinding>>,
}

impl AliasSourceSet {
    pub fn from_bindings(bindings: &[AliasBinding]) -> Self {
        let mut entries: BTreeMap<String, Vec<AliasBinding>> = BTreeMap::new();
        for binding in bindings {
            entries
                .entry(binding.alias.clone())
                .or_default()
                .push(binding.clone());
        }
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[AliasBinding])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn sources(&self, alias: &str) -> &[AliasBinding] {
        self.entries.get(alias).map_or(&[], Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
