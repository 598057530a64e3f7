//! Region names and the pure renderers that produce their bodies.
//!
//! Every function here is a deterministic function of the registry and the
//! resolved bindings: unchanged inputs give byte-identical bodies, which is
//! what lets the artifact writer skip untouched files.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::domain::{
    entities::{
        alias::AliasBinding,
        region::{GeneratedRegion, RegionSpec},
        registry::{CommandGroup, Registry},
    },
    error::DomainError,
    value_objects::{GroupId, SourceKind, TargetRef},
};

pub const ENTRY_POINTS: RegionSpec =
    RegionSpec::new("entry-points").after_section("[project.scripts]");
pub const COMMAND_IMPORTS: RegionSpec = RegionSpec::new("command-imports");
pub const GROUP_STYLES: RegionSpec = RegionSpec::new("group-styles");
pub const GROUP_EXPORTS: RegionSpec = RegionSpec::new("group-exports");
pub const COMMAND_GROUPS: RegionSpec = RegionSpec::new("command-groups");
pub const COMMAND_REFERENCE: RegionSpec = RegionSpec::markdown("command-reference");

// ── Entry-point alias table ──────────────────────────────────────────────────

/// Flat `alias → module:function` table, program entry first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTable {
    entries: Vec<(String, String)>,
}

impl AliasTable {
    /// Build from conflict-free bindings. An alias reached through several
    /// declarations resolves to one target, so only its first occurrence is
    /// kept.
    pub fn build(program: &str, program_target: &TargetRef, bindings: &[AliasBinding]) -> Self {
        let mut seen = BTreeSet::new();
        let mut entries = vec![(program.to_string(), program_target.to_string())];
        seen.insert(program.to_string());
        for binding in bindings {
            if seen.insert(binding.alias.clone()) {
                entries.push((binding.alias.clone(), binding.target.to_string()));
            }
        }
        Self { entries }
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_region(&self) -> Result<GeneratedRegion, DomainError> {
        let mut lines = Vec::with_capacity(self.entries.len());
        for (alias, target) in &self.entries {
            let mut row = toml::Table::new();
            row.insert(alias.clone(), toml::Value::String(target.clone()));
            let line = toml::to_string(&row).map_err(|e| DomainError::UnreadableRegion {
                region: ENTRY_POINTS.name().to_string(),
                reason: e.to_string(),
            })?;
            lines.push(line.trim_end().to_string());
        }
        Ok(GeneratedRegion::new(ENTRY_POINTS, lines))
    }

    /// Read a previously generated table body back into a map.
    pub fn parse(body: &str) -> Result<BTreeMap<String, String>, DomainError> {
        let unreadable = |reason: String| DomainError::UnreadableRegion {
            region: ENTRY_POINTS.name().to_string(),
            reason,
        };
        let table: toml::Table = toml::from_str(body).map_err(|e| unreadable(e.to_string()))?;
        table
            .into_iter()
            .map(|(alias, value)| match value {
                toml::Value::String(target) => Ok((alias, target)),
                other => Err(unreadable(format!(
                    "entry '{alias}' is a {}, expected a string",
                    other.type_str()
                ))),
            })
            .collect()
    }

    /// Compare against the previous table.
    pub fn diff(&self, previous: &BTreeMap<String, String>) -> AliasTableDiff {
        let mut diff = AliasTableDiff::default();
        let current: BTreeMap<&str, &str> = self
            .entries
            .iter()
            .map(|(a, t)| (a.as_str(), t.as_str()))
            .collect();

        for (alias, target) in &self.entries {
            match previous.get(alias) {
                None => diff.added.push(AliasChange::new(alias, None, Some(target))),
                Some(old) if old != target => {
                    diff.updated.push(AliasChange::new(alias, Some(old), Some(target)))
                }
                Some(_) => {}
            }
        }
        for (alias, old) in previous {
            if !current.contains_key(alias.as_str()) {
                diff.removed.push(AliasChange::new(alias, Some(old), None));
            }
        }
        diff
    }
}

/// One row of an alias-table diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasChange {
    pub alias: String,
    pub old: Option<String>,
    pub new: Option<String>,
}

impl AliasChange {
    fn new(alias: &str, old: Option<&String>, new: Option<&String>) -> Self {
        Self {
            alias: alias.to_string(),
            old: old.cloned(),
            new: new.cloned(),
        }
    }
}

/// Entries added, retargeted and retired by a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AliasTableDiff {
    pub added: Vec<AliasChange>,
    pub updated: Vec<AliasChange>,
    pub removed: Vec<AliasChange>,
}

impl AliasTableDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }
}

// ── CLI import / registration block ──────────────────────────────────────────

/// One import per command alias (alias-table order) followed by a
/// registration function wiring every group dispatcher into the router.
pub fn command_imports(package: &str, bindings: &[AliasBinding]) -> GeneratedRegion {
    let mut lines = Vec::new();
    let mut seen = BTreeSet::new();
    let mut groups: Vec<&GroupId> = Vec::new();

    for binding in bindings {
        match binding.kind {
            SourceKind::Group => groups.push(&binding.group),
            SourceKind::Command if seen.insert(binding.alias.as_str()) => lines.push(format!(
                "from {} import {} as {}  # alias: {}",
                binding.target.module,
                binding.target.function,
                binding.import_ident(),
                binding.alias
            )),
            SourceKind::Command => {}
        }
    }

    for group in &groups {
        lines.push(format!("from {package}.commands.{group} import {group}_group"));
    }
    lines.push(String::new());
    lines.push(String::new());
    lines.push("def register_command_groups(router):".into());
    lines.push("    \"\"\"Attach every command group to the top-level router.\"\"\"".into());
    for group in &groups {
        lines.push(format!("    router.add_command({group}_group, \"{group}\")"));
    }

    GeneratedRegion::new(COMMAND_IMPORTS, lines)
}

// ── Per-group display metadata ───────────────────────────────────────────────

pub const DEFAULT_ICON: &str = "\u{25c6}"; // ◆

pub const PALETTE: [&str; 8] = [
    "cyan",
    "magenta",
    "green",
    "yellow",
    "blue",
    "red",
    "bright_cyan",
    "bright_magenta",
];

/// Display theme of a command group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupStyle {
    pub icon: String,
    pub color: String,
    #[serde(default)]
    pub help: String,
}

impl GroupStyle {
    /// Deterministic default: fixed icon, palette color chosen by hash.
    pub fn default_for(group: &GroupId, help: &str) -> Self {
        let index = (fnv1a(group.as_str().as_bytes()) % PALETTE.len() as u64) as usize;
        Self {
            icon: DEFAULT_ICON.to_string(),
            color: PALETTE[index].to_string(),
            help: help.to_string(),
        }
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    hash
}

/// Parse `"group": {...},` lines of an existing styles body. Lines that are
/// not entries (the dict opener and closer, comments) are skipped.
pub fn parse_group_styles(body: &str) -> Result<BTreeMap<String, GroupStyle>, DomainError> {
    let mut styles = BTreeMap::new();
    for line in body.lines() {
        let line = line.trim();
        let Some(rest) = line.strip_prefix('"') else {
            continue;
        };
        let Some((key, value)) = rest.split_once("\":") else {
            continue;
        };
        let value = value.trim().trim_end_matches(',').trim_end();
        let style: GroupStyle =
            serde_json::from_str(value).map_err(|e| DomainError::UnreadableRegion {
                region: GROUP_STYLES.name().to_string(),
                reason: format!("entry '{key}': {e}"),
            })?;
        styles.insert(key.to_string(), style);
    }
    Ok(styles)
}

/// One entry per declared group. Existing icon/color choices of declared
/// groups survive; entries of groups no longer declared are dropped.
pub fn group_styles(
    registry: &Registry,
    previous: &BTreeMap<String, GroupStyle>,
) -> Result<GeneratedRegion, DomainError> {
    let mut lines = vec!["GROUP_STYLES = {".to_string()];
    for group in sorted_groups(registry) {
        let mut style = GroupStyle::default_for(group.id(), group.description());
        if let Some(existing) = previous.get(group.id().as_str()) {
            style.icon = existing.icon.clone();
            style.color = existing.color.clone();
        }
        let json = serde_json::to_string(&style).map_err(|e| DomainError::UnreadableRegion {
            region: GROUP_STYLES.name().to_string(),
            reason: e.to_string(),
        })?;
        lines.push(format!("    \"{}\": {},", group.id(), json));
    }
    lines.push("}".to_string());
    Ok(GeneratedRegion::new(GROUP_STYLES, lines))
}

// ── Package __init__ exports ─────────────────────────────────────────────────

/// Body of `<commands-root>/<group>/__init__.py`.
pub fn group_exports(program: &str, package: &str, group: &CommandGroup) -> GeneratedRegion {
    let id = group.id();
    let mut modules: Vec<String> = group
        .commands()
        .iter()
        .map(|c| c.name().module_name())
        .collect();
    modules.sort();

    let mut lines = vec!["import click".to_string(), String::new()];
    lines.push("__all__ = [".into());
    for module in &modules {
        lines.push(format!("    \"{module}\","));
    }
    lines.push(format!("    \"{id}_group\","));
    lines.push("    \"run_group\",".into());
    lines.push("]".into());
    lines.push(String::new());
    for module in &modules {
        lines.push(format!("from . import {module}"));
    }
    lines.push(String::new());
    lines.push(format!(
        "{id}_group = click.Group(name=\"{id}\", help={})",
        python_str(group.description())
    ));
    for module in &modules {
        lines.push(format!("{id}_group.add_command({module}.{module}_command)"));
    }
    lines.push(String::new());
    lines.push(String::new());
    lines.push("def run_group():".into());
    lines.push(format!(
        "    \"\"\"Run the {id} command group as a standalone executable.\"\"\""
    ));
    lines.push("    import sys".into());
    lines.push(String::new());
    lines.push(format!("    from {package}.cli import main"));
    lines.push(String::new());
    lines.push(format!("    sys.argv = [\"{program}\", \"{id}\"] + sys.argv[1:]"));
    lines.push("    main()".into());

    GeneratedRegion::new(GROUP_EXPORTS, lines)
}

/// Body of `<commands-root>/__init__.py`.
pub fn command_groups(registry: &Registry) -> GeneratedRegion {
    let groups = sorted_groups(registry);
    let mut lines = vec!["__all__ = [".to_string()];
    for group in &groups {
        lines.push(format!("    \"{}\",", group.id()));
    }
    lines.push("]".into());
    lines.push(String::new());
    for group in &groups {
        lines.push(format!("from . import {}", group.id()));
    }
    GeneratedRegion::new(COMMAND_GROUPS, lines)
}

// ── README command reference ─────────────────────────────────────────────────

pub fn command_reference(registry: &Registry) -> GeneratedRegion {
    let mut lines = Vec::new();
    for group in sorted_groups(registry) {
        lines.push(format!("### {} commands", group.id()));
        lines.push(String::new());
        if !group.description().is_empty() {
            lines.push(markdown_cell(group.description()));
            lines.push(String::new());
        }
        lines.push("| Command | Aliases | Description |".into());
        lines.push("|---------|---------|-------------|".into());
        for command in group.commands() {
            let aliases: Vec<String> = command
                .aliases()
                .iter()
                .map(|a| format!("`{a}`"))
                .collect();
            lines.push(format!(
                "| `{} {}` | {} | {} |",
                group.id(),
                command.name(),
                aliases.join(", "),
                markdown_cell(command.description())
            ));
        }
        lines.push(String::new());
    }
    GeneratedRegion::new(COMMAND_REFERENCE, lines)
}

// ── helpers ──────────────────────────────────────────────────────────────────

fn sorted_groups(registry: &Registry) -> Vec<&CommandGroup> {
    let mut groups: Vec<&CommandGroup> = registry.groups().iter().collect();
    groups.sort_by(|a, b| a.id().cmp(b.id()));
    groups
}

/// A double-quoted literal valid in both JSON and Python.
fn python_str(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

fn markdown_cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::registry::CommandSpec, resolution::resolve_aliases,
    };

    fn registry() -> Registry {
        Registry::new(vec![
            CommandGroup::new("vessel", "Ship commands")
                .unwrap()
                .with_command(CommandSpec::new("tour-ship", "Tour").unwrap())
                .unwrap(),
            CommandGroup::new("probe", "Probe commands")
                .unwrap()
                .with_command(
                    CommandSpec::new("map-planet", "Map it | fast")
                        .unwrap()
                        .with_alias("map")
                        .unwrap(),
                )
                .unwrap(),
        ])
        .unwrap()
    }

    fn table() -> AliasTable {
        let bindings = resolve_aliases(&registry(), "starship");
        AliasTable::build("starship", &TargetRef::program_entry("starship"), &bindings)
    }

    #[test]
    fn table_starts_with_program_entry() {
        let t = table();
        assert_eq!(t.entries()[0], ("starship".into(), "starship.cli:main".into()));
        assert_eq!(t.len(), 6);
    }

    #[test]
    fn table_region_round_trips_through_parse() {
        let region = table().to_region().unwrap();
        assert!(region.body().contains("map = \"starship.commands.probe.map_planet.cli:map_planet_command\"\n"));
        let parsed = AliasTable::parse(region.body()).unwrap();
        assert_eq!(parsed.len(), 6);
        assert_eq!(parsed["vessel"], "starship.commands.vessel:run_group");
    }

    #[test]
    fn diff_reports_added_updated_removed() {
        let mut previous = BTreeMap::new();
        previous.insert("starship".to_string(), "starship.cli:main".to_string());
        previous.insert("map".to_string(), "elsewhere:fn".to_string());
        previous.insert("retired".to_string(), "old:fn".to_string());

        let diff = table().diff(&previous);
        assert_eq!(diff.updated.len(), 1);
        assert_eq!(diff.updated[0].alias, "map");
        assert_eq!(diff.removed.len(), 1);
        assert_eq!(diff.removed[0].alias, "retired");
        assert_eq!(diff.added.len(), 4);
    }

    #[test]
    fn unreadable_table_is_reported() {
        assert!(AliasTable::parse("not = [valid").is_err());
        assert!(AliasTable::parse("x = 3").is_err());
    }

    #[test]
    fn imports_cover_command_aliases_and_register_groups() {
        let bindings = resolve_aliases(&registry(), "starship");
        let body = command_imports("starship", &bindings).body().to_string();
        assert!(body.contains(
            "from starship.commands.probe.map_planet.cli import map_planet_command as map_command  # alias: map\n"
        ));
        assert!(body.contains("from starship.commands.vessel import vessel_group\n"));
        assert!(body.contains("    router.add_command(probe_group, \"probe\")\n"));
        assert!(!body.contains("run_group as"));
    }

    #[test]
    fn default_style_is_deterministic() {
        let id = GroupId::new("probe").unwrap();
        assert_eq!(GroupStyle::default_for(&id, ""), GroupStyle::default_for(&id, ""));
        assert!(PALETTE.contains(&GroupStyle::default_for(&id, "").color.as_str()));
    }

    #[test]
    fn styles_preserve_custom_entries_and_prune_stale_ones() {
        let mut previous = BTreeMap::new();
        previous.insert(
            "probe".to_string(),
            GroupStyle {
                icon: "🛰".into(),
                color: "white".into(),
                help: "stale help".into(),
            },
        );
        previous.insert(
            "retired".to_string(),
            GroupStyle {
                icon: "x".into(),
                color: "red".into(),
                help: String::new(),
            },
        );

        let region = group_styles(&registry(), &previous).unwrap();
        let parsed = parse_group_styles(region.body()).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed["probe"].icon, "🛰");
        assert_eq!(parsed["probe"].color, "white");
        assert_eq!(parsed["probe"].help, "Probe commands");
        assert_eq!(parsed["vessel"].icon, DEFAULT_ICON);
        assert!(!parsed.contains_key("retired"));
    }

    #[test]
    fn group_exports_wire_commands() {
        let reg = registry();
        let body = group_exports("starship", "starship", reg.group("probe").unwrap())
            .body()
            .to_string();
        assert!(body.contains("from . import map_planet\n"));
        assert!(body.contains("probe_group = click.Group(name=\"probe\", help=\"Probe commands\")\n"));
        assert!(body.contains("probe_group.add_command(map_planet.map_planet_command)\n"));
        assert!(body.contains("    sys.argv = [\"starship\", \"probe\"] + sys.argv[1:]\n"));
    }

    #[test]
    fn command_groups_are_sorted() {
        let body = command_groups(&registry()).body().to_string();
        let probe = body.find("from . import probe").unwrap();
        let vessel = body.find("from . import vessel").unwrap();
        assert!(probe < vessel);
    }

    #[test]
    fn reference_escapes_pipes() {
        let body = command_reference(&registry()).body().to_string();
        assert!(body.contains("| `probe map-planet` | `map` | Map it \\| fast |"));
    }
}
