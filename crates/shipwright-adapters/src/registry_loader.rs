//! YAML registry loader.
//!
//! Parses the command registry document into a validated
//! [`Registry`]. Declaration order of groups and commands is kept as written.
//!
//! # Document format
//!
//! ```yaml
//! probe:
//!   description: Survey unexplored code
//!   commands:
//!     map-planet:
//!       description: Map the planet surface
//!       options: ["--depth", {name: "--output", help: "Where to write"}]
//!       aliases: [map]
//! ```
//!
//! Every field is optional and a `null` group or command means "all
//! defaults". Unknown keys are ignored.

use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};
use tracing::{debug, instrument};

use shipwright_core::{
    application::{ports::RegistrySource, ApplicationError},
    domain::{CommandGroup, CommandSpec, OptionSpec, Registry},
    error::{ShipwrightError, ShipwrightResult},
};

/// Loads the registry from a YAML file on every call.
#[derive(Debug, Clone)]
pub struct YamlRegistryLoader {
    path: PathBuf,
}

impl YamlRegistryLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse registry text. `origin` is only used in error messages.
    pub fn parse_str(text: &str, origin: &Path) -> ShipwrightResult<Registry> {
        let fail = |reason: String| -> ShipwrightError {
            ApplicationError::RegistryParse {
                path: origin.to_path_buf(),
                reason,
            }
            .into()
        };

        let document: Value = serde_yaml::from_str(text).map_err(|e| fail(e.to_string()))?;
        let top = match document {
            Value::Null => Mapping::new(),
            Value::Mapping(map) => map,
            other => {
                return Err(fail(format!(
                    "top level must be a mapping of group names, found {}",
                    kind(&other)
                )))
            }
        };

        let mut groups = Vec::with_capacity(top.len());
        for (key, value) in &top {
            let id = key_str(key).ok_or_else(|| fail("group names must be strings".into()))?;
            let group = parse_group(id, value).map_err(|reason| fail(format!("group '{id}': {reason}")))?;
            groups.push(group);
        }

        Registry::new(groups).map_err(|e| fail(e.to_string()))
    }
}

impl RegistrySource for YamlRegistryLoader {
    #[instrument(skip_all, fields(path = %self.path.display()))]
    fn load(&self) -> ShipwrightResult<Registry> {
        let text = std::fs::read_to_string(&self.path).map_err(|e| {
            ShipwrightError::from(ApplicationError::RegistryParse {
                path: self.path.clone(),
                reason: format!("cannot read file: {e}"),
            })
        })?;
        let registry = Self::parse_str(&text, &self.path)?;
        debug!(groups = registry.groups().len(), "registry parsed");
        Ok(registry)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

fn parse_group(id: &str, value: &Value) -> Result<CommandGroup, String> {
    let fields = mapping_or_null(value, "group")?;
    let description = optional_string(&fields, "description")?;
    let mut group = CommandGroup::new(id, description).map_err(|e| e.to_string())?;

    match fields.get("commands") {
        None | Some(Value::Null) => {}
        Some(Value::Mapping(commands)) => {
            for (key, value) in commands {
                let name = key_str(key).ok_or("command names must be strings")?;
                let command = parse_command(name, value)
                    .map_err(|reason| format!("command '{name}': {reason}"))?;
                group = group.with_command(command).map_err(|e| e.to_string())?;
            }
        }
        Some(other) => return Err(format!("'commands' must be a mapping, found {}", kind(other))),
    }
    Ok(group)
}

fn parse_command(name: &str, value: &Value) -> Result<CommandSpec, String> {
    let fields = mapping_or_null(value, "command")?;
    let description = optional_string(&fields, "description")?;
    let mut command = CommandSpec::new(name, description).map_err(|e| e.to_string())?;

    for option in sequence(&fields, "options")? {
        command = command.with_option(parse_option(option)?);
    }
    for alias in sequence(&fields, "aliases")? {
        let alias = alias
            .as_str()
            .ok_or_else(|| format!("aliases must be strings, found {}", kind(alias)))?;
        command = command.with_alias(alias).map_err(|e| e.to_string())?;
    }
    Ok(command)
}

fn parse_option(value: &Value) -> Result<OptionSpec, String> {
    match value {
        Value::String(name) => Ok(OptionSpec::new(name.as_str())),
        Value::Mapping(map) => {
            let name = map
                .get("name")
                .and_then(Value::as_str)
                .ok_or("option mappings need a string 'name'")?;
            let option = OptionSpec::new(name);
            match map.get("help") {
                None | Some(Value::Null) => Ok(option),
                Some(Value::String(help)) => Ok(option.with_help(help.as_str())),
                Some(other) => Err(format!("option help must be a string, found {}", kind(other))),
            }
        }
        other => Err(format!("options must be strings or mappings, found {}", kind(other))),
    }
}

fn mapping_or_null(value: &Value, what: &str) -> Result<Mapping, String> {
    match value {
        Value::Null => Ok(Mapping::new()),
        Value::Mapping(map) => Ok(map.clone()),
        other => Err(format!("{what} must be a mapping, found {}", kind(other))),
    }
}

fn optional_string(fields: &Mapping, key: &str) -> Result<String, String> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(other) => Err(format!("'{key}' must be a string, found {}", kind(other))),
    }
}

fn sequence<'a>(fields: &'a Mapping, key: &str) -> Result<&'a [Value], String> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Sequence(items)) => Ok(items.as_slice()),
        Some(other) => Err(format!("'{key}' must be a list, found {}", kind(other))),
    }
}

fn key_str(key: &Value) -> Option<&str> {
    key.as_str()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> ShipwrightResult<Registry> {
        YamlRegistryLoader::parse_str(text, Path::new("commands.yml"))
    }

    #[test]
    fn full_document_parses_in_order() {
        let registry = parse(
            r#"
vessel:
  description: Ship commands
  commands:
    tour_ship:
      description: Tour the ship
probe:
  description: Survey
  commands:
    map-planet:
      description: Map it
      options: ["--depth", {name: "--output", help: "Where"}]
      aliases: [map]
    scan-sector:
"#,
        )
        .unwrap();

        let ids: Vec<_> = registry.groups().iter().map(|g| g.id().as_str()).collect();
        assert_eq!(ids, ["vessel", "probe"]);

        let probe = registry.group("probe").unwrap();
        let map = probe.command("map-planet").unwrap();
        assert_eq!(map.aliases()[0].as_str(), "map");
        assert_eq!(map.options()[1].help.as_deref(), Some("Where"));
        assert_eq!(probe.command("scan-sector").unwrap().description(), "");
        assert_eq!(
            registry.group("vessel").unwrap().commands()[0].name().canonical(),
            "tour-ship"
        );
    }

    #[test]
    fn empty_document_is_an_empty_registry() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("empty_group:\n").unwrap().group("empty_group").is_some());
    }

    #[test]
    fn syntax_errors_are_registry_parse_errors() {
        let err = parse("probe: [unclosed").unwrap_err();
        assert!(matches!(
            err,
            ShipwrightError::Application(ApplicationError::RegistryParse { .. })
        ));
    }

    #[test]
    fn shape_errors_name_the_offender() {
        let err = parse("probe:\n  commands:\n    map:\n      aliases: map\n").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("group 'probe'"), "{msg}");
        assert!(msg.contains("command 'map'"), "{msg}");
        assert!(parse("- a\n- b\n").is_err());
    }

    #[test]
    fn normalized_duplicates_are_rejected() {
        let err = parse("probe:\n  commands:\n    map_planet:\n    map-planet:\n").unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn duplicate_yaml_keys_are_rejected() {
        assert!(parse("probe:\nprobe:\n").is_err());
    }

    #[test]
    fn invalid_names_are_rejected() {
        assert!(parse("Probe:\n").is_err());
        assert!(parse("probe:\n  commands:\n    map:\n      aliases: [\"m_p\"]\n").is_err());
    }

    #[test]
    fn names_that_are_not_python_identifiers_are_rejected() {
        let err = parse("vessel:\n  commands:\n    render:\n      aliases: [\"3d\"]\n").unwrap_err();
        assert!(matches!(
            err,
            ShipwrightError::Application(ApplicationError::RegistryParse { .. })
        ));
        assert!(err.to_string().contains("alias name '3d'"), "{err}");

        let err = parse("vessel:\n  commands:\n    import:\n").unwrap_err();
        assert!(err.to_string().contains("keyword"), "{err}");
        assert!(parse("class:\n").is_err());
    }

    #[test]
    fn missing_file_fails_on_load() {
        let loader = YamlRegistryLoader::new("/definitely/not/here.yml");
        assert!(loader.load().is_err());
        assert_eq!(loader.location(), "/definitely/not/here.yml");
    }
}
