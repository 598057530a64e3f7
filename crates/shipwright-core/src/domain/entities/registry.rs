//! The in-memory command registry.
//!
//! A [`Registry`] is produced once per run by a
//! [`RegistrySource`](crate::application::ports::RegistrySource) and then
//! passed by reference through every later stage. It is never mutated after
//! construction; every uniqueness invariant is checked in [`Registry::new`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::{
    error::DomainError,
    value_objects::{Alias, CommandName, GroupId},
};

/// A declared command-line option (`--depth`), kept for documentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSpec {
    pub name: String,
    pub help: Option<String>,
}

impl OptionSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            help: None,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

/// One command inside a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    name: CommandName,
    description: String,
    options: Vec<OptionSpec>,
    aliases: Vec<Alias>,
}

impl CommandSpec {
    pub fn new(name: &str, description: impl Into<String>) -> Result<Self, DomainError> {
        Ok(Self {
            name: CommandName::new(name)?,
            description: description.into(),
            options: Vec::new(),
            aliases: Vec::new(),
        })
    }

    /// Add an extra alias. Repeats of an alias already declared are ignored.
    pub fn with_alias(mut self, alias: &str) -> Result<Self, DomainError> {
        let alias = Alias::new(alias)?;
        if !self.aliases.contains(&alias) {
            self.aliases.push(alias);
        }
        Ok(self)
    }

    pub fn with_option(mut self, option: OptionSpec) -> Self {
        self.options.push(option);
        self
    }

    pub fn name(&self) -> &CommandName {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn options(&self) -> &[OptionSpec] {
        &self.options
    }

    pub fn aliases(&self) -> &[Alias] {
        &self.aliases
    }
}

/// A named group of commands, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandGroup {
    id: GroupId,
    description: String,
    commands: Vec<CommandSpec>,
}

impl CommandGroup {
    pub fn new(id: &str, description: impl Into<String>) -> Result<Self, DomainError> {
        Ok(Self {
            id: GroupId::new(id)?,
            description: description.into(),
            commands: Vec::new(),
        })
    }

    /// Append a command, rejecting a second command with the same
    /// canonical name.
    pub fn with_command(mut self, command: CommandSpec) -> Result<Self, DomainError> {
        if self.command(command.name().canonical()).is_some() {
            return Err(DomainError::DuplicateCommand {
                group: self.id.to_string(),
                command: command.name().to_string(),
            });
        }
        self.commands.push(command);
        Ok(self)
    }

    pub fn id(&self) -> &GroupId {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn commands(&self) -> &[CommandSpec] {
        &self.commands
    }

    /// Look up a command by name; `-` and `_` are interchangeable.
    pub fn command(&self, name: &str) -> Option<&CommandSpec> {
        let wanted = name.replace('_', "-");
        self.commands.iter().find(|c| c.name().canonical() == wanted)
    }
}

/// All declared groups, keyed by group id and kept in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    groups: Vec<CommandGroup>,
}

impl Registry {
    pub fn new(groups: Vec<CommandGroup>) -> Result<Self, DomainError> {
        let mut seen = HashSet::new();
        for group in &groups {
            if !seen.insert(group.id().as_str()) {
                return Err(DomainError::DuplicateGroup {
                    group: group.id().to_string(),
                });
            }
            let mut names = HashSet::new();
            for command in group.commands() {
                if !names.insert(command.name().canonical()) {
                    return Err(DomainError::DuplicateCommand {
                        group: group.id().to_string(),
                        command: command.name().to_string(),
                    });
                }
            }
        }
        Ok(Self { groups })
    }

    pub fn groups(&self) -> &[CommandGroup] {
        &self.groups
    }

    pub fn group(&self, id: &str) -> Option<&CommandGroup> {
        self.groups.iter().find(|g| g.id().as_str() == id)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Every `(group, command)` pair, in declaration order.
    pub fn commands(&self) -> impl Iterator<Item = (&CommandGroup, &CommandSpec)> {
        self.groups
            .iter()
            .flat_map(|g| g.commands().iter().map(move |c| (g, c)))
    }

    pub fn command_count(&self) -> usize {
        self.groups.iter().map(|g| g.commands().len()).sum()
    }
}
