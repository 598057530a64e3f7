//! Domain value objects: GroupId, CommandName, Alias, SourceKind, TargetRef.
//!
//! # Design
//!
//! These are pure value types with equality-by-value and no identity. Each
//! one validates its character set on construction, so code holding a
//! `GroupId` or an `Alias` never re-checks it. Normalization rules live
//! here and nowhere else:
//!
//! - a command's *canonical* name is hyphenated (`map-planet`)
//! - a command's *module* name is underscored (`map_planet`)

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── GroupId ──────────────────────────────────────────────────────────────────

/// Identifier of a command group (`probe`, `send_probe`).
///
/// Lowercase ASCII letters, digits and `_`, starting with a letter. The
/// group id doubles as the group's shortcut alias and as its package
/// directory name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GroupId(String);

impl GroupId {
    pub fn new(raw: impl Into<String>) -> Result<Self, DomainError> {
        let raw = raw.into();
        check_chars("group", &raw, |c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')?;
        if !raw.starts_with(|c: char| c.is_ascii_lowercase()) {
            return Err(invalid("group", &raw, "must start with a lowercase letter"));
        }
        if is_python_keyword(&raw) {
            return Err(invalid("group", &raw, "is a reserved Python keyword"));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for GroupId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<GroupId> for String {
    fn from(value: GroupId) -> Self {
        value.0
    }
}

// ── CommandName ──────────────────────────────────────────────────────────────

/// A command name, stored in canonical (hyphenated) form.
///
/// `map_planet` and `map-planet` construct equal values.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CommandName(String);

impl CommandName {
    pub fn new(raw: impl Into<String>) -> Result<Self, DomainError> {
        let raw = raw.into();
        check_chars("command", &raw, |c| {
            c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_'
        })?;
        if !raw.starts_with(|c: char| c.is_ascii_lowercase()) {
            return Err(invalid("command", &raw, "must start with a lowercase letter"));
        }
        if raw.ends_with(['-', '_']) {
            return Err(invalid("command", &raw, "must not end with '-' or '_'"));
        }
        if is_python_keyword(&raw.replace('-', "_")) {
            return Err(invalid("command", &raw, "is a reserved Python keyword"));
        }
        Ok(Self(raw.replace('_', "-")))
    }

    /// Hyphenated form, used as the command's implicit alias.
    pub fn canonical(&self) -> &str {
        &self.0
    }

    /// Underscored form, used for package directories and function names.
    pub fn module_name(&self) -> String {
        self.0.replace('-', "_")
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CommandName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CommandName> for String {
    fn from(value: CommandName) -> Self {
        value.0
    }
}

// ── Alias ────────────────────────────────────────────────────────────────────

/// An extra invocable name declared for a command.
///
/// Restricted to lowercase letters, digits and `-`, starting with a letter,
/// so that the import identifier derived from it (`-` → `_`) is a valid
/// Python name and never collides with one derived from a different alias.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Alias(String);

impl Alias {
    pub fn new(raw: impl Into<String>) -> Result<Self, DomainError> {
        let raw = raw.into();
        check_chars("alias", &raw, |c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')?;
        if !raw.starts_with(|c: char| c.is_ascii_lowercase()) {
            return Err(invalid("alias", &raw, "must start with a lowercase letter"));
        }
        if raw.ends_with('-') {
            return Err(invalid("alias", &raw, "must not end with '-'"));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Alias {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Alias> for String {
    fn from(value: Alias) -> Self {
        value.0
    }
}

// ── SourceKind ───────────────────────────────────────────────────────────────

/// Which namespace an alias binding was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Group,
    Command,
}

impl SourceKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::Command => "command",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── TargetRef ────────────────────────────────────────────────────────────────

/// An implementation entry point in `module:function` form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TargetRef {
    pub module: String,
    pub function: String,
}

impl TargetRef {
    pub fn new(module: impl Into<String>, function: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            function: function.into(),
        }
    }

    /// `<package>.commands.<group>:run_group`
    pub fn group_dispatcher(package: &str, group: &GroupId) -> Self {
        Self::new(format!("{package}.commands.{group}"), "run_group")
    }

    /// `<package>.commands.<group>.<module>.cli:<module>_command`
    pub fn command_entry(package: &str, group: &GroupId, command: &CommandName) -> Self {
        let module = command.module_name();
        Self::new(
            format!("{package}.commands.{group}.{module}.cli"),
            format!("{module}_command"),
        )
    }

    /// `<package>.cli:main`
    pub fn program_entry(package: &str) -> Self {
        Self::new(format!("{package}.cli"), "main")
    }
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.module, self.function)
    }
}

impl FromStr for TargetRef {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((module, function)) if !module.is_empty() && !function.is_empty() => {
                Ok(Self::new(module, function))
            }
            _ => Err(DomainError::InvalidRegistry(format!(
                "target reference '{s}' is not in module:function form"
            ))),
        }
    }
}

// ── helpers ──────────────────────────────────────────────────────────────────

/// Lowercase hard keywords of Python 3. Group and command module names are
/// emitted as bare identifiers, so none of these can be used.
const PYTHON_KEYWORDS: &[&str] = &[
    "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del", "elif",
    "else", "except", "finally", "for", "from", "global", "if", "import", "in", "is", "lambda",
    "nonlocal", "not", "or", "pass", "raise", "return", "try", "while", "with", "yield",
];

fn is_python_keyword(ident: &str) -> bool {
    PYTHON_KEYWORDS.contains(&ident)
}

fn check_chars(kind: &'static str, raw: &str, allowed: impl Fn(char) -> bool) -> Result<(), DomainError> {
    if raw.is_empty() {
        return Err(invalid(kind, raw, "must not be empty"));
    }
    if let Some(bad) = raw.chars().find(|c| !allowed(*c)) {
        return Err(invalid(kind, raw, &format!("contains invalid character '{bad}'")));
    }
    Ok(())
}

fn invalid(kind: &'static str, name: &str, reason: &str) -> DomainError {
    DomainError::InvalidName {
        kind,
        name: name.to_string(),
        reason: reason.to_string(),
    }
}
