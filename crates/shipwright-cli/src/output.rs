//! Terminal output for sync reports.
//!
//! Everything goes to stdout through one [`OutputManager`]. Errors are not
//! printed here; `main` renders them on stderr.

use std::io::{self, IsTerminal};

use console::Term;
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

/// Marker in front of an alias-table diff line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Added,
    Updated,
    Removed,
}

impl Change {
    fn sign(self) -> char {
        match self {
            Self::Added => '+',
            Self::Updated => '~',
            Self::Removed => '-',
        }
    }
}

#[derive(Clone, Copy)]
enum Tone {
    Success,
    Warning,
    Info,
}

impl Tone {
    fn symbol(self) -> &'static str {
        match self {
            Self::Success => "\u{2713}", // ✓
            Self::Warning => "\u{26a0}", // ⚠
            Self::Info => "\u{2139}",    // ℹ
        }
    }
}

pub struct OutputManager {
    format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    /// `Auto` resolves to `Human` on a terminal and `Plain` otherwise.
    /// Plain output never carries colour.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        let format = match args.output_format {
            OutputFormat::Auto if io::stdout().is_terminal() => OutputFormat::Human,
            OutputFormat::Auto => OutputFormat::Plain,
            other => other,
        };

        Self {
            format,
            quiet: args.quiet,
            no_color: args.no_color || config.output.no_color || format == OutputFormat::Plain,
            term: Term::stdout(),
        }
    }

    pub fn print(&self, msg: &str) -> io::Result<()> {
        self.line(|| msg.to_owned())
    }

    pub fn success(&self, msg: &str) -> io::Result<()> {
        self.indicator(Tone::Success, msg)
    }

    pub fn warning(&self, msg: &str) -> io::Result<()> {
        self.indicator(Tone::Warning, msg)
    }

    pub fn info(&self, msg: &str) -> io::Result<()> {
        self.indicator(Tone::Info, msg)
    }

    pub fn header(&self, text: &str) -> io::Result<()> {
        self.line(|| {
            if self.no_color {
                text.to_owned()
            } else {
                text.cyan().bold().to_string()
            }
        })
    }

    /// One indented diff line: `  + map -> pkg.cli:main`.
    pub fn change(&self, change: Change, msg: &str) -> io::Result<()> {
        self.line(|| render_change(change, msg, self.no_color))
    }

    /// Pretty JSON. Printed even in quiet mode since it was asked for.
    pub fn json<T: Serialize>(&self, value: &T) -> io::Result<()> {
        let text = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        self.term.write_line(&text)
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    fn indicator(&self, tone: Tone, msg: &str) -> io::Result<()> {
        self.line(|| render_indicator(tone, msg, self.no_color))
    }

    fn line(&self, render: impl FnOnce() -> String) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(&render())
    }
}

fn render_indicator(tone: Tone, msg: &str, no_color: bool) -> String {
    let symbol = tone.symbol();
    if no_color {
        return format!("{symbol} {msg}");
    }
    match tone {
        Tone::Success => format!("{} {}", symbol.green().bold(), msg.green()),
        Tone::Warning => format!("{} {}", symbol.yellow().bold(), msg.yellow()),
        Tone::Info => format!("{} {}", symbol.blue().bold(), msg.blue()),
    }
}

fn render_change(change: Change, msg: &str, no_color: bool) -> String {
    let sign = change.sign();
    if no_color {
        return format!("  {sign} {msg}");
    }
    match change {
        Change::Added => format!("  {} {}", sign.green().bold(), msg),
        Change::Updated => format!("  {} {}", sign.yellow().bold(), msg),
        Change::Removed => format!("  {} {}", sign.red().bold(), msg.dimmed()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(quiet: bool, no_color: bool, format: OutputFormat) -> OutputManager {
        let args = GlobalArgs {
            verbose: 0,
            quiet,
            no_color,
            config: None,
            output_format: format,
            log_file: None,
        };
        OutputManager::new(&args, &AppConfig::default())
    }

    #[test]
    fn plain_format_disables_color() {
        assert!(!manager(false, false, OutputFormat::Human).no_color);
        assert!(manager(false, true, OutputFormat::Human).no_color);
        assert!(manager(false, false, OutputFormat::Plain).no_color);
    }

    #[test]
    fn explicit_format_is_kept() {
        assert_eq!(manager(false, false, OutputFormat::Json).format(), OutputFormat::Json);
    }

    #[test]
    fn quiet_lines_are_dropped() {
        let out = manager(true, true, OutputFormat::Plain);
        assert!(out.print("hello").is_ok());
        assert!(out.change(Change::Added, "x").is_ok());
    }

    #[test]
    fn plain_lines() {
        assert_eq!(render_indicator(Tone::Success, "done", true), "\u{2713} done");
        assert_eq!(render_change(Change::Updated, "map: a -> b", true), "  ~ map: a -> b");
        assert_eq!(render_change(Change::Removed, "go -> x", true), "  - go -> x");
    }

    #[test]
    fn colored_lines_carry_ansi() {
        assert!(render_indicator(Tone::Warning, "careful", false).contains('\u{1b}'));
        assert!(render_change(Change::Added, "map -> x", false).contains('\u{1b}'));
    }
}
