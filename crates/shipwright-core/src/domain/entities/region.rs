//! Delimited, wholesale-replaceable spans inside hand-maintained files.
//!
//! A region is bounded by two full-line sentinels:
//!
//! ```text
//! # [AUTO-GENERATED START: command-imports]
//! ...generated lines...
//! # [AUTO-GENERATED END: command-imports]
//! ```
//!
//! The only mutation ever applied to a file is replacing the bytes strictly
//! between the two sentinel lines. Everything before the start line and
//! after the end line is carried over untouched, including line endings.
//! When a file has no sentinels at all the region is inserted at the
//! region's [`Anchor`]; a file with a partial or repeated pair is rejected.

use std::ops::Range;

use crate::domain::error::DomainError;

const START_TAG: &str = "AUTO-GENERATED START";
const END_TAG: &str = "AUTO-GENERATED END";

/// Where a freshly delimited region goes when the file has no sentinels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Top of the file, after a leading `#!` interpreter line if present.
    Top,
    /// Directly after the given section header line (e.g. `[project.scripts]`).
    /// If the header is absent it is appended together with the region.
    AfterSection(&'static str),
}

/// Comment syntax the sentinels are written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// `# [...]` for Python and TOML.
    Hash,
    /// `<!-- [...] -->` for Markdown.
    Html,
}

/// Name and placement policy of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionSpec {
    name: &'static str,
    anchor: Anchor,
    comment: CommentStyle,
}

impl RegionSpec {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            anchor: Anchor::Top,
            comment: CommentStyle::Hash,
        }
    }

    pub const fn markdown(name: &'static str) -> Self {
        Self {
            name,
            anchor: Anchor::Top,
            comment: CommentStyle::Html,
        }
    }

    pub const fn after_section(mut self, header: &'static str) -> Self {
        self.anchor = Anchor::AfterSection(header);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn start_marker(&self) -> String {
        self.marker(START_TAG)
    }

    pub fn end_marker(&self) -> String {
        self.marker(END_TAG)
    }

    fn marker(&self, tag: &str) -> String {
        match self.comment {
            CommentStyle::Hash => format!("# [{tag}: {}]", self.name),
            CommentStyle::Html => format!("<!-- [{tag}: {}] -->", self.name),
        }
    }

    /// Byte range of the body (between the sentinel lines), if present.
    pub fn locate(&self, text: &str) -> Result<Option<Range<usize>>, DomainError> {
        let start = self.start_marker();
        let end = self.end_marker();

        let mut starts: Vec<Range<usize>> = Vec::new();
        let mut ends: Vec<Range<usize>> = Vec::new();
        let mut offset = 0;
        for line in text.split_inclusive('\n') {
            let trimmed = line.trim();
            if trimmed == start {
                starts.push(offset..offset + line.len());
            } else if trimmed == end {
                ends.push(offset..offset + line.len());
            }
            offset += line.len();
        }

        match (starts.as_slice(), ends.as_slice()) {
            ([], []) => Ok(None),
            ([s], [e]) if s.end <= e.start => Ok(Some(s.end..e.start)),
            ([_], [_]) => Err(self.malformed("end marker appears before start marker")),
            ([], _) => Err(self.malformed("end marker without a start marker")),
            (_, []) => Err(self.malformed("start marker without an end marker")),
            _ => Err(self.malformed("markers appear more than once")),
        }
    }

    /// Current body text, if the region exists.
    pub fn extract<'t>(&self, text: &'t str) -> Result<Option<&'t str>, DomainError> {
        Ok(self.locate(text)?.map(|range| &text[range]))
    }

    fn malformed(&self, reason: &str) -> DomainError {
        DomainError::MalformedRegion {
            region: self.name.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// A region together with the body it should contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedRegion {
    spec: RegionSpec,
    body: String,
}

/// Result of applying a region to a file's current content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Splice {
    /// Body already matches byte-for-byte; the file must not be rewritten.
    Unchanged,
    /// Body between existing sentinels was replaced.
    Replaced(String),
    /// Sentinels were missing; a delimited region was inserted at the anchor.
    Inserted(String),
}

impl Splice {
    pub fn content(&self) -> Option<&str> {
        match self {
            Self::Unchanged => None,
            Self::Replaced(s) | Self::Inserted(s) => Some(s),
        }
    }
}

impl GeneratedRegion {
    /// Build a region from body lines; each line is newline-terminated.
    pub fn new<I, S>(spec: RegionSpec, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut body = String::new();
        for line in lines {
            body.push_str(line.as_ref());
            body.push('\n');
        }
        Self { spec, body }
    }

    pub fn spec(&self) -> &RegionSpec {
        &self.spec
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Start sentinel, body and end sentinel.
    pub fn delimited(&self) -> String {
        format!(
            "{}\n{}{}\n",
            self.spec.start_marker(),
            self.body,
            self.spec.end_marker()
        )
    }

    pub fn splice_into(&self, existing: &str) -> Result<Splice, DomainError> {
        match self.spec.locate(existing)? {
            Some(range) if existing[range.clone()] == self.body => Ok(Splice::Unchanged),
            Some(range) => {
                let mut out = String::with_capacity(existing.len() + self.body.len());
                out.push_str(&existing[..range.start]);
                out.push_str(&self.body);
                out.push_str(&existing[range.end..]);
                Ok(Splice::Replaced(out))
            }
            None => Ok(Splice::Inserted(self.insert(existing))),
        }
    }

    fn insert(&self, existing: &str) -> String {
        let block = self.delimited();
        match self.spec.anchor {
            Anchor::Top => insert_at_top(existing, &block),
            Anchor::AfterSection(header) => insert_after_section(existing, header, &block),
        }
    }
}

fn insert_at_top(existing: &str, block: &str) -> String {
    if existing.starts_with("#!") {
        return match existing.find('\n') {
            Some(i) => {
                let (head, rest) = existing.split_at(i + 1);
                format!("{head}{block}{rest}")
            }
            None => format!("{existing}\n{block}"),
        };
    }
    format!("{block}{existing}")
}

fn insert_after_section(existing: &str, header: &str, block: &str) -> String {
    let mut offset = 0;
    for line in existing.split_inclusive('\n') {
        let end = offset + line.len();
        if line.trim() == header {
            if !line.ends_with('\n') {
                return format!("{existing}\n{block}");
            }
            let (head, rest) = existing.split_at(end);
            return format!("{head}{block}{rest}");
        }
        offset = end;
    }

    let mut out = existing.to_string();
    if !out.is_empty() {
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out.push('\n');
    }
    out.push_str(header);
    out.push('\n');
    out.push_str(block);
    out
}
