//! Line scanner for raw agent records.
//!
//! A raw record is a flat list of `key: value` lines followed by a single
//! `instructions:` block scalar that runs to the end of the document:
//!
//! ```text
//! id: architect
//! name: "Architect"
//! skills: ["mermaid"]
//! instructions: |
//!   You are the architect.
//!   Draw diagrams.
//! ```
//!
//! Scanning produces a typed field list; assembly into a
//! [`NormalizedRecord`] is a separate step.

use crate::domain::NormalizedRecord;

/// Key that opens the body block
const INSTRUCTIONS_KEY: &str = "instructions";

/// How a key's value is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueShape {
    /// Rest of line, trimmed
    Plain,
    /// `"quoted"` or a bare value without quotes or colons
    QuoteAware,
    /// Single-line `[...]` literal, whole line kept
    Bracketed,
}

/// Recognized header keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKey {
    Id,
    Name,
    Description,
    Version,
    Model,
    Skills,
    Tools,
}

impl FieldKey {
    pub const ALL: [FieldKey; 7] = [
        FieldKey::Id,
        FieldKey::Name,
        FieldKey::Description,
        FieldKey::Version,
        FieldKey::Model,
        FieldKey::Skills,
        FieldKey::Tools,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::Id => "id",
            FieldKey::Name => "name",
            FieldKey::Description => "description",
            FieldKey::Version => "version",
            FieldKey::Model => "model",
            FieldKey::Skills => "skills",
            FieldKey::Tools => "tools",
        }
    }

    fn shape(&self) -> ValueShape {
        match self {
            FieldKey::Id | FieldKey::Version => ValueShape::Plain,
            FieldKey::Name | FieldKey::Description | FieldKey::Model => ValueShape::QuoteAware,
            FieldKey::Skills | FieldKey::Tools => ValueShape::Bracketed,
        }
    }

    /// Read this key's value from a header line, if the line carries it
    fn read(&self, line: &str) -> Option<String> {
        let rest = line.strip_prefix(self.as_str())?.strip_prefix(':')?;

        let value = match self.shape() {
            ValueShape::Plain => Some(rest.trim().to_string()),
            ValueShape::QuoteAware => read_quote_aware(rest),
            ValueShape::Bracketed => {
                let value = rest.trim_start();
                (value.starts_with('[') && value.ends_with(']')).then(|| line.to_string())
            }
        };

        value.filter(|v| !v.is_empty())
    }
}

/// Quoted form wins; a bare value must not contain quotes or colons.
fn read_quote_aware(rest: &str) -> Option<String> {
    let value = rest.trim_start();

    if let Some(inner) = value
        .strip_prefix('"')
        .and_then(|v| v.trim_end().strip_suffix('"'))
    {
        if !inner.contains('"') {
            return Some(inner.trim().to_string());
        }
    }

    if value.contains('"') || value.contains(':') {
        return None;
    }

    Some(value.trim().to_string())
}

/// One recognized field found in the header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedField {
    pub key: FieldKey,
    pub value: String,
}

/// Result of scanning a raw record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScannedRecord {
    /// First occurrence of each recognized key, in source order
    pub fields: Vec<ScannedField>,
    /// Dedented instructions body; `None` when there is no block
    pub body: Option<String>,
}

impl ScannedRecord {
    /// Value of a field, if present
    pub fn get(&self, key: FieldKey) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.value.as_str())
    }

    /// Check whether a field is present
    pub fn has(&self, key: FieldKey) -> bool {
        self.get(key).is_some()
    }

    /// Assemble the canonical record; any source `type` is replaced
    pub fn into_normalized(self, record_type: &str) -> NormalizedRecord {
        let field = |key| self.get(key).map(str::to_string);

        NormalizedRecord {
            id: field(FieldKey::Id),
            name: field(FieldKey::Name),
            description: field(FieldKey::Description),
            record_type: record_type.to_string(),
            version: field(FieldKey::Version),
            model: field(FieldKey::Model),
            skills: field(FieldKey::Skills),
            tools: field(FieldKey::Tools),
            body: self.body.clone().unwrap_or_default(),
        }
    }
}

/// Whether a line opens the instructions block (`instructions:`, `|` or `>`)
fn is_block_marker(line: &str) -> bool {
    let Some(rest) = line
        .strip_prefix(INSTRUCTIONS_KEY)
        .and_then(|r| r.strip_prefix(':'))
    else {
        return false;
    };

    matches!(rest.trim(), "" | "|" | ">")
}

/// Scan a raw record into its fields and body
pub fn scan_record(text: &str) -> ScannedRecord {
    let lines: Vec<&str> = text
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .collect();
    let mut record = ScannedRecord::default();

    for (idx, line) in lines.iter().enumerate() {
        if is_block_marker(line) {
            record.body = Some(dedent(&lines[idx + 1..]));
            break;
        }

        let found = FieldKey::ALL
            .into_iter()
            .filter(|key| !record.has(*key))
            .find_map(|key| key.read(line).map(|value| (key, value)));

        if let Some((key, value)) = found {
            record.fields.push(ScannedField { key, value });
        }
    }

    record
}

/// Strip the indentation unit of the first non-blank line from every line.
///
/// Blank lines become empty; lines without the unit pass through unchanged.
pub fn dedent(lines: &[&str]) -> String {
    let indent: &str = lines
        .iter()
        .copied()
        .find(|l| !l.trim().is_empty())
        .map(|l| {
            let content_start = l.len() - l.trim_start().len();
            &l[..content_start]
        })
        .unwrap_or("");

    if indent.is_empty() {
        return lines.join("\n");
    }

    lines
        .iter()
        .map(|&line| {
            if line.trim().is_empty() {
                ""
            } else {
                line.strip_prefix(indent).unwrap_or(line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
