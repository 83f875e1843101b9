//! Normalized agent records.
//!
//! A normalized record is a markdown document with a fixed-order
//! front-matter block followed by the instructions body.

use std::fmt;

/// Front-matter delimiter line
pub const FRONT_MATTER_MARKER: &str = "---";

/// Type tag written into every normalized record
pub const DEFAULT_RECORD_TYPE: &str = "agent";

/// Canonical front-matter + body document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub record_type: String,
    pub version: Option<String>,
    pub model: Option<String>,
    /// Full `skills: [...]` line, passed through verbatim
    pub skills: Option<String>,
    /// Full `tools: [...]` line, passed through verbatim
    pub tools: Option<String>,
    pub body: String,
}

impl NormalizedRecord {
    /// Front-matter lines in canonical order, absent fields omitted
    pub fn front_matter(&self) -> Vec<String> {
        let mut lines = Vec::new();

        if let Some(id) = &self.id {
            lines.push(format!("id: {id}"));
        }
        if let Some(name) = &self.name {
            lines.push(format!("name: \"{name}\""));
        }
        if let Some(description) = &self.description {
            lines.push(format!("description: \"{description}\""));
        }

        lines.push(format!("type: {}", self.record_type));

        if let Some(version) = &self.version {
            lines.push(format!("version: {version}"));
        }
        if let Some(model) = &self.model {
            lines.push(format!("model: \"{model}\""));
        }
        if let Some(skills) = &self.skills {
            lines.push(skills.clone());
        }
        if let Some(tools) = &self.tools {
            lines.push(tools.clone());
        }

        lines
    }

    /// Render the full document
    pub fn render(&self) -> String {
        let mut doc = String::new();

        doc.push_str(FRONT_MATTER_MARKER);
        doc.push('\n');
        for line in self.front_matter() {
            doc.push_str(&line);
            doc.push('\n');
        }
        doc.push_str(FRONT_MATTER_MARKER);
        doc.push_str("\n\n");

        let body = self.body.trim();
        if !body.is_empty() {
            doc.push_str(body);
            doc.push('\n');
        }

        doc
    }
}

impl fmt::Display for NormalizedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare() -> NormalizedRecord {
        NormalizedRecord {
            id: None,
            name: None,
            description: None,
            record_type: DEFAULT_RECORD_TYPE.to_string(),
            version: None,
            model: None,
            skills: None,
            tools: None,
            body: String::new(),
        }
    }

    #[test]
    fn test_render_full_record_order() {
        let record = NormalizedRecord {
            id: Some("architect".to_string()),
            name: Some("Architect".to_string()),
            description: Some("Designs systems".to_string()),
            version: Some("1.0.0".to_string()),
            model: Some("gemini-pro".to_string()),
            skills: Some("skills: [\"mermaid\", \"research\"]".to_string()),
            tools: Some("tools: []".to_string()),
            body: "\n\nYou design things.\n\n".to_string(),
            ..bare()
        };

        assert_eq!(
            record.render(),
            "---\n\
             id: architect\n\
             name: \"Architect\"\n\
             description: \"Designs systems\"\n\
             type: agent\n\
             version: 1.0.0\n\
             model: \"gemini-pro\"\n\
             skills: [\"mermaid\", \"research\"]\n\
             tools: []\n\
             ---\n\
             \n\
             You design things.\n"
        );
    }

    #[test]
    fn test_render_omits_absent_fields() {
        let record = NormalizedRecord {
            id: Some("x".to_string()),
            body: "hello".to_string(),
            ..bare()
        };

        assert_eq!(record.front_matter(), vec!["id: x", "type: agent"]);
        assert_eq!(record.to_string(), "---\nid: x\ntype: agent\n---\n\nhello\n");
    }

    #[test]
    fn test_render_empty_body() {
        assert_eq!(bare().render(), "---\ntype: agent\n---\n\n");
    }
}
