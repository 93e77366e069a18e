//! Neurona — one Markdown+YAML-frontmatter file, one node in the graph.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::connection::Connection;
use super::context::Context;

/// The 9 Neurona types.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NeuronaType {
    #[default]
    Concept,
    Reference,
    Artifact,
    StateMachine,
    Lesson,
    Requirement,
    TestCase,
    Issue,
    Feature,
}

impl NeuronaType {
    pub const ALL: [NeuronaType; 9] = [
        NeuronaType::Concept,
        NeuronaType::Reference,
        NeuronaType::Artifact,
        NeuronaType::StateMachine,
        NeuronaType::Lesson,
        NeuronaType::Requirement,
        NeuronaType::TestCase,
        NeuronaType::Issue,
        NeuronaType::Feature,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NeuronaType::Concept => "concept",
            NeuronaType::Reference => "reference",
            NeuronaType::Artifact => "artifact",
            NeuronaType::StateMachine => "state_machine",
            NeuronaType::Lesson => "lesson",
            NeuronaType::Requirement => "requirement",
            NeuronaType::TestCase => "test_case",
            NeuronaType::Issue => "issue",
            NeuronaType::Feature => "feature",
        }
    }

    /// Parse a frontmatter `type:` value. Unknown strings fall back to
    /// `Concept`, matching the teacher's forgiving `parse_name` idiom and
    /// the File Store's "default `type=concept`" rule.
    pub fn parse_name(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "concept" => NeuronaType::Concept,
            "reference" => NeuronaType::Reference,
            "artifact" => NeuronaType::Artifact,
            "state_machine" => NeuronaType::StateMachine,
            "lesson" => NeuronaType::Lesson,
            "requirement" => NeuronaType::Requirement,
            "test_case" => NeuronaType::TestCase,
            "issue" => NeuronaType::Issue,
            "feature" => NeuronaType::Feature,
            _ => NeuronaType::Concept,
        }
    }
}

impl std::fmt::Display for NeuronaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn default_language() -> String {
    "en".to_string()
}

/// Render a timestamp in the canonical `YYYY-MM-DDTHH:MM:SSZ` form.
pub fn format_timestamp(dt: chrono::DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// A Neurona: one Markdown file with YAML frontmatter, one graph node.
///
/// Field declaration order matches the canonical Tier 1/2/3 write order
/// (id, title, tags | type, updated, language | hash, context, connections)
/// so that deriving `Serialize` already emits frontmatter in canonical shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Neurona {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub r#type: NeuronaType,
    /// ISO 8601 timestamp string, stored verbatim rather than as a typed
    /// `DateTime` so the canonical `"YYYY-MM-DDTHH:MM:SSZ"` form round-trips
    /// byte-for-byte instead of through a library's own RFC3339 rendering.
    pub updated: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub hash: Option<String>,
    #[serde(default, skip_serializing_if = "Context::is_empty")]
    pub context: Context,
    /// Connection-group name -> ordered list of edges.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub connections: BTreeMap<String, Vec<Connection>>,
    /// The Markdown body, kept separate from frontmatter on disk but
    /// carried alongside it in memory for convenience.
    #[serde(skip)]
    pub body: String,
}

impl Neurona {
    pub fn new(id: impl Into<String>, title: impl Into<String>, r#type: NeuronaType) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            tags: Vec::new(),
            r#type,
            updated: format_timestamp(Utc::now()),
            language: default_language(),
            hash: None,
            connections: BTreeMap::new(),
            context: Context::None,
            body: String::new(),
        }
    }

    pub fn updated_datetime(&self) -> Option<chrono::DateTime<Utc>> {
        chrono::DateTime::parse_from_rfc3339(&self.updated)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn touch(&mut self) {
        self.updated = format_timestamp(Utc::now());
    }

    /// All outgoing connections across every connection group, in a stable
    /// group-then-insertion order.
    pub fn all_connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values().flatten()
    }

    pub fn indexable_text(&self) -> String {
        format!("{} {}", self.title, self.tags.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neurona_type_defaults_unknown_to_concept() {
        assert_eq!(NeuronaType::parse_name("bogus"), NeuronaType::Concept);
    }

    #[test]
    fn neurona_type_roundtrips() {
        for t in NeuronaType::ALL {
            assert_eq!(NeuronaType::parse_name(t.as_str()), t);
        }
    }

    #[test]
    fn new_neurona_has_empty_defaults() {
        let n = Neurona::new("req.auth.oauth2", "OAuth2 support", NeuronaType::Requirement);
        assert_eq!(n.language, "en");
        assert!(n.tags.is_empty());
        assert!(n.connections.is_empty());
        assert_eq!(n.context, Context::None);
    }

    #[test]
    fn indexable_text_is_title_plus_tags() {
        let mut n = Neurona::new("c.x", "Hello World", NeuronaType::Concept);
        n.tags = vec!["a".into(), "b".into()];
        assert_eq!(n.indexable_text(), "Hello World a b");
    }
}
