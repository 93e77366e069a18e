//! Context — the per-type tagged-union payload attached to a Neurona.
//!
//! A Neurona's `type` field determines which variant is legal; any other
//! variant present in frontmatter is treated as empty for that type
//! (invariant 5 in spec.md §3).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateMachineContext {
    #[serde(default)]
    pub triggers: Vec<String>,
    #[serde(default)]
    pub entry_action: String,
    #[serde(default)]
    pub exit_action: String,
    #[serde(default)]
    pub allowed_roles: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtifactContext {
    #[serde(default)]
    pub runtime: String,
    #[serde(default)]
    pub file_path: String,
    #[serde(default)]
    pub safe_to_exec: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub language_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub last_modified: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestCaseContext {
    #[serde(default)]
    pub framework: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub test_file: Option<String>,
    #[serde(default = "default_not_run")]
    pub status: String,
    #[serde(default)]
    pub priority: i32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub assignee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub last_run: Option<String>,
}

fn default_not_run() -> String {
    "not_run".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssueContext {
    #[serde(default = "default_open")]
    pub status: String,
    #[serde(default)]
    pub priority: i32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub created: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub resolved: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub closed: Option<String>,
    #[serde(default)]
    pub blocked_by: Vec<String>,
    #[serde(default)]
    pub related_to: Vec<String>,
}

fn default_open() -> String {
    "open".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequirementContext {
    #[serde(default = "default_draft")]
    pub status: String,
    #[serde(default)]
    pub verification_method: String,
    #[serde(default)]
    pub priority: i32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub assignee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub effort_points: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sprint: Option<String>,
}

fn default_draft() -> String {
    "draft".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConceptContext {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub definition: Option<String>,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub difficulty: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceContext {
    #[serde(default)]
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub citation: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LessonContext {
    #[serde(default)]
    pub objectives: Vec<String>,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub key_takeaways: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub difficulty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub estimated_time: Option<String>,
}

/// Tagged-union context payload. The `None` variant is the default — a
/// Neurona with no recognized context block, or whose block doesn't match
/// its own `type`, carries `Context::None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Context {
    StateMachine(StateMachineContext),
    Artifact(ArtifactContext),
    TestCase(TestCaseContext),
    Issue(IssueContext),
    Requirement(RequirementContext),
    Concept(ConceptContext),
    Reference(ReferenceContext),
    Lesson(LessonContext),
    Custom(std::collections::BTreeMap<String, String>),
    None,
}

impl Default for Context {
    fn default() -> Self {
        Context::None
    }
}

impl Context {
    /// The `context.status` scalar, for state-bearing types (`issue`,
    /// `test_case`, `requirement`). `None` for every other variant.
    pub fn status(&self) -> Option<&str> {
        match self {
            Context::Issue(c) => Some(&c.status),
            Context::TestCase(c) => Some(&c.status),
            Context::Requirement(c) => Some(&c.status),
            _ => None,
        }
    }

    /// Set `context.status` in place. No-op for non-state-bearing contexts
    /// (including `Custom`, per spec.md's Open Question #4).
    pub fn set_status(&mut self, status: impl Into<String>) {
        match self {
            Context::Issue(c) => c.status = status.into(),
            Context::TestCase(c) => c.status = status.into(),
            Context::Requirement(c) => c.status = status.into(),
            _ => {}
        }
    }

    pub fn priority(&self) -> Option<i32> {
        match self {
            Context::Issue(c) => Some(c.priority),
            Context::TestCase(c) => Some(c.priority),
            Context::Requirement(c) => Some(c.priority),
            _ => None,
        }
    }

    pub fn assignee(&self) -> Option<&str> {
        match self {
            Context::Issue(c) => c.assignee.as_deref(),
            Context::TestCase(c) => c.assignee.as_deref(),
            Context::Requirement(c) => c.assignee.as_deref(),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Context::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_context_is_none() {
        assert_eq!(Context::default(), Context::None);
        assert!(Context::None.is_empty());
    }

    #[test]
    fn status_accessors_only_fire_for_state_bearing_types() {
        let mut issue = Context::Issue(IssueContext::default());
        assert_eq!(issue.status(), Some("open"));
        issue.set_status("closed");
        assert_eq!(issue.status(), Some("closed"));

        let mut concept = Context::Concept(ConceptContext::default());
        assert_eq!(concept.status(), None);
        concept.set_status("ignored");
        assert_eq!(concept.status(), None);
    }
}
