//! Neurona fixture factory
//!
//! Builds realistic Neuronas for common test scenarios: requirements, test
//! cases, issues, artifacts, with the type-appropriate `Context` payload a
//! real `engram new` would attach.

use engram_core::model::{
    ArtifactContext, Connection, ConnectionType, Context, IssueContext, Neurona, NeuronaType,
    RequirementContext, TestCaseContext,
};

pub struct NeuronaFactory;

impl NeuronaFactory {
    pub fn requirement(id: &str, title: &str) -> Neurona {
        let mut n = Neurona::new(id, title, NeuronaType::Requirement);
        n.context = Context::Requirement(RequirementContext::default());
        n
    }

    pub fn test_case(id: &str, title: &str) -> Neurona {
        let mut n = Neurona::new(id, title, NeuronaType::TestCase);
        n.context = Context::TestCase(TestCaseContext::default());
        n
    }

    pub fn issue(id: &str, title: &str) -> Neurona {
        let mut n = Neurona::new(id, title, NeuronaType::Issue);
        n.context = Context::Issue(IssueContext::default());
        n
    }

    pub fn artifact(id: &str, title: &str, file_path: &str) -> Neurona {
        let mut n = Neurona::new(id, title, NeuronaType::Artifact);
        n.context = Context::Artifact(ArtifactContext {
            file_path: file_path.to_string(),
            ..Default::default()
        });
        n
    }

    /// Attach a `conn_type` connection from `from` to `to`, returning the
    /// updated Neurona for chaining.
    pub fn linked(mut from: Neurona, conn_type: ConnectionType, to: &str, weight: u8) -> Neurona {
        from.connections
            .entry(conn_type.as_str().to_string())
            .or_default()
            .push(Connection::new(to, conn_type, weight));
        from
    }
}
