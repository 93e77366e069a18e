//! Blocking release: a requirement blocked by an open issue, then
//! unblocked once the issue closes and an implementing artifact lands.

use engram_core::model::{ConnectionType, CortexType, NeuronaType};
use engram_core::validate;
use engram_e2e::{NeuronaFactory, TestCortex};

/// Mirrors `release-status`'s computation without going through the CLI:
/// open blockers per requirement, and whether an artifact implements it.
fn release_status(neuronas: &[engram_core::model::Neurona]) -> (usize, usize, usize) {
    let requirements: Vec<_> = neuronas.iter().filter(|n| n.r#type == NeuronaType::Requirement).collect();
    let total = requirements.len();
    let mut blocked = 0;
    let mut implemented = 0;

    for req in &requirements {
        let has_open_blocker = neuronas.iter().any(|n| {
            n.r#type == NeuronaType::Issue
                && n.connections
                    .get(ConnectionType::Blocks.as_str())
                    .is_some_and(|edges| edges.iter().any(|e| e.target_id == req.id))
                && n.context.status() != Some("closed")
        });
        if has_open_blocker {
            blocked += 1;
        }

        let is_implemented = neuronas.iter().any(|n| {
            n.r#type == NeuronaType::Artifact
                && n.connections
                    .get(ConnectionType::Implements.as_str())
                    .is_some_and(|edges| edges.iter().any(|e| e.target_id == req.id))
        });
        if is_implemented {
            implemented += 1;
        }
    }
    (total, blocked, implemented)
}

#[test]
fn open_blocker_reports_blocked_and_incomplete() {
    let cortex = TestCortex::new("proj", CortexType::Alm);
    cortex.write(&NeuronaFactory::requirement("req.A", "Requirement A"));
    cortex.write(&NeuronaFactory::linked(
        NeuronaFactory::issue("issue.X", "Blocking issue"),
        ConnectionType::Blocks,
        "req.A",
        50,
    ));

    assert!(validate::is_allowed(NeuronaType::Issue, NeuronaType::Requirement, ConnectionType::Blocks));

    let neuronas = cortex.scan().unwrap();
    let (total, blocked, implemented) = release_status(&neuronas);
    assert_eq!(total, 1);
    assert_eq!(blocked, 1);
    assert_eq!(implemented, 0);
    let completion = implemented as f64 / total as f64;
    assert!(completion < 1.0);
}

#[test]
fn closing_the_issue_and_adding_an_artifact_completes_the_requirement() {
    let cortex = TestCortex::new("proj", CortexType::Alm);
    cortex.write(&NeuronaFactory::requirement("req.A", "Requirement A"));

    let mut issue = NeuronaFactory::linked(
        NeuronaFactory::issue("issue.X", "Blocking issue"),
        ConnectionType::Blocks,
        "req.A",
        50,
    );
    let kind = validate::kind_for(NeuronaType::Issue).unwrap();
    for next in ["in_progress", "resolved", "closed"] {
        let current = issue.context.status().unwrap().to_string();
        validate::transition(kind, &issue.id, &current, next).unwrap();
        issue.context.set_status(next);
    }
    cortex.write(&issue);

    cortex.write(&NeuronaFactory::linked(
        NeuronaFactory::artifact("artifact.login-handler", "Login handler", "src/login.rs"),
        ConnectionType::Implements,
        "req.A",
        50,
    ));

    let neuronas = cortex.scan().unwrap();
    let (total, blocked, implemented) = release_status(&neuronas);
    assert_eq!(total, 1);
    assert_eq!(blocked, 0);
    assert_eq!(implemented, 1);
    assert_eq!(implemented as f64 / total as f64, 1.0);
}
