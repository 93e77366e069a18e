//! Per-type state machines, in the `MemoryState` enum/transition-table idiom:
//! a small `Copy` enum plus a `transition` entry point that is the only
//! sanctioned way to mutate `context.status`.

use crate::error::{EngramError, Result, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueState {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl IssueState {
    pub fn parse_name(s: &str) -> Option<Self> {
        Some(match s {
            "open" => IssueState::Open,
            "in_progress" => IssueState::InProgress,
            "resolved" => IssueState::Resolved,
            "closed" => IssueState::Closed,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueState::Open => "open",
            IssueState::InProgress => "in_progress",
            IssueState::Resolved => "resolved",
            IssueState::Closed => "closed",
        }
    }

    pub fn allowed_next(&self) -> &'static [IssueState] {
        match self {
            IssueState::Open => &[IssueState::InProgress],
            IssueState::InProgress => &[IssueState::Open, IssueState::Resolved],
            IssueState::Resolved => &[IssueState::InProgress, IssueState::Closed],
            IssueState::Closed => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestState {
    NotRun,
    Running,
    Passing,
    Failing,
}

impl TestState {
    pub fn parse_name(s: &str) -> Option<Self> {
        Some(match s {
            "not_run" => TestState::NotRun,
            "running" => TestState::Running,
            "passing" => TestState::Passing,
            "failing" => TestState::Failing,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TestState::NotRun => "not_run",
            TestState::Running => "running",
            TestState::Passing => "passing",
            TestState::Failing => "failing",
        }
    }

    pub fn allowed_next(&self) -> &'static [TestState] {
        match self {
            TestState::NotRun => &[TestState::Running],
            TestState::Running => &[TestState::NotRun, TestState::Passing, TestState::Failing],
            TestState::Passing => &[TestState::Running],
            TestState::Failing => &[TestState::Running],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequirementState {
    Draft,
    Approved,
    Implemented,
}

impl RequirementState {
    pub fn parse_name(s: &str) -> Option<Self> {
        Some(match s {
            "draft" => RequirementState::Draft,
            "approved" => RequirementState::Approved,
            "implemented" => RequirementState::Implemented,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RequirementState::Draft => "draft",
            RequirementState::Approved => "approved",
            RequirementState::Implemented => "implemented",
        }
    }

    pub fn allowed_next(&self) -> &'static [RequirementState] {
        match self {
            RequirementState::Draft => &[RequirementState::Approved],
            RequirementState::Approved => &[RequirementState::Draft, RequirementState::Implemented],
            RequirementState::Implemented => &[RequirementState::Approved],
        }
    }
}

/// Which per-type state machine governs `neurona_type`, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateMachineKind {
    Issue,
    Test,
    Requirement,
}

pub fn kind_for(neurona_type: crate::model::NeuronaType) -> Option<StateMachineKind> {
    use crate::model::NeuronaType;
    match neurona_type {
        NeuronaType::Issue => Some(StateMachineKind::Issue),
        NeuronaType::TestCase => Some(StateMachineKind::Test),
        NeuronaType::Requirement => Some(StateMachineKind::Requirement),
        _ => None,
    }
}

/// Validate and perform a `from -> to` transition for `id`, dispatching on
/// `kind`. Unknown from/to strings, or a disallowed pair, yield
/// `InvalidStateTransition`.
pub fn transition(kind: StateMachineKind, id: &str, from: &str, to: &str) -> Result<()> {
    let ok = match kind {
        StateMachineKind::Issue => {
            let (f, t) = (IssueState::parse_name(from), IssueState::parse_name(to));
            match (f, t) {
                (Some(f), Some(t)) => f.allowed_next().contains(&t),
                _ => false,
            }
        }
        StateMachineKind::Test => {
            let (f, t) = (TestState::parse_name(from), TestState::parse_name(to));
            match (f, t) {
                (Some(f), Some(t)) => f.allowed_next().contains(&t),
                _ => false,
            }
        }
        StateMachineKind::Requirement => {
            let (f, t) = (RequirementState::parse_name(from), RequirementState::parse_name(to));
            match (f, t) {
                (Some(f), Some(t)) => f.allowed_next().contains(&t),
                _ => false,
            }
        }
    };
    if ok {
        Ok(())
    } else {
        Err(EngramError::Validation(ValidationError::InvalidStateTransition {
            id: id.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_happy_path() {
        assert!(transition(StateMachineKind::Issue, "i.1", "open", "in_progress").is_ok());
        assert!(transition(StateMachineKind::Issue, "i.1", "in_progress", "resolved").is_ok());
        assert!(transition(StateMachineKind::Issue, "i.1", "resolved", "closed").is_ok());
    }

    #[test]
    fn issue_reopen_paths() {
        assert!(transition(StateMachineKind::Issue, "i.1", "in_progress", "open").is_ok());
        assert!(transition(StateMachineKind::Issue, "i.1", "resolved", "in_progress").is_ok());
    }

    #[test]
    fn closed_is_terminal() {
        assert!(transition(StateMachineKind::Issue, "i.1", "closed", "open").is_err());
        assert!(transition(StateMachineKind::Issue, "i.1", "closed", "in_progress").is_err());
    }

    #[test]
    fn test_state_running_branches() {
        assert!(transition(StateMachineKind::Test, "t.1", "not_run", "running").is_ok());
        assert!(transition(StateMachineKind::Test, "t.1", "running", "passing").is_ok());
        assert!(transition(StateMachineKind::Test, "t.1", "passing", "running").is_ok());
        assert!(transition(StateMachineKind::Test, "t.1", "not_run", "passing").is_err());
    }

    #[test]
    fn requirement_regression_allowed() {
        assert!(transition(StateMachineKind::Requirement, "r.1", "approved", "implemented").is_ok());
        assert!(transition(StateMachineKind::Requirement, "r.1", "implemented", "approved").is_ok());
        assert!(transition(StateMachineKind::Requirement, "r.1", "draft", "implemented").is_err());
    }

    #[test]
    fn unknown_state_names_are_rejected() {
        assert!(transition(StateMachineKind::Issue, "i.1", "bogus", "open").is_err());
    }
}
