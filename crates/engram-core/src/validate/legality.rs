//! Connection legality table: which `ConnectionType`s may run between which
//! `NeuronaType` pairs, plus per-pair cardinality limits.

use crate::model::{ConnectionType, NeuronaType};

struct Rule {
    from: NeuronaType,
    to: NeuronaType,
    allowed: &'static [ConnectionType],
    max_cardinality: Option<usize>,
}

/// Representative legality rules. `relates_to` is always allowed as a
/// fallback regardless of type pair and is not listed explicitly here.
static RULES: &[Rule] = &[
    Rule {
        from: NeuronaType::TestCase,
        to: NeuronaType::Requirement,
        allowed: &[ConnectionType::Validates],
        max_cardinality: None,
    },
    Rule {
        from: NeuronaType::Requirement,
        to: NeuronaType::TestCase,
        allowed: &[ConnectionType::ValidatedBy],
        max_cardinality: None,
    },
    Rule {
        from: NeuronaType::Artifact,
        to: NeuronaType::Requirement,
        allowed: &[ConnectionType::Implements],
        max_cardinality: None,
    },
    Rule {
        from: NeuronaType::Requirement,
        to: NeuronaType::Artifact,
        allowed: &[ConnectionType::ImplementedBy],
        max_cardinality: None,
    },
    Rule {
        from: NeuronaType::Issue,
        to: NeuronaType::Requirement,
        allowed: &[ConnectionType::Blocks],
        max_cardinality: None,
    },
    Rule {
        from: NeuronaType::Requirement,
        to: NeuronaType::Issue,
        allowed: &[ConnectionType::BlockedBy],
        max_cardinality: None,
    },
    Rule {
        from: NeuronaType::Issue,
        to: NeuronaType::Issue,
        allowed: &[ConnectionType::Blocks, ConnectionType::BlockedBy, ConnectionType::RelatesTo],
        max_cardinality: None,
    },
    Rule {
        from: NeuronaType::TestCase,
        to: NeuronaType::Artifact,
        allowed: &[ConnectionType::Tests, ConnectionType::TestedBy],
        max_cardinality: None,
    },
    Rule {
        from: NeuronaType::Artifact,
        to: NeuronaType::TestCase,
        allowed: &[ConnectionType::Tests, ConnectionType::TestedBy],
        max_cardinality: None,
    },
    Rule {
        from: NeuronaType::Feature,
        to: NeuronaType::Requirement,
        allowed: &[ConnectionType::Parent, ConnectionType::Child],
        max_cardinality: None,
    },
    Rule {
        from: NeuronaType::Requirement,
        to: NeuronaType::Feature,
        allowed: &[ConnectionType::Parent, ConnectionType::Child],
        max_cardinality: None,
    },
    Rule {
        from: NeuronaType::Lesson,
        to: NeuronaType::Lesson,
        allowed: &[ConnectionType::Prerequisite, ConnectionType::Next],
        max_cardinality: None,
    },
    Rule {
        from: NeuronaType::Artifact,
        to: NeuronaType::Artifact,
        allowed: &[ConnectionType::Parent, ConnectionType::Child],
        max_cardinality: Some(1),
    },
];

/// Is `conn` legal running from a Neurona of type `from` to one of type `to`?
pub fn is_allowed(from: NeuronaType, to: NeuronaType, conn: ConnectionType) -> bool {
    if conn == ConnectionType::RelatesTo {
        return true;
    }
    RULES
        .iter()
        .any(|r| r.from == from && r.to == to && r.allowed.contains(&conn))
}

/// The cardinality cap for `conn` between `from` and `to`, if one applies.
pub fn max_cardinality(from: NeuronaType, to: NeuronaType, conn: ConnectionType) -> Option<usize> {
    RULES
        .iter()
        .find(|r| r.from == from && r.to == to && r.allowed.contains(&conn))
        .and_then(|r| r.max_cardinality)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relates_to_is_universally_allowed() {
        assert!(is_allowed(NeuronaType::Concept, NeuronaType::Artifact, ConnectionType::RelatesTo));
    }

    #[test]
    fn listed_rule_is_allowed() {
        assert!(is_allowed(NeuronaType::TestCase, NeuronaType::Requirement, ConnectionType::Validates));
    }

    #[test]
    fn unlisted_pair_rejects_non_relates_to() {
        assert!(!is_allowed(NeuronaType::Concept, NeuronaType::Artifact, ConnectionType::Validates));
    }

    #[test]
    fn artifact_parent_child_capped_at_one() {
        assert_eq!(
            max_cardinality(NeuronaType::Artifact, NeuronaType::Artifact, ConnectionType::Parent),
            Some(1)
        );
    }
}
