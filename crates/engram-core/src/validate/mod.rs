//! Validator & State Machines — connection legality, cardinality, the
//! body/frontmatter invariant, cycle/orphan detection, and per-type state
//! transitions.

mod body;
mod cycles;
mod legality;
mod state;

pub use body::check_body;
pub use cycles::{detect_cycles, detect_orphans};
pub use legality::{is_allowed, max_cardinality};
pub use state::{kind_for, transition, IssueState, RequirementState, StateMachineKind, TestState};

use crate::error::{EngramError, Result, ValidationError};
use crate::model::{Neurona, NeuronaType};

/// Check every outgoing connection of `neurona` against the legality table
/// and cardinality caps. `type_of` resolves a target id to its Neurona type;
/// targets it can't resolve (dangling edges) are skipped here — dangling
/// targets are a sync-time warning, not a validation failure.
pub fn validate_neurona_connections(
    neurona: &Neurona,
    type_of: impl Fn(&str) -> Option<NeuronaType>,
) -> Result<()> {
    for (group, edges) in &neurona.connections {
        let Some(conn_type) = crate::model::ConnectionType::parse_name(group) else {
            continue;
        };
        for edge in edges {
            let Some(target_type) = type_of(&edge.target_id) else {
                continue;
            };
            if !is_allowed(neurona.r#type, target_type, conn_type) {
                return Err(EngramError::Validation(ValidationError::ConnectionTypeNotAllowed {
                    from_type: neurona.r#type.as_str().to_string(),
                    to_type: target_type.as_str().to_string(),
                    conn_type: conn_type.as_str().to_string(),
                }));
            }
            if let Some(max) = max_cardinality(neurona.r#type, target_type, conn_type) {
                if edges.len() > max {
                    return Err(EngramError::Validation(ValidationError::CardinalityExceeded {
                        from: neurona.id.clone(),
                        to_type: target_type.as_str().to_string(),
                        max,
                    }));
                }
            }
        }
    }
    check_body(&neurona.id, &neurona.body)
}
