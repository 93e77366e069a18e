//! Connection — a directed, typed, weighted edge between two Neuronas.

use serde::{Deserialize, Serialize};

/// The 20 connection types a Neurona link can carry.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionType {
    Parent,
    Child,
    Validates,
    ValidatedBy,
    Blocks,
    BlockedBy,
    Implements,
    ImplementedBy,
    TestedBy,
    Tests,
    RelatesTo,
    Prerequisite,
    Next,
    Related,
    Opposes,
    BuildsOn,
    Contradicts,
    Cites,
    ExampleOf,
    Proves,
}

impl ConnectionType {
    pub const ALL: [ConnectionType; 20] = [
        ConnectionType::Parent,
        ConnectionType::Child,
        ConnectionType::Validates,
        ConnectionType::ValidatedBy,
        ConnectionType::Blocks,
        ConnectionType::BlockedBy,
        ConnectionType::Implements,
        ConnectionType::ImplementedBy,
        ConnectionType::TestedBy,
        ConnectionType::Tests,
        ConnectionType::RelatesTo,
        ConnectionType::Prerequisite,
        ConnectionType::Next,
        ConnectionType::Related,
        ConnectionType::Opposes,
        ConnectionType::BuildsOn,
        ConnectionType::Contradicts,
        ConnectionType::Cites,
        ConnectionType::ExampleOf,
        ConnectionType::Proves,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionType::Parent => "parent",
            ConnectionType::Child => "child",
            ConnectionType::Validates => "validates",
            ConnectionType::ValidatedBy => "validated_by",
            ConnectionType::Blocks => "blocks",
            ConnectionType::BlockedBy => "blocked_by",
            ConnectionType::Implements => "implements",
            ConnectionType::ImplementedBy => "implemented_by",
            ConnectionType::TestedBy => "tested_by",
            ConnectionType::Tests => "tests",
            ConnectionType::RelatesTo => "relates_to",
            ConnectionType::Prerequisite => "prerequisite",
            ConnectionType::Next => "next",
            ConnectionType::Related => "related",
            ConnectionType::Opposes => "opposes",
            ConnectionType::BuildsOn => "builds_on",
            ConnectionType::Contradicts => "contradicts",
            ConnectionType::Cites => "cites",
            ConnectionType::ExampleOf => "example_of",
            ConnectionType::Proves => "proves",
        }
    }

    /// Parse from the frontmatter/EQL string name. Returns `None` for
    /// anything outside the 20 known types, rather than silently defaulting
    /// — callers decide whether an unknown type is a hard error or a warning.
    pub fn parse_name(s: &str) -> Option<Self> {
        Some(match s.to_lowercase().as_str() {
            "parent" => ConnectionType::Parent,
            "child" => ConnectionType::Child,
            "validates" => ConnectionType::Validates,
            "validated_by" => ConnectionType::ValidatedBy,
            "blocks" => ConnectionType::Blocks,
            "blocked_by" => ConnectionType::BlockedBy,
            "implements" => ConnectionType::Implements,
            "implemented_by" => ConnectionType::ImplementedBy,
            "tested_by" => ConnectionType::TestedBy,
            "tests" => ConnectionType::Tests,
            "relates_to" => ConnectionType::RelatesTo,
            "prerequisite" => ConnectionType::Prerequisite,
            "next" => ConnectionType::Next,
            "related" => ConnectionType::Related,
            "opposes" => ConnectionType::Opposes,
            "builds_on" => ConnectionType::BuildsOn,
            "contradicts" => ConnectionType::Contradicts,
            "cites" => ConnectionType::Cites,
            "example_of" => ConnectionType::ExampleOf,
            "proves" => ConnectionType::Proves,
            _ => return None,
        })
    }

    /// The canonical inverse of this connection type, where one exists.
    /// Directional-only types (`prerequisite`, `next`, `builds_on`, `cites`,
    /// `example_of`, `proves`) have no defined inverse.
    pub fn reverse(&self) -> Option<ConnectionType> {
        Some(match self {
            ConnectionType::Parent => ConnectionType::Child,
            ConnectionType::Child => ConnectionType::Parent,
            ConnectionType::Validates => ConnectionType::ValidatedBy,
            ConnectionType::ValidatedBy => ConnectionType::Validates,
            ConnectionType::Blocks => ConnectionType::BlockedBy,
            ConnectionType::BlockedBy => ConnectionType::Blocks,
            ConnectionType::Implements => ConnectionType::ImplementedBy,
            ConnectionType::ImplementedBy => ConnectionType::Implements,
            ConnectionType::TestedBy => ConnectionType::Tests,
            ConnectionType::Tests => ConnectionType::TestedBy,
            ConnectionType::RelatesTo => ConnectionType::RelatesTo,
            ConnectionType::Related => ConnectionType::Related,
            ConnectionType::Opposes => ConnectionType::Opposes,
            ConnectionType::Contradicts => ConnectionType::Contradicts,
            _ => return None,
        })
    }
}

impl std::fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Default edge weight when a connection omits one (invariant: weight∈[0,100]).
pub const DEFAULT_WEIGHT: u8 = 50;

/// A directed, weighted edge from the owning Neurona to `target_id`.
///
/// `conn_type` is never serialized: it is already encoded by the
/// connection-type group this edge lives under in `Neurona::connections`, so
/// emitting it again as a per-item `type:` field would be redundant with the
/// canonical `id`/`weight`-only frontmatter shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    #[serde(rename = "id")]
    pub target_id: String,
    #[serde(rename = "type", skip_serializing)]
    pub conn_type: ConnectionType,
    #[serde(default = "default_weight")]
    pub weight: u8,
}

fn default_weight() -> u8 {
    DEFAULT_WEIGHT
}

impl Connection {
    pub fn new(target_id: impl Into<String>, conn_type: ConnectionType, weight: u8) -> Self {
        Self {
            target_id: target_id.into(),
            conn_type,
            weight: clamp_weight(weight),
        }
    }
}

/// Clamp a raw weight value to the `[0, 100]` invariant.
pub fn clamp_weight(w: u8) -> u8 {
    w.min(100)
}
