//! Data Model — Neurona, Connection, Context, Cortex.

mod connection;
mod context;
mod cortex;
mod neurona;

pub use connection::{clamp_weight, Connection, ConnectionType, DEFAULT_WEIGHT};
pub use context::{
    ArtifactContext, ConceptContext, Context, IssueContext, LessonContext, ReferenceContext,
    RequirementContext, StateMachineContext, TestCaseContext,
};
pub use cortex::{Capabilities, Cortex, CortexType, IndexStrategy, Indices};
pub use neurona::{format_timestamp, Neurona, NeuronaType};
