//! Shared fixtures and harness for Engram end-to-end tests: build an
//! isolated cortex directory of Markdown+YAML Neuronas on disk, the way a
//! real `init`+`new`+`link` session would leave it.

pub mod fixtures;
pub mod harness;

pub use fixtures::NeuronaFactory;
pub use harness::TestCortex;
