//! Filter-mode EQL queries over a small, flat cortex.

use engram_core::model::CortexType;
use engram_core::query::{execute, QueryConfig, QueryContext, QueryMode};
use engram_e2e::{NeuronaFactory, TestCortex};

fn sample_cortex() -> TestCortex {
    let cortex = TestCortex::new("proj", CortexType::Alm);
    cortex.write(&NeuronaFactory::requirement("req.user-login", "User Login"));
    cortex.write(&NeuronaFactory::test_case("test.user-login", "User Login Test"));
    cortex.write(&NeuronaFactory::issue("issue.flaky-login", "Flaky login"));
    cortex
}

#[test]
fn simple_type_filter_matches_one_requirement() {
    let cortex = sample_cortex();
    let neuronas = cortex.scan().unwrap();
    let ctx = QueryContext { neuronas: &neuronas, bm25: None, vectors: None, glove: None, graph: None };
    let config = QueryConfig {
        mode: QueryMode::Filter,
        eql: Some("type:requirement".to_string()),
        text: None,
        limit: 20,
    };

    let results = execute(&config, &ctx).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].neurona.id, "req.user-login");
}

#[test]
fn and_or_not_composition_matches_same_singleton() {
    let cortex = sample_cortex();
    let neuronas = cortex.scan().unwrap();
    let ctx = QueryContext { neuronas: &neuronas, bm25: None, vectors: None, glove: None, graph: None };
    let config = QueryConfig {
        mode: QueryMode::Filter,
        eql: Some("(type:requirement OR type:issue) AND NOT type:issue".to_string()),
        text: None,
        limit: 20,
    };

    let results = execute(&config, &ctx).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].neurona.id, "req.user-login");
}
