//! link + validate + trace: a test case declares it validates a
//! requirement, and tracing downstream from the requirement finds it.

use std::collections::{HashSet, VecDeque};

use engram_core::graph::Graph;
use engram_core::model::{Connection, ConnectionType, CortexType, DEFAULT_WEIGHT};
use engram_core::validate;
use engram_e2e::{NeuronaFactory, TestCortex};

/// Reverse BFS over incoming edges, the way `trace --down`/`impact` walk a
/// dependent's edge back to what it depends on.
fn bfs_reverse(graph: &Graph, start: &str) -> Vec<(String, usize)> {
    let mut levels = vec![(start.to_string(), 0usize)];
    let mut seen: HashSet<String> = HashSet::from([start.to_string()]);
    let mut queue: VecDeque<(String, usize)> = VecDeque::from([(start.to_string(), 0)]);
    while let Some((id, level)) = queue.pop_front() {
        for edge in graph.get_incoming(&id) {
            if seen.insert(edge.target.clone()) {
                levels.push((edge.target.clone(), level + 1));
                queue.push_back((edge.target.clone(), level + 1));
            }
        }
    }
    levels
}

#[test]
fn link_writes_validates_edge_on_the_test_case() {
    let cortex = TestCortex::new("proj", CortexType::Alm);
    cortex.write(&NeuronaFactory::requirement("req.user-login", "User Login"));
    cortex.write(&NeuronaFactory::test_case("test.user-login", "User Login Test"));

    assert!(validate::is_allowed(
        engram_core::model::NeuronaType::TestCase,
        engram_core::model::NeuronaType::Requirement,
        ConnectionType::Validates
    ));

    let mut test_case = cortex.read("test.user-login").unwrap();
    test_case
        .connections
        .entry(ConnectionType::Validates.as_str().to_string())
        .or_default()
        .push(Connection::new("req.user-login", ConnectionType::Validates, DEFAULT_WEIGHT));
    cortex.write(&test_case);

    let read_back = cortex.read("test.user-login").unwrap();
    let edges = &read_back.connections[ConnectionType::Validates.as_str()];
    assert_eq!(edges[0].target_id, "req.user-login");
}

#[test]
fn trace_down_from_requirement_finds_validating_test() {
    let cortex = TestCortex::new("proj", CortexType::Alm);
    cortex.write(&NeuronaFactory::requirement("req.user-login", "User Login"));
    let test_case = NeuronaFactory::linked(
        NeuronaFactory::test_case("test.user-login", "User Login Test"),
        ConnectionType::Validates,
        "req.user-login",
        DEFAULT_WEIGHT,
    );
    cortex.write(&test_case);

    let neuronas = cortex.scan().unwrap();
    let mut graph = Graph::new();
    for n in &neuronas {
        for conn in n.all_connections() {
            graph.add_edge(&n.id, &conn.target_id, conn.weight);
        }
    }

    let down = bfs_reverse(&graph, "req.user-login");
    assert_eq!(down, vec![
        ("req.user-login".to_string(), 0),
        ("test.user-login".to_string(), 1),
    ]);
}
