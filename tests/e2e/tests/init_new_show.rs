//! init + new + show: a fresh cortex, a freshly created requirement, and
//! the JSON shape a `show --json` invocation would return for it.

use engram_core::model::{Context, CortexType, NeuronaType};
use engram_e2e::{NeuronaFactory, TestCortex};

#[test]
fn init_creates_cortex_json_and_neuronas_dir() {
    let cortex = TestCortex::new("proj", CortexType::Alm);
    assert!(cortex.root().join("cortex.json").is_file());
    assert!(cortex.neuronas_dir().is_dir());

    let raw = std::fs::read_to_string(cortex.root().join("cortex.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed["capabilities"]["type"], "alm");
}

#[test]
fn new_requirement_has_draft_status() {
    let cortex = TestCortex::new("proj", CortexType::Alm);
    let req = NeuronaFactory::requirement("req.user-login", "User Login");
    cortex.write(&req);

    let read_back = cortex.read("req.user-login").unwrap();
    assert_eq!(read_back.r#type, NeuronaType::Requirement);
    assert_eq!(read_back.context.status(), Some("draft"));
    assert!(matches!(read_back.context, Context::Requirement(_)));
}

#[test]
fn show_json_contains_id_and_type() {
    let cortex = TestCortex::new("proj", CortexType::Alm);
    cortex.write(&NeuronaFactory::requirement("req.user-login", "User Login"));

    let neurona = cortex.read("req.user-login").unwrap();
    let json = serde_json::to_value(&neurona).unwrap();
    assert_eq!(json["id"], "req.user-login");
    assert_eq!(json["type"], "requirement");
}
