//! Cortex — the per-directory configuration persisted as `cortex.json`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CortexType {
    Zettelkasten,
    Alm,
    Knowledge,
}

impl CortexType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CortexType::Zettelkasten => "zettelkasten",
            CortexType::Alm => "alm",
            CortexType::Knowledge => "knowledge",
        }
    }

    pub fn parse_name(s: &str) -> Option<Self> {
        Some(match s.to_lowercase().as_str() {
            "zettelkasten" => CortexType::Zettelkasten,
            "alm" => CortexType::Alm,
            "knowledge" => CortexType::Knowledge,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capabilities {
    #[serde(rename = "type")]
    pub cortex_type: CortexType,
    pub semantic_search: bool,
    pub llm_integration: bool,
    pub default_language: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexStrategy {
    Lazy,
    Eager,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Indices {
    pub strategy: IndexStrategy,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub embedding_model: Option<String>,
}

/// `cortex.json` — one per cortex directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cortex {
    pub id: String,
    pub name: String,
    pub version: String,
    pub spec_version: String,
    pub capabilities: Capabilities,
    pub indices: Indices,
}

impl Cortex {
    pub fn new(id: impl Into<String>, name: impl Into<String>, cortex_type: CortexType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            version: "0.1.0".to_string(),
            spec_version: "1.0".to_string(),
            capabilities: Capabilities {
                cortex_type,
                semantic_search: true,
                llm_integration: false,
                default_language: "en".to_string(),
            },
            indices: Indices {
                strategy: IndexStrategy::Lazy,
                embedding_model: Some("glove".to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json() {
        let cortex = Cortex::new("proj", "Project", CortexType::Alm);
        let json = serde_json::to_string(&cortex).unwrap();
        let back: Cortex = serde_json::from_str(&json).unwrap();
        assert_eq!(cortex, back);
    }

    #[test]
    fn cortex_type_roundtrips() {
        for t in [CortexType::Zettelkasten, CortexType::Alm, CortexType::Knowledge] {
            assert_eq!(CortexType::parse_name(t.as_str()), Some(t));
        }
    }
}
