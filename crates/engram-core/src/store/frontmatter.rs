//! Translate between [`YamlNode`] frontmatter and [`Neurona`].

use std::collections::BTreeMap;
use std::path::Path;

use chrono::Utc;

use super::yaml::YamlNode;
use crate::error::{EngramError, FormatError, Result, SchemaError};
use crate::model::{
    ArtifactContext, ConceptContext, Connection, ConnectionType, Context, IssueContext,
    LessonContext, Neurona, NeuronaType, ReferenceContext, RequirementContext,
    StateMachineContext, TestCaseContext,
};

/// Split a raw file's text into its frontmatter block and Markdown body.
/// Files without a well-formed `---`-delimited header are treated as
/// bodyless, frontmatter-less documents (the caller then fails required-field
/// validation, which is the correct diagnostic for a non-Neurona `.md` file).
pub fn split_document(text: &str) -> Option<(&str, &str)> {
    let rest = text.strip_prefix("---\n").or_else(|| text.strip_prefix("---\r\n"))?;
    let end = rest.find("\n---\n").or_else(|| rest.find("\n---\r\n"))?;
    let frontmatter = &rest[..end];
    let after = &rest[end + 1..];
    let body_start = after.find('\n').map(|i| i + 1).unwrap_or(after.len());
    let body = after[body_start..].trim_start_matches('\n');
    Some((frontmatter, body))
}

pub fn neurona_from_document(text: &str, path: &Path) -> Result<Neurona> {
    let (frontmatter, body) = split_document(text).ok_or_else(|| {
        EngramError::Format(FormatError::InvalidNeuronaFormat {
            path: path.to_path_buf(),
            reason: "missing `---` frontmatter delimiters".to_string(),
        })
    })?;
    let doc = super::yaml::parse_frontmatter(frontmatter);
    let mut neurona = neurona_from_yaml(&doc, path)?;
    neurona.body = body.to_string();
    Ok(neurona)
}

fn neurona_from_yaml(doc: &YamlNode, path: &Path) -> Result<Neurona> {
    let id = doc
        .get("id")
        .and_then(YamlNode::as_str)
        .ok_or_else(|| SchemaError::MissingRequiredField {
            path: path.to_path_buf(),
            field: "id",
        })?
        .to_string();
    let title = doc
        .get("title")
        .and_then(YamlNode::as_str)
        .ok_or_else(|| SchemaError::MissingRequiredField {
            path: path.to_path_buf(),
            field: "title",
        })?
        .to_string();
    let tags = doc.get("tags").map(YamlNode::string_list).unwrap_or_default();
    let r#type = doc
        .get("type")
        .and_then(YamlNode::as_str)
        .map(NeuronaType::parse_name)
        .unwrap_or_default();
    let updated = doc
        .get("updated")
        .and_then(YamlNode::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| crate::model::format_timestamp(Utc::now()));
    let language = doc
        .get("language")
        .and_then(YamlNode::as_str)
        .unwrap_or("en")
        .to_string();
    let hash = doc.get("hash").and_then(YamlNode::as_str).map(str::to_string);
    let context = doc
        .get("context")
        .map(|c| context_from_yaml(r#type, c))
        .unwrap_or(Context::None);
    let connections = doc
        .get("connections")
        .map(connections_from_yaml)
        .unwrap_or_default();

    Ok(Neurona {
        id,
        title,
        tags,
        r#type,
        updated,
        language,
        hash,
        context,
        connections,
        body: String::new(),
    })
}

/// Build the context payload matching `neurona_type`, ignoring any block
/// that doesn't match (invariant 5: a mismatched context is treated as
/// empty rather than coerced or rejected).
fn context_from_yaml(neurona_type: NeuronaType, node: &YamlNode) -> Context {
    let value = yaml_to_json(node);
    match neurona_type {
        NeuronaType::StateMachine => serde_json::from_value::<StateMachineContext>(value)
            .map(Context::StateMachine)
            .unwrap_or(Context::None),
        NeuronaType::Artifact => serde_json::from_value::<ArtifactContext>(value)
            .map(Context::Artifact)
            .unwrap_or(Context::None),
        NeuronaType::TestCase => serde_json::from_value::<TestCaseContext>(value)
            .map(Context::TestCase)
            .unwrap_or(Context::None),
        NeuronaType::Issue => serde_json::from_value::<IssueContext>(value)
            .map(Context::Issue)
            .unwrap_or(Context::None),
        NeuronaType::Requirement => serde_json::from_value::<RequirementContext>(value)
            .map(Context::Requirement)
            .unwrap_or(Context::None),
        NeuronaType::Concept => serde_json::from_value::<ConceptContext>(value)
            .map(Context::Concept)
            .unwrap_or(Context::None),
        NeuronaType::Reference => serde_json::from_value::<ReferenceContext>(value)
            .map(Context::Reference)
            .unwrap_or(Context::None),
        NeuronaType::Lesson => serde_json::from_value::<LessonContext>(value)
            .map(Context::Lesson)
            .unwrap_or(Context::None),
        // `feature` has no dedicated context payload; anything present is
        // dropped rather than guessed at.
        NeuronaType::Feature => Context::None,
    }
}

fn connections_from_yaml(node: &YamlNode) -> BTreeMap<String, Vec<Connection>> {
    let mut out: BTreeMap<String, Vec<Connection>> = BTreeMap::new();
    match node {
        YamlNode::Map(groups) => {
            for (group, items) in groups {
                let Some(conn_type) = ConnectionType::parse_name(group) else {
                    tracing::warn!("skipping unknown connection type in frontmatter: {group}");
                    continue;
                };
                let Some(items) = items.as_seq() else { continue };
                let mut edges = Vec::new();
                for item in items {
                    let target = item
                        .get("id")
                        .or_else(|| item.get("target"))
                        .and_then(YamlNode::as_str);
                    let Some(target) = target else { continue };
                    let weight = item
                        .get("weight")
                        .and_then(YamlNode::as_str)
                        .and_then(|w| w.parse::<u8>().ok())
                        .unwrap_or(crate::model::DEFAULT_WEIGHT);
                    edges.push(Connection::new(target, conn_type, weight));
                }
                if !edges.is_empty() {
                    out.entry(conn_type.as_str().to_string()).or_default().extend(edges);
                }
            }
        }
        YamlNode::Seq(_) => {
            // Legacy flat form: ["type:target:weight", ...].
            for token in node.string_list() {
                let parts: Vec<&str> = token.splitn(3, ':').collect();
                let [conn_name, target, weight_str] = parts.as_slice() else {
                    tracing::warn!("skipping malformed legacy connection token: {token}");
                    continue;
                };
                let Some(conn_type) = ConnectionType::parse_name(conn_name) else {
                    tracing::warn!("skipping unknown connection type in legacy token: {token}");
                    continue;
                };
                let weight = weight_str.parse::<u8>().unwrap_or(crate::model::DEFAULT_WEIGHT);
                out.entry(conn_type.as_str().to_string())
                    .or_default()
                    .push(Connection::new(*target, conn_type, weight));
            }
        }
        _ => {}
    }
    out
}

fn yaml_to_json(node: &YamlNode) -> serde_json::Value {
    match node {
        YamlNode::Null => serde_json::Value::Null,
        YamlNode::Scalar(s) => scalar_to_json(s),
        YamlNode::Seq(items) => serde_json::Value::Array(items.iter().map(yaml_to_json).collect()),
        YamlNode::Map(entries) => {
            let mut map = serde_json::Map::new();
            for (k, v) in entries {
                map.insert(k.clone(), yaml_to_json(v));
            }
            serde_json::Value::Object(map)
        }
    }
}

fn scalar_to_json(s: &str) -> serde_json::Value {
    if s == "true" {
        return serde_json::Value::Bool(true);
    }
    if s == "false" {
        return serde_json::Value::Bool(false);
    }
    if let Ok(i) = s.parse::<i64>() {
        return serde_json::Value::Number(i.into());
    }
    if let Ok(f) = s.parse::<f64>() {
        if let Some(n) = serde_json::Number::from_f64(f) {
            return serde_json::Value::Number(n);
        }
    }
    serde_json::Value::String(s.to_string())
}

/// Render the canonical frontmatter + body document for `neurona`.
///
/// `serde_yaml` handles the emission — the struct's own field order and
/// `skip_serializing_if` annotations already encode Tier 1/2/3 canonical
/// order and the "empty defaults are omitted" rule, so there is nothing
/// bespoke to do here beyond wrapping it in the `---` fences.
pub fn render_document(neurona: &Neurona) -> Result<String> {
    let frontmatter = serde_yaml::to_string(neurona)
        .map_err(|e| EngramError::Format(FormatError::InvalidYaml(e.to_string())))?;
    let frontmatter = frontmatter.strip_prefix("---\n").unwrap_or(&frontmatter);
    Ok(format!("---\n{frontmatter}---\n\n{}", neurona.body))
}
