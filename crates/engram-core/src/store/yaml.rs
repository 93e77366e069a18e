//! A minimal YAML-subset reader/value type.
//!
//! Frontmatter only ever uses: scalars, quoted strings, flow sequences
//! (`[a, b]`), block sequences, block mappings, and mappings nested one
//! level deep (for `context` and `connections` groups). This is a
//! purpose-built scanner for exactly that subset rather than a general
//! YAML grammar — the same "don't import a grammar for a narrow need"
//! call the engine makes for FTS query sanitizing elsewhere.

/// A parsed frontmatter value.
#[derive(Debug, Clone, PartialEq)]
pub enum YamlNode {
    Null,
    Scalar(String),
    Seq(Vec<YamlNode>),
    Map(Vec<(String, YamlNode)>),
}

impl YamlNode {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            YamlNode::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[YamlNode]> {
        match self {
            YamlNode::Seq(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[(String, YamlNode)]> {
        match self {
            YamlNode::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&YamlNode> {
        self.as_map()?.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Best-effort string list: a flow/block sequence of scalars, or a
    /// single scalar treated as a one-element list, or empty otherwise.
    pub fn string_list(&self) -> Vec<String> {
        match self {
            YamlNode::Seq(items) => items.iter().filter_map(|i| i.as_str()).map(String::from).collect(),
            YamlNode::Scalar(s) => vec![s.clone()],
            _ => Vec::new(),
        }
    }
}

/// Parse a frontmatter block (the text between the `---` markers) into a
/// `YamlNode::Map`. Malformed lines are skipped rather than aborting the
/// whole parse, matching the File Store's "permissive... recovers from
/// unknown keys" contract; callers that want hard failure on totally
/// unparsable input should check for an empty resulting map themselves.
pub fn parse_frontmatter(text: &str) -> YamlNode {
    let lines = tokenize_lines(text);
    if lines.is_empty() {
        return YamlNode::Map(Vec::new());
    }
    let indent = lines[0].0;
    let mut idx = 0usize;
    parse_block(&lines, &mut idx, indent)
}

fn tokenize_lines(text: &str) -> Vec<(usize, String)> {
    let mut out = Vec::new();
    for raw in text.lines() {
        if raw.trim().is_empty() {
            continue;
        }
        let trimmed_start = raw.trim_start_matches(' ');
        let indent = raw.len() - trimmed_start.len();
        let content = trimmed_start.trim_end();
        if content.starts_with('#') {
            continue;
        }
        out.push((indent, content.to_string()));
    }
    out
}

fn parse_block(lines: &[(usize, String)], idx: &mut usize, indent: usize) -> YamlNode {
    if *idx >= lines.len() || lines[*idx].0 != indent {
        return YamlNode::Null;
    }
    if is_seq_item(&lines[*idx].1) {
        parse_seq(lines, idx, indent)
    } else {
        parse_map(lines, idx, indent)
    }
}

fn is_seq_item(content: &str) -> bool {
    content == "-" || content.starts_with("- ")
}

fn parse_seq(lines: &[(usize, String)], idx: &mut usize, indent: usize) -> YamlNode {
    let mut items = Vec::new();
    while *idx < lines.len() && lines[*idx].0 == indent && is_seq_item(&lines[*idx].1) {
        let content = lines[*idx].1.clone();
        let rest = content.strip_prefix("- ").unwrap_or("").trim().to_string();
        *idx += 1;

        if rest.is_empty() {
            if *idx < lines.len() && lines[*idx].0 > indent {
                let child_indent = lines[*idx].0;
                items.push(parse_block(lines, idx, child_indent));
            } else {
                items.push(YamlNode::Null);
            }
            continue;
        }

        if let Some((key, value)) = split_kv(&rest) {
            // First field of a sequence-of-maps item, e.g. "- id: foo".
            // Continuation fields are indented to align under the first key,
            // i.e. at `indent + 2` (one level past the dash).
            let mut entries = Vec::new();
            entries.push((key, parse_scalar_or_inline(&value)));
            let cont_indent = indent + 2;
            while *idx < lines.len() && lines[*idx].0 == cont_indent {
                let line = lines[*idx].1.clone();
                if let Some((k, v)) = split_kv(&line) {
                    *idx += 1;
                    if v.trim().is_empty() && *idx < lines.len() && lines[*idx].0 > cont_indent {
                        let child_indent = lines[*idx].0;
                        entries.push((k, parse_block(lines, idx, child_indent)));
                    } else {
                        entries.push((k, parse_scalar_or_inline(&v)));
                    }
                } else {
                    break;
                }
            }
            items.push(YamlNode::Map(entries));
        } else {
            items.push(parse_scalar_or_inline(&rest));
        }
    }
    YamlNode::Seq(items)
}

fn parse_map(lines: &[(usize, String)], idx: &mut usize, indent: usize) -> YamlNode {
    let mut entries = Vec::new();
    while *idx < lines.len() && lines[*idx].0 == indent {
        let content = lines[*idx].1.clone();
        if is_seq_item(&content) {
            break;
        }
        match split_kv(&content) {
            Some((key, value)) => {
                *idx += 1;
                if value.trim().is_empty() {
                    if *idx < lines.len() && lines[*idx].0 > indent {
                        let child_indent = lines[*idx].0;
                        entries.push((key, parse_block(lines, idx, child_indent)));
                    } else {
                        entries.push((key, YamlNode::Null));
                    }
                } else {
                    entries.push((key, parse_scalar_or_inline(&value)));
                }
            }
            None => {
                tracing::warn!("skipping unparsable frontmatter line: {}", content);
                *idx += 1;
            }
        }
    }
    YamlNode::Map(entries)
}

/// Split `key: value` on the first unquoted colon-space boundary.
fn split_kv(content: &str) -> Option<(String, String)> {
    let bytes = content.as_bytes();
    let mut in_quote: Option<u8> = None;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match in_quote {
            Some(q) if b == q => in_quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => in_quote = Some(b),
            None if b == b':' && (i + 1 == bytes.len() || bytes[i + 1] == b' ') => {
                let key = content[..i].trim().to_string();
                let value = content[i + 1..].trim().to_string();
                if key.is_empty() {
                    return None;
                }
                return Some((key, value));
            }
            None => {}
        }
        i += 1;
    }
    None
}

fn parse_scalar_or_inline(raw: &str) -> YamlNode {
    let raw = raw.trim();
    if raw.is_empty() || raw == "~" || raw.eq_ignore_ascii_case("null") {
        return YamlNode::Null;
    }
    if raw.starts_with('[') && raw.ends_with(']') {
        let inner = &raw[1..raw.len() - 1];
        if inner.trim().is_empty() {
            return YamlNode::Seq(Vec::new());
        }
        return YamlNode::Seq(
            split_flow_items(inner)
                .into_iter()
                .map(|item| YamlNode::Scalar(unquote(item.trim())))
                .collect(),
        );
    }
    YamlNode::Scalar(unquote(raw))
}

fn split_flow_items(inner: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut in_quote: Option<char> = None;
    for c in inner.chars() {
        match in_quote {
            Some(q) if c == q => {
                in_quote = None;
                current.push(c);
            }
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                in_quote = Some(c);
                current.push(c);
            }
            None if c == ',' => {
                items.push(std::mem::take(&mut current));
            }
            None => current.push(c),
        }
    }
    if !current.trim().is_empty() {
        items.push(current);
    }
    items
}

fn unquote(s: &str) -> String {
    let s = s.trim();
    if s.len() >= 2 {
        let bytes = s.as_bytes();
        if (bytes[0] == b'"' && bytes[s.len() - 1] == b'"')
            || (bytes[0] == b'\'' && bytes[s.len() - 1] == b'\'')
        {
            return s[1..s.len() - 1].to_string();
        }
    }
    s.to_string()
}
