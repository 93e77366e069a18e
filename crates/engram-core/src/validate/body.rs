//! Body/frontmatter invariant: connection tokens (`type:target:weight`)
//! must never appear in a Neurona's Markdown body.

use crate::error::{EngramError, Result, ValidationError};
use crate::model::ConnectionType;

/// Reject `body` if it contains what looks like a connection token.
pub fn check_body(neurona_id: &str, body: &str) -> Result<()> {
    for token in body.split_whitespace() {
        let trimmed = token.trim_matches(|c: char| !c.is_alphanumeric() && c != ':' && c != '_');
        let parts: Vec<&str> = trimmed.splitn(3, ':').collect();
        if parts.len() == 3 && ConnectionType::parse_name(parts[0]).is_some() && !parts[1].is_empty() {
            return Err(EngramError::Validation(ValidationError::ConnectionsInBodyNotAllowed(
                neurona_id.to_string(),
            )));
        }
    }
    Ok(())
}
