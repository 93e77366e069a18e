//! Directory-level File Store operations: scan, locate, read, atomic write.

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use super::frontmatter::{neurona_from_document, render_document};
use crate::error::{EngramError, NotFoundError, Result};
use crate::model::Neurona;

/// `true` iff `name` names a Markdown file by extension.
pub fn is_neurona_file(name: &str) -> bool {
    name.ends_with(".md")
}

/// Parse the Neurona at `path`, frontmatter and body together.
pub fn read_neurona(path: &Path) -> Result<Neurona> {
    let text = fs::read_to_string(path).map_err(|e| EngramError::io(path, e))?;
    neurona_from_document(&text, path)
}

/// Parse the Neurona at `path`, returning its frontmatter and Markdown body
/// together.
pub fn read_neurona_with_parts(path: &Path) -> Result<(Neurona, String)> {
    let neurona = read_neurona(path)?;
    let body = neurona.body.clone();
    Ok((neurona, body))
}

/// Serialize `neurona` to canonical form and write it atomically: write to
/// `<path>.tmp`, fsync, then rename over `path`.
///
/// When `preserve_body` is `false`, `neurona.body` is written verbatim (the
/// caller is expected to have already set the body it wants persisted); the
/// flag exists so callers updating only frontmatter can opt into re-reading
/// the existing body first rather than truncating it.
pub fn write_neurona(neurona: &Neurona, path: &Path, preserve_body: bool) -> Result<()> {
    let mut neurona = neurona.clone();
    if preserve_body && path.exists() {
        if let Ok(existing) = read_neurona(path) {
            neurona.body = existing.body;
        }
    }
    let text = render_document(&neurona)?;
    let tmp_path = path.with_extension("md.tmp");
    {
        let mut file = fs::File::create(&tmp_path).map_err(|e| EngramError::io(&tmp_path, e))?;
        file.write_all(text.as_bytes()).map_err(|e| EngramError::io(&tmp_path, e))?;
        file.sync_all().map_err(|e| EngramError::io(&tmp_path, e))?;
    }
    fs::rename(&tmp_path, path).map_err(|e| EngramError::io(path, e))?;
    Ok(())
}

/// All `.md` file paths directly inside `dir`.
pub fn list_neurona_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    let entries = fs::read_dir(dir).map_err(|e| EngramError::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| EngramError::io(dir, e))?;
        let path = entry.path();
        if path.is_file() {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if is_neurona_file(name) {
                    out.push(path);
                }
            }
        }
    }
    out.sort();
    Ok(out)
}

/// Parse every `.md` child of `dir`. Per-file parse failures are logged and
/// skipped rather than aborting the scan.
pub fn scan_neuronas(dir: &Path) -> Result<Vec<Neurona>> {
    let mut out = Vec::new();
    for path in list_neurona_files(dir)? {
        match read_neurona(&path) {
            Ok(n) => out.push(n),
            Err(e) => tracing::warn!("skipping {}: {e}", path.display()),
        }
    }
    Ok(out)
}

/// Latest mtime among `.md` children of `dir`, used for vector-index
/// staleness comparisons. Returns `None` for an empty or unreadable
/// directory.
pub fn latest_modification_time(dir: &Path) -> Option<DateTime<Utc>> {
    let files = list_neurona_files(dir).ok()?;
    files
        .iter()
        .filter_map(|p| fs::metadata(p).ok()?.modified().ok())
        .map(DateTime::<Utc>::from)
        .max()
}

/// Locate the file for `id`: exact `<dir>/<id>.md` first, else the unique
/// filename containing `id` as a substring.
pub fn find_neurona_path(dir: &Path, id: &str) -> Result<PathBuf> {
    let exact = dir.join(format!("{id}.md"));
    if exact.is_file() {
        return Ok(exact);
    }
    let candidates: Vec<PathBuf> = list_neurona_files(dir)?
        .into_iter()
        .filter(|p| {
            p.file_stem()
                .and_then(|s| s.to_str())
                .map(|s| s.contains(id))
                .unwrap_or(false)
        })
        .collect();
    match candidates.len() {
        1 => Ok(candidates.into_iter().next().unwrap()),
        _ => Err(EngramError::NotFound(NotFoundError::NeuronaNotFound(id.to_string()))),
    }
}

/// Resolve `id` to a file by exact id or unique prefix/substring, then
/// return its parsed Neurona alongside the raw Markdown body.
pub fn read_neurona_with_body(dir: &Path, id: &str) -> Result<(Neurona, String)> {
    let path = find_neurona_path(dir, id)?;
    read_neurona_with_parts(&path)
}
