//! Brute-force cosine-similarity vector index over Neurona embeddings.
//!
//! The engine targets cortexes of hundreds to low thousands of Neuronas, so
//! an HNSW index is unneeded complexity; a flat scan is both simpler and
//! fast enough, and drops the `usearch` dependency entirely (see DESIGN.md).

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};

const MAGIC: &[u8; 8] = b"ENGRVEC1";
const VERSION: u32 = 1;

#[derive(Debug, Clone)]
pub struct VectorIndex {
    dim: usize,
    ids: Vec<String>,
    vectors: Vec<Vec<f32>>,
}

impl VectorIndex {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            ids: Vec::new(),
            vectors: Vec::new(),
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Add a vector under `id`. Rejects a vector whose length doesn't match
    /// this index's dimensionality.
    pub fn add_vector(&mut self, id: &str, vec: &[f32]) -> Result<(), VectorIndexError> {
        if vec.len() != self.dim {
            return Err(VectorIndexError::DimensionMismatch {
                expected: self.dim,
                got: vec.len(),
            });
        }
        self.ids.push(id.to_string());
        self.vectors.push(vec.to_vec());
        Ok(())
    }

    /// Top-`limit` neighbors of `query` by cosine similarity, descending.
    pub fn search(&self, query: &[f32], limit: usize) -> Vec<(String, f64)> {
        let mut scored: Vec<(String, f64)> = self
            .ids
            .iter()
            .zip(&self.vectors)
            .map(|(id, v)| (id.clone(), cosine_similarity(query, v)))
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap().then_with(|| a.0.cmp(&b.0)));
        scored.truncate(limit);
        scored
    }

    pub fn save(&self, path: &Path, source_timestamp: DateTime<Utc>) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = path.with_extension("bin.tmp");
        {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(MAGIC)?;
            file.write_all(&VERSION.to_le_bytes())?;
            file.write_all(&(self.dim as u32).to_le_bytes())?;
            file.write_all(&source_timestamp.timestamp().to_le_bytes())?;
            file.write_all(&(self.ids.len() as u32).to_le_bytes())?;
            for (id, vec) in self.ids.iter().zip(&self.vectors) {
                file.write_all(&(id.len() as u16).to_le_bytes())?;
                file.write_all(id.as_bytes())?;
                for f in vec {
                    file.write_all(&f.to_le_bytes())?;
                }
            }
            file.sync_all()?;
        }
        fs::rename(&tmp_path, path)?;
        Ok(())
    }

    /// Load a persisted index along with the source-directory timestamp it
    /// was built from, for the caller to compare against current mtime.
    pub fn load(path: &Path) -> Option<(Self, DateTime<Utc>)> {
        let bytes = fs::read(path).ok()?;
        let mut cursor = io::Cursor::new(bytes);

        let mut magic = [0u8; 8];
        cursor.read_exact(&mut magic).ok()?;
        if &magic != MAGIC {
            return None;
        }
        if read_u32(&mut cursor)? != VERSION {
            return None;
        }
        let dim = read_u32(&mut cursor)? as usize;
        let source_ts = read_i64(&mut cursor)?;
        let n = read_u32(&mut cursor)?;

        let mut index = VectorIndex::new(dim);
        for _ in 0..n {
            let mut len_buf = [0u8; 2];
            cursor.read_exact(&mut len_buf).ok()?;
            let len = u16::from_le_bytes(len_buf) as usize;
            let mut id_buf = vec![0u8; len];
            cursor.read_exact(&mut id_buf).ok()?;
            let id = String::from_utf8(id_buf).ok()?;
            let mut vec = Vec::with_capacity(dim);
            for _ in 0..dim {
                let mut f_buf = [0u8; 4];
                cursor.read_exact(&mut f_buf).ok()?;
                vec.push(f32::from_le_bytes(f_buf));
            }
            index.ids.push(id);
            index.vectors.push(vec);
        }
        let source_timestamp = Utc.timestamp_opt(source_ts, 0).single()?;
        Some((index, source_timestamp))
    }
}

fn read_u32(r: &mut impl Read) -> Option<u32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf).ok()?;
    Some(u32::from_le_bytes(buf))
}

fn read_i64(r: &mut impl Read) -> Option<i64> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf).ok()?;
    Some(i64::from_le_bytes(buf))
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b) {
        dot += (*x as f64) * (*y as f64);
        norm_a += (*x as f64) * (*x as f64);
        norm_b += (*y as f64) * (*y as f64);
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum VectorIndexError {
    #[error("vector dimension mismatch: index expects {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}
