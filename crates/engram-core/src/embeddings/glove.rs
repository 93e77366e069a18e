//! GloVe word-vector loader: parses the canonical text format, caches it as
//! a binary file for fast startup, and averages token vectors into a
//! Neurona/query embedding.

use std::collections::HashMap;
use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::Path;

const CACHE_MAGIC: &[u8; 4] = b"ENGE";
const CACHE_VERSION: u8 = 1;

#[derive(Debug, Clone)]
pub struct GloveTable {
    dim: usize,
    vectors: HashMap<String, Vec<f32>>,
}

impl GloveTable {
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Look up a word. Out-of-vocabulary words return `None` — callers must
    /// never treat a miss as fatal.
    pub fn lookup(&self, word: &str) -> Option<&[f32]> {
        self.vectors.get(word).map(Vec::as_slice)
    }

    /// Parse a GloVe text file: one `"<word> <f1> <f2> ..."` line per word.
    /// Dimension is inferred from the first line.
    pub fn load_text(path: &Path) -> io::Result<Self> {
        let file = fs::File::open(path)?;
        let reader = io::BufReader::new(file);
        let mut vectors = HashMap::new();
        let mut dim = 0usize;

        for line in reader.lines() {
            let line = line?;
            let mut parts = line.split_whitespace();
            let Some(word) = parts.next() else { continue };
            let values: Vec<f32> = parts.filter_map(|p| p.parse::<f32>().ok()).collect();
            if values.is_empty() {
                continue;
            }
            if dim == 0 {
                dim = values.len();
            }
            if values.len() == dim {
                vectors.insert(word.to_string(), values);
            }
        }
        Ok(Self { dim, vectors })
    }

    pub fn save_cache(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = path.with_extension("bin.tmp");
        {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(CACHE_MAGIC)?;
            file.write_all(&[CACHE_VERSION])?;
            file.write_all(&(self.dim as u32).to_le_bytes())?;
            file.write_all(&(self.vectors.len() as u32).to_le_bytes())?;
            for (word, vec) in &self.vectors {
                file.write_all(&(word.len() as u16).to_le_bytes())?;
                file.write_all(word.as_bytes())?;
                for f in vec {
                    file.write_all(&f.to_le_bytes())?;
                }
            }
            file.sync_all()?;
        }
        fs::rename(&tmp_path, path)?;
        Ok(())
    }

    /// Load a binary cache written by [`GloveTable::save_cache`]. Returns
    /// `None` on any corruption or version mismatch rather than erroring —
    /// the caller falls back to rebuilding from the text source.
    pub fn load_cache(path: &Path) -> Option<Self> {
        let bytes = fs::read(path).ok()?;
        let mut cursor = io::Cursor::new(bytes);

        let mut magic = [0u8; 4];
        cursor.read_exact(&mut magic).ok()?;
        if &magic != CACHE_MAGIC {
            return None;
        }
        let mut version = [0u8; 1];
        cursor.read_exact(&mut version).ok()?;
        if version[0] != CACHE_VERSION {
            return None;
        }
        let dim = read_u32(&mut cursor)? as usize;
        let n = read_u32(&mut cursor)?;

        let mut vectors = HashMap::with_capacity(n as usize);
        for _ in 0..n {
            let mut len_buf = [0u8; 2];
            cursor.read_exact(&mut len_buf).ok()?;
            let len = u16::from_le_bytes(len_buf) as usize;
            let mut word_buf = vec![0u8; len];
            cursor.read_exact(&mut word_buf).ok()?;
            let word = String::from_utf8(word_buf).ok()?;
            let mut vec = Vec::with_capacity(dim);
            for _ in 0..dim {
                let mut f_buf = [0u8; 4];
                cursor.read_exact(&mut f_buf).ok()?;
                vec.push(f32::from_le_bytes(f_buf));
            }
            vectors.insert(word, vec);
        }
        Some(Self { dim, vectors })
    }
}

fn read_u32(r: &mut impl Read) -> Option<u32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf).ok()?;
    Some(u32::from_le_bytes(buf))
}

/// Average the GloVe vectors of `text`'s tokens (tokenized identically to
/// BM25). OOV tokens are ignored; if none are found, returns the zero
/// vector — a documented degenerate case, never a panic.
pub fn embed_text(table: &GloveTable, text: &str) -> Vec<f32> {
    let tokens = crate::text::tokenize(text);
    let mut sum = vec![0f32; table.dim()];
    let mut found = 0usize;
    for token in &tokens {
        if let Some(vec) = table.lookup(token) {
            for (acc, v) in sum.iter_mut().zip(vec) {
                *acc += v;
            }
            found += 1;
        }
    }
    if found == 0 {
        return sum;
    }
    for v in &mut sum {
        *v /= found as f32;
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_text_file(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("glove.txt");
        fs::write(&path, "hello 1.0 0.0\nworld 0.0 1.0\n").unwrap();
        path
    }

    #[test]
    fn loads_text_format_and_infers_dimension() {
        let dir = tempdir().unwrap();
        let table = GloveTable::load_text(&sample_text_file(dir.path())).unwrap();
        assert_eq!(table.dim(), 2);
        assert_eq!(table.lookup("hello"), Some([1.0f32, 0.0].as_slice()));
        assert!(table.lookup("missing").is_none());
    }

    #[test]
    fn cache_round_trips() {
        let dir = tempdir().unwrap();
        let table = GloveTable::load_text(&sample_text_file(dir.path())).unwrap();
        let cache_path = dir.path().join("glove_cache.bin");
        table.save_cache(&cache_path).unwrap();

        let loaded = GloveTable::load_cache(&cache_path).unwrap();
        assert_eq!(loaded.dim(), 2);
        assert_eq!(loaded.lookup("world"), Some([0.0f32, 1.0].as_slice()));
    }

    #[test]
    fn embed_text_averages_found_tokens() {
        let dir = tempdir().unwrap();
        let table = GloveTable::load_text(&sample_text_file(dir.path())).unwrap();
        let vec = embed_text(&table, "hello world");
        assert_eq!(vec, vec![0.5, 0.5]);
    }

    #[test]
    fn embed_text_all_oov_yields_zero_vector() {
        let dir = tempdir().unwrap();
        let table = GloveTable::load_text(&sample_text_file(dir.path())).unwrap();
        let vec = embed_text(&table, "zzzzz qqqqq");
        assert_eq!(vec, vec![0.0, 0.0]);
    }

    #[test]
    fn load_cache_rejects_bad_magic() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.bin");
        fs::write(&path, b"NOPE\x01").unwrap();
        assert!(GloveTable::load_cache(&path).is_none());
    }
}
