//! Binary persistence for `.activations/graph.idx`.
//!
//! Layout: `[magic:8][version:u32][node_count:u32]` then one record per
//! node, sorted by id for deterministic output regardless of thread count:
//! `[id_len:u16][id][edge_count:u32] { [target_len:u16][target][weight:u8] }`.
//! All integers little-endian. Reverse edges are derived at load time via
//! `Graph::add_edge`.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use super::Graph;

const MAGIC: &[u8; 8] = b"ENGRGRPH";
const VERSION: u32 = 1;

pub fn save_graph(graph: &Graph, path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("idx.tmp");
    {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(MAGIC)?;
        file.write_all(&VERSION.to_le_bytes())?;

        let mut ids: Vec<&str> = graph.nodes().collect();
        ids.sort_unstable();
        file.write_all(&(ids.len() as u32).to_le_bytes())?;
        for id in ids {
            let edges = graph.forward_entries().get(id).map(Vec::as_slice).unwrap_or(&[]);
            write_str(&mut file, id)?;
            file.write_all(&(edges.len() as u32).to_le_bytes())?;
            for edge in edges {
                write_str(&mut file, &edge.target)?;
                file.write_all(&[edge.weight])?;
            }
        }
        file.sync_all()?;
    }
    fs::rename(&tmp_path, path)?;
    Ok(())
}

fn write_str(w: &mut impl Write, s: &str) -> io::Result<()> {
    w.write_all(&(s.len() as u16).to_le_bytes())?;
    w.write_all(s.as_bytes())
}

fn read_str(r: &mut impl Read) -> io::Result<String> {
    let mut len_buf = [0u8; 2];
    r.read_exact(&mut len_buf)?;
    let len = u16::from_le_bytes(len_buf) as usize;
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf)?;
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Load a persisted graph. Any parse failure (bad magic, truncated file,
/// version mismatch) is treated as "missing" per spec — the caller rebuilds
/// on the next sync rather than surfacing a hard error.
pub fn load_graph(path: &Path) -> Option<Graph> {
    let bytes = fs::read(path).ok()?;
    let mut cursor = io::Cursor::new(bytes);

    let mut magic = [0u8; 8];
    cursor.read_exact(&mut magic).ok()?;
    if &magic != MAGIC {
        return None;
    }
    let mut version_buf = [0u8; 4];
    cursor.read_exact(&mut version_buf).ok()?;
    if u32::from_le_bytes(version_buf) != VERSION {
        return None;
    }
    let mut count_buf = [0u8; 4];
    cursor.read_exact(&mut count_buf).ok()?;
    let node_count = u32::from_le_bytes(count_buf);

    let mut graph = Graph::new();
    for _ in 0..node_count {
        let id = read_str(&mut cursor).ok()?;
        graph.insert_node(&id);
        let mut edge_count_buf = [0u8; 4];
        cursor.read_exact(&mut edge_count_buf).ok()?;
        let edge_count = u32::from_le_bytes(edge_count_buf);
        for _ in 0..edge_count {
            let target = read_str(&mut cursor).ok()?;
            let mut weight_buf = [0u8; 1];
            cursor.read_exact(&mut weight_buf).ok()?;
            graph.add_edge(&id, &target, weight_buf[0]);
        }
    }
    Some(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_then_load_round_trips() {
        let mut g = Graph::new();
        g.add_edge("a", "b", 100);
        g.add_edge("b", "c", 42);

        let dir = tempdir().unwrap();
        let path = dir.path().join(".activations/graph.idx");
        save_graph(&g, &path).unwrap();
        assert!(!path.with_extension("idx.tmp").exists());

        let loaded = load_graph(&path).unwrap();
        assert_eq!(loaded.node_count(), 3);
        assert_eq!(loaded.edge_count(), 2);
        assert!(loaded.has_edge("a", "b"));
        assert_eq!(loaded.get_adjacent("b")[0].weight, 42);
    }

    #[test]
    fn load_missing_file_returns_none() {
        let dir = tempdir().unwrap();
        assert!(load_graph(&dir.path().join("nope.idx")).is_none());
    }

    #[test]
    fn load_bad_magic_returns_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.idx");
        fs::write(&path, b"NOPE\x01\x01\x01\x01").unwrap();
        assert!(load_graph(&path).is_none());
    }
}
