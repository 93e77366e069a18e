//! Test Cortex harness
//!
//! Provides isolated cortex directories for testing:
//! - Temporary directories that are automatically cleaned up
//! - A `cortex.json` pre-seeded the way `engram init` would leave it
//! - Helpers that write/scan Neuronas without going through the CLI

use std::path::{Path, PathBuf};

use engram_core::error::Result;
use engram_core::model::{Cortex, CortexType, Neurona};
use engram_core::store;
use engram_core::sync::{self, SyncConfig, SyncReport};
use tempfile::TempDir;

/// An isolated cortex directory for one test.
///
/// The directory (and everything under it) is deleted when the harness is
/// dropped.
pub struct TestCortex {
    _temp_dir: TempDir,
    root: PathBuf,
}

impl TestCortex {
    /// Create a new cortex directory with `cortex.json` and an empty
    /// `neuronas/` directory, mirroring `engram init <name> --type <type>`.
    pub fn new(name: &str, cortex_type: CortexType) -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        std::fs::create_dir_all(root.join("neuronas")).unwrap();
        std::fs::create_dir_all(root.join(".activations/cache")).unwrap();

        let cortex = Cortex::new(name, name, cortex_type);
        std::fs::write(root.join("cortex.json"), serde_json::to_string_pretty(&cortex).unwrap()).unwrap();

        Self { _temp_dir: temp_dir, root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn neuronas_dir(&self) -> PathBuf {
        self.root.join("neuronas")
    }

    /// Write `neurona` to its canonical `<id>.md` path.
    pub fn write(&self, neurona: &Neurona) {
        let path = self.neuronas_dir().join(format!("{}.md", neurona.id));
        store::write_neurona(neurona, &path, false).expect("failed to write neurona");
    }

    /// Re-read `id` from disk, the way a fresh CLI invocation would.
    pub fn read(&self, id: &str) -> Result<Neurona> {
        let path = store::find_neurona_path(&self.neuronas_dir(), id)?;
        store::read_neurona(&path)
    }

    pub fn scan(&self) -> Result<Vec<Neurona>> {
        store::scan_neuronas(&self.neuronas_dir())
    }

    /// Run the full scan -> graph -> cache -> vectors pipeline.
    pub fn sync(&self, force: bool) -> Result<SyncReport> {
        sync::run(&self.root, SyncConfig { force }, &|| false)
    }
}
