use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Serialize fully in memory, write to a sibling temp file, then rename so a
/// reader never observes a half-written strings.xml.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("xml.tmp");
    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path)
}

/// Copy `path` to `path.with_extension("xml.bak")` when it exists.
pub fn backup_file(path: &Path) -> io::Result<()> {
    if path.exists() {
        std::fs::copy(path, path.with_extension("xml.bak"))?;
    }
    Ok(())
}

/// Last-request-wins guard for scan/preview recomputation. Every `begin`
/// invalidates all previously issued tokens; a caller discards any result
/// whose token is no longer current by the time it completes.
#[derive(Debug, Clone, Default)]
pub struct Generation {
    counter: Arc<AtomicU64>,
}

#[derive(Debug, Clone)]
pub struct GenerationToken {
    value: u64,
    counter: Arc<AtomicU64>,
}

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> GenerationToken {
        let value = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        GenerationToken {
            value,
            counter: Arc::clone(&self.counter),
        }
    }
}

impl GenerationToken {
    pub fn is_current(&self) -> bool {
        self.counter.load(Ordering::SeqCst) == self.value
    }
}
