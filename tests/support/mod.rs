use std::path::Path;

/// Thin wrapper over `tempfile::TempDir` so integration tests follow the
/// same idiom the unit tests already use throughout `src/`.
pub struct TempDir(tempfile::TempDir);

impl TempDir {
    pub fn new() -> Self {
        Self(tempfile::TempDir::new().expect("failed to create scratch dome directory"))
    }

    pub fn path(&self) -> &Path {
        self.0.path()
    }
}
