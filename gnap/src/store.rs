use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::prelude::*;

/// Durable home of a [GnapState]. Callers read, modify and write back the whole state,
/// so concurrent transactions on the same session must be serialized by them.
pub trait SessionStore: Send + Sync {
    fn get(&self) -> RustyGnapResult<GnapState>;

    fn set(&self, state: GnapState) -> RustyGnapResult<()>;

    /// Read-modify-write helper
    fn update<R>(&self, f: impl FnOnce(&mut GnapState) -> R) -> RustyGnapResult<R>
    where
        Self: Sized,
    {
        let mut state = self.get()?;
        let r = f(&mut state);
        self.set(state)?;
        Ok(r)
    }
}

/// Keeps the session in memory, for tests and short-lived processes
#[derive(Debug, Default)]
pub struct MemoryStore(Mutex<GnapState>);

impl MemoryStore {
    pub fn new(state: GnapState) -> Self {
        Self(Mutex::new(state))
    }
}

impl SessionStore for MemoryStore {
    fn get(&self) -> RustyGnapResult<GnapState> {
        Ok(self.0.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn set(&self, state: GnapState) -> RustyGnapResult<()> {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = state;
        Ok(())
    }
}

/// Keeps the session as a JSON document on disk. A missing file reads as the empty state.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The session holds the private key: on unix only the owner may read it
    fn open_private(path: &Path) -> std::io::Result<std::fs::File> {
        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        std::os::unix::fs::OpenOptionsExt::mode(&mut options, 0o600);
        let file = options.open(path)?;
        // a leftover file keeps its former mode
        #[cfg(unix)]
        file.set_permissions(std::os::unix::fs::PermissionsExt::from_mode(0o600))?;
        Ok(file)
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SessionStore for FileStore {
    fn get(&self) -> RustyGnapResult<GnapState> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(GnapState::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, state: GnapState) -> RustyGnapResult<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        // readers never observe a half written file
        let tmp = self.tmp_path();
        let mut file = Self::open_private(&tmp)?;
        file.write_all(&serde_json::to_vec_pretty(&state)?)?;
        file.sync_all()?;
        drop(file);
        std::fs::rename(&tmp, &self.path)?;
        tracing::trace!(path = %self.path.display(), "session persisted");
        Ok(())
    }
}
